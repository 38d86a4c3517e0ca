use crate::error::{CoreError, CoreResult};
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

pub trait Render: fmt::Debug {
    fn type_name(&self) -> &str;
    fn render(&self) -> CoreResult<String>;
}

/// Foreign value rendered through its `Display` impl.
#[derive(Debug, Clone)]
pub struct Displayed<T> {
    type_name: String,
    inner: T,
}

impl<T: fmt::Display + fmt::Debug> Displayed<T> {
    pub fn new(type_name: impl Into<String>, inner: T) -> Self {
        Self {
            type_name: type_name.into(),
            inner,
        }
    }
}

impl<T: fmt::Display + fmt::Debug> Render for Displayed<T> {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn render(&self) -> CoreResult<String> {
        Ok(self.inner.to_string())
    }
}

/// Foreign value whose rendering always fails.
#[derive(Debug, Clone)]
pub struct Unrenderable {
    type_name: String,
    reason: String,
}

impl Unrenderable {
    pub fn new(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }
}

impl Render for Unrenderable {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn render(&self) -> CoreResult<String> {
        Err(CoreError::Render {
            type_name: self.type_name.clone(),
            reason: self.reason.clone(),
        })
    }
}

pub const MAPPING_TYPE: &str = "mapping";
pub const SEQUENCE_TYPE: &str = "sequence";

/// Shared, ordered mapping. Clones are handles to the same cell.
///
/// A map inserted into itself (directly or through other containers) forms a
/// strong `Rc` cycle that is never freed on its own; call [`RawMap::clear`]
/// on one member once the graph is no longer needed.
#[derive(Clone, Default)]
pub struct RawMap(Rc<RefCell<Vec<(String, RawValue)>>>);

impl RawMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stable for the lifetime of the map, shared by all clones of the handle.
    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    /// Inserts or replaces; a replaced key keeps its original position.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<RawValue>) {
        let key = key.into();
        let value = value.into();
        let mut entries = self.0.borrow_mut();
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<RawValue> {
        self.0
            .borrow()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn try_entries(&self) -> CoreResult<Ref<'_, Vec<(String, RawValue)>>> {
        self.0.try_borrow().map_err(|_| CoreError::Borrowed {
            type_name: MAPPING_TYPE.to_string(),
        })
    }

    pub fn entries_mut(&self) -> RefMut<'_, Vec<(String, RawValue)>> {
        self.0.borrow_mut()
    }

    /// Drops all entries, releasing any handles they held.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl fmt::Debug for RawMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Contents may be cyclic; print the handle only.
        write!(f, "RawMap@{:#x}", self.identity())
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for RawMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let map = RawMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Shared sequence. Same ownership rules as [`RawMap`]: a cycle through a
/// sequence leaks until [`RawSeq::clear`] breaks it.
#[derive(Clone, Default)]
pub struct RawSeq(Rc<RefCell<Vec<RawValue>>>);

impl RawSeq {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub fn push(&self, value: impl Into<RawValue>) {
        self.0.borrow_mut().push(value.into());
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn try_items(&self) -> CoreResult<Ref<'_, Vec<RawValue>>> {
        self.0.try_borrow().map_err(|_| CoreError::Borrowed {
            type_name: SEQUENCE_TYPE.to_string(),
        })
    }

    pub fn items_mut(&self) -> RefMut<'_, Vec<RawValue>> {
        self.0.borrow_mut()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl fmt::Debug for RawSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawSeq@{:#x}", self.identity())
    }
}

impl<V: Into<RawValue>> FromIterator<V> for RawSeq {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        RawSeq(Rc::new(RefCell::new(iter.into_iter().map(Into::into).collect())))
    }
}

#[derive(Debug, Clone)]
pub enum RawValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Map(RawMap),
    Seq(RawSeq),
    /// Live object (client, logger, callable, ...) identified by type name only.
    Handle(String),
    Foreign(Rc<dyn Render>),
}

impl RawValue {
    pub fn handle(type_name: impl Into<String>) -> Self {
        RawValue::Handle(type_name.into())
    }

    pub fn foreign(value: impl Render + 'static) -> Self {
        RawValue::Foreign(Rc::new(value))
    }

    pub fn type_name(&self) -> &str {
        match self {
            RawValue::Null => "null",
            RawValue::Bool(_) => "bool",
            RawValue::Int(_) => "int",
            RawValue::Float(_) => "float",
            RawValue::Str(_) => "str",
            RawValue::Map(_) => MAPPING_TYPE,
            RawValue::Seq(_) => SEQUENCE_TYPE,
            RawValue::Handle(name) => name.as_str(),
            RawValue::Foreign(f) => f.type_name(),
        }
    }

    pub fn as_map(&self) -> Option<&RawMap> {
        match self {
            RawValue::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&RawSeq> {
        match self {
            RawValue::Seq(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

impl From<i32> for RawValue {
    fn from(i: i32) -> Self {
        RawValue::Int(i64::from(i))
    }
}

impl From<i64> for RawValue {
    fn from(i: i64) -> Self {
        RawValue::Int(i)
    }
}

impl From<f64> for RawValue {
    fn from(f: f64) -> Self {
        RawValue::Float(f)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Str(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Str(s)
    }
}

impl From<RawMap> for RawValue {
    fn from(m: RawMap) -> Self {
        RawValue::Map(m)
    }
}

impl From<RawSeq> for RawValue {
    fn from(s: RawSeq) -> Self {
        RawValue::Seq(s)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(RawValue::Null)
    }
}

impl From<&serde_json::Value> for RawValue {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => RawValue::Null,
            serde_json::Value::Bool(b) => RawValue::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => RawValue::Int(i),
                None => n.as_f64().map(RawValue::Float).unwrap_or(RawValue::Null),
            },
            serde_json::Value::String(s) => RawValue::Str(s.clone()),
            serde_json::Value::Array(items) => {
                RawValue::Seq(items.iter().map(RawValue::from).collect())
            }
            serde_json::Value::Object(map) => RawValue::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), RawValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for RawValue {
    fn from(value: serde_json::Value) -> Self {
        RawValue::from(&value)
    }
}
