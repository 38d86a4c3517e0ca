pub mod limits;
pub mod render;
pub mod value;

use crate::error::{CoreError, CoreResult};
use limits::SanitizeLimits;
use render::{render_text, truncate_chars};
use serde_json::{Map, Number, Value};
use std::collections::HashSet;
use tracing::debug;
use value::{RawMap, RawSeq, RawValue, MAPPING_TYPE, SEQUENCE_TYPE};

pub const CIRCULAR_REF_KEY: &str = "_circular_ref";

pub fn circular_marker(type_name: &str) -> Value {
    let mut marker = Map::new();
    marker.insert(
        CIRCULAR_REF_KEY.to_string(),
        Value::String(format!("Reference to {}", type_name)),
    );
    Value::Object(marker)
}

/// Sanitizes with default limits.
pub fn sanitize(value: &RawValue) -> Value {
    Sanitizer::default().sanitize(value)
}

/// Per-pass traversal state. `ancestors` holds the identities of the
/// containers on the path from the root to the current node; entries are
/// added when a container's children are visited and removed before it
/// returns, so siblings never see each other. `visited` counts every node
/// entered, across all paths.
#[derive(Debug, Default)]
struct Walk {
    ancestors: HashSet<usize>,
    visited: usize,
}

impl Walk {
    fn is_ancestor(&self, id: usize) -> bool {
        self.ancestors.contains(&id)
    }

    fn enter(&mut self, id: usize) {
        self.ancestors.insert(id);
    }

    fn leave(&mut self, id: usize) {
        self.ancestors.remove(&id);
    }
}

/// Turns raw analysis data into a bounded, acyclic JSON tree. Never fails:
/// a node that cannot be normalized is replaced by its text rendering at the
/// nearest enclosing container.
#[derive(Debug, Clone, Default)]
pub struct Sanitizer {
    limits: SanitizeLimits,
}

impl Sanitizer {
    pub fn new(limits: SanitizeLimits) -> Self {
        Self { limits }
    }

    pub fn sanitize(&self, value: &RawValue) -> Value {
        let mut walk = Walk::default();
        match self.sanitize_node(value, &mut walk, 0) {
            Ok(clean) => clean,
            Err(err) => {
                debug!(error = %err, type_name = value.type_name(), "root value replaced by fallback");
                self.fallback(value, self.limits.max_string_chars)
            }
        }
    }

    fn sanitize_node(
        &self,
        value: &RawValue,
        walk: &mut Walk,
        depth: usize,
    ) -> CoreResult<Value> {
        if depth > self.limits.max_depth {
            return Err(CoreError::DepthExceeded { depth });
        }
        walk.visited += 1;
        if walk.visited > self.limits.max_nodes {
            return Err(CoreError::NodeBudgetExceeded {
                limit: self.limits.max_nodes,
            });
        }
        match value {
            RawValue::Null => Ok(Value::Null),
            RawValue::Bool(b) => Ok(Value::Bool(*b)),
            RawValue::Int(i) => Ok(Value::Number((*i).into())),
            // NaN and infinities have no JSON number form.
            RawValue::Float(f) => Ok(Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(f.to_string()))),
            RawValue::Str(s) if self.limits.truncate_passthrough_strings => {
                Ok(Value::String(truncate_chars(s, self.limits.max_string_chars)))
            }
            RawValue::Str(s) => Ok(Value::String(s.clone())),
            RawValue::Handle(type_name) => Ok(Value::String(type_name.clone())),
            RawValue::Map(map) => self.sanitize_map(map, walk, depth),
            RawValue::Seq(seq) => self.sanitize_seq(seq, walk, depth),
            RawValue::Foreign(_) => Ok(self.fallback(value, self.limits.max_string_chars)),
        }
    }

    fn sanitize_map(
        &self,
        map: &RawMap,
        walk: &mut Walk,
        depth: usize,
    ) -> CoreResult<Value> {
        let id = map.identity();
        if walk.is_ancestor(id) {
            debug!(depth, "circular mapping reference replaced by marker");
            return Ok(circular_marker(MAPPING_TYPE));
        }
        let entries = map.try_entries()?;

        // No early return between enter and leave.
        walk.enter(id);
        let mut out = Map::with_capacity(entries.len().min(self.limits.max_mapping_entries));
        let kept = entries
            .iter()
            .filter(|(key, _)| !self.limits.is_unsafe_key(key))
            .take(self.limits.max_mapping_entries);
        for (key, child) in kept {
            let clean = match self.sanitize_node(child, walk, depth + 1) {
                Ok(clean) => clean,
                Err(err) => {
                    debug!(key = key.as_str(), error = %err, "mapping value replaced by fallback");
                    self.fallback(child, self.limits.max_string_chars)
                }
            };
            out.insert(key.clone(), clean);
        }
        walk.leave(id);

        Ok(Value::Object(out))
    }

    fn sanitize_seq(
        &self,
        seq: &RawSeq,
        walk: &mut Walk,
        depth: usize,
    ) -> CoreResult<Value> {
        let id = seq.identity();
        if walk.is_ancestor(id) {
            debug!(depth, "circular sequence reference replaced by marker");
            return Ok(circular_marker(SEQUENCE_TYPE));
        }
        let items = seq.try_items()?;

        walk.enter(id);
        let mut out = Vec::with_capacity(items.len().min(self.limits.max_sequence_items));
        let mut failure = None;
        for item in items.iter().take(self.limits.max_sequence_items) {
            match self.sanitize_node(item, walk, depth + 1) {
                Ok(clean) => out.push(clean),
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }
        walk.leave(id);

        if let Some(err) = failure {
            debug!(error = %err, len = items.len(), "sequence replaced by per-item text");
            let fallback = items
                .iter()
                .take(self.limits.fallback_sequence_items)
                .map(|item| self.fallback(item, self.limits.fallback_item_chars))
                .collect();
            return Ok(Value::Array(fallback));
        }
        Ok(Value::Array(out))
    }

    /// Text rendering capped at `max_chars`, `<type>` when rendering fails.
    /// Null stays null.
    fn fallback(&self, value: &RawValue, max_chars: usize) -> Value {
        if let RawValue::Null = value {
            return Value::Null;
        }
        match render_text(value, max_chars) {
            Ok(text) => Value::String(text),
            Err(err) => {
                debug!(error = %err, type_name = value.type_name(), "rendering failed, using placeholder");
                Value::String(format!("<{}>", value.type_name()))
            }
        }
    }
}
