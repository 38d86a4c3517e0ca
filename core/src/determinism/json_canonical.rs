use crate::error::CoreResult;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

// Canonical report bytes:
// - UTF-8 JSON (no BOM)
// - keys sorted lexicographically at every level
// - no insignificant whitespace
// - strings JSON-escaped per RFC 8259 (serde_json handles)
// Report data carries floats, so numbers are kept as serde_json prints them.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> CoreResult<Vec<u8>> {
    let v = serde_json::to_value(value)?;
    let normalized = sort_keys(v);
    let s = serde_json::to_string(&normalized)?;
    Ok(s.into_bytes())
}

fn sort_keys(v: Value) -> Value {
    match v {
        Value::Object(map) => {
            let btm: BTreeMap<String, Value> =
                map.into_iter().map(|(k, vv)| (k, sort_keys(vv))).collect();
            // serde_json::Map preserves insertion order; we rebuild in sorted order.
            let mut out = serde_json::Map::new();
            for (k, vv) in btm {
                out.insert(k, vv);
            }
            Value::Object(out)
        }
        Value::Array(arr) => Value::Array(arr.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
