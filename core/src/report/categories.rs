use serde_json::{Map, Value};

/// Category blocks copied verbatim from `report.analysis_results`.
pub const CATEGORY_KEYS: [&str; 11] = [
    "web_research",
    "social_analysis",
    "mental_drivers",
    "visual_proofs",
    "anti_objection",
    "pre_pitch",
    "future_predictions",
    "avatar_detalhado",
    "psychological_analysis",
    "archaeological_report",
    "forensic_metrics",
];

/// Every category key is present in the result, `{}` when absent upstream.
/// Returns an empty object when the data has no `report.analysis_results`
/// mapping.
pub fn extract_categories(data: &Value) -> Value {
    let results = match data
        .get("report")
        .and_then(|r| r.get("analysis_results"))
        .and_then(Value::as_object)
    {
        Some(results) => results,
        None => return Value::Object(Map::new()),
    };
    let mut out = Map::new();
    for key in CATEGORY_KEYS {
        let block = results
            .get(key)
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));
        out.insert(key.to_string(), block);
    }
    Value::Object(out)
}
