use report_core::sanitize::limits::SanitizeLimits;
use report_core::sanitize::value::{Displayed, RawMap, RawSeq, RawValue, Unrenderable};
use report_core::sanitize::{circular_marker as marker, sanitize, Sanitizer, CIRCULAR_REF_KEY};
use serde_json::json;

#[test]
fn self_referential_mapping_gets_cycle_marker() {
    let a = RawMap::new();
    a.insert("name", "root");
    a.insert("self", a.clone());
    let out = sanitize(&RawValue::Map(a));
    assert_eq!(out["name"], json!("root"));
    assert_eq!(out["self"], marker("mapping"));
}

#[test]
fn indirect_cycle_is_detected_at_the_revisit() {
    let a = RawMap::new();
    let b = RawMap::new();
    b.insert("back", a.clone());
    a.insert("child", b);
    let out = sanitize(&RawValue::Map(a));
    assert_eq!(out["child"]["back"], marker("mapping"));
}

#[test]
fn self_referential_sequence_gets_cycle_marker() {
    let s = RawSeq::new();
    s.push(1);
    s.push(s.clone());
    let out = sanitize(&RawValue::Seq(s));
    assert_eq!(out, json!([1, marker("sequence")]));
}

#[test]
fn shared_sibling_is_not_a_cycle() {
    let shared = RawMap::new();
    shared.insert("x", 1);
    let root = RawMap::new();
    root.insert("a", shared.clone());
    root.insert("b", shared);
    let out = sanitize(&RawValue::Map(root));
    assert_eq!(out, json!({"a": {"x": 1}, "b": {"x": 1}}));
}

#[test]
fn equal_but_distinct_mappings_are_not_confused() {
    let inner = RawMap::new();
    inner.insert("x", 1);
    let outer = RawMap::new();
    outer.insert("x", 1);
    outer.insert("nested", inner);
    let out = sanitize(&RawValue::Map(outer));
    assert_eq!(out, json!({"x": 1, "nested": {"x": 1}}));
}

#[test]
fn unsafe_keys_are_stripped() {
    let m = RawMap::new();
    m.insert("client", RawValue::handle("HttpClient"));
    m.insert("name", "ok");
    m.insert("logger", RawValue::handle("Logger"));
    m.insert("_sa_instance_state", RawValue::handle("InstanceState"));
    let out = sanitize(&RawValue::Map(m));
    assert_eq!(out, json!({"name": "ok"}));
}

#[test]
fn custom_unsafe_keys_replace_defaults() {
    let limits = SanitizeLimits {
        unsafe_keys: ["token".to_string()].into_iter().collect(),
        ..SanitizeLimits::default()
    };
    let m = RawMap::new();
    m.insert("token", "secret");
    m.insert("client", "visible");
    let out = Sanitizer::new(limits).sanitize(&RawValue::Map(m));
    assert_eq!(out, json!({"client": "visible"}));
}

#[test]
fn long_sequence_keeps_first_hundred() {
    let seq: RawSeq = (0..150i64).collect();
    let out = sanitize(&RawValue::Seq(seq));
    let expected: Vec<i64> = (0..100).collect();
    assert_eq!(out, json!(expected));
}

#[test]
fn foreign_rendering_is_capped_at_two_hundred_chars() {
    let long = "x".repeat(150) + &"y".repeat(150);
    let out = sanitize(&RawValue::foreign(Displayed::new("Report", long.clone())));
    let text = out.as_str().unwrap();
    assert_eq!(text.chars().count(), 200);
    assert_eq!(text, &long[..200]);
}

#[test]
fn raw_strings_pass_through_untruncated_by_default() {
    let long = "z".repeat(300);
    let out = sanitize(&RawValue::from(long.clone()));
    assert_eq!(out, json!(long));

    let limits = SanitizeLimits {
        truncate_passthrough_strings: true,
        ..SanitizeLimits::default()
    };
    let out = Sanitizer::new(limits).sanitize(&RawValue::from(long));
    assert_eq!(out.as_str().unwrap().len(), 200);
}

#[test]
fn handles_render_as_type_name() {
    let m = RawMap::new();
    m.insert("callback", RawValue::handle("function"));
    let out = sanitize(&RawValue::Map(m));
    assert_eq!(out, json!({"callback": "function"}));
}

#[test]
fn unrenderable_foreign_becomes_placeholder() {
    let m = RawMap::new();
    m.insert("blob", RawValue::foreign(Unrenderable::new("Socket", "closed")));
    m.insert("after", true);
    let out = sanitize(&RawValue::Map(m));
    assert_eq!(out, json!({"blob": "<Socket>", "after": true}));
}

#[test]
fn failing_child_does_not_abort_siblings() {
    let busy = RawMap::new();
    busy.insert("x", 1);
    let root = RawMap::new();
    root.insert("before", 1);
    root.insert("busy", busy.clone());
    root.insert("after", 2);

    let _guard = busy.entries_mut();
    let out = sanitize(&RawValue::Map(root));
    assert_eq!(out, json!({"before": 1, "busy": "<mapping>", "after": 2}));
}

#[test]
fn failing_item_turns_sequence_into_text() {
    let busy = RawMap::new();
    busy.insert("x", 1);
    let seq: RawSeq = vec![
        RawValue::from(1),
        RawValue::from("abc"),
        RawValue::Map(busy.clone()),
        RawValue::Null,
    ]
    .into_iter()
    .collect();

    let _guard = busy.entries_mut();
    let out = sanitize(&RawValue::Seq(seq));
    assert_eq!(out, json!(["1", "abc", "<mapping>", null]));
}

#[test]
fn sequence_fallback_caps_items_and_length() {
    let busy = RawSeq::new();
    let seq = RawSeq::new();
    seq.push(busy.clone());
    for _ in 0..80 {
        seq.push("w".repeat(150));
    }

    let _guard = busy.items_mut();
    let out = sanitize(&RawValue::Seq(seq));
    let items = out.as_array().unwrap();
    assert_eq!(items.len(), 50);
    assert_eq!(items[0], json!("<sequence>"));
    assert!(items[1..]
        .iter()
        .all(|i| i.as_str().unwrap().chars().count() == 100));
}

#[test]
fn non_finite_float_leaves_siblings_intact() {
    let scored: RawMap = vec![("score", 9)].into_iter().collect();
    let seq: RawSeq = vec![RawValue::Map(scored), RawValue::from(f64::NAN)]
        .into_iter()
        .collect();
    let out = sanitize(&RawValue::Seq(seq));
    assert_eq!(out, json!([{"score": 9}, "NaN"]));

    let out = sanitize(&RawValue::from(f64::NEG_INFINITY));
    assert_eq!(out, json!("-inf"));
}

/// Each map reaches the next one twice, so a full expansion would hold 2^n
/// copies of the tail.
fn doubling_chain(len: usize) -> RawMap {
    let tail = RawMap::new();
    tail.insert("end", true);
    let mut head = tail;
    for _ in 0..len {
        let m = RawMap::new();
        m.insert("l", head.clone());
        m.insert("r", head);
        head = m;
    }
    head
}

#[test]
fn shared_fan_out_is_bounded_by_node_budget() {
    let limits = SanitizeLimits {
        max_nodes: 100,
        ..SanitizeLimits::default()
    };
    let out = Sanitizer::new(limits).sanitize(&RawValue::Map(doubling_chain(23)));
    let text = serde_json::to_string(&out).unwrap();
    assert!(text.len() < 100_000, "output grew to {} bytes", text.len());
    // The leftmost path is expanded before the budget runs out.
    assert!(out["l"]["l"]["l"].is_object());
    assert!(text.contains(r#"{\"l\": "#));
}

#[test]
fn default_budget_stops_exponential_expansion() {
    let out = sanitize(&RawValue::Map(doubling_chain(23)));
    let text = serde_json::to_string(&out).unwrap();
    assert!(text.len() < 8_000_000, "output grew to {} bytes", text.len());
}

#[test]
fn wide_mapping_keeps_first_hundred_entries() {
    let wide: RawMap = (0..5000).map(|i| (format!("k{}", i), i)).collect();
    let out = sanitize(&RawValue::Map(wide));
    let obj = out.as_object().unwrap();
    assert_eq!(obj.len(), 100);
    assert_eq!(obj["k0"], json!(0));
    assert_eq!(obj["k99"], json!(99));
    assert!(obj.get("k100").is_none());
}

#[test]
fn entry_cap_counts_only_kept_keys() {
    let m = RawMap::new();
    m.insert("logger", RawValue::handle("Logger"));
    for i in 0..120 {
        m.insert(format!("k{}", i), i);
    }
    let out = sanitize(&RawValue::Map(m));
    let obj = out.as_object().unwrap();
    assert_eq!(obj.len(), 100);
    assert!(obj.contains_key("k99"));
}

#[test]
fn deep_nesting_is_cut_at_depth_limit() {
    let root = RawMap::new();
    let mut cursor = root.clone();
    for _ in 0..500 {
        let next = RawMap::new();
        cursor.insert("k", next.clone());
        cursor = next;
    }
    let out = sanitize(&RawValue::Map(root));
    // Somewhere below the limit the chain collapses into a capped string.
    let mut node = &out;
    let mut depth = 0;
    while let Some(next) = node.get("k") {
        node = next;
        depth += 1;
    }
    assert!(depth <= 65);
    let text = node.as_str().unwrap();
    assert!(text.starts_with(r#"{"k": "#));
    assert!(text.chars().count() <= 200);
}

#[test]
fn output_serializes() {
    let root = RawMap::new();
    root.insert("self", root.clone());
    root.insert("handle", RawValue::handle("Session"));
    root.insert("nan", f64::NAN);
    let out = sanitize(&RawValue::Map(root));
    let text = serde_json::to_string(&out).unwrap();
    assert!(text.contains(CIRCULAR_REF_KEY));
}

#[test]
fn sanitize_is_idempotent_on_clean_input() {
    let clean = json!({
        "segment": "Entrepreneurs",
        "scores": [1, 2.5, -3],
        "nested": {"flag": true, "none": null, "list": ["a", "b"]},
    });
    let once = sanitize(&RawValue::from(&clean));
    let twice = sanitize(&RawValue::from(&once));
    assert_eq!(once, twice);
    assert_eq!(once, clean);
}

#[test]
fn insertion_order_is_preserved() {
    let m = RawMap::new();
    m.insert("zeta", 1);
    m.insert("alpha", 2);
    m.insert("mid", 3);
    let out = sanitize(&RawValue::Map(m));
    let keys: Vec<&String> = out.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn borrowed_sequence_becomes_placeholder() {
    let items: RawSeq = vec![RawValue::from(1)].into_iter().collect();
    let root = RawMap::new();
    root.insert("items", items.clone());
    root.insert("ok", "yes");

    let _guard = items.items_mut();
    let out = sanitize(&RawValue::Map(root));
    assert_eq!(out, json!({"items": "<sequence>", "ok": "yes"}));
}
