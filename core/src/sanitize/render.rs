use super::value::RawValue;
use crate::error::CoreResult;

/// Keeps the first `max` characters (not bytes) of `s`.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Text rendering of a raw value, capped at `limit` characters.
///
/// Rendering stops as soon as the cap is reached, so cyclic containers
/// terminate. Fails if a container is mutably borrowed or a foreign value
/// cannot render itself.
pub fn render_text(value: &RawValue, limit: usize) -> CoreResult<String> {
    let mut sink = TextSink::new(limit);
    write_value(value, &mut sink, true)?;
    Ok(sink.out)
}

struct TextSink {
    out: String,
    written: usize,
    limit: usize,
}

impl TextSink {
    fn new(limit: usize) -> Self {
        Self {
            out: String::new(),
            written: 0,
            limit,
        }
    }

    fn full(&self) -> bool {
        self.written >= self.limit
    }

    fn push(&mut self, s: &str) {
        for ch in s.chars() {
            if self.full() {
                return;
            }
            self.out.push(ch);
            self.written += 1;
        }
    }
}

fn write_value(value: &RawValue, sink: &mut TextSink, top_level: bool) -> CoreResult<()> {
    if sink.full() {
        return Ok(());
    }
    match value {
        RawValue::Null => sink.push("null"),
        RawValue::Bool(b) => sink.push(if *b { "true" } else { "false" }),
        RawValue::Int(i) => sink.push(&i.to_string()),
        RawValue::Float(f) => sink.push(&f.to_string()),
        RawValue::Str(s) if top_level => sink.push(s),
        RawValue::Str(s) => {
            sink.push("\"");
            sink.push(s);
            sink.push("\"");
        }
        RawValue::Handle(name) => {
            sink.push("<");
            sink.push(name);
            sink.push(">");
        }
        RawValue::Foreign(f) => sink.push(&f.render()?),
        RawValue::Map(map) => {
            let entries = map.try_entries()?;
            sink.push("{");
            for (i, (k, v)) in entries.iter().enumerate() {
                if sink.full() {
                    break;
                }
                if i > 0 {
                    sink.push(", ");
                }
                sink.push("\"");
                sink.push(k);
                sink.push("\": ");
                write_value(v, sink, false)?;
            }
            sink.push("}");
        }
        RawValue::Seq(seq) => {
            let items = seq.try_items()?;
            sink.push("[");
            for (i, item) in items.iter().enumerate() {
                if sink.full() {
                    break;
                }
                if i > 0 {
                    sink.push(", ");
                }
                write_value(item, sink, false)?;
            }
            sink.push("]");
        }
    }
    Ok(())
}
