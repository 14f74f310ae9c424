use serde_json::Value;

/// `var_export`-style array literal of the rows
pub(super) fn render(rows: &[Value]) -> Vec<u8> {
    let mut out = String::new();
    write_array(
        &mut out,
        rows.iter().enumerate().map(|(i, v)| (Key::Index(i), v)),
        0,
    );
    out.into_bytes()
}

enum Key<'a> {
    Index(usize),
    Name(&'a str),
}

fn write_array<'a>(out: &mut String, entries: impl Iterator<Item = (Key<'a>, &'a Value)>, indent: usize) {
    let pad = " ".repeat(indent + 2);
    out.push_str("array (\n");
    for (key, value) in entries {
        out.push_str(&pad);
        match key {
            Key::Index(i) => out.push_str(&i.to_string()),
            Key::Name(name) if is_integer_key(name) => out.push_str(name),
            Key::Name(name) => write_string(out, name),
        }
        out.push_str(" => ");
        match value {
            Value::Array(_) | Value::Object(_) => {
                out.push('\n');
                out.push_str(&pad);
                write_value(out, value, indent + 2);
            }
            scalar => write_value(out, scalar, indent + 2),
        }
        out.push_str(",\n");
    }
    out.push_str(&" ".repeat(indent));
    out.push(')');
}

fn write_value(out: &mut String, value: &Value, indent: usize) {
    match value {
        Value::Null => out.push_str("NULL"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_string(out, s),
        Value::Array(items) => write_array(
            out,
            items.iter().enumerate().map(|(i, v)| (Key::Index(i), v)),
            indent,
        ),
        Value::Object(map) => write_array(
            out,
            map.iter().map(|(k, v)| (Key::Name(k.as_str()), v)),
            indent,
        ),
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('\'');
    for c in s.chars() {
        if matches!(c, '\'' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
}

/// Keys PHP would store as integers
fn is_integer_key(key: &str) -> bool {
    let digits = key.strip_prefix('-').unwrap_or(key);
    !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'))
        && key != "-0"
        && key.parse::<i64>().is_ok()
}
