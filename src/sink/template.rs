// src/sink/template.rs
use super::LogValue;

const PLACEHOLDER: &str = "{}";
const ESCAPE: char = '\\';

/// Substitute `values` into the `{}` placeholders of `template`, in order.
///
/// Follows SLF4J's rules: `\{}` is a literal `{}` and does not consume a value,
/// `\\{}` is a literal backslash followed by a substituted value. Placeholders
/// left without a value stay as `{}`; surplus values are dropped.
pub fn render_template(template: &str, values: &[LogValue]) -> String {
    let mut out = String::with_capacity(template.len() + values.len() * 8);
    let mut values = values.iter();
    let mut rest = template;

    while let Some(pos) = rest.find(PLACEHOLDER) {
        let before = &rest[..pos];
        if let Some(stripped) = before.strip_suffix(ESCAPE) {
            if stripped.ends_with(ESCAPE) {
                out.push_str(stripped);
                push_value(&mut out, values.next());
            } else {
                out.push_str(stripped);
                out.push_str(PLACEHOLDER);
            }
        } else {
            out.push_str(before);
            push_value(&mut out, values.next());
        }
        rest = &rest[pos + PLACEHOLDER.len()..];
    }
    out.push_str(rest);
    out
}

fn push_value(out: &mut String, value: Option<&LogValue>) {
    match value {
        Some(value) => out.push_str(&display_value(value)),
        None => out.push_str(PLACEHOLDER),
    }
}

/// Strings print bare, everything else as compact JSON.
pub fn display_value(value: &LogValue) -> String {
    match value {
        LogValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
