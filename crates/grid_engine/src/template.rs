//! `{param}` substitution for URL-template fetch capabilities.
use std::collections::BTreeMap;

/// Replaces every `{key}` with its value. Unknown placeholders stay as-is.
///
/// Placeholders before the template's first `?` are substituted raw, so values
/// may carry a scheme, host or path segments. Placeholders in the query are
/// form-urlencoded.
pub fn expand_template(template: &str, values: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut in_query = false;
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let (literal, tail) = rest.split_at(open);
        in_query |= literal.contains('?');
        out.push_str(literal);
        let after = &tail[1..];
        let Some(close) = after.find('}') else {
            out.push('{');
            rest = after;
            continue;
        };
        let name = &after[..close];
        match values.get(name) {
            Some(value) if in_query => out.push_str(&encode(value)),
            Some(value) => out.push_str(value),
            None => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

/// Placeholder names in order of appearance.
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                if !name.is_empty() && !name.contains('{') {
                    names.push(name);
                }
                rest = &after[close + 1..];
            }
            None => break,
        }
    }
    names
}

fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
