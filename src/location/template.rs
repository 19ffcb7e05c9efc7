//! `${n}` placeholder templates.

use std::collections::BTreeMap;

/// A piece of a parsed template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Part<'a> {
    Text(&'a str),
    Placeholder(usize),
}

/// Split a template into text and placeholders. Malformed `${` sequences are text.
pub(crate) fn parse(template: &str) -> Vec<Part<'_>> {
    let mut parts = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        if digits > 0 && after[digits..].starts_with('}') {
            if let Ok(n) = after[..digits].parse() {
                if start > 0 {
                    parts.push(Part::Text(&rest[..start]));
                }
                parts.push(Part::Placeholder(n));
                rest = &after[digits + 1..];
                continue;
            }
        }
        parts.push(Part::Text(&rest[..start + 2]));
        rest = after;
    }

    if !rest.is_empty() {
        parts.push(Part::Text(rest));
    }
    parts
}

/// Placeholder numbers in order of appearance.
pub(crate) fn placeholders(template: &str) -> Vec<usize> {
    parse(template)
        .into_iter()
        .filter_map(|part| match part {
            Part::Placeholder(n) => Some(n),
            Part::Text(_) => None,
        })
        .collect()
}

/// Replace every placeholder; `None` if one has no value.
pub(crate) fn substitute(template: &str, values: &BTreeMap<usize, String>) -> Option<String> {
    let mut out = String::with_capacity(template.len());
    for part in parse(template) {
        match part {
            Part::Text(text) => out.push_str(text),
            Part::Placeholder(n) => out.push_str(values.get(&n)?),
        }
    }
    Some(out)
}
