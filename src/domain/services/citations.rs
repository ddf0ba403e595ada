#[cfg(test)]
#[path = "citations_test.rs"]
mod tests;

use std::collections::HashMap;

use crate::domain::models::Reference;

const MARKER_PREFIX: &str = "[citation:";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcessedCitations {
    pub text: String,
    /// Citation id to its display number, starting at 1.
    pub map: HashMap<String, usize>,
    /// Citation ids in first-seen order.
    pub order: Vec<String>,
}

impl ProcessedCitations {
    pub fn id_for_number(&self, number: usize) -> Option<&str> {
        if number == 0 {
            return None;
        }

        return self.order.get(number - 1).map(|id| return id.as_str());
    }
}

fn escape_attribute(value: &str) -> String {
    return value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;");
}

pub fn annotation(id: &str, number: usize) -> String {
    return format!(
        "<sup class=\"citation\" data-citation-id=\"{}\" data-citation-number=\"{number}\">[{number}]</sup>",
        escape_attribute(id)
    );
}

/// Rewrites every `[citation:<id>]` marker into a numbered annotation.
/// Numbering restarts on every call, so streaming callers must process the
/// whole answer each time.
pub fn process_citations(text: &str) -> ProcessedCitations {
    let mut res = ProcessedCitations::default();
    let mut rest = text;

    while let Some(start) = rest.find(MARKER_PREFIX) {
        let after_prefix = &rest[start + MARKER_PREFIX.len()..];
        let end = match after_prefix.find(']') {
            Some(end) => end,
            None => break,
        };

        let id = &after_prefix[..end];
        if id.is_empty() {
            res.text.push_str(&rest[..start + MARKER_PREFIX.len()]);
            rest = after_prefix;
            continue;
        }

        let next_number = res.order.len() + 1;
        let number = *res.map.entry(id.to_string()).or_insert(next_number);
        if number == next_number {
            res.order.push(id.to_string());
        }

        res.text.push_str(&rest[..start]);
        res.text.push_str(&annotation(id, number));
        rest = &after_prefix[end + 1..];
    }

    res.text.push_str(rest);
    return res;
}

/// Resolves a clicked citation id against the references shipped with an
/// answer. Ids usually take the form `<file id>-<index>`; bare indexes are
/// accepted as well.
pub fn resolve_citation<'a>(citation_id: &str, references: &'a [Reference]) -> Option<&'a Reference> {
    let citation_id = citation_id.trim();
    if let Some(found) = references.iter().find(|r| return r.key() == citation_id) {
        return Some(found);
    }

    return references
        .iter()
        .find(|r| return r.index.to_string() == citation_id);
}
