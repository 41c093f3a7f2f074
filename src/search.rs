//! Case-insensitive text search across stored JSON documents.

use serde::Serialize;
use serde_json::{Map, Value};

/// One matching item, tagged with the document it came from.
#[derive(Debug, Clone, Serialize)]
pub struct SearchMatch {
    /// Filename of the document containing the match
    pub file: String,
    /// The matching object (an array element or the whole document)
    pub data: Value,
}

/// Search a set of named documents for a query string.
///
/// Array documents are searched element by element, skipping non-object
/// elements; object documents are matched as a whole; scalar documents
/// never match. With `field` set, only that top-level field is examined
/// and items without it never match. Without it, any top-level value may
/// match. Matching is case-insensitive substring containment against the
/// value's text form.
pub fn search(documents: &[(String, Value)], query: &str, field: Option<&str>) -> Vec<SearchMatch> {
    let needle = query.to_lowercase();
    let mut matches = Vec::new();
    for (name, document) in documents {
        match document {
            Value::Array(items) => {
                for item in items {
                    if let Value::Object(fields) = item {
                        if object_matches(fields, &needle, field) {
                            matches.push(SearchMatch {
                                file: name.clone(),
                                data: item.clone(),
                            });
                        }
                    }
                }
            }
            Value::Object(fields) => {
                if object_matches(fields, &needle, field) {
                    matches.push(SearchMatch {
                        file: name.clone(),
                        data: document.clone(),
                    });
                }
            }
            _ => {}
        }
    }
    matches
}

fn object_matches(fields: &Map<String, Value>, needle: &str, field: Option<&str>) -> bool {
    match field {
        Some(wanted) => fields
            .get(wanted)
            .is_some_and(|value| value_matches(value, needle)),
        None => fields.values().any(|value| value_matches(value, needle)),
    }
}

fn value_matches(value: &Value, needle: &str) -> bool {
    value_text(value).to_lowercase().contains(needle)
}

/// Text form of a value: strings are used bare, everything else is
/// rendered as compact JSON.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
