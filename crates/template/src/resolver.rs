//! Resolving configured field keys against the opaque resume record.

use serde_json::Value;

/// A resolved field value. Scalars render as (possibly wrapped) text,
/// lists render as bullets, `Empty` skips the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Scalar(String),
    List(Vec<String>),
    Empty,
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Empty)
    }
}

/// Resolve a top-level field key against the resume record.
///
/// `full_name_first` / `full_name_last` prefer explicit `first_name` /
/// `last_name` entries and otherwise derive from `full_name`. Unknown keys
/// resolve to `Empty`.
pub fn resolve_field(resume: &Value, key: &str) -> FieldValue {
    match key {
        "full_name" => scalar(resume.get("full_name")),
        "headline" => scalar(resume.get("headline")),
        "profile_body" => scalar(resume.get("profile_body")),
        "full_name_first" => {
            name_part(resume, "first_name", |full| split_name(full).0)
        }
        "full_name_last" => {
            name_part(resume, "last_name", |full| split_name(full).1)
        }
        "experience" | "education" => list(resume.get(key)),
        _ => FieldValue::Empty,
    }
}

/// Resolve a field key against one repeater item.
pub fn resolve_item_field(item: &Value, key: &str) -> FieldValue {
    match key {
        "company" | "role" | "dates" | "school" | "degree" | "details" => scalar(item.get(key)),
        "bullets" => list(item.get(key)),
        _ => FieldValue::Empty,
    }
}

/// The backing array for a repeater key, if the record has one.
pub fn resolve_items<'a>(resume: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    match key {
        "experience" | "education" => resume.get(key).and_then(Value::as_array),
        _ => None,
    }
}

/// Split a display name on whitespace: first token, rest rejoined.
pub fn split_name(full_name: &str) -> (String, String) {
    let mut parts = full_name.split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    let rest: Vec<&str> = parts.collect();
    (first, rest.join(" "))
}

fn name_part(resume: &Value, explicit_key: &str, derive: impl Fn(&str) -> String) -> FieldValue {
    let explicit = resume.get(explicit_key).map(value_to_string).unwrap_or_default();
    let part = if explicit.is_empty() {
        let full = resume.get("full_name").map(value_to_string).unwrap_or_default();
        derive(&full)
    } else {
        explicit
    };
    if part.is_empty() {
        FieldValue::Empty
    } else {
        FieldValue::Scalar(part)
    }
}

fn scalar(value: Option<&Value>) -> FieldValue {
    match value {
        None | Some(Value::Null) => FieldValue::Empty,
        Some(v) => {
            let text = value_to_string(v);
            if text.is_empty() {
                FieldValue::Empty
            } else {
                FieldValue::Scalar(text)
            }
        }
    }
}

fn list(value: Option<&Value>) -> FieldValue {
    match value {
        Some(Value::Array(items)) => {
            let texts: Vec<String> = items
                .iter()
                .map(value_to_string)
                .filter(|s| !s.is_empty())
                .collect();
            if texts.is_empty() {
                FieldValue::Empty
            } else {
                FieldValue::List(texts)
            }
        }
        _ => FieldValue::Empty,
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
