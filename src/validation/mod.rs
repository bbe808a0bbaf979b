//! Request body checks for the mutating blog routes.
//!
//! Bodies arrive as loose JSON and leave as typed inputs. Every rule is
//! evaluated before a verdict is returned, so a body is either wholly valid
//! or rejected with all of its problems listed.

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::database::models::{NewPost, PostUpdate};

/// Outcome of checking a request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation<T> {
    Valid(T),
    Invalid(Vec<String>),
}

impl<T> Validation<T> {
    pub fn into_result(self) -> Result<T, Vec<String>> {
        match self {
            Validation::Valid(value) => Ok(value),
            Validation::Invalid(reasons) => Err(reasons),
        }
    }
}

/// `{title, content}`: both required non-empty strings. Other keys are ignored.
pub fn validate_create_post(body: &Value) -> Validation<NewPost> {
    let Some(object) = body.as_object() else {
        return Validation::Invalid(vec!["body must be a JSON object".to_string()]);
    };

    let mut reasons = Vec::new();
    let title = required_text(object, "title", &mut reasons);
    let content = required_text(object, "content", &mut reasons);

    match (title, content) {
        (Some(title), Some(content)) if reasons.is_empty() => {
            Validation::Valid(NewPost { title, content })
        }
        _ => Validation::Invalid(reasons),
    }
}

/// `{id, title?, content?}`: `id` must be a UUID string and at least one
/// non-empty field must be supplied to change.
pub fn validate_update_post(body: &Value) -> Validation<PostUpdate> {
    let Some(object) = body.as_object() else {
        return Validation::Invalid(vec!["body must be a JSON object".to_string()]);
    };

    let mut reasons = Vec::new();

    let id = match object.get("id") {
        Some(Value::String(raw)) => match Uuid::parse_str(raw) {
            Ok(id) => Some(id),
            Err(_) => {
                reasons.push("id: must be a UUID".to_string());
                None
            }
        },
        Some(_) => {
            reasons.push("id: must be a string".to_string());
            None
        }
        None => {
            reasons.push("id: is required".to_string());
            None
        }
    };

    let title = optional_text(object, "title", &mut reasons);
    let content = optional_text(object, "content", &mut reasons);

    if !object.contains_key("title") && !object.contains_key("content") {
        reasons.push("title or content: at least one is required".to_string());
    }

    match id {
        Some(id) if reasons.is_empty() => Validation::Valid(PostUpdate { id, title, content }),
        _ => Validation::Invalid(reasons),
    }
}

fn required_text(object: &Map<String, Value>, field: &str, reasons: &mut Vec<String>) -> Option<String> {
    match object.get(field) {
        None | Some(Value::Null) => {
            reasons.push(format!("{field}: is required"));
            None
        }
        Some(value) => text(value, field, reasons),
    }
}

fn optional_text(object: &Map<String, Value>, field: &str, reasons: &mut Vec<String>) -> Option<String> {
    object.get(field).and_then(|value| text(value, field, reasons))
}

fn text(value: &Value, field: &str, reasons: &mut Vec<String>) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::String(_) => {
            reasons.push(format!("{field}: must not be empty"));
            None
        }
        _ => {
            reasons.push(format!("{field}: must be a string"));
            None
        }
    }
}
