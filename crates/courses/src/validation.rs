//! Course request validation.
//!
//! Request bodies arrive as untyped JSON (or form fields lifted into JSON). Rules run
//! in a fixed order: object shape, then every `name` rule, then unknown keys. Only
//! the first failure is reported, and the message names the offending key.

use serde_json::Value;

use coursebook_core::{DomainError, DomainResult};

use crate::course::CourseName;

/// Keys a course body may carry.
const ALLOWED_KEYS: &[&str] = &["name"];

/// Validated body of a create/update request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRequest {
    pub name: CourseName,
}

impl CourseRequest {
    /// Check `body`: an object with a valid `name` and no other keys.
    pub fn from_value(body: &Value) -> DomainResult<Self> {
        let Value::Object(fields) = body else {
            return Err(DomainError::validation("\"value\" must be an object"));
        };

        let name = match fields.get("name") {
            None | Some(Value::Null) => {
                return Err(DomainError::validation("\"name\" is required"));
            }
            Some(Value::String(s)) => CourseName::parse(s)?,
            Some(_) => return Err(DomainError::validation("\"name\" must be a string")),
        };

        // Name errors take precedence, so unknown keys are checked last.
        if let Some(key) = fields.keys().find(|k| !ALLOWED_KEYS.contains(&k.as_str())) {
            return Err(DomainError::validation(format!("\"{key}\" is not allowed")));
        }

        Ok(Self { name })
    }

    pub fn into_name(self) -> CourseName {
        self.name
    }
}

/// Validate a create/update body, returning the name to store.
pub fn validate_course(body: &Value) -> DomainResult<CourseName> {
    let result = CourseRequest::from_value(body).map(CourseRequest::into_name);
    if let Err(DomainError::Validation(msg)) = &result {
        tracing::debug!(reason = %msg, "course body rejected");
    }
    result
}
