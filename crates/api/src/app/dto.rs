use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form,
};
use serde_json::{Map, Value};

use crate::app::errors::ApiError;

// -------------------------
// Request bodies
// -------------------------

/// Raw create/update body, lifted into JSON for validation.
///
/// Accepts `application/json` and `application/x-www-form-urlencoded`. An empty body
/// or any other content type yields an empty object, so validation reports the
/// missing `name` instead of a parse error.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseBody(pub Value);

impl CourseBody {
    fn empty() -> Self {
        Self(Value::Object(Map::new()))
    }
}

#[async_trait]
impl<S> FromRequest<S> for CourseBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let media_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .unwrap_or_default();

        match media_type.as_str() {
            "application/json" => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                if bytes.iter().all(u8::is_ascii_whitespace) {
                    return Ok(Self::empty());
                }
                serde_json::from_slice(&bytes)
                    .map(CourseBody)
                    .map_err(|e| ApiError::BadRequest(format!("Malformed JSON body: {e}")))
            }
            "application/x-www-form-urlencoded" => {
                let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                Ok(CourseBody(form_to_value(pairs)))
            }
            _ => Ok(Self::empty()),
        }
    }
}

/// Lift urlencoded pairs into JSON the way extended form parsers do: a repeated key
/// becomes an array, `key[]` appends to an array and `key[sub]` nests an object.
fn form_to_value(pairs: Vec<(String, String)>) -> Value {
    let mut object = Map::new();
    for (key, value) in pairs {
        let (base, path) = split_brackets(&key);
        insert_path(&mut object, base, &path, Value::String(value));
    }
    Value::Object(object)
}

/// `a[b][c]` → `("a", ["b", "c"])`. Keys whose brackets are not well formed stay whole.
fn split_brackets(key: &str) -> (&str, Vec<&str>) {
    let open = match key.find('[') {
        Some(open) if open > 0 => open,
        _ => return (key, Vec::new()),
    };

    let mut segments = Vec::new();
    let mut rest = &key[open..];
    while let Some(inner) = rest.strip_prefix('[') {
        let Some(close) = inner.find(']') else {
            return (key, Vec::new());
        };
        segments.push(&inner[..close]);
        rest = &inner[close + 1..];
    }
    if !rest.is_empty() {
        return (key, Vec::new());
    }

    (&key[..open], segments)
}

fn insert_path(object: &mut Map<String, Value>, key: &str, path: &[&str], value: Value) {
    match path.split_first() {
        None => append(object, key, value, false),
        Some((&"", _)) => append(object, key, value, true),
        Some((next, rest)) => {
            let child = object
                .entry(key.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(inner) = child {
                insert_path(inner, next, rest, value);
            }
        }
    }
}

fn append(object: &mut Map<String, Value>, key: &str, value: Value, as_array: bool) {
    match object.get_mut(key) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None if as_array => {
            object.insert(key.to_string(), Value::Array(vec![value]));
        }
        None => {
            object.insert(key.to_string(), value);
        }
    }
}
