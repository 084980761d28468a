//! Helpers for picking apart API Gateway proxy events.

use serde_json::Value;

/// Looks up the `Authorization` header, accepting both the canonical and
/// lowercase key spellings that API Gateway forwards.
pub fn authorization_header(event: &Value) -> Option<String> {
    let headers = event.get("headers")?.as_object()?;
    headers
        .get("Authorization")
        .or_else(|| headers.get("authorization"))?
        .as_str()
        .map(|value| value.to_string())
}

/// Normalizes the request body to a structured value. API Gateway delivers
/// the body as a serialized string; direct invocations may pass an object.
pub fn request_body(event: &Value) -> Result<Value, String> {
    let Some(body) = event.get("body") else {
        return Err("Request body is required".to_string());
    };

    match body {
        Value::Object(_) => Ok(body.clone()),
        Value::String(text) => {
            serde_json::from_str(text).map_err(|error| format!("Malformed JSON body: {error}"))
        }
        _ => Err("Request body must be a JSON object".to_string()),
    }
}

pub fn path_id(event: &Value) -> Option<String> {
    event
        .get("pathParameters")?
        .get("id")?
        .as_str()
        .map(|value| value.to_string())
}
