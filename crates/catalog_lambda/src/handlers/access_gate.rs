use catalog_core::identity::{bearer_token, parse_decision_body, DecisionBody, Identity};
use catalog_core::response::{error, ApiGatewayResponse};
use serde_json::{json, Value};

use crate::adapters::token_validator::{resolve_decision, TokenValidator};
use crate::handlers::request::authorization_header;

/// Runs the admin-authorization pipeline for a write request.
///
/// Every product handler calls this before touching the item store; a
/// denial here is terminal for the request. The pipeline fails at the first
/// violated step: missing credential, non-200 validator decision, wrong
/// actor type, wrong role.
pub fn validate_admin_access(
    event: &Value,
    validator: &dyn TokenValidator,
) -> Result<Identity, ApiGatewayResponse> {
    let Some(header) = authorization_header(event) else {
        return Err(error("Missing Authorization header", 401));
    };

    let token = bearer_token(&header);
    let decision = resolve_decision(validator, &token);

    if decision.status_code != 200 {
        return Err(error("Forbidden - Token invalido o expirado", 403));
    }

    let identity = match parse_decision_body(&decision.body) {
        DecisionBody::Parsed(identity) => identity,
        DecisionBody::Unparseable => {
            // An empty identity fails the claim checks below, so an
            // unreadable body still denies access.
            log_unparseable_body(&decision.body);
            Identity::default()
        }
    };

    if identity.actor_type.as_deref() != Some("worker") {
        return Err(error("Only workers allowed", 403));
    }

    if identity.role.as_deref() != Some("admin") {
        return Err(error("Admin role required", 403));
    }

    Ok(identity)
}

fn log_unparseable_body(body: &Value) {
    eprintln!(
        "{}",
        json!({
            "component": "access_gate",
            "level": "error",
            "event": "unparseable_decision_body",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": { "body_kind": body_kind(body) },
        })
    );
}

fn body_kind(body: &Value) -> &'static str {
    match body {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
