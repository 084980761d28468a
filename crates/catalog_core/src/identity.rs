use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Claims released by the token-validation service once a token checks out.
///
/// Reconstructed fresh on every request; never persisted by this system.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    #[serde(default)]
    pub tenant: Option<String>,
    #[serde(rename = "type", default)]
    pub actor_type: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Structured outcome returned by the external token-validation service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Decision {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    #[serde(default)]
    pub body: Value,
}

/// Parse result for a decision body of ambiguous shape.
///
/// The validator may return its identity payload either as a serialized JSON
/// string or as an already-structured object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionBody {
    Parsed(Identity),
    Unparseable,
}

pub fn parse_decision_body(body: &Value) -> DecisionBody {
    let structured = match body {
        Value::Object(_) => body.clone(),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(value @ Value::Object(_)) => value,
            _ => return DecisionBody::Unparseable,
        },
        _ => return DecisionBody::Unparseable,
    };

    match serde_json::from_value::<Identity>(structured) {
        Ok(identity) => DecisionBody::Parsed(identity),
        Err(_) => DecisionBody::Unparseable,
    }
}

/// Strips an optional `"Bearer "` prefix and surrounding whitespace from an
/// `Authorization` header value.
pub fn bearer_token(header: &str) -> String {
    let trimmed = header.trim();
    let token = trimmed.strip_prefix("Bearer ").unwrap_or(trimmed);
    token.trim().to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_serialized_string_body() {
        let body = json!("{\"tenant\":\"T1\",\"type\":\"worker\",\"role\":\"admin\"}");

        let DecisionBody::Parsed(identity) = parse_decision_body(&body) else {
            panic!("string body should parse");
        };
        assert_eq!(identity.tenant.as_deref(), Some("T1"));
        assert_eq!(identity.actor_type.as_deref(), Some("worker"));
        assert_eq!(identity.role.as_deref(), Some("admin"));
    }

    #[test]
    fn parses_already_structured_body() {
        let body = json!({"tenant": "T1", "type": "worker", "role": "admin"});

        let DecisionBody::Parsed(identity) = parse_decision_body(&body) else {
            panic!("object body should parse");
        };
        assert_eq!(identity.tenant.as_deref(), Some("T1"));
    }

    #[test]
    fn tolerates_missing_and_extra_claims() {
        let body = json!({"role": "admin", "issued_by": "auth-microservice"});

        let DecisionBody::Parsed(identity) = parse_decision_body(&body) else {
            panic!("partial body should parse");
        };
        assert_eq!(identity.tenant, None);
        assert_eq!(identity.actor_type, None);
        assert_eq!(identity.role.as_deref(), Some("admin"));
    }

    #[test]
    fn rejects_non_object_bodies() {
        assert_eq!(parse_decision_body(&json!("not json")), DecisionBody::Unparseable);
        assert_eq!(parse_decision_body(&json!("[1,2]")), DecisionBody::Unparseable);
        assert_eq!(parse_decision_body(&json!(42)), DecisionBody::Unparseable);
        assert_eq!(parse_decision_body(&Value::Null), DecisionBody::Unparseable);
    }

    #[test]
    fn bearer_prefix_and_whitespace_are_stripped() {
        assert_eq!(bearer_token("Bearer   abc123  "), "abc123");
        assert_eq!(bearer_token("Bearer abc123"), "abc123");
        assert_eq!(bearer_token("abc123"), "abc123");
        assert_eq!(bearer_token("  abc123  "), "abc123");
    }

    #[test]
    fn decision_defaults_missing_body_to_null() {
        let decision: Decision =
            serde_json::from_value(json!({"statusCode": 403})).expect("decision should parse");

        assert_eq!(decision.status_code, 403);
        assert_eq!(decision.body, Value::Null);
    }
}
