use aws_sdk_lambda::types::InvocationType;
use catalog_core::identity::Decision;
use serde_json::json;

/// Transport seam for the external token-validation service.
pub trait TokenValidator {
    fn validate_token(&self, token: &str) -> Result<Decision, String>;
}

/// Fail-closed resolution of a validator call.
///
/// Any transport fault collapses into a synthesized 500 decision, so gate
/// callers see an always-returning client. "Auth service said no" and "auth
/// service unreachable" are distinguishable only by status code.
pub fn resolve_decision(validator: &dyn TokenValidator, token: &str) -> Decision {
    match validator.validate_token(token) {
        Ok(decision) => decision,
        Err(error) => {
            log_validator_error(&error);
            Decision {
                status_code: 500,
                body: json!("Internal Auth Error"),
            }
        }
    }
}

fn log_validator_error(error: &str) {
    eprintln!(
        "{}",
        json!({
            "component": "token_validator",
            "level": "error",
            "event": "invoke_failed",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": { "error": error },
        })
    );
}

/// Invokes the independently deployed validator Lambda with the raw token
/// and decodes its decision payload.
pub struct LambdaTokenValidator {
    pub lambda_client: aws_sdk_lambda::Client,
    pub function_name: String,
}

impl TokenValidator for LambdaTokenValidator {
    fn validate_token(&self, token: &str) -> Result<Decision, String> {
        let request_payload = serde_json::to_vec(&json!({ "token": token }))
            .map_err(|error| format!("failed to encode validator payload: {error}"))?;
        let client = self.lambda_client.clone();
        let function_name = self.function_name.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let output = client
                    .invoke()
                    .function_name(function_name)
                    .invocation_type(InvocationType::RequestResponse)
                    .set_payload(Some(request_payload.into()))
                    .send()
                    .await
                    .map_err(|error| format!("failed to invoke token validator: {error}"))?;

                let bytes = output
                    .payload()
                    .map(|blob| blob.as_ref().to_vec())
                    .unwrap_or_default();
                serde_json::from_slice::<Decision>(&bytes)
                    .map_err(|error| format!("malformed token validator response: {error}"))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingValidator;

    impl TokenValidator for FailingValidator {
        fn validate_token(&self, _token: &str) -> Result<Decision, String> {
            Err("connection refused".to_string())
        }
    }

    struct PassingValidator;

    impl TokenValidator for PassingValidator {
        fn validate_token(&self, _token: &str) -> Result<Decision, String> {
            Ok(Decision {
                status_code: 200,
                body: json!({"tenant": "T1", "type": "worker", "role": "admin"}),
            })
        }
    }

    #[test]
    fn transport_failure_becomes_internal_auth_error_decision() {
        let decision = resolve_decision(&FailingValidator, "abc123");

        assert_eq!(decision.status_code, 500);
        assert_eq!(decision.body, json!("Internal Auth Error"));
    }

    #[test]
    fn successful_decisions_pass_through_unchanged() {
        let decision = resolve_decision(&PassingValidator, "abc123");

        assert_eq!(decision.status_code, 200);
        assert_eq!(decision.body["tenant"], "T1");
    }
}
