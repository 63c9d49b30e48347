use serde::Deserialize;
use serde_json::Value;

use crate::error::ValidationError;
use crate::models::{LoginRequest, ResetPasswordRequest};

pub fn login_request(email: &str, password: &str) -> Result<LoginRequest, ValidationError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    Ok(LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    })
}

pub fn signup_request(
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<LoginRequest, ValidationError> {
    if password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    login_request(email, password)
}

pub fn reset_password_request(email: &str) -> Result<ResetPasswordRequest, ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    Ok(ResetPasswordRequest {
        email: email.to_string(),
    })
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<Value>,
}

/// The `detail` field of an error response, if it has one. Structured
/// details are returned as compact JSON.
pub fn find_detail(body: &str) -> Option<String> {
    match serde_json::from_str::<ErrorBody>(body).ok()?.detail? {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_rejects_mismatched_passwords_before_anything_else() {
        assert_eq!(
            signup_request("", "a", "b"),
            Err(ValidationError::PasswordMismatch)
        );
        assert_eq!(
            signup_request(" ana@x.io ", "pw", "pw").unwrap().email,
            "ana@x.io"
        );
    }

    #[test]
    fn login_requires_both_fields() {
        assert_eq!(login_request("ana@x.io", ""), Err(ValidationError::MissingCredentials));
        assert!(login_request("ana@x.io", "pw").is_ok());
    }

    #[test]
    fn detail_extraction() {
        assert_eq!(find_detail(r#"{"detail":"Invalid credentials"}"#).as_deref(), Some("Invalid credentials"));
        assert_eq!(find_detail("<html>oops</html>"), None);
        assert_eq!(find_detail(r#"{"detail":null}"#), None);
        assert_eq!(find_detail(r#"{"detail":""}"#), None);
        assert_eq!(find_detail(r#"{"detail":[{"msg":"bad"}]}"#).as_deref(), Some(r#"[{"msg":"bad"}]"#));
    }
}
