use serde::{Deserialize, Serialize};
use std::fmt;

/// Response of `GET /api/auth/csrf`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrfTokenResponse {
    #[serde(default)]
    pub csrf_token: String,
}

/// Form body of `POST /api/auth/callback/credentials`.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsForm<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub csrf_token: &'a str,
}

impl fmt::Debug for CredentialsForm<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsForm")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("csrf_token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csrf_token_defaults_to_empty_when_missing() {
        let parsed: CsrfTokenResponse = serde_json::from_str("{}").expect("parse");
        assert!(parsed.csrf_token.is_empty());

        let parsed: CsrfTokenResponse =
            serde_json::from_str(r#"{"csrfToken":"abc"}"#).expect("parse");
        assert_eq!(parsed.csrf_token, "abc");
    }

    #[test]
    fn credentials_form_debug_hides_secrets() {
        let form = CredentialsForm {
            username: "admin@example.com",
            password: "hunter2",
            csrf_token: "csrf-secret",
        };
        let rendered = format!("{form:?}");
        assert!(rendered.contains("admin@example.com"));
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("csrf-secret"));
    }
}
