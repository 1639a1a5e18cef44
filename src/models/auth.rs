use serde::{Deserialize, Serialize};

/// Token pair carried by login, signup, and refresh responses.
///
/// The service returns the new refresh token under the key `token`, not
/// `refreshToken`; the asymmetry is part of the wire contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "token")]
    pub refresh_token: String,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Profile fields for account creation. Field names are snake_case on the
/// wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_auth_tokens() {
        let json = r#"{"accessToken":"A1","token":"R1","userId":"U1"}"#;
        let tokens: AuthTokens = serde_json::from_str(json).unwrap();
        assert_eq!(tokens.access_token, "A1");
        assert_eq!(tokens.refresh_token, "R1");
        assert_eq!(tokens.user_id.as_deref(), Some("U1"));
    }

    #[test]
    fn test_user_id_is_optional() {
        let json = r#"{"accessToken":"A1","token":"R1"}"#;
        let tokens: AuthTokens = serde_json::from_str(json).unwrap();
        assert_eq!(tokens.user_id, None);
    }

    #[test]
    fn test_missing_refresh_token_is_rejected() {
        // A response without the `token` field must not yield a partial pair
        let json = r#"{"accessToken":"A1"}"#;
        assert!(serde_json::from_str::<AuthTokens>(json).is_err());
    }

    #[test]
    fn test_missing_access_token_is_rejected() {
        let json = r#"{"token":"R1"}"#;
        assert!(serde_json::from_str::<AuthTokens>(json).is_err());
    }

    #[test]
    fn test_signup_request_serializes_snake_case() {
        let request = SignupRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone_number: "5551234567".to_string(),
            password: "secret".to_string(),
            username: "ada".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["first_name"], "Ada");
        assert_eq!(value["phone_number"], "5551234567");
        assert_eq!(value["username"], "ada");
    }
}
