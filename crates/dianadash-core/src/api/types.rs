use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Body returned by `/auth/login` and `/auth/refresh`.
///
/// Every field is optional so that an unexpected shape is reported as a
/// failed login rather than a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<f64>,
}

/// Admin account as returned by `/auth/me` (no sensitive fields).
///
/// The API emits naive UTC timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    #[serde(default)]
    pub permissions: Option<serde_json::Value>,
    #[serde(default)]
    pub last_login: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login_response() {
        let json = r#"{"access_token":"abc","token_type":"bearer","expires_in":1800.0}"#;
        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.access_token.as_deref(), Some("abc"));
        assert_eq!(resp.expires_in, Some(1800.0));

        let resp: LoginResponse = serde_json::from_str(r#"{"detail":"nope"}"#).unwrap();
        assert!(resp.access_token.is_none());
    }

    #[test]
    fn test_parse_admin_user() {
        let json = r#"{"id":1,"username":"diana","email":"d@example.com","role":"owner","is_active":true,"permissions":null,"last_login":null,"created_at":"2024-03-07T10:00:00.123456","updated_at":null}"#;
        let user: AdminUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.username, "diana");
        assert_eq!(user.role, "owner");
        assert!(user.last_login.is_none());
    }
}
