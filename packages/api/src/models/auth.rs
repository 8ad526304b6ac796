//! # Login exchange
//!
//! Both roles log in through `POST /api/auth/{role}/login` with a
//! [`LoginRequest`]. The backend answers with a [`LoginResponse`]:
//!
//! - `token`: bearer token attached to every later request.
//! - `name`: display name; staff accounts may answer with `employeeId` or
//!   `username` instead, so all three decode into the same field.
//! - `role`: optional echo of the role. When present it must match the role
//!   the user logged in as; an administrator cannot sign in through the staff
//!   form and vice versa.
//!
//! [`LoginResponse::into_session`] performs that check and produces the
//! [`Session`] handed to the session service.

use helpdesk_store::{Role, Session};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[serde(alias = "username", alias = "employeeId", default)]
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl LoginResponse {
    /// Convert into a session for `requested`, falling back to the login name.
    pub fn into_session(self, requested: Role, username: &str) -> Result<Session, ApiError> {
        if self.token.trim().is_empty() {
            return Err(ApiError::Decode("login response carried no token".to_string()));
        }
        if let Some(role) = self.role.as_deref() {
            let role = role.trim().to_lowercase();
            let role = role.strip_prefix("role_").unwrap_or(&role);
            let matches = match requested {
                Role::Admin => role == "admin",
                Role::Staff => role == "staff" || role == "support" || role == "supportstaff",
            };
            if !matches {
                return Err(ApiError::WrongRole(requested));
            }
        }
        let name = if self.name.trim().is_empty() {
            username.to_string()
        } else {
            self.name
        };
        Ok(Session {
            role: requested,
            username: name,
            token: self.token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_response_with_employee_id() {
        let response: LoginResponse =
            serde_json::from_str(r#"{"token": "t", "employeeId": "EMP7", "role": "ROLE_STAFF"}"#)
                .unwrap();
        let session = response.into_session(Role::Staff, "emp7").unwrap();
        assert_eq!(session.username, "EMP7");
        assert_eq!(session.role, Role::Staff);
    }

    #[test]
    fn test_role_mismatch_is_rejected() {
        let response = LoginResponse {
            token: "t".into(),
            name: "alice".into(),
            role: Some("admin".into()),
        };
        assert!(matches!(
            response.into_session(Role::Staff, "alice"),
            Err(ApiError::WrongRole(Role::Staff))
        ));
    }

    #[test]
    fn test_missing_name_falls_back_to_username() {
        let response: LoginResponse = serde_json::from_str(r#"{"token": "t"}"#).unwrap();
        let session = response.into_session(Role::Admin, "root").unwrap();
        assert_eq!(session.username, "root");
    }

    #[test]
    fn test_empty_token_is_rejected() {
        let response: LoginResponse = serde_json::from_str(r#"{"token": " "}"#).unwrap();
        assert!(response.into_session(Role::Admin, "root").is_err());
    }
}
