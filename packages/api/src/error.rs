use helpdesk_store::Role;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("session expired or not authorized")]
    Unauthorized,
    #[error("sign-in rejected: {0}")]
    InvalidCredentials(String),
    #[error("this account cannot sign in as {}", .0.label())]
    WrongRole(Role),
    #[error("server responded {code}: {message}")]
    Status { code: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("no endpoint configured for server `{0}`")]
    UnknownServer(String),
    #[error("{0}")]
    Legacy(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// Sentence suitable for a toast.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => "Could not reach the server. Please try again.".to_string(),
            ApiError::Unauthorized => "Your session has expired. Please log in again.".to_string(),
            ApiError::InvalidCredentials(message) if !message.is_empty() => message.clone(),
            ApiError::InvalidCredentials(_) => "Invalid username or password.".to_string(),
            ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
            ApiError::Status { code, .. } => format!("Request failed ({code})"),
            ApiError::Decode(_) => "The server sent an unexpected response.".to_string(),
            ApiError::WrongRole(role) => format!("This account cannot sign in as {}.", role.label()),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let status = ApiError::Status {
            code: 409,
            message: "Server code already exists".into(),
        };
        assert_eq!(status.user_message(), "Server code already exists");

        let bare = ApiError::Status {
            code: 500,
            message: String::new(),
        };
        assert_eq!(bare.user_message(), "Request failed (500)");

        assert_eq!(
            ApiError::WrongRole(Role::Staff).user_message(),
            "This account cannot sign in as Support Staff."
        );
        assert!(ApiError::Unauthorized.is_unauthorized());
    }
}
