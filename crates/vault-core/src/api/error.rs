use thiserror::Error;

use super::transport::TransportError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Registration failed")]
    RegistrationFailed,

    #[error("API Error: {status_text}")]
    Status { status: u16, status_text: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl ApiError {
    /// Build the generic status error. Only the status text is kept; the
    /// response body is never parsed for structured error details.
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        let status_text = status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.as_str().to_string());
        ApiError::Status {
            status: status.as_u16(),
            status_text,
        }
    }

    /// HTTP status code for status failures
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_uses_reason_phrase() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND);
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "API Error: Not Found");
    }

    #[test]
    fn test_from_status_without_reason_falls_back_to_code() {
        let status = StatusCode::from_u16(599).expect("valid status code");
        let err = ApiError::from_status(status);
        assert_eq!(err.to_string(), "API Error: 599");
    }

    #[test]
    fn test_auth_errors_have_no_status() {
        assert_eq!(ApiError::InvalidCredentials.status(), None);
        assert_eq!(ApiError::RegistrationFailed.to_string(), "Registration failed");
    }
}
