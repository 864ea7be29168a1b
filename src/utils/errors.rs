use thiserror::Error;

use crate::constants::{MSG_BACKEND_ERROR, MSG_BUSY};

/// Main error type for Sitescan
#[derive(Error, Debug)]
pub enum SiteScanError {
    /// Bad form input; recovered locally and shown as a message
    #[error("Validation error: {0}")]
    Validation(String),

    /// Navigation attempted from a view that does not allow it
    #[error("Cannot {action} from the {from} view")]
    InvalidTransition { action: &'static str, from: String },

    /// A submission was attempted while another one is still pending
    #[error("An analysis is already in progress")]
    Busy,

    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The backend answered with a body we could not decode
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SiteScanError {
    /// Text shown in the message slot for this error
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(text) => text.clone(),
            Self::Server { message, .. } => message.clone(),
            Self::Network(message) => message.clone(),
            Self::Decode(_) => MSG_BACKEND_ERROR.to_string(),
            Self::Busy => MSG_BUSY.to_string(),
            other => other.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_uses_server_detail() {
        let err = SiteScanError::Server {
            status: 500,
            message: "bad image".to_string(),
        };
        assert_eq!(err.user_message(), "bad image");
    }

    #[test]
    fn test_decode_error_is_generic() {
        let err = SiteScanError::Decode("expected value at line 1".to_string());
        assert_eq!(err.user_message(), "Backend error");
    }
}
