// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types with a fixed presentation policy.
//!
//! Validation and precondition failures never reach the network and are shown
//! inline next to the form. Network and server failures become a dismissible
//! banner. Only an expired session resets global state.

use crate::config::ConfigError;

/// Classification of an error answer from the gateway, derived from the HTTP
/// status code rather than the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    PaymentRequired,
    NotFound,
    Conflict,
    Unprocessable,
    Unavailable,
    /// Error payload carried by a 2xx answer, or any other status.
    Other,
}

impl ServerErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            402 => Self::PaymentRequired,
            404 => Self::NotFound,
            409 => Self::Conflict,
            422 => Self::Unprocessable,
            500..=599 => Self::Unavailable,
            _ => Self::Other,
        }
    }
}

/// Local, field-level rejection of user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please choose a box to book")]
    MissingBox,

    #[error("Please select a start time")]
    MissingStartTime,

    #[error("Please enter a valid number of people")]
    InvalidPartySize,

    #[error("Please enter a valid duration")]
    InvalidDuration,

    #[error("Card number must be 16 digits")]
    CardNumberLength,

    #[error("CVC must be 3 digits")]
    CvcLength,

    #[error("Phone number must be 10 digits")]
    PhoneNumberLength,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please enter a password")]
    MissingPassword,

    #[error("Please enter a positive amount")]
    InvalidAmount,
}

/// Where an error is shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPresentation {
    /// Next to the offending form.
    Inline,
    /// Dismissible banner above the main content.
    Banner,
    /// Credential cleared and view reverted to logged out.
    SessionReset,
}

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Please add a payment method before booking")]
    PreconditionFailed,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error ({status}): {message}")]
    Server {
        kind: ServerErrorKind,
        status: u16,
        message: String,
    },

    #[error("Session expired or invalid")]
    SessionExpired,

    #[error("Please log in first")]
    NotAuthenticated,

    #[error("A booking submission is already in progress")]
    SubmissionInFlight,

    #[error("Credential storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ClientError {
    /// Message used when the gateway gives no usable error text.
    pub const GENERIC_SERVER_MESSAGE: &'static str = "Something went wrong";

    /// Build a server error from an HTTP status and the extracted message.
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        ClientError::Server {
            kind: ServerErrorKind::from_status(status),
            status,
            message: if message.trim().is_empty() {
                Self::GENERIC_SERVER_MESSAGE.to_string()
            } else {
                message
            },
        }
    }

    /// Error payload carried inside a successful HTTP answer.
    pub fn rejected(message: impl Into<String>) -> Self {
        let message = message.into();
        ClientError::Server {
            kind: ServerErrorKind::Other,
            status: 200,
            message: if message.trim().is_empty() {
                Self::GENERIC_SERVER_MESSAGE.to_string()
            } else {
                message
            },
        }
    }

    pub fn server_kind(&self) -> Option<ServerErrorKind> {
        match self {
            ClientError::Server { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, ClientError::SessionExpired)
    }

    pub fn presentation(&self) -> ErrorPresentation {
        match self {
            ClientError::Validation(_)
            | ClientError::PreconditionFailed
            | ClientError::NotAuthenticated
            | ClientError::SubmissionInFlight => ErrorPresentation::Inline,
            ClientError::SessionExpired => ErrorPresentation::SessionReset,
            ClientError::Network(_)
            | ClientError::Server { .. }
            | ClientError::Storage(_)
            | ClientError::Config(_)
            | ClientError::Internal(_) => ErrorPresentation::Banner,
        }
    }

    /// Text shown to the user: the server's own message when it sent one,
    /// otherwise `fallback`.
    pub fn display_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Server { message, .. } => message.clone(),
            ClientError::Network(_) | ClientError::Internal(_) => fallback.to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_status() {
        assert_eq!(ServerErrorKind::from_status(401), ServerErrorKind::Unauthorized);
        assert_eq!(ServerErrorKind::from_status(402), ServerErrorKind::PaymentRequired);
        assert_eq!(ServerErrorKind::from_status(404), ServerErrorKind::NotFound);
        assert_eq!(ServerErrorKind::from_status(409), ServerErrorKind::Conflict);
        assert_eq!(ServerErrorKind::from_status(503), ServerErrorKind::Unavailable);
        assert_eq!(ServerErrorKind::from_status(418), ServerErrorKind::Other);
    }

    #[test]
    fn test_empty_server_message_falls_back() {
        let err = ClientError::server(500, "  ");
        assert_eq!(err.display_message("unused"), "Something went wrong");
    }

    #[test]
    fn test_presentation_policy() {
        assert_eq!(
            ClientError::from(ValidationError::InvalidDuration).presentation(),
            ErrorPresentation::Inline
        );
        assert_eq!(
            ClientError::PreconditionFailed.presentation(),
            ErrorPresentation::Inline
        );
        assert_eq!(
            ClientError::Network("timeout".into()).presentation(),
            ErrorPresentation::Banner
        );
        assert_eq!(
            ClientError::server(409, "conflict").presentation(),
            ErrorPresentation::Banner
        );
        assert_eq!(
            ClientError::SessionExpired.presentation(),
            ErrorPresentation::SessionReset
        );
    }

    #[test]
    fn test_network_error_uses_fallback_text() {
        let err = ClientError::Network("connection refused".into());
        assert_eq!(err.display_message("Try again"), "Try again");
    }
}
