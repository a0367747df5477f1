//! Oracle error types

use thiserror::Error;

/// Oracle request failure with classification
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct OracleError {
    pub kind: OracleErrorKind,
    pub message: String,
}

impl OracleError {
    pub fn new(kind: OracleErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(OracleErrorKind::Network, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(OracleErrorKind::InvalidResponse, message)
    }

    /// Classify a non-success HTTP status
    pub fn from_status(status: u16, body: &str) -> Self {
        let kind = match status {
            401 | 403 => OracleErrorKind::Auth,
            402 | 429 => OracleErrorKind::RateLimit,
            400..=499 => OracleErrorKind::InvalidRequest,
            500..=599 => OracleErrorKind::ServerError,
            _ => OracleErrorKind::InvalidResponse,
        };
        Self::new(kind, format!("HTTP {}: {}", status, body.trim()))
    }
}

impl From<reqwest::Error> for OracleError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::invalid_response(e.to_string())
        } else {
            Self::network(e.to_string())
        }
    }
}

/// Error classification for oracle failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleErrorKind {
    /// Connection failures and timeouts
    Network,
    /// Authentication failed (401, 403)
    Auth,
    /// Rate limited or out of credits (429, 402)
    RateLimit,
    /// Server error (5xx)
    ServerError,
    /// Bad request (other 4xx)
    InvalidRequest,
    /// Response could not be understood
    InvalidResponse,
}

impl std::fmt::Display for OracleErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OracleErrorKind::Network => write!(f, "network error"),
            OracleErrorKind::Auth => write!(f, "authentication failed"),
            OracleErrorKind::RateLimit => write!(f, "rate limited"),
            OracleErrorKind::ServerError => write!(f, "server error"),
            OracleErrorKind::InvalidRequest => write!(f, "invalid request"),
            OracleErrorKind::InvalidResponse => write!(f, "invalid response"),
        }
    }
}
