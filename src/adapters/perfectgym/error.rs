//! Errors from the booking portal's client API.

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Errors that can occur when talking to the portal.
#[derive(Error, Debug)]
pub enum PortalError {
    /// The portal rejected the request as malformed.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The portal rejected the credentials or the session.
    #[error("Credentials rejected: {0}")]
    InvalidCredentials(String),

    /// The portal reported a server-side failure (5xx).
    #[error("Portal server error: {0}")]
    ServerError(String),

    /// A network-level failure: timeout, connect error, broken body.
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Anything else the portal answered with.
    #[error("Unexpected response: {0}")]
    Unexpected(String),
}

impl PortalError {
    /// Whether retrying could reasonably help. Server errors, timeouts,
    /// and connection failures qualify; rejected credentials and
    /// malformed requests never do. Only the login path acts on this.
    pub fn is_transient(&self) -> bool {
        match self {
            PortalError::ServerError(_) => true,
            PortalError::NetworkError(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Classify a non-success HTTP response.
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        match status.as_u16() {
            400 => PortalError::InvalidRequest(body),
            401 | 403 => PortalError::InvalidCredentials(body),
            s if (500..=599).contains(&s) => {
                PortalError::ServerError(format!("HTTP {status}: {body}"))
            }
            _ => PortalError::Unexpected(format!("HTTP {status}: {body}")),
        }
    }
}

impl From<PortalError> for DomainError {
    fn from(err: PortalError) -> Self {
        match err {
            PortalError::InvalidCredentials(msg) => DomainError::AuthenticationFailed(msg),
            PortalError::InvalidRequest(msg) => DomainError::InvalidInput(msg),
            other => DomainError::TransientNetwork(other.to_string()),
        }
    }
}
