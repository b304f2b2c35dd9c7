//! Error types for the amphibians client.
//!
//! # Design
//! Three concrete variants keep enough detail for logs, while `kind()`
//! collapses them into the two categories the UI layer cares about: the
//! request never produced a usable response, or it did and the payload was
//! not the expected shape. Both end up as the same `Error` view state.

use thiserror::Error;

/// Errors produced while fetching and decoding the amphibian list.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, DNS failure, timeout, or the body could not be read.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The response body is not a JSON array of amphibians.
    #[error("decode failed: {0}")]
    Decode(String),
}

/// Coarse classification of an `ApiError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Decode,
}

impl ApiError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::Transport(_) | ApiError::HttpStatus { .. } => FailureKind::Transport,
            ApiError::Decode(_) => FailureKind::Decode,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}
