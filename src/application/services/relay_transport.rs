use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::{CandidateFile, UploadDescriptor};

/// The only failure text shown to the user, whatever went wrong in transit.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to upload file. Please try again.";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransferError {
    #[error("Transfer timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Relay responded with {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid relay response: {0}")]
    InvalidResponse(String),

    #[error("Cannot build request: {0}")]
    InvalidRequest(String),

    /// The caller stopped waiting before the relay answered.
    #[error("Transfer abandoned before completion")]
    Cancelled,
}

impl TransferError {
    pub fn user_message(&self) -> &'static str {
        GENERIC_FAILURE_MESSAGE
    }
}

impl From<reqwest::Error> for TransferError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TransferError::Timeout
        } else if error.is_decode() {
            TransferError::InvalidResponse(error.to_string())
        } else {
            TransferError::Network(error.to_string())
        }
    }
}

/// Carries a selected file to the relay endpoint.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn send(&self, file: &CandidateFile) -> Result<UploadDescriptor, TransferError>;
}
