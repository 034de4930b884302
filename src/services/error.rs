use thiserror::Error;

use crate::application::error::ApplicationError;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Provider rejected upload: {0}")]
    Rejected(String),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<ProviderError> for ApplicationError {
    fn from(error: ProviderError) -> Self {
        ApplicationError::ProviderUploadFailed(error.to_string())
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ProviderError::NetworkError("Request timeout".to_string())
        } else if error.is_connect() {
            ProviderError::NetworkError(format!("Connection failed: {}", error))
        } else if let Some(status) = error.status() {
            match status.as_u16() {
                401 | 403 => ProviderError::Unauthorized(error.to_string()),
                _ => ProviderError::Rejected(error.to_string()),
            }
        } else {
            ProviderError::InternalError(error.to_string())
        }
    }
}
