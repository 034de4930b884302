use thiserror::Error;

/// Failures of the relay endpoint. Every variant is rendered into the JSON
/// error body at the handler boundary.
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("No file provided")]
    NoFileProvided,

    #[error("Provider upload failed: {0}")]
    ProviderUploadFailed(String),

    #[error("Request processing failed: {0}")]
    RequestProcessingFailed(String),
}
