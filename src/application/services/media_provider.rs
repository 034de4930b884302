use async_trait::async_trait;
use bytes::Bytes;

use crate::{
    application::error::ApplicationError,
    domain::models::{MediaKind, UploadDescriptor},
};

/// One file on its way to the provider.
#[derive(Debug, Clone)]
pub struct ProviderUpload {
    pub content: Bytes,
    pub file_name: String,
    pub mime_type: String,
    pub kind: MediaKind,
    pub folder: String,
}

#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// Resolves once the provider has acknowledged or refused the upload.
    async fn upload(&self, upload: ProviderUpload) -> Result<UploadDescriptor, ApplicationError>;
}
