use async_trait::async_trait;
use chrono::Utc;
use reqwest::{multipart, Body, Client};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use tracing::debug;

use crate::{
    application::{
        error::ApplicationError,
        services::{MediaProvider, ProviderUpload},
    },
    domain::{
        config::ProviderConfig,
        models::{MediaKind, UploadDescriptor},
    },
    services::error::ProviderError,
};

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

/// Signed uploads to Cloudinary's Upload API.
pub struct CloudinaryProvider {
    client: Client,
    api_base: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl CloudinaryProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        if config.cloud_name.is_empty()
            || config.api_key.is_empty()
            || config.api_secret.is_empty()
        {
            return Err(ProviderError::InvalidCredentials(
                "cloud name, API key and API secret are required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::InternalError(e.to_string()))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
        })
    }

    fn upload_url(&self, kind: MediaKind) -> String {
        format!("{}/{}/{}/upload", self.api_base, self.cloud_name, kind)
    }

    /// Request signature: parameters sorted by name, joined as `k=v` with `&`,
    /// the secret appended, SHA-1 hex encoded.
    fn sign(&self, params: &[(&str, &str)]) -> String {
        let mut sorted = params.to_vec();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let to_sign = sorted
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha1::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(self.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    async fn send_upload(&self, upload: ProviderUpload) -> Result<UploadDescriptor, ProviderError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = self.sign(&[
            ("folder", upload.folder.as_str()),
            ("timestamp", timestamp.as_str()),
        ]);

        let size = upload.content.len() as u64;
        let file_part = multipart::Part::stream_with_length(Body::from(upload.content), size)
            .file_name(upload.file_name)
            .mime_str(&upload.mime_type)
            .map_err(|e| ProviderError::InternalError(e.to_string()))?;

        let form = multipart::Form::new()
            .part("file", file_part)
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", upload.folder)
            .text("signature", signature);

        let url = self.upload_url(upload.kind);
        debug!("Posting {} bytes to {}", size, url);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(ProviderError::from)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&error_text)
                .map(|envelope| envelope.error.message)
                .unwrap_or(error_text);

            return Err(match status.as_u16() {
                401 | 403 => ProviderError::Unauthorized(message),
                _ => ProviderError::Rejected(format!("{}: {}", status, message)),
            });
        }

        response
            .json::<UploadDescriptor>()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl MediaProvider for CloudinaryProvider {
    async fn upload(&self, upload: ProviderUpload) -> Result<UploadDescriptor, ApplicationError> {
        Ok(self.send_upload(upload).await?)
    }
}
