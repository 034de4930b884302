use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Body, Client};
use tracing::warn;

use crate::{
    adapters::dto::error_dto::ErrorResponse,
    application::services::{RelayTransport, TransferError},
    domain::models::{CandidateFile, UploadDescriptor},
};

/// Posts the selected file to a relay's `/upload` endpoint.
pub struct HttpRelayClient {
    client: Client,
    upload_url: String,
}

impl HttpRelayClient {
    pub fn new(relay_url: &str, timeout: Option<Duration>) -> Result<Self, TransferError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransferError::InvalidRequest(e.to_string()))?;

        Ok(Self {
            client,
            upload_url: format!("{}/upload", relay_url.trim_end_matches('/')),
        })
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }
}

#[async_trait]
impl RelayTransport for HttpRelayClient {
    async fn send(&self, file: &CandidateFile) -> Result<UploadDescriptor, TransferError> {
        let body = Body::from(file.content.clone());
        let file_part = multipart::Part::stream_with_length(body, file.size())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| TransferError::InvalidRequest(e.to_string()))?;

        let form = multipart::Form::new().part("file", file_part);

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|error| error.error)
                .unwrap_or(body);
            warn!("Relay rejected upload with {}: {}", status, message);
            return Err(TransferError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<UploadDescriptor>()
            .await
            .map_err(|e| TransferError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::MediaKind;
    use mockito::Matcher;

    fn png() -> CandidateFile {
        CandidateFile::new(&b"fake png"[..], "photo.png", "image/png")
    }

    #[test]
    fn upload_url_tolerates_trailing_slash() {
        let client = HttpRelayClient::new("http://relay.local/", None).unwrap();
        assert_eq!(client.upload_url(), "http://relay.local/upload");
    }

    #[tokio::test]
    async fn posts_file_field_and_parses_descriptor() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/upload")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data; boundary=".to_string()),
            )
            .match_body(Matcher::Regex(
                r#"name="file"; filename="photo.png"\r\nContent-Type: image/png\r\n\r\nfake png"#
                    .to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"public_id":"uploads/abc","secure_url":"https://res.example.com/abc.png","resource_type":"image","version":3}"#,
            )
            .create_async()
            .await;

        let client = HttpRelayClient::new(&server.url(), Some(Duration::from_secs(5))).unwrap();
        let descriptor = client.send(&png()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(descriptor.public_id, "uploads/abc");
        assert_eq!(descriptor.resource_type, MediaKind::Image);
        assert_eq!(descriptor.metadata["version"], 3);
    }

    #[tokio::test]
    async fn error_status_becomes_rejected_with_relay_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/upload")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"Failed to upload to provider"}"#)
            .create_async()
            .await;

        let client = HttpRelayClient::new(&server.url(), None).unwrap();
        let err = client.send(&png()).await.unwrap_err();

        assert_eq!(
            err,
            TransferError::Rejected {
                status: 500,
                message: "Failed to upload to provider".to_string()
            }
        );
    }

    #[tokio::test]
    async fn malformed_success_body_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/upload")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"public_id":"uploads/abc"}"#)
            .create_async()
            .await;

        let client = HttpRelayClient::new(&server.url(), None).unwrap();
        let err = client.send(&png()).await.unwrap_err();

        assert!(matches!(err, TransferError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn unreachable_relay_is_a_network_error() {
        // Port 9 (discard) is closed on test hosts.
        let client =
            HttpRelayClient::new("http://127.0.0.1:9", Some(Duration::from_secs(2))).unwrap();
        let err = client.send(&png()).await.unwrap_err();

        assert!(matches!(err, TransferError::Network(_) | TransferError::Timeout));
    }
}
