use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::{
    adapters::state::AppState,
    application::{error::ApplicationError, services::ProviderUpload},
    domain::models::{CandidateFile, MediaKind, UploadDescriptor},
};

const FILE_FIELD: &str = "file";
const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

pub struct UploadController;

impl UploadController {
    /// Relays a single file to the media provider
    /// POST /upload
    /// Body: multipart form with one `file` field
    pub async fn upload(
        State(app_state): State<AppState>,
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<Json<UploadDescriptor>, ApplicationError> {
        let request_id = Uuid::new_v4();
        let span = info_span!("relay_upload", %request_id);

        async move {
            let multipart = multipart.map_err(|rejection| {
                ApplicationError::RequestProcessingFailed(rejection.body_text())
            })?;

            let file = Self::read_file_field(multipart).await?.ok_or_else(|| {
                warn!("Missing required 'file' field in upload");
                ApplicationError::NoFileProvided
            })?;

            let kind = MediaKind::from_mime(&file.mime_type);
            info!(
                "Forwarding {} ({} bytes, {}) as {}",
                file.name,
                file.size(),
                file.mime_type,
                kind
            );

            let upload = ProviderUpload {
                content: file.content,
                file_name: file.name,
                mime_type: file.mime_type,
                kind,
                folder: app_state.folder.to_string(),
            };
            let descriptor = app_state.provider.upload(upload).await?;

            info!(
                "Upload successful: public_id={}, secure_url={}",
                descriptor.public_id, descriptor.secure_url
            );

            Ok(Json(descriptor))
        }
        .instrument(span)
        .await
    }

    /// Returns the first `file` field. Other fields are drained and ignored.
    /// A browser sends an empty, nameless part when nothing was picked; that
    /// counts as no file. A nameless part with content is a text value.
    async fn read_file_field(
        mut multipart: Multipart,
    ) -> Result<Option<CandidateFile>, ApplicationError> {
        let mut file = None;

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            warn!("Invalid multipart data: {}", e);
            ApplicationError::RequestProcessingFailed(e.body_text())
        })? {
            if file.is_some() || field.name() != Some(FILE_FIELD) {
                continue;
            }

            let name = field.file_name().unwrap_or_default().to_string();
            let mime_type = field
                .content_type()
                .unwrap_or(FALLBACK_MIME_TYPE)
                .to_string();
            let content = field.bytes().await.map_err(|e| {
                warn!("Cannot read file bytes: {}", e);
                ApplicationError::RequestProcessingFailed(e.body_text())
            })?;

            if name.is_empty() {
                if content.is_empty() {
                    continue;
                }
                warn!("'file' field is a plain value, not a file");
                return Err(ApplicationError::RequestProcessingFailed(
                    "'file' field carries no file name".to_string(),
                ));
            }

            file = Some(CandidateFile::new(content, name, mime_type));
        }

        Ok(file)
    }
}
