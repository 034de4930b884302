use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use crate::{adapters::dto::error_dto::ErrorResponse, application::error::ApplicationError};

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApplicationError::NoFileProvided => {
                warn!("Upload request without a file field");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new("No file provided"),
                )
            }
            ApplicationError::ProviderUploadFailed(ref detail) => {
                // Provider internals stay in the log.
                error!("Upload to provider failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Failed to upload to provider"),
                )
            }
            ApplicationError::RequestProcessingFailed(detail) => {
                error!("Request processing error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Upload failed").with_details(detail),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
