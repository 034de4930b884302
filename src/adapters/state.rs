use axum::extract::FromRef;
use std::sync::Arc;

use crate::application::services::MediaProvider;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub provider: Arc<dyn MediaProvider>,
    pub folder: Arc<str>,
}

impl AppState {
    pub fn new(provider: Arc<dyn MediaProvider>, folder: impl Into<Arc<str>>) -> Self {
        Self {
            provider,
            folder: folder.into(),
        }
    }
}
