mod cloudinary;
mod error;

pub use cloudinary::CloudinaryProvider;
pub use error::ProviderError;

use std::sync::Arc;

use crate::{application::services::MediaProvider, domain::config::ProviderConfig};

pub fn create_media_provider(
    config: &ProviderConfig,
) -> Result<Arc<dyn MediaProvider>, ProviderError> {
    let service = CloudinaryProvider::new(config)?;
    Ok(Arc::new(service))
}
