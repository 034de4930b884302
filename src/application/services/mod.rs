mod media_provider;
mod relay_transport;

pub use media_provider::{MediaProvider, ProviderUpload};
pub use relay_transport::{RelayTransport, TransferError, GENERIC_FAILURE_MESSAGE};
