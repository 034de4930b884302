pub mod provider;
pub mod server;
pub mod session;

pub use provider::ProviderConfig;
pub use server::{ConfigError, ServerConfig};
pub use session::SessionConfig;
