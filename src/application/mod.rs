pub mod error;
pub mod progress;
pub mod services;
pub mod session;
