pub mod controllers;
pub mod dto;
pub mod error;
pub mod relay_client;
pub mod router;
pub mod state;
