use std::time::Duration;

/// Client side settings for an [`UploadSession`](crate::application::session::UploadSession).
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub tick_interval: Duration,
    pub tick_step: u8,
    /// Highest value the simulated ramp may report. Only a completed transfer reaches 100.
    pub progress_cap: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(100),
            tick_step: 5,
            progress_cap: 95,
        }
    }
}
