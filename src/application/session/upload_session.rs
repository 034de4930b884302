use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::state::{BeginDecision, Selection, SessionSnapshot, SessionState};
use crate::{
    application::{
        progress::ProgressTicker,
        services::{RelayTransport, TransferError},
    },
    domain::{
        config::SessionConfig,
        models::{CandidateFile, PreviewHandle, UploadDescriptor},
        validation::ValidationResult,
    },
};

#[derive(Debug, Clone, PartialEq)]
pub enum BeginOutcome {
    Succeeded(UploadDescriptor),
    Failed(TransferError),
    /// Another call already owns the transfer; nothing was sent.
    AlreadyInFlight,
    NoCandidate,
}

/// Drives one user's upload: selection, preview, a single transfer at a time
/// and the progress shown meanwhile. Clones share the same session.
#[derive(Clone)]
pub struct UploadSession {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<SessionState>,
    transport: Arc<dyn RelayTransport>,
    config: SessionConfig,
    updates: watch::Sender<SessionSnapshot>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs a transition and notifies observers when it changed something.
    fn apply<T>(&self, transition: impl FnOnce(&mut SessionState) -> T) -> T {
        let mut state = self.lock();
        let before = state.snapshot();
        let result = transition(&mut *state);
        let after = state.snapshot();
        if after != before {
            self.updates.send_replace(after);
        }
        result
    }
}

/// Marks the running transfer as abandoned if `begin_upload` is dropped
/// before the transport returned.
struct TransferGuard {
    inner: Arc<Inner>,
    armed: bool,
}

impl TransferGuard {
    fn new(inner: Arc<Inner>) -> Self {
        Self { inner, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for TransferGuard {
    fn drop(&mut self) {
        if self.armed {
            warn!("Upload dropped before the relay answered");
            self.inner.apply(|state| state.on_abandoned());
        }
    }
}

impl UploadSession {
    pub fn new(transport: Arc<dyn RelayTransport>, config: SessionConfig) -> Self {
        let (updates, _) = watch::channel(SessionSnapshot::default());
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(SessionState::new()),
                transport,
                config,
                updates,
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.updates.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().snapshot()
    }

    /// Validates `raw` right away, then builds its preview on the blocking pool.
    /// Resolves once the preview is attached (or discarded because a newer
    /// selection arrived first).
    pub async fn select_file(&self, raw: Option<CandidateFile>) -> ValidationResult {
        let selection = self.inner.apply(|state| state.select(raw));

        let (generation, file) = match selection {
            Selection::Accepted { generation, file } => (generation, file),
            Selection::Rejected(result) => {
                debug!("Selection rejected: {:?}", result);
                return result;
            }
        };

        debug!(
            "Selected {} ({} bytes, {})",
            file.name,
            file.size(),
            file.mime_type
        );

        match tokio::task::spawn_blocking(move || PreviewHandle::build(&file)).await {
            Ok(preview) => {
                if !self.inner.apply(|state| state.set_preview(generation, preview)) {
                    debug!("Discarded preview for superseded selection {}", generation);
                }
            }
            Err(e) => warn!("Preview construction failed: {}", e),
        }

        ValidationResult::Ok
    }

    /// Sends the selected file to the relay and waits for the result. A call
    /// made while another transfer is running returns at once without sending.
    pub async fn begin_upload(&self) -> BeginOutcome {
        let (generation, file) = match self.inner.apply(|state| state.begin()) {
            BeginDecision::Start { generation, file } => (generation, file),
            BeginDecision::AlreadyInFlight => {
                debug!("Upload already in flight, ignoring begin");
                return BeginOutcome::AlreadyInFlight;
            }
            BeginDecision::NoCandidate => return BeginOutcome::NoCandidate,
        };

        info!("Uploading {} ({} bytes)", file.name, file.size());

        let guard = TransferGuard::new(Arc::clone(&self.inner));
        let ticker = {
            let inner = Arc::clone(&self.inner);
            ProgressTicker::start(
                self.inner.config.tick_interval,
                self.inner.config.tick_step,
                self.inner.config.progress_cap,
                move |value| {
                    inner.apply(|state| state.on_progress(value));
                },
            )
        };

        let result = self.inner.transport.send(&file).await;
        ticker.stop();
        guard.disarm();

        match result {
            Ok(descriptor) => {
                info!("Upload succeeded: {}", descriptor.public_id);
                self.inner
                    .apply(|state| state.on_complete(generation, descriptor.clone()));
                BeginOutcome::Succeeded(descriptor)
            }
            Err(e) => {
                warn!("Upload failed: {}", e);
                self.inner.apply(|state| state.on_error(e.clone()));
                BeginOutcome::Failed(e)
            }
        }
    }
}
