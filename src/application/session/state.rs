use crate::{
    application::services::TransferError,
    domain::{
        models::{CandidateFile, PreviewHandle, UploadDescriptor},
        validation::{self, ValidationResult},
    },
};

/// Highest progress a running transfer can show. 100 belongs to success.
pub const MAX_IN_FLIGHT_PROGRESS: u8 = 99;

pub const SELECT_FIRST_MESSAGE: &str = "Please select a file first";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum TransferState {
    #[default]
    Idle,
    InFlight {
        progress: u8,
    },
    Succeeded(UploadDescriptor),
    Failed(TransferError),
}

impl TransferState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, TransferState::InFlight { .. })
    }

    pub fn progress(&self) -> u8 {
        match self {
            TransferState::InFlight { progress } => *progress,
            TransferState::Succeeded(_) => 100,
            TransferState::Idle | TransferState::Failed(_) => 0,
        }
    }
}

/// What the caller should do after `select`.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Build a preview for `file` and hand it back tagged with `generation`.
    Accepted { generation: u64, file: CandidateFile },
    Rejected(ValidationResult),
}

impl Selection {
    pub fn result(&self) -> ValidationResult {
        match self {
            Selection::Accepted { .. } => ValidationResult::Ok,
            Selection::Rejected(result) => *result,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BeginDecision {
    Start { generation: u64, file: CandidateFile },
    AlreadyInFlight,
    NoCandidate,
}

/// Read-only view handed to observers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionSnapshot {
    pub candidate: Option<CandidateFile>,
    pub preview: Option<PreviewHandle>,
    pub transfer: TransferState,
    pub progress: u8,
    pub message: Option<String>,
}

/// Upload session state with pure transitions. Every method returns whether or
/// what the caller must act on; none of them perform I/O.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    candidate: Option<CandidateFile>,
    preview: Option<PreviewHandle>,
    transfer: TransferState,
    message: Option<String>,
    // Bumped on every accepted selection. Late previews and completions
    // compare against it.
    generation: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, raw: Option<CandidateFile>) -> Selection {
        let result = validation::validate(raw.as_ref());

        let file = match (result, raw) {
            (ValidationResult::Ok, Some(file)) => file,
            (_, _) => {
                self.candidate = None;
                self.preview = None;
                if let ValidationResult::Rejected(reason) = result {
                    self.message = Some(reason.to_string());
                }
                return Selection::Rejected(result);
            }
        };

        self.generation += 1;
        self.candidate = Some(file.clone());
        self.preview = None;
        self.message = None;
        // A running transfer keeps its state; it settles on its own.
        if !self.transfer.is_in_flight() {
            self.transfer = TransferState::Idle;
        }

        Selection::Accepted {
            generation: self.generation,
            file,
        }
    }

    /// Attaches a preview unless a newer selection replaced the file meanwhile.
    pub fn set_preview(&mut self, generation: u64, preview: PreviewHandle) -> bool {
        if generation != self.generation || self.candidate.is_none() {
            return false;
        }
        self.preview = Some(preview);
        true
    }

    pub fn begin(&mut self) -> BeginDecision {
        if self.transfer.is_in_flight() {
            return BeginDecision::AlreadyInFlight;
        }

        let Some(file) = self.candidate.clone() else {
            self.message = Some(SELECT_FIRST_MESSAGE.to_string());
            return BeginDecision::NoCandidate;
        };

        self.transfer = TransferState::InFlight { progress: 0 };
        self.message = None;

        BeginDecision::Start {
            generation: self.generation,
            file,
        }
    }

    /// Raises progress of the running transfer. Lower values than the current
    /// one and values outside a transfer are ignored.
    pub fn on_progress(&mut self, value: u8) -> bool {
        match &mut self.transfer {
            TransferState::InFlight { progress } => {
                let next = value.min(MAX_IN_FLIGHT_PROGRESS);
                if next > *progress {
                    *progress = next;
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    pub fn on_complete(&mut self, generation: u64, descriptor: UploadDescriptor) -> bool {
        if !self.transfer.is_in_flight() {
            return false;
        }

        self.transfer = TransferState::Succeeded(descriptor);
        self.message = None;
        // Only the uploaded file is cleared; one picked during the transfer stays.
        if generation == self.generation {
            self.candidate = None;
            self.preview = None;
        }
        true
    }

    /// The candidate stays selected so the same file can be retried.
    pub fn on_error(&mut self, error: TransferError) -> bool {
        if !self.transfer.is_in_flight() {
            return false;
        }

        self.message = Some(error.user_message().to_string());
        self.transfer = TransferState::Failed(error);
        true
    }

    /// Settles a transfer whose driver went away without a result, so the
    /// session accepts a new `begin` again.
    pub fn on_abandoned(&mut self) -> bool {
        self.on_error(TransferError::Cancelled)
    }

    pub fn transfer(&self) -> &TransferState {
        &self.transfer
    }

    pub fn candidate(&self) -> Option<&CandidateFile> {
        self.candidate.as_ref()
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            candidate: self.candidate.clone(),
            preview: self.preview.clone(),
            transfer: self.transfer.clone(),
            progress: self.transfer.progress(),
            message: self.message.clone(),
        }
    }
}
