mod state;
mod upload_session;

pub use state::{
    BeginDecision, Selection, SessionSnapshot, SessionState, TransferState,
    MAX_IN_FLIGHT_PROGRESS, SELECT_FIRST_MESSAGE,
};
pub use upload_session::{BeginOutcome, UploadSession};
