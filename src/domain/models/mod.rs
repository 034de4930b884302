pub mod media;

pub use media::{CandidateFile, MediaKind, PreviewHandle, UploadDescriptor};
