use thiserror::Error;

use crate::domain::models::CandidateFile;

/// 10 MiB. A file of exactly this size is accepted.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

pub const ACCEPTED_MIME_TYPES: [&str; 7] = [
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "video/mp4",
    "video/quicktime",
    "video/webm",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("Please select a file")]
    Missing,

    #[error("File size must be less than 10MB")]
    TooLarge,

    #[error("Please upload an image (JPEG, PNG, GIF, WEBP) or video file (MP4, MOV, WEBM)")]
    UnsupportedType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationResult {
    Ok,
    Rejected(RejectReason),
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, ValidationResult::Ok)
    }
}

/// Size is checked before type.
pub fn validate(file: Option<&CandidateFile>) -> ValidationResult {
    let Some(file) = file else {
        return ValidationResult::Rejected(RejectReason::Missing);
    };

    if file.size() > MAX_FILE_SIZE {
        return ValidationResult::Rejected(RejectReason::TooLarge);
    }

    if !ACCEPTED_MIME_TYPES.contains(&file.mime_type.as_str()) {
        return ValidationResult::Rejected(RejectReason::UnsupportedType);
    }

    ValidationResult::Ok
}

/// Maps a file extension onto one of the accepted MIME types.
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "mp4" => Some("video/mp4"),
        "mov" => Some("video/quicktime"),
        "webm" => Some("video/webm"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_of(size: usize, mime_type: &str) -> CandidateFile {
        CandidateFile::new(vec![0u8; size], "sample", mime_type)
    }

    #[test]
    fn missing_file_is_rejected() {
        assert_eq!(
            validate(None),
            ValidationResult::Rejected(RejectReason::Missing)
        );
    }

    #[test]
    fn oversized_file_is_rejected_before_type_check() {
        let file = file_of(MAX_FILE_SIZE as usize + 1, "application/zip");
        assert_eq!(
            validate(Some(&file)),
            ValidationResult::Rejected(RejectReason::TooLarge)
        );
    }

    #[test]
    fn file_at_exact_limit_is_accepted() {
        let file = file_of(MAX_FILE_SIZE as usize, "video/mp4");
        assert!(validate(Some(&file)).is_ok());
    }

    #[test]
    fn unlisted_types_are_rejected() {
        for mime_type in ["image/svg+xml", "image/bmp", "video/x-msvideo", "text/plain", ""] {
            let file = file_of(16, mime_type);
            assert_eq!(
                validate(Some(&file)),
                ValidationResult::Rejected(RejectReason::UnsupportedType),
                "{mime_type} should be rejected"
            );
        }
    }

    #[test]
    fn every_accepted_type_passes() {
        for mime_type in ACCEPTED_MIME_TYPES {
            assert!(validate(Some(&file_of(16, mime_type))).is_ok());
        }
    }

    #[test]
    fn extension_lookup_only_knows_accepted_types() {
        assert_eq!(mime_for_extension("MOV"), Some("video/quicktime"));
        assert_eq!(mime_for_extension("jpg"), Some("image/jpeg"));
        assert_eq!(mime_for_extension("bmp"), None);
        for ext in ["jpeg", "png", "gif", "webp", "mp4", "mov", "webm"] {
            let mime_type = mime_for_extension(ext).unwrap();
            assert!(ACCEPTED_MIME_TYPES.contains(&mime_type));
        }
    }
}
