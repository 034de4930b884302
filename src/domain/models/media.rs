use std::{fmt, sync::Arc};

use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Anything whose primary MIME category is not `video` is treated as an image.
    pub fn from_mime(mime_type: &str) -> Self {
        let primary = mime_type.split('/').next().unwrap_or_default().trim();
        if primary.eq_ignore_ascii_case("video") {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file picked by the user, held in memory until it is uploaded or replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFile {
    pub content: Bytes,
    pub name: String,
    pub mime_type: String,
}

impl CandidateFile {
    pub fn new(
        content: impl Into<Bytes>,
        name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            name: name.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn kind(&self) -> MediaKind {
        MediaKind::from_mime(&self.mime_type)
    }
}

/// Locally renderable form of a [`CandidateFile`].
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewHandle {
    data_uri: Arc<str>,
    pub kind: MediaKind,
}

impl PreviewHandle {
    /// Encodes the whole file as a `data:` URI. CPU bound for large files, so
    /// callers run it off the async workers.
    pub fn build(file: &CandidateFile) -> Self {
        let encoded = STANDARD.encode(&file.content);
        Self {
            data_uri: format!("data:{};base64,{}", file.mime_type, encoded).into(),
            kind: file.kind(),
        }
    }

    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }
}

/// Normalized provider result. Fields other than the three named ones are
/// passed through untouched at the top level of the JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadDescriptor {
    pub public_id: String,
    pub secure_url: String,
    pub resource_type: MediaKind,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_by_primary_mime_category() {
        assert_eq!(MediaKind::from_mime("video/mp4"), MediaKind::Video);
        assert_eq!(MediaKind::from_mime("VIDEO/quicktime"), MediaKind::Video);
        assert_eq!(MediaKind::from_mime("image/png"), MediaKind::Image);
        assert_eq!(MediaKind::from_mime("application/pdf"), MediaKind::Image);
        assert_eq!(MediaKind::from_mime(""), MediaKind::Image);
    }

    #[test]
    fn preview_is_a_data_uri_tagged_with_kind() {
        let file = CandidateFile::new(&b"abc"[..], "clip.webm", "video/webm");
        let preview = PreviewHandle::build(&file);

        assert_eq!(preview.kind, MediaKind::Video);
        assert_eq!(preview.data_uri(), "data:video/webm;base64,YWJj");
    }

    #[test]
    fn descriptor_keeps_provider_fields_at_top_level() {
        let raw = json!({
            "public_id": "uploads/abc",
            "secure_url": "https://res.example.com/abc.png",
            "resource_type": "image",
            "width": 640,
            "format": "png"
        });

        let descriptor: UploadDescriptor = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(descriptor.public_id, "uploads/abc");
        assert_eq!(descriptor.resource_type, MediaKind::Image);
        assert_eq!(descriptor.metadata.get("width"), Some(&json!(640)));

        assert_eq!(serde_json::to_value(&descriptor).unwrap(), raw);
    }

    #[test]
    fn descriptor_without_secure_url_is_rejected() {
        let raw = json!({ "public_id": "uploads/abc", "resource_type": "image" });
        assert!(serde_json::from_value::<UploadDescriptor>(raw).is_err());
    }
}
