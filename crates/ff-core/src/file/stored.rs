use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use twox_hash::xxh3::hash64;

use super::MimeType;

/// A file payload as the core tracks it: name, declared mime type, raw
/// bytes, and the last-modified stamp the host reported.
///
/// Payloads are `Bytes`, so clones are cheap and a reset can reinstall the
/// stored original without copying.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredFile {
    pub name: String,
    pub mime: MimeType,
    #[serde(
        serialize_with = "serialize_bytes",
        deserialize_with = "deserialize_bytes"
    )]
    pub bytes: Bytes,
    pub modified_at_ms: i64,
}

impl StoredFile {
    pub fn new(
        name: impl Into<String>,
        mime: MimeType,
        bytes: impl Into<Bytes>,
        modified_at_ms: i64,
    ) -> Self {
        Self {
            name: name.into(),
            mime,
            bytes: bytes.into(),
            modified_at_ms,
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn content_hash(&self) -> u64 {
        hash64(&self.bytes)
    }

    /// Replace the file name, keeping payload and mime.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replace the mime type, keeping payload and name.
    pub fn with_mime(mut self, mime: MimeType) -> Self {
        self.mime = mime;
        self
    }

    /// Rewrite the extension of the file name, appending if there is none.
    pub fn with_extension(mut self, ext: &str) -> Self {
        if let Some(dot) = self.name.rfind('.') {
            self.name.truncate(dot);
        }
        self.name.push('.');
        self.name.push_str(ext);
        self
    }

    /// Two files are the same installation when name and content match.
    /// This is the post-install verification predicate.
    pub fn same_content(&self, other: &StoredFile) -> bool {
        self.name == other.name && self.content_hash() == other.content_hash()
    }
}

fn serialize_bytes<S>(bytes: &Bytes, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    serializer.serialize_str(&encoded)
}

fn deserialize_bytes<'de, D>(deserializer: D) -> Result<Bytes, D::Error>
where
    D: Deserializer<'de>,
{
    let encoded = String::deserialize(deserializer)?;
    base64::engine::general_purpose::STANDARD
        .decode(encoded.as_bytes())
        .map(Bytes::from)
        .map_err(serde::de::Error::custom)
}
