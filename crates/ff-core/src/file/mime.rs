use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::MediaKind;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MimeType(pub String);

impl MimeType {
    pub fn image_png() -> Self {
        Self("image/png".into())
    }
    pub fn image_jpeg() -> Self {
        Self("image/jpeg".into())
    }
    pub fn image_webp() -> Self {
        Self("image/webp".into())
    }
    pub fn application_pdf() -> Self {
        Self("application/pdf".into())
    }
    pub fn video_mp4() -> Self {
        Self("video/mp4".into())
    }
    pub fn text_plain() -> Self {
        Self("text/plain".into())
    }

    /// Classify this mime type into the media family the toolbox gates on.
    pub fn media_kind(&self) -> MediaKind {
        if self.0.starts_with("image/") {
            MediaKind::Image
        } else if self.0 == "application/pdf" {
            MediaKind::Pdf
        } else if self.0.starts_with("video/") {
            MediaKind::Video
        } else {
            MediaKind::Other
        }
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MimeType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(MimeType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_classification() {
        assert_eq!(MimeType::image_png().media_kind(), MediaKind::Image);
        assert_eq!(MimeType::image_webp().media_kind(), MediaKind::Image);
        assert_eq!(MimeType::application_pdf().media_kind(), MediaKind::Pdf);
        assert_eq!(MimeType::video_mp4().media_kind(), MediaKind::Video);
        assert_eq!(
            MimeType("video/quicktime".into()).media_kind(),
            MediaKind::Video
        );
        assert_eq!(MimeType::text_plain().media_kind(), MediaKind::Other);
    }
}
