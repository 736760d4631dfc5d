use serde::{Deserialize, Serialize};

use crate::file::MediaKind;

/// One operation family the toolbox can trigger.
///
/// Serde names are the wire discriminators the page-scope adapters match
/// on. `Reset` exists on the wire surface but is always handled locally by
/// the application layer and never routed to an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    #[serde(rename = "resize")]
    Resize,
    #[serde(rename = "compress")]
    Compress,
    #[serde(rename = "convert")]
    Convert,
    #[serde(rename = "compress-PDF")]
    CompressPdf,
    #[serde(rename = "compress-Video")]
    CompressVideo,
    #[serde(rename = "trim-Video")]
    TrimVideo,
    #[serde(rename = "reset")]
    Reset,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Resize => "resize",
            Self::Compress => "compress",
            Self::Convert => "convert",
            Self::CompressPdf => "compress-PDF",
            Self::CompressVideo => "compress-Video",
            Self::TrimVideo => "trim-Video",
            Self::Reset => "reset",
        }
    }

    /// Whether this operation applies to files of the given media family.
    /// Reset applies to anything that has an original stored.
    pub fn allowed_on(self, kind: MediaKind) -> bool {
        match self {
            Self::Resize | Self::Compress | Self::Convert => kind == MediaKind::Image,
            Self::CompressPdf => kind == MediaKind::Pdf,
            Self::CompressVideo | Self::TrimVideo => kind == MediaKind::Video,
            Self::Reset => true,
        }
    }

    /// The operations the toolbox offers for one media family, in display
    /// order.
    pub fn offered_for(kind: MediaKind) -> &'static [OperationKind] {
        match kind {
            MediaKind::Image => &[Self::Resize, Self::Compress, Self::Convert],
            MediaKind::Pdf => &[Self::CompressPdf],
            MediaKind::Video => &[Self::CompressVideo, Self::TrimVideo],
            MediaKind::Other => &[],
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&OperationKind::CompressPdf).unwrap(),
            "\"compress-PDF\""
        );
        assert_eq!(
            serde_json::to_string(&OperationKind::CompressVideo).unwrap(),
            "\"compress-Video\""
        );
        let parsed: OperationKind = serde_json::from_str("\"resize\"").unwrap();
        assert_eq!(parsed, OperationKind::Resize);
    }

    #[test]
    fn test_gating_by_media_kind() {
        assert!(OperationKind::Resize.allowed_on(MediaKind::Image));
        assert!(!OperationKind::Resize.allowed_on(MediaKind::Pdf));
        assert!(OperationKind::CompressPdf.allowed_on(MediaKind::Pdf));
        assert!(OperationKind::TrimVideo.allowed_on(MediaKind::Video));
        assert!(OperationKind::Reset.allowed_on(MediaKind::Other));
        assert!(OperationKind::offered_for(MediaKind::Other).is_empty());
    }
}
