use serde::{Deserialize, Serialize};

/// Media family a bound file belongs to.
///
/// The toolbox renders operation controls conditioned on this: images get
/// resize/compress/convert, PDFs get compress, videos get compress/trim.
/// `Other` gets no toolbox at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Image,
    Pdf,
    Video,
    Other,
}

impl MediaKind {
    pub fn is_supported(self) -> bool {
        !matches!(self, Self::Other)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Pdf => "pdf",
            Self::Video => "video",
            Self::Other => "other",
        }
    }
}
