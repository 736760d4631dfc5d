use serde::{Deserialize, Serialize};

use super::OperationKind;

/// Target format for image conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Webp,
}

impl ImageFormat {
    pub fn mime(self) -> crate::file::MimeType {
        match self {
            Self::Png => crate::file::MimeType::image_png(),
            Self::Jpeg => crate::file::MimeType::image_jpeg(),
            Self::Webp => crate::file::MimeType::image_webp(),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
        }
    }
}

/// Options for one dispatched operation, one variant per family.
///
/// Ranges mirror what the controls expose: scale is a percentage, quality
/// is the encoder quality knob, crf follows the x264 scale where higher
/// means smaller output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum OperationOptions {
    Resize { scale_percent: u8 },
    Compress { quality: f32 },
    Convert { target: ImageFormat },
    CompressPdf {},
    CompressVideo { crf: Option<u8> },
    TrimVideo { start_ms: u64, end_ms: u64 },
    Reset {},
}

impl OperationOptions {
    /// The operation kind these options belong to.
    pub fn operation(&self) -> OperationKind {
        match self {
            Self::Resize { .. } => OperationKind::Resize,
            Self::Compress { .. } => OperationKind::Compress,
            Self::Convert { .. } => OperationKind::Convert,
            Self::CompressPdf {} => OperationKind::CompressPdf,
            Self::CompressVideo { .. } => OperationKind::CompressVideo,
            Self::TrimVideo { .. } => OperationKind::TrimVideo,
            Self::Reset {} => OperationKind::Reset,
        }
    }
}
