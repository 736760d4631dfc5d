use async_trait::async_trait;

use ff_core::{
    MediaKind, MimeType, OperationKind, OperationOptions, ProcessingRequest, StoredFile,
};

use super::{scaled_payload, AdapterError, ProcessingAdapter};

/// Stand-in image codec for resize, compress, and convert.
///
/// Payload sizes follow the knobs the way a pixel pipeline would: resize
/// shrinks quadratically with the scale, compression follows the quality
/// setting, conversion applies a per-format factor. Compression always
/// re-encodes to JPEG and renames accordingly.
pub struct ImageAdapter;

/// Share of the payload a full-quality JPEG re-encode keeps.
const JPEG_BASELINE: f64 = 0.85;

fn convert_factor(target: ff_core::ops::ImageFormat) -> f64 {
    use ff_core::ops::ImageFormat;
    match target {
        ImageFormat::Png => 1.0,
        ImageFormat::Jpeg => 0.9,
        ImageFormat::Webp => 0.8,
    }
}

impl ImageAdapter {
    fn check(&self, request: &ProcessingRequest) -> Result<(), AdapterError> {
        if request.file.mime.media_kind() != MediaKind::Image {
            return Err(AdapterError::Unsupported(
                "only image files are supported".into(),
            ));
        }
        if request.file.bytes.is_empty() {
            return Err(AdapterError::Corrupt("empty image payload".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProcessingAdapter for ImageAdapter {
    fn accepts(&self, op: OperationKind) -> bool {
        matches!(
            op,
            OperationKind::Resize | OperationKind::Compress | OperationKind::Convert
        )
    }

    async fn process(&self, request: &ProcessingRequest) -> Result<StoredFile, AdapterError> {
        self.check(request)?;
        let file = &request.file;

        match &request.options {
            OperationOptions::Resize { scale_percent } => {
                if !(1..=100).contains(scale_percent) {
                    return Err(AdapterError::Failed(
                        "scale must be between 1% and 100%".into(),
                    ));
                }
                // Area scales with the square of the linear factor.
                let linear = *scale_percent as f64 / 100.0;
                Ok(StoredFile {
                    bytes: scaled_payload(file, linear * linear),
                    ..file.clone()
                })
            }
            OperationOptions::Compress { quality } => {
                if !(0.1..=1.0).contains(quality) {
                    return Err(AdapterError::Failed(
                        "quality must be between 0.1 and 1.0".into(),
                    ));
                }
                let out = StoredFile {
                    bytes: scaled_payload(file, *quality as f64 * JPEG_BASELINE),
                    ..file.clone()
                };
                Ok(out.with_mime(MimeType::image_jpeg()).with_extension("jpg"))
            }
            OperationOptions::Convert { target } => {
                let out = StoredFile {
                    bytes: scaled_payload(file, convert_factor(*target)),
                    ..file.clone()
                };
                Ok(out.with_mime(target.mime()).with_extension(target.extension()))
            }
            other => Err(AdapterError::Unsupported(format!(
                "image adapter cannot run {}",
                other.operation()
            ))),
        }
    }
}
