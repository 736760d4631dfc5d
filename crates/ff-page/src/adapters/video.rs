use async_trait::async_trait;

use ff_core::ops::DEFAULT_VIDEO_CRF;
use ff_core::{
    MediaKind, MimeType, OperationKind, OperationOptions, ProcessingRequest, StoredFile,
};

use super::{scaled_payload, AdapterError, ProcessingAdapter};

/// Stand-in transcoder for compress and trim. Output is always mp4.
///
/// Trim maps time onto the payload at a nominal density of
/// [`BYTES_PER_MS`] and slices the requested window out of it; a window
/// that starts past the nominal end is a failure, an end past it is
/// clamped.
pub struct VideoAdapter;

pub const BYTES_PER_MS: u64 = 1024;

fn crf_factor(crf: u8) -> f64 {
    // crf 0 keeps nearly everything, crf 51 keeps the least.
    1.0 - 0.8 * (crf.min(51) as f64 / 51.0)
}

impl VideoAdapter {
    fn check(&self, request: &ProcessingRequest) -> Result<(), AdapterError> {
        if request.file.mime.media_kind() != MediaKind::Video {
            return Err(AdapterError::Unsupported(
                "only video files are supported".into(),
            ));
        }
        if request.file.bytes.is_empty() {
            return Err(AdapterError::Corrupt("empty video payload".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProcessingAdapter for VideoAdapter {
    fn accepts(&self, op: OperationKind) -> bool {
        matches!(
            op,
            OperationKind::CompressVideo | OperationKind::TrimVideo
        )
    }

    async fn process(&self, request: &ProcessingRequest) -> Result<StoredFile, AdapterError> {
        self.check(request)?;
        let file = &request.file;

        match &request.options {
            OperationOptions::CompressVideo { crf } => {
                let crf = crf.unwrap_or(DEFAULT_VIDEO_CRF);
                let out = StoredFile {
                    bytes: scaled_payload(file, crf_factor(crf)),
                    ..file.clone()
                };
                Ok(out.with_mime(MimeType::video_mp4()).with_extension("mp4"))
            }
            OperationOptions::TrimVideo { start_ms, end_ms } => {
                let duration_ms = (file.bytes.len() as u64 / BYTES_PER_MS).max(1);
                if *start_ms >= duration_ms {
                    return Err(AdapterError::Failed(
                        "trim window starts past the end of the video".into(),
                    ));
                }
                let end_ms = (*end_ms).min(duration_ms);
                let from = (*start_ms * BYTES_PER_MS) as usize;
                let to = ((end_ms * BYTES_PER_MS) as usize).min(file.bytes.len());
                let out = StoredFile {
                    bytes: file.bytes.slice(from..to),
                    ..file.clone()
                };
                Ok(out.with_mime(MimeType::video_mp4()).with_extension("mp4"))
            }
            other => Err(AdapterError::Unsupported(format!(
                "video adapter cannot run {}",
                other.operation()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ff_core::{BindingId, CorrelationId};

    fn clip(len: usize) -> StoredFile {
        StoredFile::new("clip.mov", MimeType("video/quicktime".into()), vec![8u8; len], 0)
    }

    fn request(file: StoredFile, options: OperationOptions) -> ProcessingRequest {
        ProcessingRequest {
            op: options.operation(),
            binding_id: BindingId::new(),
            file,
            options,
            correlation: CorrelationId::new(),
        }
    }

    #[tokio::test]
    async fn test_compress_rewrites_to_mp4() {
        let req = request(
            clip(1_000_000),
            OperationOptions::CompressVideo { crf: None },
        );
        let out = VideoAdapter.process(&req).await.unwrap();
        assert!(out.size_bytes() < 1_000_000);
        assert_eq!(out.mime, MimeType::video_mp4());
        assert_eq!(out.name, "clip.mp4");
    }

    #[tokio::test]
    async fn test_lower_crf_keeps_more() {
        let small = request(clip(100_000), OperationOptions::CompressVideo { crf: Some(40) });
        let large = request(clip(100_000), OperationOptions::CompressVideo { crf: Some(10) });
        let smaller = VideoAdapter.process(&small).await.unwrap();
        let larger = VideoAdapter.process(&large).await.unwrap();
        assert!(smaller.size_bytes() < larger.size_bytes());
    }

    #[tokio::test]
    async fn test_trim_slices_the_window() {
        // 10 240 bytes is a nominal 10 ms clip.
        let req = request(
            clip(10 * BYTES_PER_MS as usize),
            OperationOptions::TrimVideo {
                start_ms: 2,
                end_ms: 6,
            },
        );
        let out = VideoAdapter.process(&req).await.unwrap();
        assert_eq!(out.size_bytes(), 4 * BYTES_PER_MS);
        assert_eq!(out.name, "clip.mp4");
    }

    #[tokio::test]
    async fn test_trim_end_is_clamped() {
        let req = request(
            clip(10 * BYTES_PER_MS as usize),
            OperationOptions::TrimVideo {
                start_ms: 5,
                end_ms: 50_000,
            },
        );
        let out = VideoAdapter.process(&req).await.unwrap();
        assert_eq!(out.size_bytes(), 5 * BYTES_PER_MS);
    }

    #[tokio::test]
    async fn test_trim_past_the_end_fails() {
        let req = request(
            clip(10 * BYTES_PER_MS as usize),
            OperationOptions::TrimVideo {
                start_ms: 60_000,
                end_ms: 61_000,
            },
        );
        let err = VideoAdapter.process(&req).await.unwrap_err();
        assert!(matches!(err, AdapterError::Failed(_)));
    }
}
