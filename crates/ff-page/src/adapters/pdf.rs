use async_trait::async_trait;

use ff_core::{MediaKind, OperationKind, OperationOptions, ProcessingRequest, StoredFile};

use super::{scaled_payload, AdapterError, ProcessingAdapter};

/// Stand-in document codec: a rewrite pass with a fixed shrink factor.
/// The result keeps the PDF mime and is renamed so the replacement is
/// visible in the file list.
pub struct PdfAdapter;

const REWRITE_FACTOR: f64 = 0.7;

#[async_trait]
impl ProcessingAdapter for PdfAdapter {
    fn accepts(&self, op: OperationKind) -> bool {
        op == OperationKind::CompressPdf
    }

    async fn process(&self, request: &ProcessingRequest) -> Result<StoredFile, AdapterError> {
        if request.file.mime.media_kind() != MediaKind::Pdf {
            return Err(AdapterError::Unsupported(
                "only PDF files are supported".into(),
            ));
        }
        if request.file.bytes.is_empty() {
            return Err(AdapterError::Corrupt("empty document payload".into()));
        }
        match &request.options {
            OperationOptions::CompressPdf {} => {
                let file = &request.file;
                let renamed = format!("Compressed: {}", file.name);
                Ok(StoredFile {
                    bytes: scaled_payload(file, REWRITE_FACTOR),
                    ..file.clone()
                }
                .with_name(renamed))
            }
            other => Err(AdapterError::Unsupported(format!(
                "document adapter cannot run {}",
                other.operation()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ff_core::{BindingId, CorrelationId, MimeType};

    #[tokio::test]
    async fn test_compress_shrinks_and_renames() {
        let file = StoredFile::new("report.pdf", MimeType::application_pdf(), vec![5u8; 1_000], 0);
        let req = ProcessingRequest {
            op: OperationKind::CompressPdf,
            binding_id: BindingId::new(),
            file,
            options: OperationOptions::CompressPdf {},
            correlation: CorrelationId::new(),
        };
        let out = PdfAdapter.process(&req).await.unwrap();
        assert_eq!(out.size_bytes(), 700);
        assert_eq!(out.name, "Compressed: report.pdf");
        assert_eq!(out.mime, MimeType::application_pdf());
    }

    #[tokio::test]
    async fn test_non_pdf_is_refused() {
        let file = StoredFile::new("a.png", MimeType::image_png(), vec![5u8; 10], 0);
        let req = ProcessingRequest {
            op: OperationKind::CompressPdf,
            binding_id: BindingId::new(),
            file,
            options: OperationOptions::CompressPdf {},
            correlation: CorrelationId::new(),
        };
        assert!(PdfAdapter.process(&req).await.is_err());
    }
}
