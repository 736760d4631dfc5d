use crate::errors::OperationError;
use crate::file::StoredFile;

use super::{OperationKind, OperationOptions};

fn reject(reason: impl Into<String>) -> OperationError {
    let reason = reason.into();
    #[cfg(feature = "tracing")]
    tracing::debug!("operation rejected before dispatch: {}", reason);
    OperationError::InvalidInput(reason)
}

/// Pre-dispatch validation: option ranges, operation vs. media family,
/// and the option/operation pairing itself.
///
/// This is the only producer of `InvalidInput`. Anything rejected here is
/// surfaced as inline feedback and never dispatched, so the binding stays
/// `Idle`.
pub fn validate(
    op: OperationKind,
    options: &OperationOptions,
    file: &StoredFile,
) -> Result<(), OperationError> {
    if options.operation() != op {
        return Err(reject(format!(
            "options for {} supplied to {}",
            options.operation(),
            op
        )));
    }

    let kind = file.mime.media_kind();
    if !op.allowed_on(kind) {
        return Err(reject(format!(
            "{} does not apply to {} files",
            op,
            kind.as_str()
        )));
    }

    match options {
        OperationOptions::Resize { scale_percent } => {
            if !(1..=100).contains(scale_percent) {
                return Err(reject("scale must be between 1% and 100%"));
            }
        }
        OperationOptions::Compress { quality } => {
            if !(0.1..=1.0).contains(quality) {
                return Err(reject("quality must be between 0.1 and 1.0"));
            }
        }
        OperationOptions::Convert { .. } => {}
        OperationOptions::CompressPdf {} => {}
        OperationOptions::CompressVideo { crf } => {
            if let Some(crf) = crf {
                if *crf > 51 {
                    return Err(reject("crf must be between 0 and 51"));
                }
            }
        }
        OperationOptions::TrimVideo { start_ms, end_ms } => {
            if start_ms >= end_ms {
                return Err(reject("trim start must lie before trim end"));
            }
        }
        OperationOptions::Reset {} => {}
    }

    Ok(())
}
