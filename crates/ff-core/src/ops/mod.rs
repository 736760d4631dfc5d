//! Operation kinds, their options, and pre-dispatch validation.
mod kind;
mod options;
mod validate;

pub use kind::OperationKind;
pub use options::{ImageFormat, OperationOptions};
pub use validate::validate;

/// Default x264-style constant rate factor for video compression.
pub const DEFAULT_VIDEO_CRF: u8 = 28;
