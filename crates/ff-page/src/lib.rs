//! # ff-page
//!
//! The page-scope half of FormFix: the same-window broadcast channel the
//! two scopes talk over, and the processing adapter host with one
//! deterministic stand-in codec per operation family. Real encoder
//! backends slot in behind the same [`adapters::ProcessingAdapter`]
//! trait without touching the core.

pub mod adapters;
mod channel;
mod clock;

pub use adapters::{AdapterError, AdapterHost, ProcessingAdapter};
pub use channel::WindowChannel;
pub use clock::SystemClock;
