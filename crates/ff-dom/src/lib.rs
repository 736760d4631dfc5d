//! # ff-dom
//!
//! An in-process page document standing where a real browser DOM would:
//! an element arena with shadow roots, file lists, dataset annotations,
//! mutation batches, and synthetic event dispatch. It implements the
//! DOM-facing ports of `ff-core`, which keeps the application layer
//! identical whether it runs against this surface or a real page.

mod document;
mod events;
mod node;

pub use document::PageDocument;
pub use events::{DomEvent, ALERT_EVENT, REPLACEMENT_EVENT};
