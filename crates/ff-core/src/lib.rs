//! # ff-core
//!
//! Core domain models and business logic for FormFix.
//!
//! This crate contains pure business logic without any infrastructure
//! dependencies: the file and binding models, the processing and toolbox
//! state machines, the typed bridge messages, and the port contracts the
//! page-document and page-scope surfaces implement.

// Public module exports
pub mod binding;
pub mod config;
pub mod errors;
pub mod file;
pub mod ids;
pub mod message;
pub mod ops;
pub mod ports;
pub mod toolbox;

// Re-export commonly used types at the crate root
pub use binding::{InputBinding, ProcessingState};
pub use config::AppConfig;
pub use errors::{DispatchError, OperationError, RegistryError, ReplaceError};
pub use file::{MediaKind, MimeType, SelectionOrigin, StoredFile};
pub use ids::{BindingId, CorrelationId, ElementId, ToolboxId, WindowToken};
pub use message::{Envelope, PageMessage, ProcessingMetrics, ProcessingRequest};
pub use ops::{OperationKind, OperationOptions};
pub use toolbox::{Feedback, FeedbackTone, ToolboxDescriptor, ToolboxState};
