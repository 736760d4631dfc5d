//! # formfix
//!
//! FormFix augments HTML file-upload inputs with an in-page editing
//! toolbox: resize, compress, convert, or trim a selected file before
//! the form submits it, entirely client side. This crate is the
//! composition root over the workspace members:
//!
//! - `ff-core`: domain models, state machines, messages, ports
//! - `ff-app`: registry, replacement engine, dispatch, toolbox, use cases
//! - `ff-dom`: the in-process page document surface
//! - `ff-page`: the window channel and processing adapters

pub mod bootstrap;

pub use bootstrap::{start_session, start_session_with, Session};

pub use ff_app::{App, AppDeps};
pub use ff_core::{
    AppConfig, BindingId, Envelope, MediaKind, MimeType, OperationKind, OperationOptions,
    PageMessage, ProcessingMetrics, StoredFile,
};
pub use ff_dom::{DomEvent, PageDocument, ALERT_EVENT, REPLACEMENT_EVENT};
pub use ff_page::{AdapterHost, ProcessingAdapter, WindowChannel};
