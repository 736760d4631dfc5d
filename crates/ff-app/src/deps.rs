//! # Application Dependencies
//!
//! This module defines the dependency grouping for App construction.
//!
//! **Note**: this is NOT a Builder pattern.
//! - No build steps
//! - No default values
//! - No hidden logic
//! - Just parameter grouping

use std::sync::Arc;

use ff_core::ports::{
    BridgePort, InputSurfacePort, MutationStreamPort, PageEventStreamPort, ToolboxPort,
};

/// Application dependency grouping (non-Builder, just parameter grouping).
///
/// All dependencies are required. The constructor signature of [`crate::App`]
/// IS the dependency manifest.
pub struct AppDeps {
    /// The DOM surface around file inputs
    pub surface: Arc<dyn InputSurfacePort>,

    /// Added-subtree observation
    pub mutations: Arc<dyn MutationStreamPort>,

    /// Change events and edit requests
    pub page_events: Arc<dyn PageEventStreamPort>,

    /// The window message channel
    pub bridge: Arc<dyn BridgePort>,

    /// The toolbox render surface
    pub toolbox: Arc<dyn ToolboxPort>,
}
