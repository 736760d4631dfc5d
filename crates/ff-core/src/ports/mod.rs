//! Port interfaces for the application layer
//!
//! Ports define the contract between the application logic (use cases)
//! and the surfaces that host it: the page document on one side and the
//! window message channel on the other. Following Hexagonal Architecture,
//! the core stays independent of how either surface is implemented.

mod bridge;
mod clock;
mod input_surface;
mod mutation_stream;
mod page_events;
mod toolbox;

pub use bridge::BridgePort;
pub use clock::ClockPort;
pub use input_surface::{InputSurfacePort, ReplacementNotice, SyntheticEvent};
pub use mutation_stream::{MutationBatch, MutationStreamPort};
pub use page_events::{PageEvent, PageEventStreamPort};
pub use toolbox::ToolboxPort;
