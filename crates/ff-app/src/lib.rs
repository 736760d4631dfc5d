//! # ff-app
//!
//! FormFix application orchestration layer: the input registry, the
//! file-replacement engine, the dispatch client, the toolbox controller,
//! input discovery, and the reactive use cases tying them together over
//! the ports of `ff-core`.

pub mod app;
pub mod deps;
pub mod dispatch;
pub mod registry;
pub mod replace;
pub mod toolbox;
pub mod usecases;
pub mod watcher;

pub use app::App;
pub use deps::AppDeps;
pub use dispatch::{DispatchClient, ExpiredDispatch};
pub use registry::{InputRegistry, OperationOutcome, SelectionCapture};
pub use replace::FileReplacer;
pub use toolbox::{ToolboxController, ToolboxInstance};
pub use watcher::InputScanner;
