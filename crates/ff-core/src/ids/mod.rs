//! ID type wrappers for type safety.

mod id_macro;

use serde::{Deserialize, Serialize};

use id_macro::impl_id;

/// Stable identifier for one managed file input.
///
/// Assigned once at registration and never reused for a different element
/// while that element remains attached.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BindingId(String);

/// Correlates one dispatched processing request with its single result.
///
/// A result carrying a correlation that is no longer pending is stale and
/// must be dropped without side effects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationId(String);

/// Identifies the window a bridge message originated from.
///
/// Receivers drop envelopes whose token differs from their own window.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowToken(String);

/// Opaque handle to a DOM element owned by the host page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(String);

/// Handle to one mounted toolbox panel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolboxId(String);

impl_id!(BindingId, CorrelationId, WindowToken, ElementId, ToolboxId);
