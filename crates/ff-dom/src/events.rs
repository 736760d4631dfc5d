use ff_core::ElementId;

/// Name of the bubbling notification fired after every successful
/// installation.
pub const REPLACEMENT_EVENT: &str = "formfix:file-replaced";

/// Name of the event standing in for a blocking `window.alert`.
pub const ALERT_EVENT: &str = "formfix:alert";

/// One event as host-page code would observe it.
///
/// `trusted` mirrors the DOM's `isTrusted` bit: set for simulated user
/// gestures, cleared for anything dispatched by script.
#[derive(Debug, Clone)]
pub struct DomEvent {
    pub target: ElementId,
    pub name: String,
    pub bubbles: bool,
    pub cancelable: bool,
    pub trusted: bool,
    pub detail: Option<serde_json::Value>,
}

impl DomEvent {
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }
}
