use serde::{Deserialize, Serialize};

/// How a file ended up in an input's file list.
///
/// Only a `UserSelection` may overwrite the stored original file. A change
/// event raised by the replacement engine itself is a
/// `ProgrammaticInstall` and must leave the original untouched, otherwise
/// reset would restore a processed derivative instead of what the user
/// picked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SelectionOrigin {
    UserSelection,
    ProgrammaticInstall,
}

impl SelectionOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionOrigin::UserSelection => "user-selection",
            SelectionOrigin::ProgrammaticInstall => "programmatic-install",
        }
    }

    /// Classify from the DOM trust bit: trusted events come from a real
    /// user gesture, untrusted ones from script dispatch.
    pub fn from_trusted(trusted: bool) -> Self {
        if trusted {
            SelectionOrigin::UserSelection
        } else {
            SelectionOrigin::ProgrammaticInstall
        }
    }
}
