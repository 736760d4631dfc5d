use std::collections::HashMap;

use ff_core::{ElementId, StoredFile};

/// One node in the document arena. Detached nodes stay in the arena so
/// late lookups resolve; attachment is derived by walking parents.
#[derive(Debug, Default)]
pub(crate) struct Node {
    pub tag: String,
    pub input_type: Option<String>,
    pub class_name: Option<String>,
    pub dataset: HashMap<String, String>,
    pub files: Vec<StoredFile>,
    pub required: bool,
    pub text: Option<String>,
    pub children: Vec<ElementId>,
    pub shadow_root: Option<ElementId>,
    pub parent: Option<ElementId>,
}

impl Node {
    pub fn element(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn file_input() -> Self {
        Self {
            tag: "input".to_string(),
            input_type: Some("file".to_string()),
            ..Default::default()
        }
    }

    pub fn is_file_input(&self) -> bool {
        self.tag == "input" && self.input_type.as_deref() == Some("file")
    }
}
