use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc, Mutex};
use tracing::debug;

use ff_core::ports::{
    InputSurfacePort, MutationBatch, MutationStreamPort, PageEvent, PageEventStreamPort,
    ReplacementNotice, SyntheticEvent, ToolboxPort,
};
use ff_core::{
    BindingId, ElementId, Feedback, OperationKind, ReplaceError, StoredFile, ToolboxDescriptor,
    ToolboxId,
};

use crate::events::{DomEvent, ALERT_EVENT, REPLACEMENT_EVENT};
use crate::node::Node;

/// Dataset key carrying the binding annotation on a managed input.
const DATA_BINDING: &str = "formfixId";
/// Dataset key on an edit control, pointing back at its input.
const DATA_EDIT_FOR: &str = "formfixEditFor";
/// Dataset keys on a mounted toolbox panel.
const DATA_TOOLBOX_INPUT: &str = "inputId";
const DATA_PREVIEW: &str = "preview";
const DATA_ACTIVE_CONTROLS: &str = "activeControls";
const DATA_TONE: &str = "tone";

type InstallFilter = Box<dyn Fn(StoredFile) -> StoredFile + Send + Sync>;

struct DocumentTree {
    root: ElementId,
    nodes: HashMap<ElementId, Node>,
}

impl DocumentTree {
    fn new() -> Self {
        let root = ElementId::new();
        let mut nodes = HashMap::new();
        nodes.insert(root.clone(), Node::element("body"));
        Self { root, nodes }
    }

    fn attached(&self, id: &ElementId) -> bool {
        let mut cursor = id.clone();
        loop {
            if cursor == self.root {
                return true;
            }
            match self.nodes.get(&cursor).and_then(|n| n.parent.clone()) {
                Some(parent) => cursor = parent,
                None => return false,
            }
        }
    }

    /// Depth-first collection of file inputs, descending into children
    /// and shadow roots. A flat query cannot see encapsulated subtrees.
    fn collect_file_inputs(&self, from: &ElementId, out: &mut Vec<ElementId>) {
        let Some(node) = self.nodes.get(from) else {
            return;
        };
        if node.is_file_input() {
            out.push(from.clone());
        }
        for child in &node.children {
            self.collect_file_inputs(child, out);
        }
        if let Some(shadow) = &node.shadow_root {
            self.collect_file_inputs(shadow, out);
        }
    }

    fn detach(&mut self, id: &ElementId) {
        let parent = self.nodes.get(id).and_then(|n| n.parent.clone());
        if let Some(parent_id) = parent {
            if let Some(parent_node) = self.nodes.get_mut(&parent_id) {
                parent_node.children.retain(|c| c != id);
            }
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = None;
        }
    }

    fn input_for_binding(&self, binding: &BindingId) -> Option<ElementId> {
        self.nodes.iter().find_map(|(id, node)| {
            (node.is_file_input()
                && node.dataset.get(DATA_BINDING).map(String::as_str) == Some(binding.as_str()))
            .then(|| id.clone())
        })
    }
}

/// The in-process page document.
///
/// Implements every DOM-facing port of `ff-core`; tests and the demo
/// drive it directly through the user-action helpers (`select_files`,
/// `click`) and observe it through the broadcast event stream, the way a
/// host page would.
pub struct PageDocument {
    tree: Mutex<DocumentTree>,
    mutation_tx: Mutex<Option<mpsc::Sender<MutationBatch>>>,
    page_tx: Mutex<Option<mpsc::Sender<PageEvent>>>,
    dom_events: broadcast::Sender<DomEvent>,
    install_filter: Mutex<Option<InstallFilter>>,
}

impl PageDocument {
    pub fn new() -> Self {
        let (dom_events, _) = broadcast::channel(64);
        Self {
            tree: Mutex::new(DocumentTree::new()),
            mutation_tx: Mutex::new(None),
            page_tx: Mutex::new(None),
            dom_events,
            install_filter: Mutex::new(None),
        }
    }

    pub async fn root(&self) -> ElementId {
        self.tree.lock().await.root.clone()
    }

    /// Observe events the way host-page code would.
    pub fn events(&self) -> broadcast::Receiver<DomEvent> {
        self.dom_events.subscribe()
    }

    /// Simulate a host page interfering with installs (for example a
    /// framework resetting the input). The filter sees each installed
    /// file and decides what actually lands on the element.
    pub async fn set_install_filter(&self, filter: InstallFilter) {
        *self.install_filter.lock().await = Some(filter);
    }

    // ── Element construction ────────────────────────────────────────

    pub async fn create_element(&self, tag: &str) -> ElementId {
        let id = ElementId::new();
        self.tree
            .lock()
            .await
            .nodes
            .insert(id.clone(), Node::element(tag));
        id
    }

    pub async fn create_file_input(&self) -> ElementId {
        let id = ElementId::new();
        self.tree
            .lock()
            .await
            .nodes
            .insert(id.clone(), Node::file_input());
        id
    }

    pub async fn set_required(&self, element: &ElementId, required: bool) {
        if let Some(node) = self.tree.lock().await.nodes.get_mut(element) {
            node.required = required;
        }
    }

    /// Append `child` under `parent`. Insertion under an attached parent
    /// produces a mutation batch with the child as the added root.
    pub async fn append(&self, parent: &ElementId, child: &ElementId) {
        let now_attached = {
            let mut tree = self.tree.lock().await;
            if let Some(node) = tree.nodes.get_mut(child) {
                node.parent = Some(parent.clone());
            }
            if let Some(parent_node) = tree.nodes.get_mut(parent) {
                if !parent_node.children.contains(child) {
                    parent_node.children.push(child.clone());
                }
            }
            tree.attached(child)
        };
        if now_attached {
            self.emit_mutation(MutationBatch {
                added_roots: vec![child.clone()],
            })
            .await;
        }
    }

    /// Attach a shadow root to `host` and return it. Content appended
    /// under the shadow root is invisible to flat queries but reachable
    /// by the deep scan.
    pub async fn attach_shadow(&self, host: &ElementId) -> ElementId {
        let shadow = ElementId::new();
        let mut tree = self.tree.lock().await;
        let mut node = Node::element("#shadow-root");
        node.parent = Some(host.clone());
        tree.nodes.insert(shadow.clone(), node);
        if let Some(host_node) = tree.nodes.get_mut(host) {
            host_node.shadow_root = Some(shadow.clone());
        }
        shadow
    }

    pub async fn remove(&self, element: &ElementId) {
        self.tree.lock().await.detach(element);
    }

    // ── User actions ────────────────────────────────────────────────

    /// Simulate the user picking files through the native chooser. Fires
    /// a trusted change event.
    pub async fn select_files(&self, input: &ElementId, files: Vec<StoredFile>) {
        {
            let mut tree = self.tree.lock().await;
            if let Some(node) = tree.nodes.get_mut(input) {
                node.files = files.clone();
            }
        }
        self.emit_dom(DomEvent {
            target: input.clone(),
            name: "change".into(),
            bubbles: true,
            cancelable: false,
            trusted: true,
            detail: None,
        });
        self.emit_page(PageEvent::SelectionChanged {
            element: input.clone(),
            files,
            trusted: true,
        })
        .await;
    }

    /// Simulate a click. Clicking an edit control raises the edit
    /// request for its input.
    pub async fn click(&self, element: &ElementId) {
        let edit_for = {
            let tree = self.tree.lock().await;
            tree.nodes
                .get(element)
                .and_then(|n| n.dataset.get(DATA_EDIT_FOR).cloned())
        };
        self.emit_dom(DomEvent {
            target: element.clone(),
            name: "click".into(),
            bubbles: true,
            cancelable: true,
            trusted: true,
            detail: None,
        });
        if let Some(input) = edit_for {
            self.emit_page(PageEvent::EditRequested {
                element: ElementId::from_string(input),
            })
            .await;
        }
    }

    // ── Inspection helpers (tests, demo) ────────────────────────────

    pub async fn files_of(&self, element: &ElementId) -> Vec<StoredFile> {
        self.tree
            .lock()
            .await
            .nodes
            .get(element)
            .map(|n| n.files.clone())
            .unwrap_or_default()
    }

    pub async fn dataset_of(&self, element: &ElementId, key: &str) -> Option<String> {
        self.tree
            .lock()
            .await
            .nodes
            .get(element)
            .and_then(|n| n.dataset.get(key).cloned())
    }

    pub async fn text_of(&self, element: &ElementId) -> Option<String> {
        self.tree
            .lock()
            .await
            .nodes
            .get(element)
            .and_then(|n| n.text.clone())
    }

    pub async fn children_of(&self, element: &ElementId) -> Vec<ElementId> {
        self.tree
            .lock()
            .await
            .nodes
            .get(element)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Elements under `parent` carrying the given class name.
    pub async fn children_with_class(&self, parent: &ElementId, class: &str) -> Vec<ElementId> {
        let tree = self.tree.lock().await;
        tree.nodes
            .get(parent)
            .map(|n| {
                n.children
                    .iter()
                    .filter(|c| {
                        tree.nodes
                            .get(*c)
                            .and_then(|n| n.class_name.as_deref())
                            .map(|cls| cls == class)
                            .unwrap_or(false)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    // ── Event plumbing ──────────────────────────────────────────────

    fn emit_dom(&self, event: DomEvent) {
        // No receivers is fine; the host page may not be listening.
        let _ = self.dom_events.send(event);
    }

    // Non-blocking sends: the consumer may be the same task that caused
    // the emission (a synthetic change raised mid-install), so awaiting
    // queue space here could deadlock the event loop on itself.
    async fn emit_page(&self, event: PageEvent) {
        let tx = self.page_tx.lock().await.clone();
        if let Some(tx) = tx {
            if let Err(e) = tx.try_send(event) {
                debug!("page event not delivered: {}", e);
            }
        }
    }

    async fn emit_mutation(&self, batch: MutationBatch) {
        let tx = self.mutation_tx.lock().await.clone();
        if let Some(tx) = tx {
            if let Err(e) = tx.try_send(batch) {
                debug!("mutation batch not delivered: {}", e);
            }
        }
    }
}

impl Default for PageDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InputSurfacePort for PageDocument {
    async fn query_file_inputs(&self, root: &ElementId) -> anyhow::Result<Vec<ElementId>> {
        let tree = self.tree.lock().await;
        let mut out = Vec::new();
        tree.collect_file_inputs(root, &mut out);
        Ok(out)
    }

    async fn document_root(&self) -> ElementId {
        self.root().await
    }

    async fn is_attached(&self, element: &ElementId) -> bool {
        self.tree.lock().await.attached(element)
    }

    async fn annotate_binding(
        &self,
        element: &ElementId,
        binding: &BindingId,
    ) -> anyhow::Result<()> {
        let mut tree = self.tree.lock().await;
        let node = tree
            .nodes
            .get_mut(element)
            .ok_or_else(|| anyhow::anyhow!("no such element"))?;
        node.dataset
            .insert(DATA_BINDING.into(), binding.as_str().to_string());
        Ok(())
    }

    async fn binding_annotation(&self, element: &ElementId) -> Option<BindingId> {
        self.tree
            .lock()
            .await
            .nodes
            .get(element)
            .and_then(|n| n.dataset.get(DATA_BINDING))
            .map(|s| BindingId::from_string(s.clone()))
    }

    async fn attach_edit_control(
        &self,
        element: &ElementId,
        binding: &BindingId,
    ) -> anyhow::Result<()> {
        let mut tree = self.tree.lock().await;
        let parent = tree
            .nodes
            .get(element)
            .and_then(|n| n.parent.clone())
            .ok_or_else(|| anyhow::anyhow!("input has no parent to hold the edit control"))?;

        let button_id = ElementId::new();
        let mut button = Node::element("button");
        button.class_name = Some("formfix-edit-btn".into());
        button.text = Some("Edit".into());
        button
            .dataset
            .insert(DATA_EDIT_FOR.into(), element.as_str().to_string());
        button
            .dataset
            .insert(DATA_BINDING.into(), binding.as_str().to_string());
        button.parent = Some(parent.clone());
        tree.nodes.insert(button_id.clone(), button);
        if let Some(parent_node) = tree.nodes.get_mut(&parent) {
            parent_node.children.push(button_id);
        }
        Ok(())
    }

    async fn install_files(
        &self,
        element: &ElementId,
        file: StoredFile,
    ) -> Result<(), ReplaceError> {
        let landed = {
            let filter = self.install_filter.lock().await;
            match filter.as_ref() {
                Some(f) => f(file),
                None => file,
            }
        };
        let mut tree = self.tree.lock().await;
        if !tree.attached(element) {
            return Err(ReplaceError::Detached);
        }
        let node = tree.nodes.get_mut(element).ok_or(ReplaceError::Detached)?;
        node.files = vec![landed];
        Ok(())
    }

    async fn first_file(&self, element: &ElementId) -> Option<StoredFile> {
        self.tree
            .lock()
            .await
            .nodes
            .get(element)
            .and_then(|n| n.files.first().cloned())
    }

    async fn dispatch_synthetic(
        &self,
        element: &ElementId,
        event: SyntheticEvent,
    ) -> anyhow::Result<()> {
        let (is_input, files) = {
            let tree = self.tree.lock().await;
            match tree.nodes.get(element) {
                Some(node) => (node.is_file_input(), node.files.clone()),
                None => anyhow::bail!("no such element"),
            }
        };
        self.emit_dom(DomEvent {
            target: element.clone(),
            name: event.name().into(),
            bubbles: true,
            cancelable: true,
            trusted: false,
            detail: None,
        });
        if is_input && event == SyntheticEvent::Change {
            self.emit_page(PageEvent::SelectionChanged {
                element: element.clone(),
                files,
                trusted: false,
            })
            .await;
        }
        Ok(())
    }

    async fn report_validity(&self, element: &ElementId) -> bool {
        self.tree
            .lock()
            .await
            .nodes
            .get(element)
            .map(|n| !(n.required && n.files.is_empty()))
            .unwrap_or(false)
    }

    async fn emit_replacement_notice(
        &self,
        element: &ElementId,
        notice: ReplacementNotice,
    ) -> anyhow::Result<()> {
        let detail = serde_json::to_value(&notice)?;
        self.emit_dom(DomEvent {
            target: element.clone(),
            name: REPLACEMENT_EVENT.into(),
            bubbles: true,
            cancelable: false,
            trusted: false,
            detail: Some(detail),
        });
        Ok(())
    }
}

#[async_trait]
impl MutationStreamPort for PageDocument {
    async fn subscribe(&self) -> anyhow::Result<mpsc::Receiver<MutationBatch>> {
        let (tx, rx) = mpsc::channel(32);
        *self.mutation_tx.lock().await = Some(tx);
        Ok(rx)
    }
}

#[async_trait]
impl PageEventStreamPort for PageDocument {
    async fn subscribe(&self) -> anyhow::Result<mpsc::Receiver<PageEvent>> {
        let (tx, rx) = mpsc::channel(32);
        *self.page_tx.lock().await = Some(tx);
        Ok(rx)
    }
}

#[async_trait]
impl ToolboxPort for PageDocument {
    async fn mount(&self, descriptor: ToolboxDescriptor) -> anyhow::Result<ToolboxId> {
        let mut tree = self.tree.lock().await;
        let input = tree
            .input_for_binding(&descriptor.binding_id)
            .ok_or_else(|| anyhow::anyhow!("no input annotated with the binding"))?;
        let parent = tree
            .nodes
            .get(&input)
            .and_then(|n| n.parent.clone())
            .ok_or_else(|| anyhow::anyhow!("input has no parent to hold the toolbox"))?;

        let panel_id = ElementId::new();
        let mut panel = Node::element("div");
        panel.class_name = Some("formfix-toolbox".into());
        panel.dataset.insert(
            DATA_TOOLBOX_INPUT.into(),
            descriptor.binding_id.as_str().to_string(),
        );
        panel
            .dataset
            .insert(DATA_PREVIEW.into(), descriptor.file_name.clone());
        panel.parent = Some(parent.clone());

        let feedback_id = ElementId::new();
        let mut feedback = Node::element("div");
        feedback.class_name = Some("formfix-feedback".into());
        feedback.parent = Some(panel_id.clone());
        panel.children.push(feedback_id.clone());

        tree.nodes.insert(panel_id.clone(), panel);
        tree.nodes.insert(feedback_id, feedback);

        // Insert as the input's next sibling.
        if let Some(parent_node) = tree.nodes.get_mut(&parent) {
            let at = parent_node
                .children
                .iter()
                .position(|c| c == &input)
                .map(|i| i + 1)
                .unwrap_or(parent_node.children.len());
            parent_node.children.insert(at, panel_id.clone());
        }
        Ok(ToolboxId::from_string(panel_id.into_inner()))
    }

    async fn update_preview(&self, toolbox: &ToolboxId, file: &StoredFile) -> anyhow::Result<()> {
        let mut tree = self.tree.lock().await;
        let panel = ElementId::from_string(toolbox.as_str().to_string());
        if let Some(node) = tree.nodes.get_mut(&panel) {
            node.dataset.insert(DATA_PREVIEW.into(), file.name.clone());
        }
        Ok(())
    }

    async fn show_controls(&self, toolbox: &ToolboxId, op: OperationKind) -> anyhow::Result<()> {
        let mut tree = self.tree.lock().await;
        let panel = ElementId::from_string(toolbox.as_str().to_string());
        if let Some(node) = tree.nodes.get_mut(&panel) {
            node.dataset
                .insert(DATA_ACTIVE_CONTROLS.into(), op.as_str().to_string());
        }
        Ok(())
    }

    async fn show_feedback(&self, toolbox: &ToolboxId, feedback: Feedback) -> anyhow::Result<()> {
        let panel = ElementId::from_string(toolbox.as_str().to_string());
        let mut tree = self.tree.lock().await;
        let child = tree
            .nodes
            .get(&panel)
            .and_then(|n| n.children.first().cloned());
        if let Some(region) = child {
            if let Some(node) = tree.nodes.get_mut(&region) {
                node.text = Some(feedback.text.clone());
                node.dataset.insert(
                    DATA_TONE.into(),
                    match feedback.tone {
                        ff_core::FeedbackTone::Info => "info",
                        ff_core::FeedbackTone::Success => "success",
                        ff_core::FeedbackTone::Error => "error",
                    }
                    .to_string(),
                );
            }
        }
        Ok(())
    }

    async fn hide_feedback(&self, toolbox: &ToolboxId) -> anyhow::Result<()> {
        let panel = ElementId::from_string(toolbox.as_str().to_string());
        let mut tree = self.tree.lock().await;
        let child = tree
            .nodes
            .get(&panel)
            .and_then(|n| n.children.first().cloned());
        if let Some(region) = child {
            if let Some(node) = tree.nodes.get_mut(&region) {
                node.text = None;
            }
        }
        Ok(())
    }

    async fn unmount(&self, toolbox: &ToolboxId) -> anyhow::Result<()> {
        let panel = ElementId::from_string(toolbox.as_str().to_string());
        self.tree.lock().await.detach(&panel);
        Ok(())
    }

    async fn alert(&self, message: &str) -> anyhow::Result<()> {
        let root = self.root().await;
        self.emit_dom(DomEvent {
            target: root,
            name: ALERT_EVENT.into(),
            bubbles: false,
            cancelable: false,
            trusted: false,
            detail: Some(serde_json::Value::String(message.to_string())),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ff_core::MimeType;

    fn file(name: &str, len: usize) -> StoredFile {
        StoredFile::new(name, MimeType::image_png(), vec![9u8; len], 0)
    }

    #[tokio::test]
    async fn test_deep_query_sees_shadow_content() {
        let doc = PageDocument::new();
        let root = doc.root().await;

        let host = doc.create_element("div").await;
        doc.append(&root, &host).await;
        let shadow = doc.attach_shadow(&host).await;
        let hidden_input = doc.create_file_input().await;
        doc.append(&shadow, &hidden_input).await;

        let plain_input = doc.create_file_input().await;
        doc.append(&root, &plain_input).await;

        let found = doc.query_file_inputs(&root).await.unwrap();
        assert!(found.contains(&hidden_input));
        assert!(found.contains(&plain_input));
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn test_append_under_attached_parent_emits_mutation() {
        let doc = PageDocument::new();
        let root = doc.root().await;
        let mut rx = MutationStreamPort::subscribe(&doc).await.unwrap();

        let input = doc.create_file_input().await;
        doc.append(&root, &input).await;

        let batch = rx.recv().await.unwrap();
        assert_eq!(batch.added_roots, vec![input]);
    }

    #[tokio::test]
    async fn test_detached_append_is_silent_until_attached() {
        let doc = PageDocument::new();
        let root = doc.root().await;
        let mut rx = MutationStreamPort::subscribe(&doc).await.unwrap();

        let wrapper = doc.create_element("div").await;
        let input = doc.create_file_input().await;
        doc.append(&wrapper, &input).await;
        assert!(rx.try_recv().is_err());

        doc.append(&root, &wrapper).await;
        let batch = rx.recv().await.unwrap();
        assert_eq!(batch.added_roots, vec![wrapper]);
    }

    #[tokio::test]
    async fn test_user_selection_is_trusted_synthetic_is_not() {
        let doc = PageDocument::new();
        let root = doc.root().await;
        let input = doc.create_file_input().await;
        doc.append(&root, &input).await;
        let mut rx = PageEventStreamPort::subscribe(&doc).await.unwrap();

        doc.select_files(&input, vec![file("a.png", 4)]).await;
        match rx.recv().await.unwrap() {
            PageEvent::SelectionChanged { trusted, .. } => assert!(trusted),
            other => panic!("unexpected event: {other:?}"),
        }

        doc.dispatch_synthetic(&input, SyntheticEvent::Change)
            .await
            .unwrap();
        match rx.recv().await.unwrap() {
            PageEvent::SelectionChanged { trusted, .. } => assert!(!trusted),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_install_respects_filter() {
        let doc = PageDocument::new();
        let root = doc.root().await;
        let input = doc.create_file_input().await;
        doc.append(&root, &input).await;

        doc.set_install_filter(Box::new(|f| f.with_name("clobbered.bin")))
            .await;
        doc.install_files(&input, file("a.png", 4)).await.unwrap();
        assert_eq!(doc.first_file(&input).await.unwrap().name, "clobbered.bin");
    }

    #[tokio::test]
    async fn test_install_on_detached_element_fails() {
        let doc = PageDocument::new();
        let input = doc.create_file_input().await;
        let err = doc.install_files(&input, file("a.png", 4)).await;
        assert_eq!(err, Err(ReplaceError::Detached));
    }

    #[tokio::test]
    async fn test_validity_honors_required_flag() {
        let doc = PageDocument::new();
        let root = doc.root().await;
        let input = doc.create_file_input().await;
        doc.append(&root, &input).await;
        doc.set_required(&input, true).await;

        assert!(!doc.report_validity(&input).await);
        doc.install_files(&input, file("a.png", 4)).await.unwrap();
        assert!(doc.report_validity(&input).await);
    }
}
