//! The input registry: every managed file input, keyed by binding id.
//!
//! The registry is the single writer of `original_file` and the only
//! component that moves `ProcessingState`. It is constructed per
//! document and injected into everything that needs it, so tests build
//! isolated instances instead of sharing ambient globals.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, warn};
use tokio::sync::Mutex;

use ff_core::ports::InputSurfacePort;
use ff_core::{
    BindingId, CorrelationId, ElementId, InputBinding, MediaKind, OperationError,
    ProcessingState, RegistryError, SelectionOrigin, StoredFile, ToolboxId,
};

/// What a genuine user selection captured, handed to the toolbox layer.
#[derive(Debug, Clone)]
pub struct SelectionCapture {
    pub binding_id: BindingId,
    pub file: StoredFile,
    pub kind: MediaKind,
}

#[derive(Default)]
struct RegistryInner {
    bindings: HashMap<BindingId, InputBinding>,
    by_element: HashMap<ElementId, BindingId>,
}

pub struct InputRegistry {
    surface: Arc<dyn InputSurfacePort>,
    inner: Mutex<RegistryInner>,
}

impl InputRegistry {
    pub fn new(surface: Arc<dyn InputSurfacePort>) -> Self {
        Self {
            surface,
            inner: Mutex::new(RegistryInner::default()),
        }
    }

    /// Register an element, returning the existing binding id when the
    /// element is already managed. Idempotent by contract: discovery may
    /// sight the same input any number of times.
    pub async fn register(&self, element: &ElementId) -> anyhow::Result<BindingId> {
        let mut inner = self.inner.lock().await;
        if let Some(existing) = inner.by_element.get(element) {
            return Ok(existing.clone());
        }
        let id = BindingId::new();
        inner
            .bindings
            .insert(id.clone(), InputBinding::new(id.clone(), element.clone()));
        inner.by_element.insert(element.clone(), id.clone());
        debug!("registered input {} as binding {}", element, id);
        drop(inner);

        self.surface.annotate_binding(element, &id).await?;
        if let Err(e) = self.surface.attach_edit_control(element, &id).await {
            // An input without a parent cannot hold the affordance;
            // the binding still works without it.
            warn!("could not attach edit control for {}: {}", id, e);
        }
        Ok(id)
    }

    pub async fn lookup(&self, id: &BindingId) -> Result<InputBinding, RegistryError> {
        self.inner
            .lock()
            .await
            .bindings
            .get(id)
            .cloned()
            .ok_or(RegistryError::NotFound)
    }

    pub async fn binding_for_element(&self, element: &ElementId) -> Option<BindingId> {
        self.inner.lock().await.by_element.get(element).cloned()
    }

    /// React to a change event on a managed input.
    ///
    /// Only a trusted, non-empty selection captures a new original; a
    /// synthetic change raised by the replacement engine or any other
    /// script leaves the original untouched, which is what keeps reset
    /// pointing at what the user actually picked.
    pub async fn record_selection(
        &self,
        element: &ElementId,
        files: &[StoredFile],
        trusted: bool,
    ) -> Option<SelectionCapture> {
        let origin = SelectionOrigin::from_trusted(trusted);
        if origin == SelectionOrigin::ProgrammaticInstall {
            debug!("ignoring {} change on {}", origin.as_str(), element);
            return None;
        }
        let file = files.first()?.clone();

        let mut inner = self.inner.lock().await;
        let id = inner.by_element.get(element).cloned()?;
        let binding = inner.bindings.get_mut(&id)?;

        binding.original_file = Some(file.clone());
        binding.current_file = Some(file.clone());
        // A fresh selection supersedes whatever was happening before:
        // the state returns to Idle and any in-flight result goes stale.
        binding.state = ProcessingState::Idle;
        binding.in_flight = None;

        Some(SelectionCapture {
            binding_id: id,
            kind: file.mime.media_kind(),
            file,
        })
    }

    /// Guarded entry into `Processing`. Returns the payload snapshot the
    /// request will carry.
    pub async fn begin_operation(
        &self,
        id: &BindingId,
        correlation: &CorrelationId,
    ) -> Result<StoredFile, OperationError> {
        let mut inner = self.inner.lock().await;
        let binding = inner.bindings.get_mut(id).ok_or(OperationError::NotFound)?;
        let file = binding
            .current_file
            .clone()
            .ok_or_else(|| OperationError::InvalidInput("no file selected yet".into()))?;
        match binding.state.begin() {
            Some(next) => {
                binding.state = next;
                binding.in_flight = Some(correlation.clone());
                Ok(file)
            }
            None => Err(OperationError::AlreadyProcessing),
        }
    }

    /// Roll back a `begin_operation` whose dispatch never left.
    pub async fn abort_operation(&self, id: &BindingId, correlation: &CorrelationId) {
        let mut inner = self.inner.lock().await;
        if let Some(binding) = inner.bindings.get_mut(id) {
            if binding.is_current(correlation) {
                binding.state = binding.state.on_timeout();
                binding.in_flight = None;
            }
        }
    }

    /// Apply a result transition if `correlation` is still the in-flight
    /// request. Returns false for stale results, which callers drop.
    pub async fn finish_operation(
        &self,
        id: &BindingId,
        correlation: &CorrelationId,
        outcome: OperationOutcome,
    ) -> bool {
        let mut inner = self.inner.lock().await;
        let Some(binding) = inner.bindings.get_mut(id) else {
            return false;
        };
        if !binding.is_current(correlation) {
            return false;
        }
        binding.state = match outcome {
            OperationOutcome::Success => binding.state.on_success(),
            OperationOutcome::Failure => binding.state.on_failure(),
            OperationOutcome::Timeout => binding.state.on_timeout(),
        };
        binding.in_flight = None;
        true
    }

    /// Called by the replacement engine, and only by it, after a
    /// verified install.
    pub(crate) async fn set_current_file(&self, id: &BindingId, file: StoredFile) {
        let mut inner = self.inner.lock().await;
        if let Some(binding) = inner.bindings.get_mut(id) {
            binding.current_file = Some(file);
        }
    }

    pub async fn attach_toolbox(&self, id: &BindingId, toolbox: ToolboxId) {
        let mut inner = self.inner.lock().await;
        if let Some(binding) = inner.bindings.get_mut(id) {
            binding.toolbox = Some(toolbox);
        }
    }

    pub async fn clear_toolbox(&self, id: &BindingId) {
        let mut inner = self.inner.lock().await;
        if let Some(binding) = inner.bindings.get_mut(id) {
            binding.toolbox = None;
        }
    }

    /// Drop one binding, for an element that left the document.
    pub async fn unregister(&self, id: &BindingId) {
        let mut inner = self.inner.lock().await;
        if let Some(binding) = inner.bindings.remove(id) {
            inner.by_element.remove(&binding.element);
        }
    }

    /// Page teardown: forget everything.
    pub async fn unregister_all(&self) {
        let mut inner = self.inner.lock().await;
        inner.bindings.clear();
        inner.by_element.clear();
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.bindings.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// How one in-flight operation ended, from the registry's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationOutcome {
    Success,
    Failure,
    Timeout,
}
