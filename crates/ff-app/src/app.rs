//! The application runtime: wiring plus the event loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use ff_core::ports::PageEvent;
use ff_core::{
    AppConfig, BindingId, ElementId, InputBinding, OperationKind, OperationOptions, RegistryError,
};

use crate::deps::AppDeps;
use crate::dispatch::DispatchClient;
use crate::registry::InputRegistry;
use crate::replace::FileReplacer;
use crate::toolbox::ToolboxController;
use crate::usecases::{
    HandleProcessingResult, HandleSelectionChanged, RequestOperation, ResetInput,
};
use crate::watcher::InputScanner;

pub struct App {
    config: AppConfig,
    deps: AppDeps,
    registry: Arc<InputRegistry>,
    toolbox: Arc<ToolboxController>,
    dispatch: Arc<DispatchClient>,
    selection: HandleSelectionChanged,
    results: Arc<HandleProcessingResult>,
    request: RequestOperation,
    reset: Arc<ResetInput>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl App {
    /// Create the runtime from its dependencies. No hidden defaults: the
    /// config carries every policy knob.
    pub fn new(deps: AppDeps, config: AppConfig) -> Arc<Self> {
        let registry = Arc::new(InputRegistry::new(Arc::clone(&deps.surface)));
        let replacer = Arc::new(FileReplacer::new(
            Arc::clone(&deps.surface),
            Arc::clone(&registry),
        ));
        let toolbox = Arc::new(ToolboxController::new(
            Arc::clone(&deps.toolbox),
            Arc::clone(&registry),
            Duration::from_millis(config.feedback_hide_ms),
        ));
        let dispatch = Arc::new(DispatchClient::new(
            Arc::clone(&deps.bridge),
            Duration::from_millis(config.dispatch_timeout_ms),
        ));

        let reset = Arc::new(ResetInput::new(
            Arc::clone(&registry),
            Arc::clone(&replacer),
            Arc::clone(&toolbox),
        ));
        let selection =
            HandleSelectionChanged::new(Arc::clone(&registry), Arc::clone(&toolbox));
        let results = Arc::new(HandleProcessingResult::new(
            Arc::clone(&registry),
            Arc::clone(&replacer),
            Arc::clone(&toolbox),
            Arc::clone(&dispatch),
        ));
        let request = RequestOperation::new(
            Arc::clone(&registry),
            Arc::clone(&dispatch),
            Arc::clone(&toolbox),
            Arc::clone(&reset),
        );

        Arc::new(Self {
            config,
            deps,
            registry,
            toolbox,
            dispatch,
            selection,
            results,
            request,
            reset,
            tasks: Mutex::new(Vec::new()),
        })
    }

    /// Start discovery and the event loop. Idempotent enough for one
    /// call per document; a second call would double-subscribe.
    pub async fn start(self: &Arc<Self>) -> anyhow::Result<()> {
        let mutations = self.deps.mutations.subscribe().await?;
        let mut page_events = self.deps.page_events.subscribe().await?;
        let mut bridge_rx = self.deps.bridge.subscribe();
        let mut expired_rx = self
            .dispatch
            .take_expired()
            .await
            .ok_or_else(|| anyhow::anyhow!("event loop already started"))?;

        let scanner = Arc::new(InputScanner::new(
            Arc::clone(&self.deps.surface),
            Arc::clone(&self.registry),
            self.config.clone(),
        ));

        let initial = {
            let scanner = Arc::clone(&scanner);
            tokio::spawn(async move { scanner.initial_scan().await })
        };
        let mutation_loop =
            tokio::spawn(async move { scanner.run_mutation_loop(mutations).await });

        let app = Arc::clone(self);
        let window = self.deps.bridge.window();
        let event_loop = tokio::spawn(async move {
            loop {
                tokio::select! {
                    event = page_events.recv() => {
                        match event {
                            Some(PageEvent::SelectionChanged { element, files, trusted }) => {
                                if let Err(e) = app.selection.execute(&element, files, trusted).await {
                                    warn!("selection handling failed: {}", e);
                                }
                            }
                            Some(PageEvent::EditRequested { element }) => {
                                app.handle_edit_request(&element).await;
                            }
                            None => break,
                        }
                    }
                    envelope = bridge_rx.recv() => {
                        match envelope {
                            Ok(envelope) => {
                                if !envelope.is_from(&window) {
                                    debug!("dropping envelope from a foreign window");
                                    continue;
                                }
                                app.results.on_message(envelope.message).await;
                            }
                            Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                                warn!(skipped, "event loop lagged behind the window channel");
                            }
                            Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                        }
                    }
                    expired = expired_rx.recv() => {
                        match expired {
                            Some(expired) => app.results.on_expired(expired).await,
                            None => break,
                        }
                    }
                }
            }
            debug!("event loop ended");
        });

        let mut tasks = self.tasks.lock().await;
        tasks.push(initial);
        tasks.push(mutation_loop);
        tasks.push(event_loop);
        Ok(())
    }

    /// Page teardown: stop the loops, unmount every toolbox, clear the
    /// registry.
    pub async fn shutdown(&self) {
        for task in self.tasks.lock().await.drain(..) {
            task.abort();
        }
        self.toolbox.close_all().await;
        self.registry.unregister_all().await;
    }

    async fn handle_edit_request(&self, element: &ElementId) {
        let Some(binding_id) = self.registry.binding_for_element(element).await else {
            return;
        };
        let Ok(binding) = self.registry.lookup(&binding_id).await else {
            return;
        };
        match binding.current_file {
            Some(file) => {
                if let Err(e) = self.toolbox.open(&binding_id, &file).await {
                    warn!("could not reopen toolbox for {}: {}", binding_id, e);
                }
            }
            None => self.toolbox.alert_select_first().await,
        }
    }

    // ── Public surface for hosts and tests ──────────────────────────

    pub async fn binding_for(&self, element: &ElementId) -> Option<BindingId> {
        self.registry.binding_for_element(element).await
    }

    pub async fn lookup(&self, binding_id: &BindingId) -> Result<InputBinding, RegistryError> {
        self.registry.lookup(binding_id).await
    }

    pub async fn request_operation(
        &self,
        binding_id: &BindingId,
        op: OperationKind,
        options: OperationOptions,
    ) -> anyhow::Result<()> {
        self.request.execute(binding_id, op, options).await
    }

    pub async fn reset(&self, binding_id: &BindingId) -> anyhow::Result<()> {
        self.reset.execute(binding_id).await
    }

    pub fn registry(&self) -> &Arc<InputRegistry> {
        &self.registry
    }

    pub fn toolbox(&self) -> &Arc<ToolboxController> {
        &self.toolbox
    }

    pub fn dispatch(&self) -> &Arc<DispatchClient> {
        &self.dispatch
    }
}
