//! Composition root: one call wires the page document, the window
//! channel, the adapter host, and the application runtime together.

use std::sync::Arc;

use tokio::task::JoinHandle;

use ff_app::{App, AppDeps};
use ff_core::ports::{BridgePort, ClockPort};
use ff_core::AppConfig;
use ff_dom::PageDocument;
use ff_page::{AdapterHost, SystemClock, WindowChannel};

/// One running FormFix session against an in-process page.
pub struct Session {
    pub document: Arc<PageDocument>,
    pub channel: Arc<WindowChannel>,
    pub app: Arc<App>,
    adapter_task: JoinHandle<()>,
}

impl Session {
    pub async fn shutdown(self) {
        self.app.shutdown().await;
        self.adapter_task.abort();
    }
}

/// Build and start a session with the stand-in codecs.
pub async fn start_session(config: AppConfig) -> anyhow::Result<Session> {
    start_session_with(config, |host| host.with_default_adapters()).await
}

/// Build and start a session, letting the caller decide which adapters
/// the page scope carries. Tests use this to leave operations
/// unanswered (timeouts) or wire failing adapters.
pub async fn start_session_with(
    config: AppConfig,
    adapters: impl FnOnce(AdapterHost) -> AdapterHost,
) -> anyhow::Result<Session> {
    let document = Arc::new(PageDocument::new());
    let channel = Arc::new(WindowChannel::new());

    let bridge: Arc<dyn BridgePort> = channel.clone();
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);
    let host = adapters(AdapterHost::new(Arc::clone(&bridge), clock));
    // Subscribes synchronously: nothing posted afterwards is missed.
    let adapter_task = host.spawn();

    let app = App::new(
        AppDeps {
            surface: document.clone(),
            mutations: document.clone(),
            page_events: document.clone(),
            bridge,
            toolbox: document.clone(),
        },
        config,
    );
    app.start().await?;

    Ok(Session {
        document,
        channel,
        app,
        adapter_task,
    })
}
