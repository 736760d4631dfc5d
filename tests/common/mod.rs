//! Shared helpers for the end-to-end tests.
#![allow(dead_code)]

use std::time::Duration;

use ff_core::{BindingId, ElementId, InputBinding};
use ff_page::AdapterHost;
use formfix::{start_session_with, AppConfig, MimeType, Session, StoredFile};

const POLL: Duration = Duration::from_millis(10);
const POLL_ROUNDS: usize = 200;

/// Short policy windows so the tests run in milliseconds.
pub fn test_config() -> AppConfig {
    AppConfig {
        dispatch_timeout_ms: 300,
        scan_max_attempts: 1,
        scan_backoff_ms: 1,
        feedback_hide_ms: 50,
    }
}

pub async fn session() -> Session {
    start_session_with(test_config(), |host| host.with_default_adapters())
        .await
        .expect("session starts")
}

/// A session whose page scope carries only what the caller wires in.
pub async fn session_with(adapters: impl FnOnce(AdapterHost) -> AdapterHost) -> Session {
    start_session_with(test_config(), adapters)
        .await
        .expect("session starts")
}

/// Append a form with one file input and wait for discovery to bind it.
pub async fn add_bound_input(session: &Session) -> (ElementId, ElementId) {
    let document = &session.document;
    let root = document.root().await;
    let form = document.create_element("form").await;
    document.append(&root, &form).await;
    let input = document.create_file_input().await;
    document.append(&form, &input).await;

    for _ in 0..POLL_ROUNDS {
        if session.app.binding_for(&input).await.is_some() {
            return (form, input);
        }
        tokio::time::sleep(POLL).await;
    }
    panic!("input was not discovered within two seconds");
}

/// Select a file and wait until the binding carries it as original.
pub async fn select_and_settle(session: &Session, input: &ElementId, file: StoredFile) -> BindingId {
    session.document.select_files(input, vec![file]).await;
    let binding = session
        .app
        .binding_for(input)
        .await
        .expect("input is bound");
    wait_binding(session, &binding, |b| b.original_file.is_some()).await;
    binding
}

/// Poll the binding until the predicate holds.
pub async fn wait_binding(
    session: &Session,
    binding: &BindingId,
    predicate: impl Fn(&InputBinding) -> bool,
) {
    for _ in 0..POLL_ROUNDS {
        if let Ok(snapshot) = session.app.lookup(binding).await {
            if predicate(&snapshot) {
                return;
            }
        }
        tokio::time::sleep(POLL).await;
    }
    panic!("binding never reached the expected state");
}

/// Poll the element's first file until the predicate holds.
pub async fn wait_installed(
    session: &Session,
    input: &ElementId,
    predicate: impl Fn(&StoredFile) -> bool,
) {
    for _ in 0..POLL_ROUNDS {
        if let Some(file) = session.document.files_of(input).await.first() {
            if predicate(file) {
                return;
            }
        }
        tokio::time::sleep(POLL).await;
    }
    panic!("expected file never landed on the input");
}

/// Poll the toolbox feedback region until it contains `needle`.
pub async fn wait_feedback(session: &Session, form: &ElementId, needle: &str) {
    for _ in 0..POLL_ROUNDS {
        if let Some(text) = feedback_text(session, form).await {
            if text.contains(needle) {
                return;
            }
        }
        tokio::time::sleep(POLL).await;
    }
    panic!("feedback never mentioned {needle:?}");
}

/// The text currently shown in the feedback region of the toolbox
/// mounted next to the input under `form`.
pub async fn feedback_text(session: &Session, form: &ElementId) -> Option<String> {
    let document = &session.document;
    let panels = document.children_with_class(form, "formfix-toolbox").await;
    let panel = panels.first()?;
    let regions = document.children_of(panel).await;
    let region = regions.first()?;
    document.text_of(region).await
}

/// Whether a toolbox panel is mounted under `form`.
pub async fn has_toolbox(session: &Session, form: &ElementId) -> bool {
    !session
        .document
        .children_with_class(form, "formfix-toolbox")
        .await
        .is_empty()
}

pub fn png(name: &str, len: usize) -> StoredFile {
    StoredFile::new(name, MimeType::image_png(), vec![0x89u8; len], 0)
}

pub fn pdf(name: &str, len: usize) -> StoredFile {
    StoredFile::new(name, MimeType::application_pdf(), vec![0x25u8; len], 0)
}

pub fn mov(name: &str, len: usize) -> StoredFile {
    StoredFile::new(name, MimeType("video/quicktime".into()), vec![0x66u8; len], 0)
}

pub fn txt(name: &str) -> StoredFile {
    StoredFile::new(name, MimeType::text_plain(), b"hello".to_vec(), 0)
}
