//! Demo binary: build a simulated page with one upload input, run a
//! compress round-trip through the stand-in codec, reset, and print the
//! notifications a host page would see.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use formfix::{
    start_session, AppConfig, MimeType, OperationKind, OperationOptions, StoredFile,
    REPLACEMENT_EVENT,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Policy knobs come from formfix.toml when one sits next to the
    // binary; the defaults mirror the documented constants.
    let config = match std::fs::read_to_string("formfix.toml") {
        Ok(raw) => AppConfig::from_toml(&raw.parse::<toml::Value>()?)?,
        Err(_) => AppConfig::default(),
    };

    let session = start_session(config).await?;
    let document = Arc::clone(&session.document);
    let mut page_view = document.events();

    // A form with one file input, as a page would render it.
    let root = document.root().await;
    let form = document.create_element("form").await;
    document.append(&root, &form).await;
    let upload = document.create_file_input().await;
    document.append(&form, &upload).await;

    // Give discovery a beat to register the input.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    // The user picks a 2 MB photo.
    let photo = StoredFile::new(
        "photo.png",
        MimeType::image_png(),
        vec![0x89u8; 2 * 1024 * 1024],
        0,
    );
    document.select_files(&upload, vec![photo]).await;
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let binding = session
        .app
        .binding_for(&upload)
        .await
        .expect("input was registered");
    info!(%binding, "input bound");

    session
        .app
        .request_operation(
            &binding,
            OperationKind::Compress,
            OperationOptions::Compress { quality: 0.7 },
        )
        .await?;

    // Wait for the replacement notification.
    loop {
        let event = page_view.recv().await?;
        if event.is(REPLACEMENT_EVENT) {
            info!(detail = %event.detail.unwrap_or_default(), "file replaced");
            break;
        }
    }
    let compressed = document.files_of(&upload).await;
    info!(
        name = %compressed[0].name,
        size = compressed[0].size_bytes(),
        "compressed file installed"
    );

    session.app.reset(&binding).await?;
    loop {
        let event = page_view.recv().await?;
        if event.is(REPLACEMENT_EVENT) {
            break;
        }
    }
    let restored = document.files_of(&upload).await;
    info!(
        name = %restored[0].name,
        size = restored[0].size_bytes(),
        "original restored"
    );

    session.shutdown().await;
    Ok(())
}
