//! End-to-end flows through the simulated page: selection, processing,
//! installation, reset, and the failure paths.

mod common;

use std::time::Duration;

use common::*;

use ff_page::adapters::FailingAdapter;
use formfix::{
    DomEvent, MimeType, OperationKind, OperationOptions, ALERT_EVENT, REPLACEMENT_EVENT,
};
use tokio::sync::broadcast;

/// Wait until an event with the given name comes over the page view.
async fn next_event(page_view: &mut broadcast::Receiver<DomEvent>, name: &str) -> DomEvent {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let event = page_view.recv().await.expect("page view stays open");
            if event.is(name) {
                return event;
            }
        }
    })
    .await
    .expect("event arrives within two seconds")
}

#[tokio::test]
async fn compress_then_reset_round_trip() {
    let session = session().await;
    let (_form, input) = add_bound_input(&session).await;
    let mut page_view = session.document.events();

    let photo = png("photo.png", 2 * 1024 * 1024);
    let binding = select_and_settle(&session, &input, photo.clone()).await;

    session
        .app
        .request_operation(
            &binding,
            OperationKind::Compress,
            OperationOptions::Compress { quality: 0.7 },
        )
        .await
        .unwrap();

    // The compressed JPEG lands on the input.
    wait_installed(&session, &input, |f| f.mime == MimeType::image_jpeg()).await;
    let installed = session.document.files_of(&input).await.remove(0);
    assert_eq!(installed.name, "photo.jpg");
    assert!(installed.size_bytes() <= photo.size_bytes());

    // The notification the host page observes reports the reduction.
    let notice = next_event(&mut page_view, REPLACEMENT_EVENT).await;
    let detail = notice.detail.unwrap();
    assert_eq!(detail["operation"], "compress");
    let processed = detail["metrics"]["processedSize"].as_u64().unwrap();
    assert!(processed < 2 * 1024 * 1024);

    // Reset restores the PNG exactly.
    session.app.reset(&binding).await.unwrap();
    wait_installed(&session, &input, |f| f.mime == MimeType::image_png()).await;
    let restored = session.document.files_of(&input).await.remove(0);
    assert_eq!(restored, photo);
}

#[tokio::test]
async fn slow_video_compress_completes_within_timeout() {
    let session = session().await;
    let (_form, input) = add_bound_input(&session).await;

    let clip = mov("holiday.mov", 4 * 1024 * 1024);
    let binding = select_and_settle(&session, &input, clip).await;

    session
        .app
        .request_operation(
            &binding,
            OperationKind::CompressVideo,
            OperationOptions::CompressVideo { crf: None },
        )
        .await
        .unwrap();

    wait_installed(&session, &input, |f| f.mime == MimeType::video_mp4()).await;
    let installed = session.document.files_of(&input).await.remove(0);
    assert_eq!(installed.name, "holiday.mp4");
    assert!(installed.size_bytes() < 4 * 1024 * 1024);
}

#[tokio::test]
async fn unsupported_file_gets_no_toolbox() {
    let session = session().await;
    let (form, input) = add_bound_input(&session).await;

    let binding = select_and_settle(&session, &input, txt("notes.txt")).await;

    assert!(!has_toolbox(&session, &form).await);
    assert!(session.app.toolbox().instance(&binding).await.is_none());
}

#[tokio::test]
async fn operation_without_a_file_alerts_and_dispatches_nothing() {
    let session = session().await;
    let (_form, input) = add_bound_input(&session).await;
    let mut page_view = session.document.events();

    let binding = session.app.binding_for(&input).await.unwrap();
    session
        .app
        .request_operation(
            &binding,
            OperationKind::Convert,
            OperationOptions::Convert {
                target: ff_core::ops::ImageFormat::Webp,
            },
        )
        .await
        .unwrap();

    let alert = next_event(&mut page_view, ALERT_EVENT).await;
    assert!(alert
        .detail
        .unwrap()
        .as_str()
        .unwrap()
        .contains("select a file"));

    let state = session.app.lookup(&binding).await.unwrap().state;
    assert!(!state.is_busy());
    assert_eq!(session.app.dispatch().pending_count().await, 0);
}

#[tokio::test]
async fn edit_control_reopens_a_fresh_toolbox() {
    let session = session().await;
    let (form, input) = add_bound_input(&session).await;
    let binding = select_and_settle(&session, &input, png("a.png", 4096)).await;
    assert!(has_toolbox(&session, &form).await);

    // The user closes the panel; hidden is terminal for that instance.
    session.app.toolbox().close(&binding).await.unwrap();
    assert!(!has_toolbox(&session, &form).await);

    // Clicking the edit affordance builds a fresh one.
    let buttons = session
        .document
        .children_with_class(&form, "formfix-edit-btn")
        .await;
    session.document.click(&buttons[0]).await;

    for _ in 0..200 {
        if has_toolbox(&session, &form).await {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(has_toolbox(&session, &form).await);
    assert!(session.app.toolbox().instance(&binding).await.is_some());
}

#[tokio::test]
async fn adapter_failure_leaves_both_files_untouched() {
    let session = session_with(|host| {
        host.with(std::sync::Arc::new(FailingAdapter::new(
            OperationKind::CompressPdf,
            "pdf backend exploded",
        )))
    })
    .await;
    let (form, input) = add_bound_input(&session).await;

    let report = pdf("report.pdf", 512 * 1024);
    let binding = select_and_settle(&session, &input, report.clone()).await;

    session
        .app
        .request_operation(
            &binding,
            OperationKind::CompressPdf,
            OperationOptions::CompressPdf {},
        )
        .await
        .unwrap();

    wait_feedback(&session, &form, "pdf backend exploded").await;

    let after = session.app.lookup(&binding).await.unwrap();
    assert_eq!(after.original_file.unwrap(), report);
    assert_eq!(after.current_file.unwrap(), report);
    assert_eq!(after.state, ff_core::ProcessingState::Failed);
    assert_eq!(session.document.files_of(&input).await.remove(0), report);
}
