//! The contract-level guarantees: single binding per element, original
//! immutability, reset round-trips, mutual exclusion, timeout recovery,
//! and the post-install verification gate.

mod common;

use std::time::Duration;

use common::*;

use ff_core::ports::BridgePort;
use ff_core::{CorrelationId, Envelope, PageMessage, ProcessingMetrics, ProcessingState};
use formfix::{MimeType, OperationKind, OperationOptions, REPLACEMENT_EVENT};

#[tokio::test]
async fn one_binding_per_element_across_rediscovery() {
    let session = session().await;
    let (form, input) = add_bound_input(&session).await;
    let binding = session.app.binding_for(&input).await.unwrap();

    // More discovery passes: a mutation under the same parent, plus the
    // selection path, which registers lazily on first sighting.
    let sibling = session.document.create_element("div").await;
    session.document.append(&form, &sibling).await;
    select_and_settle(&session, &input, png("a.png", 64)).await;

    assert_eq!(session.app.registry().len().await, 1);
    assert_eq!(session.app.binding_for(&input).await.unwrap(), binding);
}

#[tokio::test]
async fn original_survives_any_number_of_processing_rounds() {
    let session = session().await;
    let (_form, input) = add_bound_input(&session).await;
    let original = png("photo.png", 100_000);
    let binding = select_and_settle(&session, &input, original.clone()).await;

    for _ in 0..3 {
        session
            .app
            .request_operation(
                &binding,
                OperationKind::Compress,
                OperationOptions::Compress { quality: 0.5 },
            )
            .await
            .unwrap();
        wait_binding(&session, &binding, |b| {
            b.state == ProcessingState::Idle && b.current_file != b.original_file
        })
        .await;

        session.app.reset(&binding).await.unwrap();
        wait_binding(&session, &binding, |b| b.current_file == b.original_file).await;
    }

    let after = session.app.lookup(&binding).await.unwrap();
    assert_eq!(after.original_file.unwrap(), original);
}

#[tokio::test]
async fn reset_notification_carries_the_original() {
    let session = session().await;
    let (_form, input) = add_bound_input(&session).await;
    let original = png("photo.png", 50_000);
    let binding = select_and_settle(&session, &input, original.clone()).await;

    session
        .app
        .request_operation(
            &binding,
            OperationKind::Compress,
            OperationOptions::Compress { quality: 0.4 },
        )
        .await
        .unwrap();
    wait_binding(&session, &binding, |b| {
        b.current_file != b.original_file && !b.state.is_busy()
    })
    .await;

    let mut page_view = session.document.events();
    session.app.reset(&binding).await.unwrap();

    let notice = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let event = page_view.recv().await.unwrap();
            if event.is(REPLACEMENT_EVENT) {
                return event;
            }
        }
    })
    .await
    .unwrap();

    let detail = notice.detail.unwrap();
    assert_eq!(detail["operation"], "reset");
    assert_eq!(detail["processedFile"]["name"], "photo.png");

    let after = session.app.lookup(&binding).await.unwrap();
    assert_eq!(after.current_file.unwrap(), original);
}

#[tokio::test]
async fn second_dispatch_while_processing_is_rejected() {
    // No adapters: the first request stays in flight until its timeout.
    let session = session_with(|host| host).await;
    let (form, input) = add_bound_input(&session).await;
    let binding = select_and_settle(&session, &input, png("a.png", 1024)).await;

    session
        .app
        .request_operation(
            &binding,
            OperationKind::Compress,
            OperationOptions::Compress { quality: 0.5 },
        )
        .await
        .unwrap();
    assert!(session.app.lookup(&binding).await.unwrap().state.is_busy());
    assert_eq!(session.app.dispatch().pending_count().await, 1);

    // The second trigger is refused at the gate, not dispatched.
    session
        .app
        .request_operation(
            &binding,
            OperationKind::Resize,
            OperationOptions::Resize { scale_percent: 50 },
        )
        .await
        .unwrap();
    assert_eq!(session.app.dispatch().pending_count().await, 1);
    wait_feedback(&session, &form, "already running").await;
}

#[tokio::test]
async fn timeout_returns_to_idle_with_files_untouched() {
    let session = session_with(|host| host).await;
    let (form, input) = add_bound_input(&session).await;
    let original = png("a.png", 2048);
    let binding = select_and_settle(&session, &input, original.clone()).await;

    session
        .app
        .request_operation(
            &binding,
            OperationKind::Compress,
            OperationOptions::Compress { quality: 0.5 },
        )
        .await
        .unwrap();

    // The configured window elapses with no reply.
    wait_binding(&session, &binding, |b| b.state == ProcessingState::Idle).await;

    let after = session.app.lookup(&binding).await.unwrap();
    assert_eq!(after.current_file.unwrap(), original);
    assert_eq!(session.app.dispatch().pending_count().await, 0);
    wait_feedback(&session, &form, "timed out").await;
}

#[tokio::test]
async fn clobbered_install_surfaces_verification_failure() {
    let session = session().await;
    let (form, input) = add_bound_input(&session).await;
    let original = png("a.png", 4096);
    let binding = select_and_settle(&session, &input, original.clone()).await;

    // A host page framework that rewrites whatever lands on the input.
    session
        .document
        .set_install_filter(Box::new(|f| f.with_name("framework-reset.bin")))
        .await;

    session
        .app
        .request_operation(
            &binding,
            OperationKind::Compress,
            OperationOptions::Compress { quality: 0.5 },
        )
        .await
        .unwrap();

    wait_feedback(&session, &form, "verification failed").await;

    // The tracked current file still points at what was last verified.
    let after = session.app.lookup(&binding).await.unwrap();
    assert_eq!(after.current_file.unwrap(), original);
    assert_eq!(after.state, ProcessingState::Failed);
}

#[tokio::test]
async fn forged_results_from_a_foreign_window_are_dropped() {
    let session = session().await;
    let (_form, input) = add_bound_input(&session).await;
    let original = png("a.png", 1024);
    let binding = select_and_settle(&session, &input, original.clone()).await;

    // Another frame with access to the same bus forges a result.
    let foreign = session.channel.sibling();
    let forged = PageMessage::Processed {
        binding_id: binding.clone(),
        correlation: CorrelationId::new(),
        file: png("evil.png", 8),
        original_operation: OperationKind::Compress,
        metrics: ProcessingMetrics {
            original_size: 1024,
            processed_size: 8,
            original_mime: MimeType::image_png(),
            processed_mime: MimeType::image_png(),
            elapsed_ms: 0,
        },
    };
    foreign
        .post(Envelope::new(foreign.window(), forged))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;
    let after = session.app.lookup(&binding).await.unwrap();
    assert_eq!(after.current_file.unwrap(), original);
    assert_eq!(session.document.files_of(&input).await.remove(0), original);
}
