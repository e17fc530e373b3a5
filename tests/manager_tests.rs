//! Registry-level behavior: identifier stamping, stray dispatch,
//! shutdown, and first-send failure hygiene.

mod common;

use std::sync::Arc;
use std::time::Duration;

use stun_transaction_core::prelude::*;

use common::{
    local_access_point, manager_with, server_address, success_event, MockTransport,
    RecordingCollector,
};

#[tokio::test(start_paused = true)]
async fn stamped_identifier_matches_registry_key() {
    let transport = Arc::new(MockTransport::new());
    let manager = manager_with(transport.clone());
    let collector = Arc::new(RecordingCollector::new());

    let transaction = manager
        .submit(
            Request::binding(),
            server_address(),
            local_access_point(),
            collector.clone(),
        )
        .await
        .unwrap();

    // The identifier the access layer saw on the wire is the identifier
    // the registry matches responses by.
    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].transaction_id.as_ref(), Some(transaction.id()));
    assert_eq!(
        transaction.request().transaction_id(),
        Some(transaction.id())
    );

    assert!(manager.transaction_exists(transaction.id()));
    assert!(manager.deliver(transaction.id(), success_event(transaction.id())).is_none());
    assert_eq!(collector.response_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn stray_response_is_reported_unmatched() {
    let transport = Arc::new(MockTransport::new());
    let manager = manager_with(transport.clone());
    let collector = Arc::new(RecordingCollector::new());

    let transaction = manager
        .submit(
            Request::binding(),
            server_address(),
            local_access_point(),
            collector.clone(),
        )
        .await
        .unwrap();

    let stray_id = TransactionId::new().unwrap();
    assert!(manager.deliver(&stray_id, success_event(&stray_id)).is_some());

    // The live transaction is untouched.
    assert!(manager.transaction_exists(transaction.id()));
    assert_eq!(transaction.state(), TransactionState::Trying);
    assert_eq!(collector.response_count(), 0);
    assert_eq!(collector.timeout_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn cancel_all_empties_the_registry_silently() {
    let transport = Arc::new(MockTransport::new());
    let manager = manager_with(transport.clone());
    let collector = Arc::new(RecordingCollector::new());

    for _ in 0..3 {
        manager
            .submit(
                Request::binding(),
                server_address(),
                local_access_point(),
                collector.clone(),
            )
            .await
            .unwrap();
    }
    assert_eq!(manager.active_transaction_count(), 3);

    manager.cancel_all();
    assert_eq!(manager.active_transaction_count(), 0);

    tokio::time::sleep(Duration::from_millis(7000)).await;

    // Only the three initial sends; no retransmissions, no callbacks.
    assert_eq!(transport.send_count(), 3);
    assert_eq!(collector.response_count(), 0);
    assert_eq!(collector.timeout_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn failed_first_send_leaves_no_residue() {
    let transport = Arc::new(MockTransport::new());
    transport.fail_attempts(&[0]);
    let manager = manager_with(transport.clone());
    let collector = Arc::new(RecordingCollector::new());

    let result = manager
        .submit(
            Request::binding(),
            server_address(),
            local_access_point(),
            collector.clone(),
        )
        .await;

    assert!(matches!(result, Err(Error::SendFailed(_, _))));
    assert_eq!(manager.active_transaction_count(), 0);

    tokio::time::sleep(Duration::from_millis(7000)).await;
    assert_eq!(transport.send_count(), 1);
    assert_eq!(collector.response_count(), 0);
    assert_eq!(collector.timeout_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn each_terminal_path_clears_its_entry() {
    let transport = Arc::new(MockTransport::new());
    let manager = manager_with(transport.clone());
    let collector = Arc::new(RecordingCollector::new());

    let answered = manager
        .submit(
            Request::binding(),
            server_address(),
            local_access_point(),
            collector.clone(),
        )
        .await
        .unwrap();
    let cancelled = manager
        .submit(
            Request::binding(),
            server_address(),
            local_access_point(),
            collector.clone(),
        )
        .await
        .unwrap();
    let abandoned = manager
        .submit(
            Request::binding(),
            server_address(),
            local_access_point(),
            collector.clone(),
        )
        .await
        .unwrap();
    assert_eq!(manager.active_transaction_count(), 3);

    assert!(manager
        .deliver(answered.id(), success_event(answered.id()))
        .is_none());
    assert!(!manager.transaction_exists(answered.id()));

    cancelled.cancel();
    assert!(!manager.transaction_exists(cancelled.id()));

    tokio::time::sleep(Duration::from_millis(7000)).await;
    assert!(!manager.transaction_exists(abandoned.id()));
    assert_eq!(manager.active_transaction_count(), 0);

    assert_eq!(collector.response_count(), 1);
    assert_eq!(collector.timeout_count(), 1);
}
