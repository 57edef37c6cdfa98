use std::sync::Arc;
use std::time::Duration;

use huddle_core::SdpType;
use huddle_mesh::{NegotiationRole, PeerStatus};

use super::{relay_session, spawn_relay};
use crate::integration::{init_tracing, peer, wait_until};
use crate::utils::MockTransportFactory;

#[tokio::test]
async fn test_two_sessions_negotiate_through_relay() {
    init_tracing();

    let base = spawn_relay().await;
    let bob_transports = MockTransportFactory::new();
    let alice_transports = MockTransportFactory::new();

    let mut bob = relay_session(&base, "R1", "bob", Arc::new(bob_transports.clone()));
    bob.initialize().await.expect("bob failed to join");
    assert_eq!(bob.connection_count(), 0);
    let bob_handle = bob.handle();
    let bob_task = tokio::spawn(bob.run());

    let mut alice = relay_session(&base, "R1", "alice", Arc::new(alice_transports.clone()));
    alice.initialize().await.expect("alice failed to join");
    // the newcomer offers to everyone already in the room
    assert_eq!(alice.peer_role(&peer("bob")), Some(NegotiationRole::Offerer));
    let alice_handle = alice.handle();
    let alice_task = tokio::spawn(alice.run());

    let bob_registry = bob_handle.registry().clone();
    let alice_registry = alice_handle.registry().clone();
    assert!(
        wait_until(
            || {
                alice_registry.get(&peer("bob")).map(|e| e.status) == Some(PeerStatus::Connected)
                    && bob_registry.get(&peer("alice")).map(|e| e.status)
                        == Some(PeerStatus::Connected)
            },
            5000
        )
        .await,
        "sessions never finished offer/answer"
    );

    let alice_side = alice_transports.latest(&peer("bob")).unwrap();
    let bob_side = bob_transports.latest(&peer("alice")).unwrap();
    assert_eq!(alice_side.log().offers_created, 1);
    assert_eq!(bob_side.log().answers_created, 1);
    assert_eq!(bob_side.log().remote_descriptions[0].sdp_type, SdpType::Offer);
    assert_eq!(alice_side.log().remote_descriptions[0].sdp_type, SdpType::Answer);

    // trickled candidates cross the relay in both directions
    alice_side.emit_candidate("candidate:alice").await;
    bob_side.emit_candidate("candidate:bob").await;
    assert!(
        wait_until(
            || {
                bob_side.applied_candidates() == vec!["candidate:alice".to_owned()]
                    && alice_side.applied_candidates() == vec!["candidate:bob".to_owned()]
            },
            5000
        )
        .await
    );

    alice_handle.teardown().await;
    let result = tokio::time::timeout(Duration::from_secs(5), alice_task)
        .await
        .expect("alice loop did not stop")
        .expect("alice loop panicked");
    assert!(result.is_ok());

    assert!(
        wait_until(|| bob_registry.is_empty(), 5000).await,
        "bob never saw alice leave"
    );
    assert!(bob_side.is_closed());

    bob_handle.teardown().await;
    let _ = tokio::time::timeout(Duration::from_secs(5), bob_task).await;
}

#[tokio::test]
async fn test_third_peer_completes_the_mesh() {
    init_tracing();

    let base = spawn_relay().await;
    let factories: Vec<MockTransportFactory> =
        (0..3).map(|_| MockTransportFactory::new()).collect();
    let names = ["alice", "bob", "carol"];

    let mut handles = Vec::new();
    let mut tasks = Vec::new();
    for (name, transports) in names.iter().zip(&factories) {
        let mut session = relay_session(&base, "R1", name, Arc::new(transports.clone()));
        session.initialize().await.expect("join failed");
        handles.push(session.handle());
        tasks.push(tokio::spawn(session.run()));
    }

    for (i, handle) in handles.iter().enumerate() {
        let registry = handle.registry().clone();
        let others: Vec<_> = names
            .iter()
            .filter(|n| **n != names[i])
            .map(|n| peer(n))
            .collect();
        assert!(
            wait_until(
                || {
                    others.iter().all(|p| {
                        registry.get(p).map(|e| e.status) == Some(PeerStatus::Connected)
                    })
                },
                5000
            )
            .await,
            "{} is missing connections",
            names[i]
        );
        assert_eq!(registry.len(), 2);
    }

    // one connection per pair, offered by the later joiner
    assert_eq!(factories[0].created().len(), 2);
    assert_eq!(
        factories[2]
            .created()
            .iter()
            .map(|h| h.log().offers_created)
            .sum::<usize>(),
        2
    );

    for handle in &handles {
        handle.teardown().await;
    }
    for task in tasks {
        let _ = tokio::time::timeout(Duration::from_secs(5), task).await;
    }
}
