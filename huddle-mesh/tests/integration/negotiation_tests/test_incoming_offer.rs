use huddle_core::SignalEvent;
use huddle_mesh::{NegotiationPhase, NegotiationRole, PeerStatus};

use crate::integration::{init_tracing, joined_session, offer, peer};

#[tokio::test]
async fn test_offer_from_unknown_peer_creates_answerer() {
    init_tracing();

    let mut test = joined_session("alice", &["alice"]).await;
    let bob = peer("bob");

    test.session
        .handle_signal(offer("bob", "alice", "bob-offer"))
        .await
        .expect("offer handling failed");

    assert_eq!(test.session.connection_count(), 1);
    assert_eq!(test.session.peer_role(&bob), Some(NegotiationRole::Answerer));
    assert_eq!(test.session.peer_phase(&bob), Some(NegotiationPhase::Connected));

    let answers = test.signaling.answers_to(&bob).await;
    assert_eq!(answers.len(), 1);
    let sent = test.signaling.sent().await;
    assert!(matches!(
        &sent[0],
        SignalEvent::Answer { from, to, .. } if from.as_str() == "alice" && to == &bob
    ));

    let handle = test.transports.latest(&bob).expect("connection to bob");
    assert_eq!(handle.log().remote_descriptions[0].sdp, "bob-offer");
    assert_eq!(
        test.session.registry().get(&bob).map(|e| e.status),
        Some(PeerStatus::Connected)
    );
}

#[tokio::test]
async fn test_duplicate_offer_reuses_connection() {
    init_tracing();

    let mut test = joined_session("alice", &["alice"]).await;
    let bob = peer("bob");

    test.session
        .handle_signal(offer("bob", "alice", "first"))
        .await
        .unwrap();
    test.session
        .handle_signal(offer("bob", "alice", "second"))
        .await
        .unwrap();

    assert_eq!(test.session.connection_count(), 1);
    assert_eq!(test.transports.created_for(&bob).len(), 1);

    let log = test.transports.latest(&bob).unwrap().log();
    assert_eq!(log.remote_descriptions.len(), 2);
    assert_eq!(log.answers_created, 2);
    assert!(!log.closed);
    assert_eq!(test.signaling.answers_to(&bob).await.len(), 2);
}

#[tokio::test]
async fn test_offer_for_someone_else_is_ignored() {
    init_tracing();

    let mut test = joined_session("alice", &["alice"]).await;

    test.session
        .handle_signal(offer("bob", "carol", "not-for-us"))
        .await
        .unwrap();
    test.session
        .handle_signal(offer("alice", "alice", "echo"))
        .await
        .unwrap();

    assert_eq!(test.session.connection_count(), 0);
    assert!(test.transports.created().is_empty());
    assert!(test.signaling.sent().await.is_empty());
}

#[tokio::test]
async fn test_bad_offer_drops_peer_but_not_session() {
    init_tracing();

    let mut test = joined_session("alice", &["alice"]).await;
    test.transports.fail_remote_description();

    test.session
        .handle_signal(offer("bob", "alice", "garbage"))
        .await
        .expect("per-peer failure is not fatal");

    assert_eq!(test.session.connection_count(), 0);
    assert!(!test.session.registry().contains(&peer("bob")));
    assert!(test.transports.latest(&peer("bob")).unwrap().is_closed());
    assert!(test.signaling.answers_to(&peer("bob")).await.is_empty());
    assert!(test.reported_errors().is_empty());
}
