use huddle_mesh::NegotiationPhase;

use crate::integration::{answer, candidate, init_tracing, joined_session, offer, peer};

#[tokio::test]
async fn test_early_candidates_applied_in_order_after_answer() {
    init_tracing();

    let mut test = joined_session("alice", &["alice", "bob"]).await;
    let bob = peer("bob");

    for line in ["c1", "c2", "c3"] {
        test.session
            .handle_signal(candidate("bob", "alice", line))
            .await
            .unwrap();
    }

    let handle = test.transports.latest(&bob).unwrap();
    assert!(handle.applied_candidates().is_empty());
    assert_eq!(test.session.pending_candidates(&bob), Some(3));

    test.session
        .handle_signal(answer("bob", "alice", "bob-answer"))
        .await
        .unwrap();

    assert_eq!(handle.applied_candidates(), vec!["c1", "c2", "c3"]);
    assert_eq!(test.session.pending_candidates(&bob), Some(0));
    assert_eq!(test.session.peer_phase(&bob), Some(NegotiationPhase::Connected));
}

#[tokio::test]
async fn test_candidates_after_remote_description_apply_immediately() {
    init_tracing();

    let mut test = joined_session("alice", &["alice"]).await;
    let bob = peer("bob");

    test.session
        .handle_signal(offer("bob", "alice", "bob-offer"))
        .await
        .unwrap();
    test.session
        .handle_signal(candidate("bob", "alice", "late"))
        .await
        .unwrap();

    let handle = test.transports.latest(&bob).unwrap();
    assert_eq!(handle.applied_candidates(), vec!["late"]);
}

#[tokio::test]
async fn test_candidate_for_unknown_peer_is_ignored() {
    init_tracing();

    let mut test = joined_session("alice", &["alice"]).await;

    test.session
        .handle_signal(candidate("ghost", "alice", "c1"))
        .await
        .unwrap();

    assert_eq!(test.session.connection_count(), 0);
    assert!(test.transports.created().is_empty());
    assert!(test.session.registry().is_empty());
}

#[tokio::test]
async fn test_rejected_candidate_does_not_fail_peer() {
    init_tracing();

    let mut test = joined_session("alice", &["alice", "bob"]).await;
    test.transports.reject_candidates();
    let bob = peer("bob");

    test.session
        .handle_signal(answer("bob", "alice", "bob-answer"))
        .await
        .unwrap();
    test.session
        .handle_signal(candidate("bob", "alice", "broken"))
        .await
        .unwrap();

    assert_eq!(test.session.peer_phase(&bob), Some(NegotiationPhase::Connected));
    assert!(test.session.registry().contains(&bob));
    assert!(test.reported_errors().is_empty());
}
