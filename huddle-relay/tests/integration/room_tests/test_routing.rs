use huddle_core::{ConnectionId, IceCandidate, SessionDescription, SignalEvent};
use huddle_relay::RoomCommand;
use tokio::sync::mpsc;

use crate::integration::{create_test_room, init_tracing, join_room};
use crate::utils::drain;

struct Joined {
    connection_id: ConnectionId,
    rx: mpsc::UnboundedReceiver<SignalEvent>,
}

async fn join(room: &mpsc::Sender<RoomCommand>, name: &str) -> Joined {
    let connection_id = ConnectionId::new();
    let rx = join_room(room, name, connection_id).await;
    Joined { connection_id, rx }
}

/// Round-trip through the actor so earlier commands are processed.
async fn settle(room: &mpsc::Sender<RoomCommand>) {
    let (reply, rx) = tokio::sync::oneshot::channel();
    room.send(RoomCommand::Roster { reply }).await.unwrap();
    rx.await.unwrap();
}

#[tokio::test]
async fn test_events_routed_by_recipient_only() {
    init_tracing();

    let room = create_test_room();
    let alice = join(&room, "alice").await;
    let mut bob = join(&room, "bob").await;
    let mut carol = join(&room, "carol").await;
    settle(&room).await;
    drain(&mut bob.rx);
    drain(&mut carol.rx);

    let offer = SignalEvent::Offer {
        offer: SessionDescription::offer("v=0"),
        from: "alice".into(),
        to: "bob".into(),
    };
    room.send(RoomCommand::Relay {
        connection_id: alice.connection_id,
        event: offer.clone(),
    })
    .await
    .unwrap();
    room.send(RoomCommand::Relay {
        connection_id: alice.connection_id,
        event: SignalEvent::Candidate {
            candidate: IceCandidate::new("c1"),
            from: "alice".into(),
            to: "carol".into(),
        },
    })
    .await
    .unwrap();
    settle(&room).await;

    assert_eq!(drain(&mut bob.rx), vec![offer]);
    let carol_events = drain(&mut carol.rx);
    assert_eq!(carol_events.len(), 1);
    assert!(matches!(carol_events[0], SignalEvent::Candidate { .. }));
}

#[tokio::test]
async fn test_spoofed_sender_is_dropped() {
    init_tracing();

    let room = create_test_room();
    let mallory = join(&room, "mallory").await;
    let mut bob = join(&room, "bob").await;
    settle(&room).await;
    drain(&mut bob.rx);

    room.send(RoomCommand::Relay {
        connection_id: mallory.connection_id,
        event: SignalEvent::Answer {
            answer: SessionDescription::answer("v=0"),
            from: "alice".into(),
            to: "bob".into(),
        },
    })
    .await
    .unwrap();
    settle(&room).await;

    assert!(drain(&mut bob.rx).is_empty());
}

#[tokio::test]
async fn test_unknown_recipient_and_unjoined_sender_are_dropped() {
    init_tracing();

    let room = create_test_room();
    let mut alice = join(&room, "alice").await;
    settle(&room).await;
    drain(&mut alice.rx);

    room.send(RoomCommand::Relay {
        connection_id: alice.connection_id,
        event: SignalEvent::Offer {
            offer: SessionDescription::offer("v=0"),
            from: "alice".into(),
            to: "nobody".into(),
        },
    })
    .await
    .unwrap();
    room.send(RoomCommand::Relay {
        connection_id: ConnectionId::new(),
        event: SignalEvent::Offer {
            offer: SessionDescription::offer("v=0"),
            from: "ghost".into(),
            to: "alice".into(),
        },
    })
    .await
    .unwrap();
    settle(&room).await;

    assert!(drain(&mut alice.rx).is_empty());
}
