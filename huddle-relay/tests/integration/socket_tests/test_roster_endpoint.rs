use huddle_core::{PeerName, RoomId};
use reqwest::StatusCode;

use crate::integration::init_tracing;
use crate::utils::{TestClient, fetch_roster, spawn_relay};

#[tokio::test]
async fn test_roster_lists_members_in_join_order() {
    init_tracing();

    let (addr, _manager) = spawn_relay().await;
    let _bob = TestClient::join(addr, "R1", "bob").await.unwrap();
    let _alice = TestClient::join(addr, "R1", "alice").await.unwrap();

    let response = fetch_roster(addr, "R1").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let names: Vec<PeerName> = response.json().await.unwrap();
    assert_eq!(names, vec![PeerName::from("bob"), PeerName::from("alice")]);
}

#[tokio::test]
async fn test_unknown_room_is_not_found() {
    init_tracing();

    let (addr, _manager) = spawn_relay().await;

    let response = fetch_roster(addr, "nowhere").await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_room_is_gone_after_last_member_leaves() {
    init_tracing();

    let (addr, manager) = spawn_relay().await;
    let alice = TestClient::join(addr, "R1", "alice").await.unwrap();
    assert_eq!(fetch_roster(addr, "R1").await.unwrap().status(), StatusCode::OK);

    alice.close().await.unwrap();

    let mut status = StatusCode::OK;
    for _ in 0..200 {
        status = fetch_roster(addr, "R1").await.unwrap().status();
        if status == StatusCode::NOT_FOUND && !manager.contains(&RoomId::from("R1")) {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!manager.contains(&RoomId::from("R1")));

    // a new joiner opens a fresh room under the same id
    let _bob = TestClient::join(addr, "R1", "bob").await.unwrap();
    let names: Vec<PeerName> = fetch_roster(addr, "R1").await.unwrap().json().await.unwrap();
    assert_eq!(names, vec![PeerName::from("bob")]);
}
