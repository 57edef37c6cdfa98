use crate::room::{MemberOutput, Room, RoomCommand};
use dashmap::DashMap;
use huddle_core::{ConnectionId, PeerName, RoomId};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// A join can land on a room that is closing. One retry lands on its replacement.
const JOIN_ATTEMPTS: usize = 2;

#[derive(Clone, Default)]
pub struct RoomManager {
    rooms: Arc<DashMap<RoomId, mpsc::Sender<RoomCommand>>>,
}

impl RoomManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Комната создаётся при первом `join` и удаляется, когда из неё выходит последний участник.
    pub fn get_room_sender(&self, room_id: &RoomId) -> mpsc::Sender<RoomCommand> {
        self.rooms
            .entry(room_id.clone())
            .or_insert_with(|| {
                info!("Creating new room: {}", room_id);
                let (tx, rx) = mpsc::channel(100);

                let rooms = Arc::clone(&self.rooms);
                let id = room_id.clone();
                let own = tx.clone();
                tokio::spawn(async move {
                    Room::new(id.clone(), rx).run().await;
                    rooms.remove_if(&id, |_, sender| sender.same_channel(&own));
                    debug!("Room {} removed", id);
                });
                tx
            })
            .clone()
    }

    /// Join and wait until the room has registered the member.
    /// Returns the room sender, or `None` if no room accepted the join.
    pub async fn join(
        &self,
        room_id: &RoomId,
        name: PeerName,
        connection_id: ConnectionId,
        output: impl Fn() -> Box<dyn MemberOutput>,
    ) -> Option<mpsc::Sender<RoomCommand>> {
        for _ in 0..JOIN_ATTEMPTS {
            let room = self.get_room_sender(room_id);
            let (joined, ack) = oneshot::channel();
            let cmd = RoomCommand::Join {
                name: name.clone(),
                connection_id,
                output: output(),
                joined,
            };
            if room.send(cmd).await.is_ok() && ack.await.is_ok() {
                return Some(room);
            }
            debug!("Room {} closed under join from {}, retrying", room_id, name);
            self.forget(room_id, &room);
        }
        warn!("No room {} accepted join from {}", room_id, name);
        None
    }

    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// `None` when the room does not exist (never created or already empty).
    pub async fn roster(&self, room_id: &RoomId) -> Option<Vec<PeerName>> {
        let sender = self.rooms.get(room_id).map(|s| s.clone())?;
        let (reply, rx) = oneshot::channel();
        sender.send(RoomCommand::Roster { reply }).await.ok()?;
        rx.await.ok()
    }

    fn forget(&self, room_id: &RoomId, room: &mpsc::Sender<RoomCommand>) {
        self.rooms
            .remove_if(room_id, |_, sender| sender.same_channel(room));
    }
}
