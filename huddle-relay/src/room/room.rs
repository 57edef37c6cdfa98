use crate::room::{MemberOutput, RoomCommand};
use huddle_core::{ConnectionId, PeerName, RoomId, SignalEvent};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

struct Member {
    name: PeerName,
    connection_id: ConnectionId,
    output: Box<dyn MemberOutput>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoomState {
    Open,
    Empty,
}

/// Актор комнаты: членство, рассылка `peer-joined`/`peer-left`, маршрутизация по `to`.
pub struct Room {
    id: RoomId,

    /// Участники в порядке входа.
    members: Vec<Member>,

    /// Канал для приема команд (извне).
    command_rx: mpsc::Receiver<RoomCommand>,
}

impl Room {
    pub fn new(id: RoomId, command_rx: mpsc::Receiver<RoomCommand>) -> Self {
        Self {
            id,
            members: Vec::new(),
            command_rx,
        }
    }

    /// Запуск главного цикла комнаты, запускать через tokio::spawn.
    /// Цикл завершается, когда комнату покидает последний участник.
    pub async fn run(mut self) {
        info!("Room {} event loop started", self.id);

        while let Some(cmd) = self.command_rx.recv().await {
            if self.handle_command(cmd) == RoomState::Empty {
                info!("Room {} is empty, closing", self.id);
                break;
            }
        }

        info!("Room {} event loop finished", self.id);
    }

    fn handle_command(&mut self, cmd: RoomCommand) -> RoomState {
        match cmd {
            RoomCommand::Join {
                name,
                connection_id,
                output,
                joined,
            } => {
                self.join(name, connection_id, output);
                let _ = joined.send(());
                RoomState::Open
            }

            RoomCommand::Relay {
                connection_id,
                event,
            } => {
                self.relay(connection_id, event);
                RoomState::Open
            }

            RoomCommand::Disconnect { connection_id } => self.disconnect(connection_id),

            RoomCommand::Roster { reply } => {
                let _ = reply.send(self.names());
                RoomState::Open
            }
        }
    }

    fn join(&mut self, name: PeerName, connection_id: ConnectionId, output: Box<dyn MemberOutput>) {
        info!("Processing join for {} in room {}", name, self.id);

        // Если имя уже занято (реконнект), старый сокет теряет членство
        if let Some(pos) = self.members.iter().position(|m| m.name == name) {
            let old = self.members.remove(pos);
            warn!(
                "{} re-joined room {} from a new connection, dropping {}",
                name, self.id, old.connection_id
            );
        }

        self.members.push(Member {
            name: name.clone(),
            connection_id,
            output,
        });

        let event = SignalEvent::PeerJoined {
            username: name,
            users: self.names(),
        };
        self.broadcast(&event);
    }

    fn relay(&mut self, connection_id: ConnectionId, event: SignalEvent) {
        let Some(sender) = self.member_by_connection(connection_id) else {
            warn!("Dropping {} from a connection that has not joined", event.name());
            return;
        };
        let Some((from, to)) = event.route() else {
            warn!("Dropping non-routable {} from {}", event.name(), sender.name);
            return;
        };
        if from != &sender.name {
            warn!(
                "Dropping {} from {} claiming to be {}",
                event.name(),
                sender.name,
                from
            );
            return;
        }

        let Some(target) = self.members.iter().find(|m| &m.name == to) else {
            warn!("Dropping {} for unknown recipient {}", event.name(), to);
            return;
        };
        debug!("Relaying {} {} -> {}", event.name(), from, to);
        if !target.output.send(&event) {
            warn!("Recipient {} is gone", to);
        }
    }

    fn disconnect(&mut self, connection_id: ConnectionId) -> RoomState {
        let Some(pos) = self
            .members
            .iter()
            .position(|m| m.connection_id == connection_id)
        else {
            debug!("Disconnect from {} without membership", connection_id);
            return RoomState::Open;
        };

        let member = self.members.remove(pos);
        info!("{} left room {}", member.name, self.id);
        self.broadcast(&SignalEvent::PeerLeft {
            username: member.name,
        });

        if self.members.is_empty() {
            RoomState::Empty
        } else {
            RoomState::Open
        }
    }

    fn broadcast(&self, event: &SignalEvent) {
        for member in &self.members {
            if !member.output.send(event) {
                debug!("Skipping {} for closed member {}", event.name(), member.name);
            }
        }
    }

    fn member_by_connection(&self, connection_id: ConnectionId) -> Option<&Member> {
        self.members
            .iter()
            .find(|m| m.connection_id == connection_id)
    }

    fn names(&self) -> Vec<PeerName> {
        self.members.iter().map(|m| m.name.clone()).collect()
    }
}
