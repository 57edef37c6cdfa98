use crate::room::MemberOutput;
use huddle_core::{ConnectionId, PeerName, SignalEvent};
use tokio::sync::oneshot;

/// Команды, поступающие в комнату от сигнального сервера (WebSocket/HTTP).
pub enum RoomCommand {
    /// Сокет прислал `join`. Имя, уже занятое другим сокетом, переходит к новому.
    Join {
        name: PeerName,
        connection_id: ConnectionId,
        output: Box<dyn MemberOutput>,
        /// Закрывается без ответа, если комната завершилась раньше, чем обработала join.
        joined: oneshot::Sender<()>,
    },

    /// `offer` / `answer` / `candidate` от участника, пересылается по полю `to`.
    Relay {
        connection_id: ConnectionId,
        event: SignalEvent,
    },

    /// Сокет закрылся или прислал `leave`.
    Disconnect { connection_id: ConnectionId },

    /// Текущий состав комнаты в порядке входа.
    Roster { reply: oneshot::Sender<Vec<PeerName>> },
}

impl std::fmt::Debug for RoomCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomCommand::Join {
                name,
                connection_id,
                ..
            } => f
                .debug_struct("Join")
                .field("name", name)
                .field("connection_id", connection_id)
                .finish(),
            RoomCommand::Relay {
                connection_id,
                event,
            } => f
                .debug_struct("Relay")
                .field("connection_id", connection_id)
                .field("event", &event.name())
                .finish(),
            RoomCommand::Disconnect { connection_id } => f
                .debug_struct("Disconnect")
                .field("connection_id", connection_id)
                .finish(),
            RoomCommand::Roster { .. } => f.write_str("Roster"),
        }
    }
}
