use crate::error::MeshError;
use crate::media::LocalMediaState;
use crate::registry::PeerRegistry;
use crate::session::SessionCommand;
use tokio::sync::{mpsc, oneshot, watch};

/// Handle for the UI side of a running session.
#[derive(Clone)]
pub struct MeshHandle {
    commands: mpsc::Sender<SessionCommand>,
    registry: PeerRegistry,
    local_media: watch::Receiver<Option<LocalMediaState>>,
}

impl MeshHandle {
    pub(crate) fn new(
        commands: mpsc::Sender<SessionCommand>,
        registry: PeerRegistry,
        local_media: watch::Receiver<Option<LocalMediaState>>,
    ) -> Self {
        Self {
            commands,
            registry,
            local_media,
        }
    }

    pub async fn toggle_local_audio(&self, enabled: bool) -> Result<(), MeshError> {
        self.command(SessionCommand::ToggleAudio(enabled)).await
    }

    pub async fn toggle_local_video(&self, enabled: bool) -> Result<(), MeshError> {
        self.command(SessionCommand::ToggleVideo(enabled)).await
    }

    /// Waits until the session has closed everything. Does nothing if it already ended.
    pub async fn teardown(&self) {
        let (done, finished) = oneshot::channel();
        if self
            .commands
            .send(SessionCommand::Teardown { done })
            .await
            .is_err()
        {
            return;
        }
        let _ = finished.await;
    }

    pub fn registry(&self) -> &PeerRegistry {
        &self.registry
    }

    pub fn local_media(&self) -> Option<LocalMediaState> {
        self.local_media.borrow().clone()
    }

    async fn command(&self, command: SessionCommand) -> Result<(), MeshError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| MeshError::InvalidState("session has ended".to_owned()))
    }
}
