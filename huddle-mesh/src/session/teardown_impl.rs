use crate::error::MeshError;
use crate::session::{MeshNegotiator, SessionLifecycle};
use tracing::{debug, error, info};

impl MeshNegotiator {
    /// Закрывает всё: локальные треки, все соединения, реестр, сигнальный канал.
    /// Повторный вызов ничего не делает.
    pub async fn teardown(&mut self) {
        if self.lifecycle == SessionLifecycle::TornDown {
            debug!("Session already torn down");
            return;
        }
        self.lifecycle = SessionLifecycle::TornDown;

        if let Some(media) = self.local_media() {
            media.stop_all();
        }

        let closed = self.peers.len();
        for (_, mut negotiator) in self.peers.drain() {
            negotiator.close().await;
        }
        self.registry.clear();

        if let Some(channel) = self.channel.take() {
            channel.close().await;
        }
        self.signals = None;
        self.backlog.clear();

        info!("Session torn down, {} connections closed", closed);
    }

    /// Фатальная ошибка: teardown, затем `on_error`.
    pub(crate) async fn fail(&mut self, err: MeshError) -> MeshError {
        error!("Session failed: {}", err);
        self.teardown().await;
        if let Some(callback) = &self.on_error {
            callback(&err);
        }
        err
    }
}
