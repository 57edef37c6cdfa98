use crate::error::MeshError;
use crate::session::{MeshNegotiator, SessionCommand};
use tracing::{info, warn};

impl MeshNegotiator {
    /// Главный цикл сессии. Запускать после `initialize`, обычно через `tokio::spawn`.
    /// Завершается по teardown или при потере сигнального канала.
    pub async fn run(mut self) -> Result<(), MeshError> {
        let Some(mut signals) = self.signals.take() else {
            return Err(MeshError::InvalidState(
                "run requires an initialized session".to_owned(),
            ));
        };
        info!("Session event loop started");

        while let Some(event) = self.backlog.pop_front() {
            if let Err(e) = self.handle_signal(event).await {
                return Err(self.fail(e).await);
            }
        }

        let result = loop {
            tokio::select! {
                signal = signals.recv() => {
                    match signal {
                        Some(event) => {
                            if let Err(e) = self.handle_signal(event).await {
                                break Err(self.fail(e).await);
                            }
                        }
                        None => {
                            warn!("Signaling channel closed, ending session");
                            break Err(self.fail(MeshError::ChannelClosed).await);
                        }
                    }
                }

                evt = self.transport_rx.recv() => {
                    let Some(evt) = evt else {
                        break Ok(());
                    };
                    if let Err(e) = self.handle_transport_event(evt).await {
                        break Err(self.fail(e).await);
                    }
                }

                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(SessionCommand::ToggleAudio(enabled)) => self.toggle_local_audio(enabled),
                        Some(SessionCommand::ToggleVideo(enabled)) => self.toggle_local_video(enabled),
                        Some(SessionCommand::Teardown { done }) => {
                            self.teardown().await;
                            let _ = done.send(());
                            break Ok(());
                        }
                        None => break Ok(()),
                    }
                }
            }
        };

        info!("Session event loop finished");
        result
    }
}
