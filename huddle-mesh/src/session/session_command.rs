use tokio::sync::oneshot;

/// Локальные команды, которые применяются в цикле сессии.
#[derive(Debug)]
pub enum SessionCommand {
    ToggleAudio(bool),
    ToggleVideo(bool),
    Teardown { done: oneshot::Sender<()> },
}
