use crate::playback::WidgetEvent;
use anyhow::Result;
use async_trait::async_trait;

/// An external video player driven by video id.
#[async_trait]
pub trait VideoWidget: Send {
    /// Load and start playing a video, replacing whatever was loaded
    async fn load(&mut self, video_id: &str) -> Result<()>;

    async fn play(&mut self) -> Result<()>;

    async fn pause(&mut self) -> Result<()>;

    async fn toggle(&mut self, playing: bool) -> Result<()> {
        if playing {
            self.pause().await
        } else {
            self.play().await
        }
    }

    /// Next pending event, if any
    fn try_recv_event(&mut self) -> Option<WidgetEvent>;

    /// Release the player. Events stop after this.
    async fn teardown(&mut self) -> Result<()>;
}
