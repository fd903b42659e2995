/// Player state reported by the video widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Paused,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetEventKind {
    Ready,
    StateChanged(PlaybackState),
    Error,
}

/// Event emitted by a widget, stamped with the video id it was playing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetEvent {
    pub video_id: String,
    pub kind: WidgetEventKind,
}

impl WidgetEvent {
    pub fn new(video_id: impl Into<String>, kind: WidgetEventKind) -> Self {
        Self {
            video_id: video_id.into(),
            kind,
        }
    }

    /// The current video is over, either finished or failed to play
    pub fn is_finished(&self) -> bool {
        matches!(
            self.kind,
            WidgetEventKind::StateChanged(PlaybackState::Ended) | WidgetEventKind::Error
        )
    }
}
