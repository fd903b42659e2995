pub mod events;
pub mod mpv;
pub mod session;
pub mod shuffle;
pub mod widget;

pub use events::{PlaybackState, WidgetEvent, WidgetEventKind};
pub use mpv::MpvPlayer;
pub use session::Session;
pub use shuffle::shuffle;
pub use widget::VideoWidget;
