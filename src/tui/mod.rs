mod app;
mod ui;

pub use app::{App, LoadTicket, Screen, EMPTY_PLAYLIST, INVALID_INPUT};
pub use ui::Tui;
