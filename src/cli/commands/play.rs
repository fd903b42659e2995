use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::cli::commands::utils::create_provider;
use crate::playback::{MpvPlayer, VideoWidget};
use crate::provider::{embed_url, FetchError, PlaylistEntry, PlaylistSource};
use crate::state::{config::recent_path, Config, RecentStore};
use crate::tui::{App, LoadTicket, Screen, Tui};

/// Side effects a key press asks the event loop to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Submit,
    TogglePlayback,
    OpenInBrowser,
}

struct PendingLoad {
    ticket: LoadTicket,
    handle: JoinHandle<Result<Vec<PlaylistEntry>, FetchError>>,
}

/// The mpv process and the video it was last told to load.
struct PlayerSlot {
    player: Option<MpvPlayer>,
    loaded: Option<String>,
    audio_only: bool,
}

pub async fn run(input: Option<&str>, audio_only: bool, data_dir: &Path) -> Result<()> {
    let config = Config::resolve(data_dir)?;
    let provider = create_provider(&config);

    let mut app = App::new(RecentStore::open(recent_path(data_dir)));
    let mut pending: Option<PendingLoad> = None;
    let mut slot = PlayerSlot {
        player: None,
        loaded: None,
        audio_only: audio_only || config.audio_only,
    };

    if let Some(input) = input {
        app.input = input.to_string();
        if let Some(ticket) = app.submit() {
            pending = Some(start_load(ticket, &provider));
        }
    }

    let mut tui = Tui::new()?;

    loop {
        tui.draw(&app)?;

        if pending.as_ref().is_some_and(|p| p.handle.is_finished()) {
            if let Some(PendingLoad { ticket, handle }) = pending.take() {
                match handle.await {
                    Ok(result) => app.finish_load(ticket, result),
                    Err(e) => {
                        error!(error = %e, "Playlist load task failed");
                        app.cancel_load();
                        app.set_error(format!("Playlist load failed: {}", e));
                    }
                }
            }
        }

        if let Some(key) = tui.poll_key()? {
            match handle_key(&mut app, key) {
                Action::Quit => break,
                Action::Submit => {
                    if let Some(ticket) = app.submit() {
                        pending = Some(start_load(ticket, &provider));
                    }
                }
                Action::TogglePlayback => {
                    if let Some(player) = slot.player.as_mut() {
                        if let Err(e) = player.toggle(app.is_playing).await {
                            app.set_error(e.to_string());
                        }
                    }
                }
                Action::OpenInBrowser => open_in_browser(&mut app),
                Action::None => {}
            }
        }

        // A cancelled or superseded load keeps running; its result is simply never read
        if pending.is_some() && !app.is_loading() {
            debug!("Dropping abandoned playlist load");
            pending = None;
        }

        if let Some(player) = slot.player.as_mut() {
            while let Some(event) = player.try_recv_event() {
                app.on_widget_event(event);
            }
        }

        sync_player(&mut app, &mut slot).await;
    }

    tui.restore()?;
    if let Some(mut player) = slot.player.take() {
        player.teardown().await?;
    }
    Ok(())
}

fn start_load(ticket: LoadTicket, provider: &Arc<dyn PlaylistSource>) -> PendingLoad {
    let provider = Arc::clone(provider);
    let playlist_id = ticket.playlist_id.clone();
    let handle = tokio::spawn(async move { provider.fetch(&playlist_id).await });
    PendingLoad { ticket, handle }
}

/// Bring the player in line with the app: start it when a video should play,
/// load the current video when it changed, tear it down on the home screen.
async fn sync_player(app: &mut App, slot: &mut PlayerSlot) {
    let Some(video_id) = app.current_video_id().map(str::to_string) else {
        if let Some(mut player) = slot.player.take() {
            info!("Leaving player, stopping mpv");
            if let Err(e) = player.teardown().await {
                warn!(error = %e, "mpv teardown failed");
            }
        }
        slot.loaded = None;
        return;
    };

    if slot.player.is_none() {
        match MpvPlayer::spawn(slot.audio_only).await {
            Ok(player) => slot.player = Some(player),
            Err(e) => {
                error!(error = %e, "Could not start mpv");
                app.go_home();
                app.set_error(e.to_string());
                return;
            }
        }
    }

    if slot.loaded.as_deref() == Some(video_id.as_str()) {
        return;
    }

    if let Some(player) = slot.player.as_mut() {
        app.is_playing = false;
        if let Err(e) = player.load(&video_id).await {
            app.set_error(format!("Failed to load video: {}", e));
        }
        slot.loaded = Some(video_id);
    }
}

fn open_in_browser(app: &mut App) {
    let Some(video_id) = app.current_video_id() else {
        return;
    };

    let result = embed_url(video_id)
        .map_err(anyhow::Error::from)
        .and_then(|url| open::that(&url).map_err(anyhow::Error::from));

    if let Err(e) = result {
        app.set_error(format!("Failed to open browser: {}", e));
    }
}

/// Apply a key press to the app, returning what the loop still has to do.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    if matches!(app.screen, Screen::Home) {
        return handle_home_key(app, key.code);
    }

    app.clear_error();
    handle_player_key(app, key.code)
}

fn handle_home_key(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc if app.is_loading() => app.cancel_load(),
        KeyCode::Esc => return Action::Quit,
        KeyCode::Enter => return Action::Submit,
        KeyCode::Backspace => app.pop_char(),
        KeyCode::Up => app.select_prev(),
        KeyCode::Down => app.select_next(),
        KeyCode::Tab => app.use_selected_recent(),
        KeyCode::Delete => app.remove_selected_recent(),
        KeyCode::Char(c) => app.push_char(c),
        _ => {}
    }
    Action::None
}

fn handle_player_key(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char(' ') => return Action::TogglePlayback,
        KeyCode::Char('o') => return Action::OpenInBrowser,
        KeyCode::Char('n') => app.next(),
        KeyCode::Char('p') => app.prev(),
        KeyCode::Char('s') => app.reshuffle(),
        KeyCode::Up => app.select_prev(),
        KeyCode::Down => app.select_next(),
        KeyCode::Enter => app.select_highlighted(),
        KeyCode::Char('b') | KeyCode::Esc => app.go_home(),
        _ => {}
    }
    Action::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::Session;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn entry(id: &str, title: &str) -> PlaylistEntry {
        PlaylistEntry {
            video_id: id.to_string(),
            title: title.to_string(),
            channel_title: String::new(),
            thumbnail_url: String::new(),
            position: 0,
        }
    }

    fn player_app(temp: &TempDir) -> App {
        let mut app = App::new(RecentStore::open(temp.path().join("recent.yaml")));
        app.screen = Screen::Player(Session::with_order(
            "PL1234567890",
            vec![entry("A", "Song"), entry("B", "Deleted video"), entry("C", "Song2")],
            vec!["A".to_string(), "B".to_string(), "C".to_string()],
        ));
        app
    }

    #[test]
    fn test_typing_on_home() {
        let temp = TempDir::new().unwrap();
        let mut app = App::new(RecentStore::open(temp.path().join("recent.yaml")));

        for c in "PLx".chars() {
            assert_eq!(handle_key(&mut app, key(KeyCode::Char(c))), Action::None);
        }
        handle_key(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.input, "PL");

        // 'q' is text on the home screen
        handle_key(&mut app, key(KeyCode::Char('q')));
        assert_eq!(app.input, "PLq");

        assert_eq!(handle_key(&mut app, key(KeyCode::Enter)), Action::Submit);
        assert_eq!(handle_key(&mut app, key(KeyCode::Esc)), Action::Quit);
    }

    #[test]
    fn test_esc_cancels_load() {
        let temp = TempDir::new().unwrap();
        let mut app = App::new(RecentStore::open(temp.path().join("recent.yaml")));
        app.begin_load("PL1234567890").unwrap();

        assert_eq!(handle_key(&mut app, key(KeyCode::Esc)), Action::None);
        assert!(!app.is_loading());
    }

    #[test]
    fn test_ctrl_c_quits() {
        let temp = TempDir::new().unwrap();
        let mut app = App::new(RecentStore::open(temp.path().join("recent.yaml")));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(&mut app, ctrl_c), Action::Quit);
    }

    #[test]
    fn test_player_navigation_keys() {
        let temp = TempDir::new().unwrap();
        let mut app = player_app(&temp);

        handle_key(&mut app, key(KeyCode::Char('n')));
        assert_eq!(app.current_video_id(), Some("C"));

        handle_key(&mut app, key(KeyCode::Char('p')));
        assert_eq!(app.current_video_id(), Some("A"));

        handle_key(&mut app, key(KeyCode::Down));
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.current_video_id(), Some("B"));

        assert_eq!(
            handle_key(&mut app, key(KeyCode::Char(' '))),
            Action::TogglePlayback
        );
        assert_eq!(
            handle_key(&mut app, key(KeyCode::Char('o'))),
            Action::OpenInBrowser
        );
    }

    #[test]
    fn test_player_back_and_quit() {
        let temp = TempDir::new().unwrap();
        let mut app = player_app(&temp);
        app.set_error("stale".to_string());

        assert_eq!(handle_key(&mut app, key(KeyCode::Char('q'))), Action::Quit);
        assert!(app.error.is_none());

        handle_key(&mut app, key(KeyCode::Char('b')));
        assert!(matches!(app.screen, Screen::Home));
    }

    #[tokio::test]
    async fn test_sync_player_tears_down_on_home() {
        let temp = TempDir::new().unwrap();
        let mut app = App::new(RecentStore::open(temp.path().join("recent.yaml")));
        let mut slot = PlayerSlot {
            player: None,
            loaded: Some("A".to_string()),
            audio_only: true,
        };

        sync_player(&mut app, &mut slot).await;
        assert!(slot.player.is_none());
        assert!(slot.loaded.is_none());
    }
}
