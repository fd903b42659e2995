use tracing::{debug, info};

use crate::playback::{PlaybackState, Session, WidgetEvent, WidgetEventKind};
use crate::provider::{parse_playlist_id, FetchError, PlaylistEntry};
use crate::state::{RecentList, RecentStore};

pub const INVALID_INPUT: &str = "Invalid URL: paste a YouTube playlist link (list=... parameter).";
pub const EMPTY_PLAYLIST: &str = "Playlist is empty or not accessible (private or not found).";

pub enum Screen {
    Home,
    Player(Session),
}

/// A fetch started by [`App::begin_load`]. Only the latest ticket is honored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    pub playlist_id: String,
}

pub struct App {
    pub screen: Screen,
    pub input: String,
    pub error: Option<String>,
    pub is_playing: bool,
    pub selected_index: usize, // recent list on home, play order in the player
    pub recent: RecentStore,
    pending: Option<u64>,
    generation: u64,
}

impl App {
    pub fn new(recent: RecentStore) -> Self {
        Self {
            screen: Screen::Home,
            input: String::new(),
            error: None,
            is_playing: false,
            selected_index: 0,
            recent,
            pending: None,
            generation: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.screen {
            Screen::Player(session) => Some(session),
            Screen::Home => None,
        }
    }

    pub fn current_video_id(&self) -> Option<&str> {
        self.session().and_then(Session::current_id)
    }

    pub fn current_entry(&self) -> Option<&PlaylistEntry> {
        self.session().and_then(Session::current_entry)
    }

    pub fn recent_list(&self) -> &RecentList {
        self.recent.list()
    }

    pub fn set_error(&mut self, msg: String) {
        self.error = Some(msg);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Submit the home screen input.
    pub fn submit(&mut self) -> Option<LoadTicket> {
        let input = self.input.clone();
        self.begin_load(&input)
    }

    /// Validate `input` and start a load. Returns `None` when nothing should be fetched.
    pub fn begin_load(&mut self, input: &str) -> Option<LoadTicket> {
        if self.is_loading() {
            return None;
        }

        self.clear_error();
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        self.recent.touch(input);

        let Some(playlist_id) = parse_playlist_id(input) else {
            self.set_error(INVALID_INPUT.to_string());
            return None;
        };

        self.generation += 1;
        self.pending = Some(self.generation);
        info!(playlist_id = %playlist_id, "Loading playlist");

        Some(LoadTicket {
            generation: self.generation,
            playlist_id,
        })
    }

    /// Apply the outcome of a fetch. Results of cancelled or superseded loads are dropped.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<PlaylistEntry>, FetchError>,
    ) {
        if self.pending != Some(ticket.generation) {
            debug!(playlist_id = %ticket.playlist_id, "Discarding stale playlist load");
            return;
        }
        self.pending = None;

        match result {
            Err(e) => {
                info!(error = %e, "Playlist load failed");
                self.set_error(e.to_string());
            }
            Ok(entries) if entries.is_empty() => {
                self.set_error(EMPTY_PLAYLIST.to_string());
            }
            Ok(entries) => {
                let session = Session::shuffled(ticket.playlist_id, entries);
                info!(entries = session.len(), "Playlist shuffled");
                self.input.clear();
                self.is_playing = false;
                self.selected_index = 0;
                self.screen = Screen::Player(session);
            }
        }
    }

    pub fn cancel_load(&mut self) {
        self.pending = None;
    }

    pub fn go_home(&mut self) {
        self.clear_error();
        self.pending = None;
        self.is_playing = false;
        self.selected_index = 0;
        self.screen = Screen::Home;
    }

    fn replace_session(&mut self, op: impl FnOnce(&Session) -> Session) {
        if let Screen::Player(session) = &self.screen {
            let next = op(session);
            self.selected_index = next.cursor();
            self.screen = Screen::Player(next);
        }
    }

    pub fn next(&mut self) {
        self.replace_session(Session::next);
    }

    pub fn prev(&mut self) {
        self.replace_session(Session::prev);
    }

    pub fn reshuffle(&mut self) {
        self.replace_session(Session::reshuffle);
    }

    pub fn select_by_id(&mut self, video_id: &str) {
        self.replace_session(|session| session.select(video_id));
    }

    /// Play the highlighted entry of the player list.
    pub fn select_highlighted(&mut self) {
        let Some(id) = self
            .session()
            .and_then(|s| s.order().get(self.selected_index))
            .cloned()
        else {
            return;
        };
        self.select_by_id(&id);
    }

    /// React to the video widget. End and error events for the current video advance
    /// the session once and never surface as an error.
    pub fn on_widget_event(&mut self, event: WidgetEvent) {
        if self.current_video_id() != Some(event.video_id.as_str()) {
            debug!(video_id = %event.video_id, kind = ?event.kind, "Ignoring stale widget event");
            return;
        }

        if event.is_finished() {
            if event.kind == WidgetEventKind::Error {
                info!(video_id = %event.video_id, "Video failed to play, skipping");
            }
            self.next();
            return;
        }

        self.is_playing = event.kind != WidgetEventKind::StateChanged(PlaybackState::Paused);
    }

    fn list_len(&self) -> usize {
        match &self.screen {
            Screen::Home => self.recent.list().len(),
            Screen::Player(session) => session.len(),
        }
    }

    pub fn select_next(&mut self) {
        if self.selected_index < self.list_len().saturating_sub(1) {
            self.selected_index += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    /// Copy the highlighted recent entry into the input.
    pub fn use_selected_recent(&mut self) {
        if let Some(entry) = self.recent.list().get(self.selected_index) {
            self.input = entry.input.clone();
        }
    }

    pub fn remove_selected_recent(&mut self) {
        let Some(input) = self
            .recent
            .list()
            .get(self.selected_index)
            .map(|e| e.input.clone())
        else {
            return;
        };
        self.recent.remove(&input);
        self.selected_index = self
            .selected_index
            .min(self.recent.list().len().saturating_sub(1));
    }
}
