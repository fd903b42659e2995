use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::playback::shuffle::shuffle;
use crate::provider::PlaylistEntry;

/// A playlist in shuffled order with a cursor into it.
///
/// Sessions are values: every navigation returns a new `Session` sharing the
/// entry list, so the order and cursor are always swapped together.
#[derive(Debug, Clone)]
pub struct Session {
    playlist_id: String,
    entries: Arc<Vec<PlaylistEntry>>,
    by_id: Arc<HashMap<String, usize>>,
    order: Arc<Vec<String>>,
    cursor: usize,
}

impl Session {
    /// Start a session over `entries` in a fresh random order.
    pub fn shuffled(playlist_id: impl Into<String>, entries: Vec<PlaylistEntry>) -> Self {
        let ids: Vec<String> = entries.iter().map(|e| e.video_id.clone()).collect();
        let order = shuffle(&ids);
        Self::with_order(playlist_id, entries, order)
    }

    pub fn with_order(
        playlist_id: impl Into<String>,
        entries: Vec<PlaylistEntry>,
        order: Vec<String>,
    ) -> Self {
        // A repeated id resolves to its last occurrence
        let by_id: HashMap<String, usize> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.video_id.clone(), i))
            .collect();

        Self {
            playlist_id: playlist_id.into(),
            entries: Arc::new(entries),
            by_id: Arc::new(by_id),
            order: Arc::new(order),
            cursor: 0,
        }
    }

    pub fn playlist_id(&self) -> &str {
        &self.playlist_id
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn entry(&self, video_id: &str) -> Option<&PlaylistEntry> {
        self.by_id.get(video_id).map(|&i| &self.entries[i])
    }

    pub fn current_id(&self) -> Option<&str> {
        self.order.get(self.cursor).map(String::as_str)
    }

    pub fn current_entry(&self) -> Option<&PlaylistEntry> {
        self.current_id().and_then(|id| self.entry(id))
    }

    /// Entries in play order with their index in the order. Ids with no entry are skipped.
    pub fn ordered_entries(&self) -> impl Iterator<Item = (usize, &PlaylistEntry)> + '_ {
        self.order
            .iter()
            .enumerate()
            .filter_map(|(i, id)| self.entry(id).map(|e| (i, e)))
    }

    pub fn is_playable(&self, video_id: &str) -> bool {
        self.entry(video_id).is_some_and(|e| !e.is_unavailable())
    }

    fn at(&self, cursor: usize) -> Self {
        Self {
            cursor,
            ..self.clone()
        }
    }

    /// Next playable entry after the cursor. Stays put at the end of the order.
    pub fn next(&self) -> Self {
        let found = (self.cursor + 1..self.order.len()).find(|&i| self.is_playable(&self.order[i]));

        match found {
            Some(i) => self.at(i),
            None => self.clone(),
        }
    }

    /// Previous playable entry before the cursor, falling back to index 0 when it is playable.
    pub fn prev(&self) -> Self {
        let found = (0..self.cursor)
            .rev()
            .find(|&i| self.is_playable(&self.order[i]));

        match found {
            Some(i) => self.at(i),
            None if self.order.first().is_some_and(|id| self.is_playable(id)) => self.at(0),
            None => self.clone(),
        }
    }

    /// Jump to `video_id`, playable or not. Unknown ids leave the cursor alone.
    pub fn select(&self, video_id: &str) -> Self {
        match self.order.iter().position(|id| id == video_id) {
            Some(i) => self.at(i),
            None => self.clone(),
        }
    }

    /// New random order over the distinct ids of the playlist, starting from the top.
    pub fn reshuffle(&self) -> Self {
        let mut seen = HashSet::new();
        let unique: Vec<String> = self
            .entries
            .iter()
            .filter(|e| seen.insert(e.video_id.as_str()))
            .map(|e| e.video_id.clone())
            .collect();

        Self {
            order: Arc::new(shuffle(&unique)),
            cursor: 0,
            ..self.clone()
        }
    }
}
