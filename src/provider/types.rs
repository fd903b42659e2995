use serde::{Deserialize, Serialize};

/// One video of a fetched playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub video_id: String,
    pub title: String,
    pub channel_title: String,
    pub thumbnail_url: String,
    pub position: u64,
}

const UNAVAILABLE_TITLES: [&str; 2] = ["private video", "deleted video"];

impl PlaylistEntry {
    /// YouTube keeps removed and private videos in playlists under a placeholder title.
    pub fn is_unavailable(&self) -> bool {
        let title = self.title.trim().to_lowercase();
        UNAVAILABLE_TITLES.iter().any(|t| title.contains(t))
    }
}
