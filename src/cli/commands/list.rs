use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::cli::commands::utils::create_provider;
use crate::playback::shuffle;
use crate::provider::{parse_playlist_id, PlaylistEntry};
use crate::state::{config::recent_path, Config, RecentStore};
use crate::tui::{EMPTY_PLAYLIST, INVALID_INPUT};

pub async fn run(input: &str, no_shuffle: bool, data_dir: &Path) -> Result<()> {
    let playlist_id = parse_playlist_id(input).context(INVALID_INPUT)?;

    let config = Config::resolve(data_dir)?;
    let provider = create_provider(&config);
    let entries = provider.fetch(&playlist_id).await?;

    if entries.is_empty() {
        bail!(EMPTY_PLAYLIST);
    }

    RecentStore::open(recent_path(data_dir)).touch(input);

    let entries = if no_shuffle { entries } else { shuffle(&entries) };

    println!("\nPlaylist: {}", playlist_id);
    println!("Videos: {}\n", entries.len());

    for (i, entry) in entries.iter().enumerate() {
        println!("{}", format_entry(i, entry));
    }

    let unavailable = entries.iter().filter(|e| e.is_unavailable()).count();
    if unavailable > 0 {
        println!("\n{} unavailable video(s) will be skipped", unavailable);
    }

    Ok(())
}

fn format_entry(index: usize, entry: &PlaylistEntry) -> String {
    let marker = if entry.is_unavailable() { "✗" } else { " " };
    if entry.channel_title.is_empty() {
        format!("{} {:>3}. {} [{}]", marker, index + 1, entry.title, entry.video_id)
    } else {
        format!(
            "{} {:>3}. {} - {} [{}]",
            marker,
            index + 1,
            entry.title,
            entry.channel_title,
            entry.video_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, channel: &str) -> PlaylistEntry {
        PlaylistEntry {
            video_id: "dQw4w9WgXcQ".to_string(),
            title: title.to_string(),
            channel_title: channel.to_string(),
            thumbnail_url: String::new(),
            position: 0,
        }
    }

    #[test]
    fn test_format_entry() {
        assert_eq!(
            format_entry(0, &entry("Song", "Artist")),
            "    1. Song - Artist [dQw4w9WgXcQ]"
        );
        assert_eq!(
            format_entry(11, &entry("Private video", "")),
            "✗  12. Private video [dQw4w9WgXcQ]"
        );
    }
}
