use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ytshuffle - Play a YouTube playlist in random order
///
/// Paste a playlist link, get its videos in a fair random order and
/// watch them one after another in mpv, skipping private and deleted videos.
#[derive(Parser, Debug)]
#[command(name = "ytshuffle")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Where config, recent playlists and logs live
    #[arg(short, long, global = true, default_value = ".ytshuffle")]
    pub data_dir: PathBuf,

    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the player, optionally starting with a playlist
    Play {
        /// Playlist URL or ID (e.g., https://www.youtube.com/playlist?list=PL... or PL...)
        playlist: Option<String>,
        /// Play sound only, no video window
        #[arg(long)]
        audio_only: bool,
    },
    /// Print the videos of a playlist in shuffled order
    List {
        /// Playlist URL or ID
        playlist: String,
        /// Keep the playlist order
        #[arg(long)]
        no_shuffle: bool,
    },
    /// Manage recently used playlists
    Recent {
        #[command(subcommand)]
        command: RecentCommand,
    },
    /// Write settings to config.toml
    Config {
        /// YouTube Data API key
        #[arg(long)]
        api_key: Option<String>,
        /// Play sound only by default
        #[arg(long)]
        audio_only: Option<bool>,
    },
}

#[derive(Subcommand, Debug)]
pub enum RecentCommand {
    /// Show recently used playlists
    List,
    /// Give a recent playlist a display name
    Rename {
        /// The playlist input as it was entered
        playlist: String,
        /// New display name
        name: String,
    },
    /// Forget a recent playlist
    Remove {
        /// The playlist input as it was entered
        playlist: String,
    },
}
