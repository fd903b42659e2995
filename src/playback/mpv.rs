use serde::Deserialize;

use crate::playback::{PlaybackState, WidgetEventKind};

/// Observer id for the `pause` property
const PAUSE_OBSERVER: i64 = 1;

#[derive(Debug, Clone, Deserialize)]
pub struct MpvEvent {
    pub event: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    /// Set on `start-file` and `end-file`
    #[serde(default)]
    pub playlist_entry_id: Option<i64>,
}

impl MpvEvent {
    /// Translate an mpv IPC event into a widget event. Events that don't matter
    /// to playback (including `end-file` caused by replacing the file) map to `None`.
    pub fn widget_kind(&self) -> Option<WidgetEventKind> {
        match self.event.as_str() {
            "file-loaded" => Some(WidgetEventKind::Ready),
            "end-file" => match self.reason.as_deref() {
                Some("eof") => Some(WidgetEventKind::StateChanged(PlaybackState::Ended)),
                Some("error") => Some(WidgetEventKind::Error),
                _ => None,
            },
            "property-change"
                if self.id == Some(PAUSE_OBSERVER) || self.name.as_deref() == Some("pause") =>
            {
                let paused = self.data.as_ref()?.as_bool()?;
                Some(WidgetEventKind::StateChanged(if paused {
                    PlaybackState::Paused
                } else {
                    PlaybackState::Playing
                }))
            }
            _ => None,
        }
    }
}

/// Keeps file events of a replaced video from being blamed on the one loaded after it.
///
/// After a load, `file-loaded` and `end-file` are dropped until mpv reports
/// `start-file` for the new entry; from then on only events for that entry pass.
#[derive(Debug, Default)]
pub struct EntryTracker {
    awaiting_start: bool,
    entry: Option<i64>,
}

impl EntryTracker {
    pub fn loading(&mut self) {
        self.awaiting_start = true;
        self.entry = None;
    }

    pub fn accept(&mut self, event: &MpvEvent) -> Option<WidgetEventKind> {
        match event.event.as_str() {
            "start-file" => {
                self.awaiting_start = false;
                self.entry = event.playlist_entry_id;
                None
            }
            "file-loaded" | "end-file" => {
                if self.awaiting_start {
                    return None;
                }
                if let (Some(current), Some(id)) = (self.entry, event.playlist_entry_id) {
                    if current != id {
                        return None;
                    }
                }
                event.widget_kind()
            }
            _ => event.widget_kind(),
        }
    }
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

#[cfg(unix)]
mod unix {
    use super::{watch_url, EntryTracker, MpvEvent, PAUSE_OBSERVER};
    use crate::playback::{VideoWidget, WidgetEvent};
    use anyhow::{Context, Result};
    use async_trait::async_trait;
    use serde_json::json;
    use std::path::PathBuf;
    use std::process::{Child, Command, Stdio};
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
    use tokio::net::UnixStream;
    use tokio::sync::mpsc;
    use tracing::{debug, info, warn};

    pub struct MpvPlayer {
        socket_path: PathBuf,
        process: Child,
        writer: BufWriter<tokio::net::unix::OwnedWriteHalf>,
        event_rx: mpsc::Receiver<MpvEvent>,
        current: Option<String>,
        tracker: EntryTracker,
    }

    pub fn check_dependencies() -> Result<()> {
        if Command::new("mpv")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_err()
        {
            anyhow::bail!(
                "mpv not found. Install it:\n\n  \
                 Ubuntu/Debian: sudo apt install mpv\n  \
                 Arch:          sudo pacman -S mpv\n  \
                 Fedora:        sudo dnf install mpv\n  \
                 macOS:         brew install mpv\n"
            );
        }

        if Command::new("yt-dlp")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_err()
        {
            anyhow::bail!(
                "yt-dlp not found (mpv needs it to open YouTube links). Install it:\n\n  \
                 pip install yt-dlp\n  \
                 # or\n  \
                 pipx install yt-dlp\n"
            );
        }

        Ok(())
    }

    impl MpvPlayer {
        pub async fn spawn(audio_only: bool) -> Result<Self> {
            check_dependencies()?;

            let socket_path =
                std::env::temp_dir().join(format!("ytshuffle-mpv-{}.sock", std::process::id()));
            let _ = std::fs::remove_file(&socket_path);

            let mut args = vec![
                "--idle=yes".to_string(),
                "--ytdl=yes".to_string(),
                "--no-terminal".to_string(),
                "--really-quiet".to_string(),
                format!("--input-ipc-server={}", socket_path.display()),
            ];
            if audio_only {
                args.push("--no-video".to_string());
            } else {
                args.push("--force-window=yes".to_string());
            }

            let process = Command::new("mpv")
                .args(&args)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
                .context("Failed to spawn mpv")?;

            let mut connected = false;
            for _ in 0..50 {
                if socket_path.exists() {
                    connected = true;
                    break;
                }
                tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
            }

            if !connected {
                anyhow::bail!("mpv socket did not appear at {}", socket_path.display());
            }

            let stream = UnixStream::connect(&socket_path)
                .await
                .context("Failed to connect to mpv socket")?;

            let (reader, writer) = stream.into_split();
            let writer = BufWriter::new(writer);

            let (event_tx, event_rx) = mpsc::channel(32);
            tokio::spawn(Self::read_events(BufReader::new(reader), event_tx));

            info!(socket = %socket_path.display(), audio_only, "Started mpv");

            let mut player = Self {
                socket_path,
                process,
                writer,
                event_rx,
                current: None,
                tracker: EntryTracker::default(),
            };
            player
                .send_command(vec![
                    json!("observe_property"),
                    json!(PAUSE_OBSERVER),
                    json!("pause"),
                ])
                .await?;

            Ok(player)
        }

        async fn read_events(
            mut reader: BufReader<tokio::net::unix::OwnedReadHalf>,
            event_tx: mpsc::Sender<MpvEvent>,
        ) {
            let mut line = String::new();
            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => break,
                    Ok(_) => {
                        // Command replies carry no "event" field and are skipped here
                        if let Ok(event) = serde_json::from_str::<MpvEvent>(&line) {
                            if event_tx.send(event).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        debug!(error = %e, "mpv socket closed");
                        break;
                    }
                }
            }
        }

        async fn send_command(&mut self, cmd: Vec<serde_json::Value>) -> Result<()> {
            let msg = json!({ "command": cmd });
            let line = format!("{}\n", msg);
            self.writer.write_all(line.as_bytes()).await?;
            self.writer.flush().await?;
            Ok(())
        }

        async fn set_paused(&mut self, paused: bool) -> Result<()> {
            self.send_command(vec![json!("set_property"), json!("pause"), json!(paused)])
                .await
        }
    }

    #[async_trait]
    impl VideoWidget for MpvPlayer {
        async fn load(&mut self, video_id: &str) -> Result<()> {
            // Anything still queued belongs to the previous video
            while self.event_rx.try_recv().is_ok() {}

            debug!(video_id, "Loading video");
            self.current = Some(video_id.to_string());
            self.tracker.loading();
            self.send_command(vec![
                json!("loadfile"),
                json!(watch_url(video_id)),
                json!("replace"),
            ])
            .await?;
            self.set_paused(false).await
        }

        async fn play(&mut self) -> Result<()> {
            self.set_paused(false).await
        }

        async fn pause(&mut self) -> Result<()> {
            self.set_paused(true).await
        }

        fn try_recv_event(&mut self) -> Option<WidgetEvent> {
            loop {
                let event = self.event_rx.try_recv().ok()?;
                let Some(kind) = self.tracker.accept(&event) else {
                    continue;
                };
                let video_id = self.current.clone()?;
                return Some(WidgetEvent::new(video_id, kind));
            }
        }

        async fn teardown(&mut self) -> Result<()> {
            self.current = None;
            self.event_rx.close();
            if let Err(e) = self.send_command(vec![json!("quit")]).await {
                warn!(error = %e, "Failed to ask mpv to quit");
            }
            Ok(())
        }
    }

    impl Drop for MpvPlayer {
        fn drop(&mut self) {
            let _ = self.process.kill();
            let _ = self.process.wait();
            let _ = std::fs::remove_file(&self.socket_path);
        }
    }
}

#[cfg(unix)]
pub use unix::*;

#[cfg(not(unix))]
compile_error!("Playback is currently only supported on Unix systems (Linux/macOS).");

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> MpvEvent {
        serde_json::from_str(line).unwrap()
    }

    #[test]
    fn test_file_loaded_is_ready() {
        let event = parse(r#"{"event":"file-loaded"}"#);
        assert_eq!(event.widget_kind(), Some(WidgetEventKind::Ready));
    }

    #[test]
    fn test_end_file_reasons() {
        let eof = parse(r#"{"event":"end-file","reason":"eof","playlist_entry_id":1}"#);
        assert_eq!(
            eof.widget_kind(),
            Some(WidgetEventKind::StateChanged(PlaybackState::Ended))
        );

        let error = parse(r#"{"event":"end-file","reason":"error","file_error":"loading failed"}"#);
        assert_eq!(error.widget_kind(), Some(WidgetEventKind::Error));

        let replaced = parse(r#"{"event":"end-file","reason":"stop"}"#);
        assert_eq!(replaced.widget_kind(), None);
    }

    #[test]
    fn test_pause_property() {
        let paused = parse(r#"{"event":"property-change","id":1,"name":"pause","data":true}"#);
        assert_eq!(
            paused.widget_kind(),
            Some(WidgetEventKind::StateChanged(PlaybackState::Paused))
        );

        let playing = parse(r#"{"event":"property-change","id":1,"name":"pause","data":false}"#);
        assert_eq!(
            playing.widget_kind(),
            Some(WidgetEventKind::StateChanged(PlaybackState::Playing))
        );

        let unset = parse(r#"{"event":"property-change","id":1,"name":"pause"}"#);
        assert_eq!(unset.widget_kind(), None);
    }

    #[test]
    fn test_unrelated_events_are_ignored() {
        assert_eq!(parse(r#"{"event":"idle"}"#).widget_kind(), None);
        assert_eq!(
            parse(r#"{"event":"property-change","id":4,"name":"volume","data":50}"#).widget_kind(),
            None
        );
    }

    #[test]
    fn test_command_reply_is_not_an_event() {
        assert!(serde_json::from_str::<MpvEvent>(r#"{"error":"success","data":null}"#).is_err());
    }

    #[test]
    fn test_late_end_of_replaced_file_is_dropped() {
        let mut tracker = EntryTracker::default();
        tracker.accept(&parse(r#"{"event":"start-file","playlist_entry_id":1}"#));

        tracker.loading();
        // The old video hit eof just as the new one was requested
        let late = parse(r#"{"event":"end-file","reason":"eof","playlist_entry_id":1}"#);
        assert_eq!(tracker.accept(&late), None);

        assert_eq!(
            tracker.accept(&parse(r#"{"event":"start-file","playlist_entry_id":2}"#)),
            None
        );
        assert_eq!(
            tracker.accept(&parse(r#"{"event":"file-loaded"}"#)),
            Some(WidgetEventKind::Ready)
        );

        // Still tagged with the old entry after the new one started
        assert_eq!(tracker.accept(&late), None);

        let ended = parse(r#"{"event":"end-file","reason":"eof","playlist_entry_id":2}"#);
        assert_eq!(
            tracker.accept(&ended),
            Some(WidgetEventKind::StateChanged(PlaybackState::Ended))
        );
    }

    #[test]
    fn test_tracker_passes_events_without_entry_id() {
        let mut tracker = EntryTracker::default();
        tracker.loading();
        tracker.accept(&parse(r#"{"event":"start-file"}"#));

        let error = parse(r#"{"event":"end-file","reason":"error"}"#);
        assert_eq!(tracker.accept(&error), Some(WidgetEventKind::Error));
    }

    #[test]
    fn test_tracker_passes_pause_while_loading() {
        let mut tracker = EntryTracker::default();
        tracker.loading();
        let playing = parse(r#"{"event":"property-change","id":1,"name":"pause","data":false}"#);
        assert_eq!(
            tracker.accept(&playing),
            Some(WidgetEventKind::StateChanged(PlaybackState::Playing))
        );
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(watch_url("dQw4w9WgXcQ"), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }
}
