use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::state::config::log_path;

/// Send tracing output to `<data_dir>/ytshuffle.log`. The terminal belongs to the TUI.
///
/// `RUST_LOG` wins over `verbose` when set.
pub fn init(data_dir: &Path, verbose: bool) -> Result<()> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

    let path = log_path(data_dir);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "ytshuffle=debug"
    } else {
        "ytshuffle=info"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "ytshuffle=info");
        assert_eq!(default_directive(true), "ytshuffle=debug");
    }
}
