use std::path::Path;

use anyhow::Result;

use crate::state::{config::config_path, Config};

pub fn run(api_key: Option<String>, audio_only: Option<bool>, data_dir: &Path) -> Result<()> {
    let path = config_path(data_dir);
    let mut config = if path.exists() {
        Config::load(&path)?
    } else {
        Config::default()
    };

    if let Some(key) = api_key {
        let key = key.trim().to_string();
        config.api_key = if key.is_empty() { None } else { Some(key) };
    }
    if let Some(audio_only) = audio_only {
        config.audio_only = audio_only;
    }

    config.save(&path)?;
    println!("Saved {}", path.display());
    println!(
        "  api key:    {}",
        if config.api_key.is_some() { "set" } else { "not set" }
    );
    println!("  api base:   {}", config.api_base);
    println!("  audio only: {}", config.audio_only);

    Ok(())
}
