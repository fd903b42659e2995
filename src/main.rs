mod cli;
mod playback;
mod provider;
mod state;
mod tui;
mod utils;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (ignores if missing)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let data_dir = cli.data_dir;
    utils::logging::init(&data_dir, cli.verbose)?;

    match cli.command {
        Commands::Play {
            playlist,
            audio_only,
        } => {
            cli::commands::play::run(playlist.as_deref(), audio_only, &data_dir).await?;
        }
        Commands::List {
            playlist,
            no_shuffle,
        } => {
            cli::commands::list::run(&playlist, no_shuffle, &data_dir).await?;
        }
        Commands::Recent { command } => {
            cli::commands::recent::run(command, &data_dir)?;
        }
        Commands::Config {
            api_key,
            audio_only,
        } => {
            cli::commands::config::run(api_key, audio_only, &data_dir)?;
        }
    }

    Ok(())
}
