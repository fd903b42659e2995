use std::path::Path;

use anyhow::{bail, Result};

use crate::cli::RecentCommand;
use crate::state::{config::recent_path, RecentList};

pub fn run(command: RecentCommand, data_dir: &Path) -> Result<()> {
    let path = recent_path(data_dir);
    let mut recent = RecentList::load(&path)?;

    match command {
        RecentCommand::List => {
            if recent.is_empty() {
                println!("No recent playlists");
                return Ok(());
            }
            for entry in &recent.entries {
                let used = entry.last_used.format("%Y-%m-%d %H:%M");
                if entry.name == entry.input {
                    println!("{}  {}", used, entry.input);
                } else {
                    println!("{}  {} ({})", used, entry.name, entry.input);
                }
            }
        }
        RecentCommand::Rename { playlist, name } => {
            if !recent.rename(&playlist, &name) {
                bail!("'{}' is not in the recent list", playlist);
            }
            recent.save(&path)?;
            println!("Renamed");
        }
        RecentCommand::Remove { playlist } => {
            if !recent.remove(&playlist) {
                bail!("'{}' is not in the recent list", playlist);
            }
            recent.save(&path)?;
            println!("Removed '{}'", playlist);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_rename_and_remove() {
        let temp = TempDir::new().unwrap();
        let path = recent_path(temp.path());
        let mut list = RecentList::default();
        list.touch("PL1234567890");
        list.save(&path).unwrap();

        run(
            RecentCommand::Rename {
                playlist: "PL1234567890".to_string(),
                name: "Focus".to_string(),
            },
            temp.path(),
        )
        .unwrap();
        assert_eq!(RecentList::load(&path).unwrap().get(0).unwrap().name, "Focus");

        run(
            RecentCommand::Remove {
                playlist: "PL1234567890".to_string(),
            },
            temp.path(),
        )
        .unwrap();
        assert!(RecentList::load(&path).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_entry_fails() {
        let temp = TempDir::new().unwrap();
        let result = run(
            RecentCommand::Remove {
                playlist: "missing".to_string(),
            },
            temp.path(),
        );
        assert!(result.is_err());
    }
}
