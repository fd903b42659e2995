use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

const MAX_RECENT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentEntry {
    /// What the user pasted
    pub input: String,
    /// Display name, defaults to the input
    pub name: String,
    pub last_used: DateTime<Utc>,
}

/// Recently used playlist inputs, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentList {
    #[serde(default)]
    pub entries: Vec<RecentEntry>,
}

impl RecentList {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read recent list from {:?}", path))?;
        serde_yaml::from_str(&content).with_context(|| "Failed to parse recent list YAML")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self).with_context(|| "Failed to serialize recent list")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        fs::write(path, yaml).with_context(|| format!("Failed to write recent list to {:?}", path))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RecentEntry> {
        self.entries.get(index)
    }

    /// Move `input` to the front, keeping its name if it was already known.
    pub fn touch(&mut self, input: &str) {
        let input = input.trim();
        if input.is_empty() {
            return;
        }

        let index = self.entries.iter().position(|e| e.input == input);
        let existing = index.map(|i| self.entries.remove(i));

        let mut entry = existing.unwrap_or_else(|| RecentEntry {
            input: input.to_string(),
            name: input.to_string(),
            last_used: Utc::now(),
        });
        entry.last_used = Utc::now();

        self.entries.insert(0, entry);
        self.entries.truncate(MAX_RECENT);
    }

    /// Returns false when `input` isn't in the list. A blank name keeps the old one.
    pub fn rename(&mut self, input: &str, name: &str) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.input == input.trim()) else {
            return false;
        };

        let name = name.trim();
        if !name.is_empty() {
            entry.name = name.to_string();
        }
        true
    }

    pub fn remove(&mut self, input: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.input != input.trim());
        self.entries.len() != before
    }
}

/// A recent list bound to its file. Persistence is best effort: failures are logged.
#[derive(Debug, Clone)]
pub struct RecentStore {
    path: PathBuf,
    list: RecentList,
}

impl RecentStore {
    pub fn open(path: PathBuf) -> Self {
        let list = RecentList::load(&path).unwrap_or_else(|e| {
            warn!(error = %e, path = %path.display(), "Ignoring unreadable recent list");
            RecentList::default()
        });
        Self { path, list }
    }

    pub fn list(&self) -> &RecentList {
        &self.list
    }

    pub fn touch(&mut self, input: &str) {
        self.list.touch(input);
        self.persist();
    }

    pub fn remove(&mut self, input: &str) -> bool {
        let removed = self.list.remove(input);
        if removed {
            self.persist();
        }
        removed
    }

    fn persist(&self) {
        if let Err(e) = self.list.save(&self.path) {
            warn!(error = %e, "Failed to save recent list");
        }
    }
}
