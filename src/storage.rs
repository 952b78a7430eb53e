use crate::leaderboard::{LeaderboardEntry, ScoreStore, MAX_ENTRIES};
use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Leaderboard kept as a pretty-printed JSON array on disk.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<LeaderboardEntry>> {
        let s = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        let entries = serde_json::from_str(&s)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(entries)
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&self) -> Vec<LeaderboardEntry> {
        match self.read() {
            Ok(entries) => {
                log::info!("loaded {} leaderboard entries", entries.len());
                entries
            }
            Err(e) => {
                log::debug!("starting with an empty leaderboard: {e:#}");
                Vec::new()
            }
        }
    }

    fn save(&self, entries: &[LeaderboardEntry]) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).ok();
        }
        let capped = &entries[..entries.len().min(MAX_ENTRIES)];
        let tmp = self.path.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(capped)?;
        fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
        atomic_rename(&tmp, &self.path)?;
        log::info!("saved {} leaderboard entries", capped.len());
        Ok(())
    }
}

pub fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    // rename-over-existing is not atomic on Windows; clear the target first
    if cfg!(windows) && to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to)
        .with_context(|| format!("renaming {} -> {}", from.display(), to.display()))?;
    Ok(())
}
