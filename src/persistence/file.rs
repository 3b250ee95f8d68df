//! JSON files on disk

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{GameStats, ScoreStore};
use crate::error::Result;
use crate::sim::GameState;

/// Write JSON next to the destination, then rename over it
fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let json = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&json)?))
}

/// Stats stored as a single JSON file
#[derive(Debug, Clone)]
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
}

impl ScoreStore for JsonFileStore {
    fn load(&self) -> Result<GameStats> {
        Ok(read_json(&self.path)?.unwrap_or_default())
    }

    fn save(&mut self, stats: &GameStats) -> Result<()> {
        write_json_atomic(&self.path, stats)?;
        log::info!("Stats saved to {}", self.path.display());
        Ok(())
    }
}

/// Save an in-progress round for Continue
pub fn save_snapshot(path: impl AsRef<Path>, state: &GameState) -> Result<()> {
    write_json_atomic(path.as_ref(), state)?;
    log::info!("Round snapshot saved (tick {})", state.time_ticks);
    Ok(())
}

/// Load a saved round, if one exists
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Option<GameState>> {
    let state: Option<GameState> = read_json(path.as_ref())?;
    if let Some(state) = &state {
        log::info!("Round snapshot loaded (tick {})", state.time_ticks);
    }
    Ok(state)
}
