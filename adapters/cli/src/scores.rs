//! High scores kept in a small TOML table on disk.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use neon_arcade_engine::{HighScoreStore, MemoryScores};

/// Score table mirrored to a TOML file after every write.
#[derive(Debug)]
pub(crate) struct FileScores {
    path: PathBuf,
    table: MemoryScores,
}

impl FileScores {
    /// Opens the table at `path`, starting empty when the file does not exist.
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let entries = match fs::read_to_string(path) {
            Ok(source) => toml::from_str::<BTreeMap<String, u64>>(&source)
                .with_context(|| format!("failed to parse scores in {}", path.display()))?,
            Err(error) if error.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(error) => {
                return Err(error)
                    .with_context(|| format!("failed to read scores from {}", path.display()))
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            table: MemoryScores::with_entries(entries),
        })
    }
}

impl HighScoreStore for FileScores {
    type Error = anyhow::Error;

    fn load(&self, game: &str) -> Result<Option<u64>> {
        Ok(self.table.entries().get(game).copied())
    }

    fn store(&mut self, game: &str, score: u64) -> Result<()> {
        if let Err(never) = self.table.store(game, score) {
            match never {}
        }
        let source = toml::to_string(self.table.entries()).context("failed to encode scores")?;
        fs::write(&self.path, source)
            .with_context(|| format!("failed to write scores to {}", self.path.display()))
    }
}
