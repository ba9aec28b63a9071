//! High-score persistence keyed by game name.

use std::{collections::BTreeMap, convert::Infallible};

/// Storage for one best score per game.
pub trait HighScoreStore {
    /// Failure raised by the backing storage.
    type Error;

    /// Best score recorded for `game`, if any.
    fn load(&self, game: &str) -> Result<Option<u64>, Self::Error>;

    /// Overwrites the best score recorded for `game`.
    fn store(&mut self, game: &str, score: u64) -> Result<(), Self::Error>;
}

/// Stores `score` when it beats the recorded best and reports whether it did.
pub fn record_high_score<S>(scores: &mut S, game: &str, score: u64) -> Result<bool, S::Error>
where
    S: HighScoreStore + ?Sized,
{
    let best = scores.load(game)?;
    if best.map_or(true, |best| score > best) {
        scores.store(game, score)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

/// In-memory score table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryScores {
    entries: BTreeMap<String, u64>,
}

impl MemoryScores {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table pre-filled with `entries`.
    #[must_use]
    pub fn with_entries(entries: BTreeMap<String, u64>) -> Self {
        Self { entries }
    }

    /// Recorded scores ordered by game name.
    #[must_use]
    pub fn entries(&self) -> &BTreeMap<String, u64> {
        &self.entries
    }
}

impl HighScoreStore for MemoryScores {
    type Error = Infallible;

    fn load(&self, game: &str) -> Result<Option<u64>, Self::Error> {
        Ok(self.entries.get(game).copied())
    }

    fn store(&mut self, game: &str, score: u64) -> Result<(), Self::Error> {
        let _ = self.entries.insert(game.to_owned(), score);
        Ok(())
    }
}
