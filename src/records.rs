//! Persisted economy: gold balance and best score

use crate::persistence::{GOLD_KEY, HIGH_SCORE_KEY, Storage};

/// Values that survive across sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Records {
    pub gold: u64,
    pub high_score: u64,
}

impl Records {
    /// Load from storage (missing keys read as zero)
    pub fn load(storage: &impl Storage) -> Self {
        let records = Self {
            gold: storage.read_int(GOLD_KEY, 0),
            high_score: storage.read_int(HIGH_SCORE_KEY, 0),
        };
        log::info!(
            "Loaded records: {} gold, high score {}",
            records.gold,
            records.high_score
        );
        records
    }

    /// Write only the values that differ from `self`, then adopt `current`
    pub fn sync(&mut self, current: Records, storage: &mut impl Storage) {
        if current.gold != self.gold {
            storage.write_int(GOLD_KEY, current.gold);
        }
        if current.high_score != self.high_score {
            storage.write_int(HIGH_SCORE_KEY, current.high_score);
            log::info!("New high score saved: {}", current.high_score);
        }
        *self = current;
    }
}
