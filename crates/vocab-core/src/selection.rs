//! Which words a study session or export works on, and in what order.

use rand::Rng;
use rand::seq::SliceRandom;
use time::Date;

/// Word set presented by a study session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudyMode {
    /// Every stored word.
    All,
    /// Words with strictly more retries than the threshold.
    RetryThreshold(u32),
    /// Words created during the current local day.
    Today,
}

/// Word set written by an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    /// Every stored word.
    All,
    /// Words with strictly more retries than the threshold.
    RetryThreshold(u32),
}

impl ExportMode {
    /// File name for an export produced on `date`.
    ///
    /// `words-MM-DD.csv` for a full export, `words-MM-DD-retry-N.csv` otherwise.
    #[must_use]
    pub fn file_name(self, date: Date) -> String {
        let month = u8::from(date.month());
        let day = date.day();
        match self {
            Self::All => format!("words-{month:02}-{day:02}.csv"),
            Self::RetryThreshold(n) => format!("words-{month:02}-{day:02}-retry-{n}.csv"),
        }
    }
}

/// Shuffle `items` in place so that every permutation is equally likely.
pub fn shuffle<T, R>(items: &mut [T], rng: &mut R)
where
    R: Rng + ?Sized,
{
    items.shuffle(rng);
}

/// Return `items` in a uniformly random order.
#[must_use]
pub fn shuffled<T, R>(mut items: Vec<T>, rng: &mut R) -> Vec<T>
where
    R: Rng + ?Sized,
{
    shuffle(&mut items, rng);
    items
}
