use crate::id::WordId;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A stored word together with its meaning and review bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    /// Stable identifier assigned at creation.
    pub id: WordId,
    /// The term being studied.
    pub word: String,
    /// Free-text definition.
    pub meaning: String,
    /// How many times the word was marked as not known.
    pub retries: u32,
    /// Creation time (UTC).
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Last edit or retry increment (UTC).
    #[serde(with = "time::serde::rfc3339")]
    pub last_modified_at: OffsetDateTime,
}

impl WordEntry {
    /// Build a fresh entry with a new id, zero retries and both timestamps set to `now`.
    #[must_use]
    pub fn new(word: impl Into<String>, meaning: impl Into<String>, now: OffsetDateTime) -> Self {
        Self {
            id: WordId::new(),
            word: word.into(),
            meaning: meaning.into(),
            retries: 0,
            created_at: now,
            last_modified_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn new_entry_starts_without_retries() {
        let now = datetime!(2024-05-01 08:00 UTC);
        let entry = WordEntry::new("ephemeral", "short-lived", now);
        assert_eq!(entry.word, "ephemeral");
        assert_eq!(entry.meaning, "short-lived");
        assert_eq!(entry.retries, 0);
        assert_eq!(entry.created_at, now);
        assert_eq!(entry.last_modified_at, now);
    }

    #[test]
    fn entries_get_distinct_ids() {
        let now = datetime!(2024-05-01 08:00 UTC);
        let a = WordEntry::new("a", "1", now);
        let b = WordEntry::new("a", "1", now);
        assert_ne!(a.id, b.id);
    }
}
