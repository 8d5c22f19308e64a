//! Storage seam consumed by [`WordService`](crate::service::WordService).

use vocab_core::{WordEntry, WordId};
use vocab_store_sqlite::{SqliteStore, StoreError};

use crate::error::WordError;

/// Minimal storage abstraction required by the word service.
pub trait WordStore {
    /// Error type bubbled up from the backing store.
    type Error: Into<WordError>;

    /// Persist a new entry.
    ///
    /// # Errors
    /// Returns a store-specific error when the id already exists or the write fails.
    fn insert(&self, entry: &WordEntry) -> Result<(), Self::Error>;

    /// Every stored entry.
    ///
    /// # Errors
    /// Returns a store-specific error when the entries cannot be read.
    fn get_all(&self) -> Result<Vec<WordEntry>, Self::Error>;

    /// First entry whose word equals `word`.
    ///
    /// # Errors
    /// Returns a store-specific error when nothing matches or the read fails.
    fn get_by_name(&self, word: &str) -> Result<WordEntry, Self::Error>;

    /// Entries with strictly more retries than `threshold`.
    ///
    /// # Errors
    /// Returns a store-specific error when the entries cannot be read.
    fn get_by_min_retries(&self, threshold: u32) -> Result<Vec<WordEntry>, Self::Error>;

    /// Entries created during the current local day.
    ///
    /// # Errors
    /// Returns a store-specific error when the entries cannot be read.
    fn get_created_today(&self) -> Result<Vec<WordEntry>, Self::Error>;

    /// Overwrite the first entry matching `original_word`.
    ///
    /// # Errors
    /// Returns a store-specific error when nothing matches or the write fails.
    fn update(&self, original_word: &str, new_word: Option<&str>, meaning: &str) -> Result<(), Self::Error>;

    /// Add one to the retry counter of the entry with `id`.
    ///
    /// # Errors
    /// Returns a store-specific error when the id is unknown or the write fails.
    fn increment_retry(&self, id: WordId) -> Result<(), Self::Error>;
}

impl WordStore for SqliteStore {
    type Error = StoreError;

    fn insert(&self, entry: &WordEntry) -> Result<(), Self::Error> {
        Self::insert(self, entry)
    }

    fn get_all(&self) -> Result<Vec<WordEntry>, Self::Error> {
        Self::get_all(self)
    }

    fn get_by_name(&self, word: &str) -> Result<WordEntry, Self::Error> {
        Self::get_by_name(self, word)
    }

    fn get_by_min_retries(&self, threshold: u32) -> Result<Vec<WordEntry>, Self::Error> {
        Self::get_by_min_retries(self, threshold)
    }

    fn get_created_today(&self) -> Result<Vec<WordEntry>, Self::Error> {
        Self::get_created_today(self)
    }

    fn update(&self, original_word: &str, new_word: Option<&str>, meaning: &str) -> Result<(), Self::Error> {
        Self::update(self, original_word, new_word, meaning)
    }

    fn increment_retry(&self, id: WordId) -> Result<(), Self::Error> {
        Self::increment_retry(self, id)
    }
}

impl<S> WordStore for &S
where
    S: WordStore + ?Sized,
{
    type Error = S::Error;

    fn insert(&self, entry: &WordEntry) -> Result<(), Self::Error> {
        (*self).insert(entry)
    }

    fn get_all(&self) -> Result<Vec<WordEntry>, Self::Error> {
        (*self).get_all()
    }

    fn get_by_name(&self, word: &str) -> Result<WordEntry, Self::Error> {
        (*self).get_by_name(word)
    }

    fn get_by_min_retries(&self, threshold: u32) -> Result<Vec<WordEntry>, Self::Error> {
        (*self).get_by_min_retries(threshold)
    }

    fn get_created_today(&self) -> Result<Vec<WordEntry>, Self::Error> {
        (*self).get_created_today()
    }

    fn update(&self, original_word: &str, new_word: Option<&str>, meaning: &str) -> Result<(), Self::Error> {
        (*self).update(original_word, new_word, meaning)
    }

    fn increment_retry(&self, id: WordId) -> Result<(), Self::Error> {
        (*self).increment_retry(id)
    }
}
