use rand::Rng;
use std::path::{Path, PathBuf};
use time::Date;
use tracing::debug;
use vocab_core::{ExportMode, StudyMode, WordEntry, WordId, shuffled, timestamp};

use crate::error::WordError;
use crate::export;
use crate::store::WordStore;

/// Result alias for service operations.
pub type Result<T> = std::result::Result<T, WordError>;

/// Service façade translating user intents into store calls.
pub struct WordService<S> {
    store: S,
}

impl<S> WordService<S> {
    /// Wrap an owned (or borrowed) store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }
}

impl<S: WordStore> WordService<S> {
    /// Store a new word with a fresh id and current timestamps.
    ///
    /// # Errors
    /// Returns [`WordError::Validation`] for a blank word or meaning, otherwise any store failure.
    pub fn store_word(&self, word: &str, meaning: &str) -> Result<WordEntry> {
        require("word", word)?;
        require("meaning", meaning)?;
        let entry = WordEntry::new(word, meaning, timestamp::now());
        self.store.insert(&entry).map_err(Into::into)?;
        Ok(entry)
    }

    /// Every stored word.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn retrieve_all(&self) -> Result<Vec<WordEntry>> {
        self.store.get_all().map_err(Into::into)
    }

    /// The first stored entry for `word`.
    ///
    /// # Errors
    /// Returns [`WordError::NotFound`] when the word is unknown.
    pub fn retrieve_by_name(&self, word: &str) -> Result<WordEntry> {
        self.store.get_by_name(word).map_err(Into::into)
    }

    /// Words with strictly more retries than `min_retries`.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn words_for_study(&self, min_retries: u32) -> Result<Vec<WordEntry>> {
        self.store.get_by_min_retries(min_retries).map_err(Into::into)
    }

    /// Words created today (local time).
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn words_for_today(&self) -> Result<Vec<WordEntry>> {
        self.store.get_created_today().map_err(Into::into)
    }

    /// Resolve the words for `mode` and return them in random order.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn study_selection<R>(&self, mode: StudyMode, rng: &mut R) -> Result<Vec<WordEntry>>
    where
        R: Rng + ?Sized,
    {
        let selected = match mode {
            StudyMode::All => self.retrieve_all()?,
            StudyMode::RetryThreshold(threshold) => self.words_for_study(threshold)?,
            StudyMode::Today => self.words_for_today()?,
        };
        debug!(?mode, count = selected.len(), "Selected words for study");
        Ok(shuffled(selected, rng))
    }

    /// Write the words for `mode` to `destination` as CSV.
    ///
    /// # Errors
    /// Returns [`WordError::Storage`] when the store or the file write fails.
    pub fn export_selection(&self, destination: &Path, mode: ExportMode) -> Result<ExportSummary> {
        let entries = match mode {
            ExportMode::All => self.retrieve_all()?,
            ExportMode::RetryThreshold(threshold) => self.words_for_study(threshold)?,
        };
        let rows = export::write_csv_file(destination, &entries)?;
        Ok(ExportSummary {
            path: destination.to_path_buf(),
            rows,
        })
    }

    /// Export into `directory` using the dated file-name convention for `date`.
    ///
    /// # Errors
    /// Returns [`WordError::Storage`] when the store or the file write fails.
    pub fn export_to_directory(&self, directory: &Path, mode: ExportMode, date: Date) -> Result<ExportSummary> {
        let destination = directory.join(mode.file_name(date));
        self.export_selection(&destination, mode)
    }

    /// Replace the meaning (and optionally the text) of the first entry matching `original_word`.
    ///
    /// A missing or blank `new_word` keeps the current text.
    ///
    /// # Errors
    /// Returns [`WordError::Validation`] for a blank original word or meaning and
    /// [`WordError::NotFound`] when nothing matches.
    pub fn update_word(&self, original_word: &str, new_word: Option<&str>, meaning: &str) -> Result<()> {
        require("original word", original_word)?;
        require("meaning", meaning)?;
        let new_word = new_word.filter(|word| !word.trim().is_empty());
        self.store
            .update(original_word, new_word, meaning)
            .map_err(Into::into)
    }

    /// Count one more failed recall for the entry with `id`.
    ///
    /// # Errors
    /// Returns [`WordError::NotFound`] when the id is unknown.
    pub fn increment_retry(&self, id: WordId) -> Result<()> {
        self.store.increment_retry(id).map_err(Into::into)
    }

    /// Count one more failed recall for the first entry matching `word`.
    ///
    /// # Errors
    /// Returns [`WordError::NotFound`] when the word is unknown.
    pub fn increment_retry_by_name(&self, word: &str) -> Result<WordId> {
        let entry = self.retrieve_by_name(word)?;
        self.increment_retry(entry.id)?;
        Ok(entry.id)
    }
}

/// Outcome of a completed export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// File that was written.
    pub path: PathBuf,
    /// Number of data rows (header excluded).
    pub rows: usize,
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(WordError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}
