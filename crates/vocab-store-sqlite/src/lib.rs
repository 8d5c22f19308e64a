//! SQLite-backed storage for vocabulary entries.

mod error;

pub use error::StoreError;

use rusqlite::{Connection, Params, Row, params};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use vocab_core::timestamp::{self, LocalDay};
use vocab_core::{WordEntry, WordId};

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS words (
    id TEXT PRIMARY KEY,
    word TEXT NOT NULL,
    meaning TEXT NOT NULL,
    retries INTEGER NOT NULL DEFAULT 0 CHECK (retries >= 0),
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    last_modified_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE INDEX IF NOT EXISTS idx_words_word ON words(word);
";

const COLUMNS: &str = "id, word, meaning, retries, created_at, last_modified_at";

/// Storage based on a single `words` table.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database file at `path`.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    /// Returns an error if the directory or database cannot be created, or the schema
    /// cannot be applied.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "Opened word database");
        Self::with_connection(conn)
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    /// Returns an error if `SQLite` cannot allocate the database or apply the schema.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Persist a new entry.
    ///
    /// # Errors
    /// Returns [`StoreError::Conflict`] if the id is already taken.
    pub fn insert(&self, entry: &WordEntry) -> Result<()> {
        let created_at = timestamp::encode(entry.created_at)?;
        let last_modified_at = timestamp::encode(entry.last_modified_at)?;
        let result = self.conn.execute(
            "INSERT INTO words (id, word, meaning, retries, created_at, last_modified_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.id.to_string(),
                entry.word,
                entry.meaning,
                entry.retries,
                created_at,
                last_modified_at,
            ],
        );
        match result {
            Ok(_) => {
                info!(id = %entry.id, word = %entry.word, "Inserted word");
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
            {
                Err(StoreError::Conflict(entry.id))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// All entries in insertion order. An empty table yields an empty list.
    ///
    /// # Errors
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn get_all(&self) -> Result<Vec<WordEntry>> {
        let entries = self.query_entries(&format!("SELECT {COLUMNS} FROM words ORDER BY rowid"), [])?;
        debug!(count = entries.len(), "Loaded all words");
        Ok(entries)
    }

    /// The earliest inserted entry whose word equals `word` exactly.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] when nothing matches.
    pub fn get_by_name(&self, word: &str) -> Result<WordEntry> {
        let matches = self.query_entries(
            &format!("SELECT {COLUMNS} FROM words WHERE word = ?1 ORDER BY rowid LIMIT 2"),
            [word],
        )?;
        if matches.len() > 1 {
            warn!(word, "Several entries share this word; using the earliest");
        }
        matches
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(word.to_owned()))
    }

    /// Entries with strictly more retries than `threshold`.
    ///
    /// # Errors
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn get_by_min_retries(&self, threshold: u32) -> Result<Vec<WordEntry>> {
        let entries = self.query_entries(
            &format!("SELECT {COLUMNS} FROM words WHERE retries > ?1 ORDER BY rowid"),
            [threshold],
        )?;
        debug!(threshold, count = entries.len(), "Loaded words above retry threshold");
        Ok(entries)
    }

    /// Entries created during the current local calendar day.
    ///
    /// `SQLite` resolves both dates through the platform time zone rules, so the
    /// day is correct across daylight saving changes. `created_at` may be in any
    /// layout [`timestamp::decode`] accepts.
    ///
    /// # Errors
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn get_created_today(&self) -> Result<Vec<WordEntry>> {
        let entries = self.query_entries(
            &format!(
                "SELECT {COLUMNS} FROM words
                 WHERE date(created_at, 'localtime') = date('now', 'localtime')
                 ORDER BY rowid"
            ),
            [],
        )?;
        debug!(count = entries.len(), "Loaded words created today");
        Ok(entries)
    }

    /// Entries whose creation time falls within `day`.
    ///
    /// Rows are compared after decoding, so every stored layout and offset is
    /// placed on the correct day down to the microsecond.
    ///
    /// # Errors
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn get_created_on(&self, day: LocalDay) -> Result<Vec<WordEntry>> {
        let entries: Vec<WordEntry> = self
            .get_all()?
            .into_iter()
            .filter(|entry| day.contains(entry.created_at))
            .collect();
        debug!(date = %day.date(), count = entries.len(), "Loaded words created on day");
        Ok(entries)
    }

    /// Rewrite the earliest entry matching `original_word`.
    ///
    /// The word text changes only when `new_word` is non-empty; the meaning is always replaced.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] when nothing matches `original_word`.
    pub fn update(&self, original_word: &str, new_word: Option<&str>, meaning: &str) -> Result<()> {
        let new_word = new_word.filter(|word| !word.is_empty());
        let now = timestamp::encode(timestamp::now())?;
        let changed = self.conn.execute(
            &format!(
                "UPDATE words
                 SET word = COALESCE(?1, word), meaning = ?2, last_modified_at = {}
                 WHERE id = (SELECT id FROM words WHERE word = ?4 ORDER BY rowid LIMIT 1)",
                not_before_created("?3")
            ),
            params![new_word, meaning, now, original_word],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(original_word.to_owned()));
        }
        info!(original = original_word, new_word = new_word.unwrap_or(original_word), "Updated word");
        Ok(())
    }

    /// Add one to the retry counter of the entry with `id`.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] when no entry has that id.
    pub fn increment_retry(&self, id: WordId) -> Result<()> {
        let now = timestamp::encode(timestamp::now())?;
        let changed = self.conn.execute(
            &format!(
                "UPDATE words SET retries = retries + 1, last_modified_at = {} WHERE id = ?2",
                not_before_created("?1")
            ),
            params![now, id.to_string()],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        info!(%id, "Incremented retry count");
        Ok(())
    }

    fn query_entries<P: Params>(&self, sql: &str, params: P) -> Result<Vec<WordEntry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, StoredRow::read)?;
        let entries = rows
            .map(|row| row.map_err(StoreError::from).and_then(StoredRow::into_entry))
            .collect::<Result<Vec<_>>>()?;
        Ok(entries)
    }
}

/// SQL expression for a modification time of `now` that never precedes `created_at`.
///
/// Stored timestamps may use different layouts, so the comparison goes through
/// `julianday` instead of the raw text.
fn not_before_created(now: &str) -> String {
    format!("CASE WHEN julianday(created_at) >= julianday({now}) THEN created_at ELSE {now} END")
}

/// Raw column values before id and timestamp decoding.
struct StoredRow {
    id: String,
    word: String,
    meaning: String,
    retries: u32,
    created_at: String,
    last_modified_at: String,
}

impl StoredRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            word: row.get(1)?,
            meaning: row.get(2)?,
            retries: row.get(3)?,
            created_at: row.get(4)?,
            last_modified_at: row.get(5)?,
        })
    }

    fn into_entry(self) -> Result<WordEntry> {
        let id = self
            .id
            .parse()
            .map_err(|_| StoreError::InvalidId(self.id.clone()))?;
        Ok(WordEntry {
            id,
            word: self.word,
            meaning: self.meaning,
            retries: self.retries,
            created_at: timestamp::decode(&self.created_at)?,
            last_modified_at: timestamp::decode(&self.last_modified_at)?,
        })
    }
}
