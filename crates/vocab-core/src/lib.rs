//! Domain types for the vocabulary store.

/// Stored word entries.
pub mod entry;
/// Identifier types.
pub mod id;
/// Study and export selection.
pub mod selection;
/// Timestamp encoding and calendar days.
pub mod timestamp;

pub use entry::WordEntry;
pub use id::WordId;
pub use selection::{ExportMode, StudyMode, shuffle, shuffled};
pub use timestamp::{LocalDay, TimestampError};
