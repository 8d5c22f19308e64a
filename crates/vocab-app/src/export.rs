//! CSV export of word/meaning pairs.

use anyhow::Context;
use std::io::Write;
use std::path::Path;
use tracing::info;
use vocab_core::WordEntry;

use crate::error::WordError;

const HEADER: [&str; 2] = ["Word", "Meaning"];

/// Write `entries` to `path` as `Word,Meaning` CSV, replacing any existing file.
///
/// Returns the number of data rows written.
///
/// # Errors
/// Returns [`WordError::Storage`] if the file cannot be created or written.
pub fn write_csv_file(path: &Path, entries: &[WordEntry]) -> Result<usize, WordError> {
    let file = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create export file {}", path.display()))?;
    let rows = write_records(file, entries)
        .with_context(|| format!("failed to write export file {}", path.display()))?;
    info!(path = %path.display(), rows, "Exported words");
    Ok(rows)
}

/// Write `entries` as CSV into an arbitrary sink.
///
/// # Errors
/// Returns [`WordError::Storage`] if the sink rejects a write.
pub fn write_csv<W: Write>(sink: W, entries: &[WordEntry]) -> Result<usize, WordError> {
    let rows = write_records(csv::Writer::from_writer(sink), entries)?;
    Ok(rows)
}

fn write_records<W: Write>(mut writer: csv::Writer<W>, entries: &[WordEntry]) -> anyhow::Result<usize> {
    writer.write_record(HEADER).context("failed to write header")?;
    for entry in entries {
        writer
            .write_record([entry.word.as_str(), entry.meaning.as_str()])
            .with_context(|| format!("failed to write row for '{}'", entry.word))?;
    }
    writer.flush().context("failed to flush export")?;
    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn entry(word: &str, meaning: &str) -> WordEntry {
        WordEntry::new(word, meaning, datetime!(2024-01-01 00:00 UTC))
    }

    fn render(entries: &[WordEntry]) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, entries).unwrap_or_else(|err| panic!("write csv: {err}"));
        String::from_utf8(buf).unwrap_or_else(|err| panic!("utf-8: {err}"))
    }

    #[test]
    fn empty_export_has_only_header() {
        assert_eq!(render(&[]), "Word,Meaning\n");
    }

    #[test]
    fn plain_values_are_unquoted() {
        let text = render(&[entry("ephemeral", "short-lived"), entry("ostensible", "apparent")]);
        assert_eq!(text, "Word,Meaning\nephemeral,short-lived\nostensible,apparent\n");
    }

    #[test]
    fn delimiters_and_quotes_are_escaped() {
        let text = render(&[entry("say \"hi\"", "greet, politely")]);
        assert_eq!(text, "Word,Meaning\n\"say \"\"hi\"\"\",\"greet, politely\"\n");
    }

    #[test]
    fn embedded_newline_is_quoted() {
        let text = render(&[entry("multi", "line one\nline two")]);
        assert_eq!(text, "Word,Meaning\nmulti,\"line one\nline two\"\n");
    }

    #[test]
    fn missing_directory_is_storage_error() {
        let dir = tempfile::tempdir().unwrap_or_else(|err| panic!("tempdir: {err}"));
        let path = dir.path().join("absent").join("words.csv");
        let Err(err) = write_csv_file(&path, &[entry("a", "b")]) else {
            panic!("expected failure for missing directory");
        };
        assert!(matches!(err, WordError::Storage(_)));
    }

    #[test]
    fn existing_file_is_overwritten() {
        let dir = tempfile::tempdir().unwrap_or_else(|err| panic!("tempdir: {err}"));
        let path = dir.path().join("words.csv");
        std::fs::write(&path, "stale content that is much longer than the export\n".repeat(10))
            .unwrap_or_else(|err| panic!("seed file: {err}"));

        let rows = write_csv_file(&path, &[entry("fresh", "new")])
            .unwrap_or_else(|err| panic!("export: {err}"));

        assert_eq!(rows, 1);
        let text = std::fs::read_to_string(&path).unwrap_or_else(|err| panic!("read back: {err}"));
        assert_eq!(text, "Word,Meaning\nfresh,new\n");
    }
}
