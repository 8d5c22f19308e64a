use std::fs;
use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use rand::Rng;
use tracing::warn;
use vocab_app::{AppConfig, WordError, WordService, WordStore};
use vocab_core::{ExportMode, LocalDay, StudyMode, WordEntry, WordId};

use crate::console::Console;
use crate::{Command, ExportSelection, StudySelection};

const EXIT_WORD: &str = "exit";
const NOT_KNOWN_MARK: &str = "w";

pub fn run<S, R, W, G>(
    command: Command,
    service: &WordService<S>,
    config: &AppConfig,
    console: &mut Console<R, W>,
    rng: &mut G,
) -> Result<()>
where
    S: WordStore,
    R: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    match command {
        Command::Store => store_words(service, console),
        Command::Retrieve { word, all } => retrieve_words(service, console, word.as_deref(), all),
        Command::Study {
            selection,
            track_retries,
        } => study_words(service, console, selection, track_retries, rng),
        Command::Export { selection } => export_words(service, console, config, selection),
        Command::Update {
            original,
            new_word,
            meaning,
        } => {
            service.update_word(&original, Some(new_word.as_str()), &meaning)?;
            console.say(&format!("Updated: {original}"))?;
            Ok(())
        }
    }
}

fn store_words<S, R, W>(service: &WordService<S>, console: &mut Console<R, W>) -> Result<()>
where
    S: WordStore,
    R: BufRead,
    W: Write,
{
    console.say(&format!("Enter words and meanings to store (type '{EXIT_WORD}' to finish):"))?;
    loop {
        let Some(word) = console.prompt("Word: ")? else {
            break;
        };
        if word == EXIT_WORD {
            break;
        }
        let Some(meaning) = console.prompt("Meaning: ")? else {
            break;
        };
        match service.store_word(&word, &meaning) {
            Ok(entry) => console.say(&format!("Stored: {} - {}", entry.word, entry.meaning))?,
            Err(err @ WordError::Validation(_)) => console.say(&format!("Skipped: {err}"))?,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn retrieve_words<S, R, W>(
    service: &WordService<S>,
    console: &mut Console<R, W>,
    word: Option<&str>,
    all: bool,
) -> Result<()>
where
    S: WordStore,
    R: BufRead,
    W: Write,
{
    let entries = match word {
        Some(word) if !all => vec![service.retrieve_by_name(word)?],
        _ => service.retrieve_all()?,
    };
    if entries.is_empty() {
        console.say("No words stored")?;
    }
    for entry in &entries {
        console.say(&describe(entry))?;
    }
    Ok(())
}

fn study_words<S, R, W, G>(
    service: &WordService<S>,
    console: &mut Console<R, W>,
    selection: StudySelection,
    track_retries: bool,
    rng: &mut G,
) -> Result<()>
where
    S: WordStore,
    R: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    let mode = selection.mode();
    if let StudyMode::RetryThreshold(threshold) = mode {
        console.say(&format!("Studying words with retry count > {threshold}"))?;
    }
    let session = service.study_selection(mode, rng)?;
    if session.is_empty() {
        console.say("No words to study")?;
        return Ok(());
    }

    let missed = present(&session, console)?;
    if missed.is_empty() {
        return Ok(());
    }
    if track_retries {
        for id in &missed {
            service.increment_retry(*id)?;
        }
        console.say(&format!("Recorded a retry for {} word(s)", missed.len()))?;
    } else {
        console.say(&format!(
            "{} word(s) marked as not known; pass --track-retries to record them",
            missed.len()
        ))?;
    }
    Ok(())
}

/// Walk through `session` one word at a time, returning the ids marked as not known.
fn present<R: BufRead, W: Write>(session: &[WordEntry], console: &mut Console<R, W>) -> Result<Vec<WordId>> {
    let mut missed = Vec::new();
    for entry in session {
        console.say(&format!("Word: {}", entry.word))?;
        if console.prompt("Press Enter to see the meaning...")?.is_none() {
            break;
        }
        console.say(&format!("Meaning: {}", entry.meaning))?;
        let Some(answer) = console.prompt(&format!(
            "Press Enter to continue or '{NOT_KNOWN_MARK}' if you did not know it..."
        ))?
        else {
            break;
        };
        if answer.trim().eq_ignore_ascii_case(NOT_KNOWN_MARK) {
            missed.push(entry.id);
        }
    }
    Ok(missed)
}

fn export_words<S, R, W>(
    service: &WordService<S>,
    console: &mut Console<R, W>,
    config: &AppConfig,
    selection: ExportSelection,
) -> Result<()>
where
    S: WordStore,
    R: BufRead,
    W: Write,
{
    let directory = &config.export.directory;
    fs::create_dir_all(directory)
        .with_context(|| format!("failed to create export directory {}", directory.display()))?;
    let summary = service.export_to_directory(directory, selection.mode(), today().date())?;
    console.say(&format!(
        "Exported {} word(s) to {}",
        summary.rows,
        summary.path.display()
    ))?;
    Ok(())
}

fn describe(entry: &WordEntry) -> String {
    format!("{} - {} (Retries: {})", entry.word, entry.meaning, entry.retries)
}

fn today() -> LocalDay {
    LocalDay::today().unwrap_or_else(|err| {
        warn!(%err, "Local time offset unavailable; using the UTC date");
        LocalDay::today_utc()
    })
}

impl StudySelection {
    const fn mode(&self) -> StudyMode {
        if self.all {
            StudyMode::All
        } else if self.today {
            StudyMode::Today
        } else if let Some(threshold) = self.only_retry {
            StudyMode::RetryThreshold(threshold)
        } else {
            // clap requires one of the flags; fall back to the broadest set.
            StudyMode::All
        }
    }
}

impl ExportSelection {
    const fn mode(&self) -> ExportMode {
        match self.only_retry {
            Some(threshold) if !self.all => ExportMode::RetryThreshold(threshold),
            _ => ExportMode::All,
        }
    }
}
