//! CLI entry point for vocab.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt::format::FmtSpan};
use vocab_app::{AppConfig, WordService};
use vocab_store_sqlite::SqliteStore;

use console::Console;

mod commands;
mod console;

/// Vocabulary notebook with shuffled study sessions.
#[derive(Parser, Debug)]
#[command(
    name = "vocab",
    version,
    about = "vocab: store words and meanings, study them in random order, export to CSV"
)]
struct Cli {
    /// Configuration file (defaults to <config dir>/vocab/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database file, overriding the configuration.
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Directory for exported CSV files, overriding the configuration.
    #[arg(long, global = true)]
    export_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Store new words interactively.
    #[command(visible_alias = "s")]
    Store,

    /// Retrieve stored words.
    #[command(visible_alias = "r")]
    Retrieve {
        /// Word to look up.
        #[arg(required_unless_present = "all")]
        word: Option<String>,
        /// Retrieve all words.
        #[arg(short, long)]
        all: bool,
    },

    /// Study words in random order.
    #[command(visible_alias = "st")]
    Study {
        #[command(flatten)]
        selection: StudySelection,
        /// Record a retry for every word marked as not known.
        #[arg(long)]
        track_retries: bool,
    },

    /// Export words to CSV.
    #[command(visible_alias = "e")]
    Export {
        #[command(flatten)]
        selection: ExportSelection,
    },

    /// Change the meaning and optionally the text of a stored word.
    #[command(visible_alias = "u")]
    Update {
        /// Word as currently stored.
        original: String,
        /// Replacement text; pass "" to keep the current word.
        new_word: String,
        /// New meaning.
        meaning: String,
    },
}

#[derive(Args, Debug, Clone, Copy)]
#[group(required = true, multiple = false)]
struct StudySelection {
    /// Study all words.
    #[arg(short, long)]
    all: bool,
    /// Only study words with more retries than this.
    #[arg(short = 'r', long = "only-retry", value_name = "N")]
    only_retry: Option<u32>,
    /// Study words stored today.
    #[arg(short, long)]
    today: bool,
}

#[derive(Args, Debug, Clone, Copy)]
#[group(required = true, multiple = false)]
struct ExportSelection {
    /// Export all words.
    #[arg(short, long)]
    all: bool,
    /// Only export words with more retries than this.
    #[arg(short = 'r', long = "only-retry", value_name = "N")]
    only_retry: Option<u32>,
}

fn main() -> Result<()> {
    let Cli {
        config,
        database,
        export_dir,
        cmd,
    } = Cli::parse();

    install_tracing();

    let config = AppConfig::load(config.as_deref())?.with_overrides(database, export_dir);
    let store = SqliteStore::open(&config.storage.database).with_context(|| {
        format!("failed to open database {}", config.storage.database.display())
    })?;
    let service = WordService::new(store);

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout().lock());
    commands::run(cmd, &service, &config, &mut console, &mut rand::thread_rng())
}

fn install_tracing() {
    // RUST_LOG overrides the default; WARN keeps the interactive prompts readable.
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(io::stderr)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_study_only_retry() {
        let cli = Cli::parse_from(["vocab", "study", "--only-retry", "2"]);
        match cli.cmd {
            Command::Study {
                selection,
                track_retries,
            } => {
                assert_eq!(selection.only_retry, Some(2));
                assert!(!selection.all);
                assert!(!track_retries);
            }
            other => panic!("expected study command, got {other:?}"),
        }
    }

    #[test]
    fn parse_aliases_and_short_flags() {
        let cli = Cli::parse_from(["vocab", "st", "-t", "--track-retries"]);
        assert!(matches!(
            cli.cmd,
            Command::Study {
                selection: StudySelection { today: true, .. },
                track_retries: true,
            }
        ));

        let cli = Cli::parse_from(["vocab", "e", "-r", "1"]);
        assert!(matches!(
            cli.cmd,
            Command::Export {
                selection: ExportSelection {
                    only_retry: Some(1),
                    all: false,
                },
            }
        ));
    }

    #[test]
    fn study_requires_exactly_one_selection() {
        assert!(Cli::try_parse_from(["vocab", "study"]).is_err());
        assert!(Cli::try_parse_from(["vocab", "study", "--all", "--today"]).is_err());
    }

    #[test]
    fn export_requires_a_selection() {
        assert!(Cli::try_parse_from(["vocab", "export"]).is_err());
    }

    #[test]
    fn negative_threshold_is_rejected() {
        assert!(Cli::try_parse_from(["vocab", "study", "--only-retry", "-1"]).is_err());
    }

    #[test]
    fn retrieve_needs_word_or_all() {
        assert!(Cli::try_parse_from(["vocab", "retrieve"]).is_err());
        let cli = Cli::parse_from(["vocab", "r", "ephemeral"]);
        assert!(matches!(
            cli.cmd,
            Command::Retrieve { word: Some(ref w), all: false } if w == "ephemeral"
        ));
        let cli = Cli::parse_from(["vocab", "retrieve", "--all"]);
        assert!(matches!(cli.cmd, Command::Retrieve { word: None, all: true }));
    }

    #[test]
    fn parse_update_with_empty_new_word() {
        let cli = Cli::parse_from(["vocab", "u", "laconic", "", "brief"]);
        match cli.cmd {
            Command::Update {
                original,
                new_word,
                meaning,
            } => {
                assert_eq!(original, "laconic");
                assert!(new_word.is_empty());
                assert_eq!(meaning, "brief");
            }
            other => panic!("expected update command, got {other:?}"),
        }
    }

    #[test]
    fn global_overrides_parse_after_subcommand() {
        let cli = Cli::parse_from(["vocab", "store", "--database", "/tmp/words.db", "--export-dir", "out"]);
        assert_eq!(cli.database, Some(PathBuf::from("/tmp/words.db")));
        assert_eq!(cli.export_dir, Some(PathBuf::from("out")));
        assert!(cli.config.is_none());
    }
}
