//! Binary entry point for wordsweep.
//!
//! This binary provides the CLI interface for the wordsweep daemon.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::info;
use wordsweep::config::SweepConfig;
use wordsweep::observability::{self, ObservabilityConfig};
use wordsweep::services::{SweepService, find_match, read_word_list};
use wordsweep::storage::SqliteStore;
use wordsweep::watch::{FileWatchLoop, WatchSource};
use wordsweep::{Error, Result};

/// Wordsweep - keeps a database free of rows containing sensitive words.
#[derive(Parser)]
#[command(name = "wordsweep")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Run the initial check, then watch word lists until interrupted.
    Watch {
        /// Word list file, or directory of word lists.
        path: Option<PathBuf>,

        /// `SQLite` database to remediate.
        #[arg(long)]
        db: Option<PathBuf>,

        /// Milliseconds between polls.
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Word list extension in directory mode.
        #[arg(short, long)]
        extension: Option<String>,

        /// Report matches without deleting or redacting.
        #[arg(long)]
        dry_run: bool,
    },

    /// Sweep once with every word list found, then exit.
    Sweep {
        /// Word list file, or directory of word lists.
        path: Option<PathBuf>,

        /// `SQLite` database to remediate.
        #[arg(long)]
        db: Option<PathBuf>,

        /// Report matches without deleting or redacting.
        #[arg(long)]
        dry_run: bool,
    },

    /// Report which word, if any, matches a piece of text.
    Check {
        /// Text to test.
        text: String,

        /// Word list file, or directory of word lists.
        path: Option<PathBuf>,
    },
}

/// Main entry point.
fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init(&ObservabilityConfig::from_config(&config, cli.verbose)) {
        eprintln!("Failed to initialize observability: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(command: Commands, mut config: SweepConfig) -> Result<()> {
    match command {
        Commands::Watch {
            path,
            db,
            interval_ms,
            extension,
            dry_run,
        } => {
            apply_overrides(&mut config, path, db, extension.as_deref());
            if let Some(ms) = interval_ms {
                config.watch.poll_interval = Duration::from_millis(ms);
            }
            config.validate()?;
            cmd_watch(&config, dry_run)
        },
        Commands::Sweep { path, db, dry_run } => {
            apply_overrides(&mut config, path, db, None);
            config.validate()?;
            cmd_sweep(&config, dry_run)
        },
        Commands::Check { text, path } => {
            apply_overrides(&mut config, path, None, None);
            cmd_check(&config, &text)
        },
    }
}

/// Loads configuration.
fn load_config(path: Option<&str>) -> Result<SweepConfig> {
    let config = match path {
        Some(config_path) => SweepConfig::load_from_file(Path::new(config_path))?,
        None => SweepConfig::load_default()?,
    };
    config.with_env_overrides()
}

/// Applies command line flags over the loaded configuration.
fn apply_overrides(
    config: &mut SweepConfig,
    path: Option<PathBuf>,
    db: Option<PathBuf>,
    extension: Option<&str>,
) {
    if let Some(path) = path {
        config.watch.path = path;
    }
    if let Some(db) = db {
        config.database.path = db;
    }
    if let Some(extension) = extension {
        config.watch.extension = extension.trim_start_matches('.').to_string();
    }
}

/// Watches word lists until Ctrl-C, then closes the database.
fn cmd_watch(config: &SweepConfig, dry_run: bool) -> Result<()> {
    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&shutdown);
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)).map_err(|e| {
        Error::OperationFailed {
            operation: "install_signal_handler".to_string(),
            cause: e.to_string(),
        }
    })?;

    info!(db = %config.database.path.display(), "Connecting to database");
    let store = SqliteStore::open(&config.database.path)?;
    let service = SweepService::new(&store, config.targets.tables()).with_dry_run(dry_run);
    let source = WatchSource::from_path(&config.watch.path, &config.watch.extension);

    let mut watch = FileWatchLoop::new(source, service, config.watch.poll_interval);
    let result = watch.start().and_then(|_| watch.run(&shutdown));
    drop(watch);

    if shutdown.load(Ordering::SeqCst) {
        info!("Program ended by keyboard interrupt");
    }
    store.close()?;
    result
}

/// Sweeps once per word list found.
fn cmd_sweep(config: &SweepConfig, dry_run: bool) -> Result<()> {
    let source = WatchSource::from_path(&config.watch.path, &config.watch.extension);
    let lists = word_lists(&source)?;

    let store = SqliteStore::open(&config.database.path)?;
    let service = SweepService::new(&store, config.targets.tables()).with_dry_run(dry_run);

    for path in &lists {
        let words = read_word_list(path)?;
        let report = service.sweep(&words)?;
        println!("{} ({} words)", path.display(), words.len());
        for target in &report.targets {
            let affected = if dry_run {
                "dry run".to_string()
            } else {
                format!("{} {}", target.affected, target.action.verb())
            };
            println!(
                "  {}: {} scanned, {} matched, {affected}",
                target.table, target.scanned, target.matched
            );
        }
    }

    drop(service);
    store.close()
}

/// Prints the first word list entry that matches `text`.
fn cmd_check(config: &SweepConfig, text: &str) -> Result<()> {
    let source = WatchSource::from_path(&config.watch.path, &config.watch.extension);

    for path in word_lists(&source)? {
        let words = read_word_list(&path)?;
        if let Some(word) = find_match(text, &words) {
            println!("match: '{word}' ({})", path.display());
            return Ok(());
        }
    }

    println!("no match");
    Ok(())
}

/// Word lists present for `source`; a missing single file is an error.
fn word_lists(source: &WatchSource) -> Result<Vec<PathBuf>> {
    let lists = source.list_candidates()?;
    if lists.is_empty() && source.is_single_file() {
        return Err(Error::file_unavailable(
            source.root(),
            std::io::Error::new(std::io::ErrorKind::NotFound, "word list not found"),
        ));
    }
    Ok(lists)
}
