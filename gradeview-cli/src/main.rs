//! gradeview CLI - browse and check grading submissions
//!
//! Usage:
//!   gradeview [DIR]               interactive browser (default: current directory)
//!   gradeview dump [DIR]          print the loaded submissions as JSON
//!   gradeview lint [ROOT]         report discouraged spellings in course material
//!   gradeview footnotes [ROOT]    renumber footnotes in notebooks

mod batch;
mod tui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gradeview_core::ViewerConfig;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gradeview")]
#[command(about = "gradeview - terminal browser for grading submissions", long_about = None)]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory to open in the browser
    dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a submission directory and print it as JSON
    Dump {
        /// Submission directory (default: current directory)
        dir: Option<PathBuf>,
    },

    /// Check course material for discouraged spellings
    Lint {
        /// Project root the corpus globs are relative to
        root: Option<PathBuf>,
    },

    /// Canonicalize footnotes in notebooks
    Footnotes {
        /// Project root the corpus globs are relative to
        root: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The browser owns the terminal, so it only logs to a file
    let interactive = cli.command.is_none();
    if !interactive || cli.log_file.is_some() {
        init_logging(cli.verbose, cli.log_file.as_deref())?;
    }

    let config = match &cli.config {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ViewerConfig::default(),
    };

    match cli.command {
        None => {
            let dir = or_current_dir(cli.dir)?;
            tui::run(&dir, &config.scan)
        }
        Some(Commands::Dump { dir }) => batch::dump(&or_current_dir(dir)?, &config.scan),
        Some(Commands::Lint { root }) => batch::lint(&or_current_dir(root)?, &config.lint),
        Some(Commands::Footnotes { root }) => {
            batch::footnotes(&or_current_dir(root)?, &config.footnotes)
        }
    }
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn or_current_dir(dir: Option<PathBuf>) -> Result<PathBuf> {
    match dir {
        Some(dir) => Ok(dir),
        None => std::env::current_dir().context("Failed to determine current directory"),
    }
}
