//! CLI module - Command-line interface definitions and handlers

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cache::store::{clean, insert_many};
use crate::core::error::CacheError;
use crate::core::paths::CacheLocation;

/// cachef - cache absolute filepaths into a single text file.
#[derive(Parser, Debug)]
#[command(name = "cachef")]
#[command(
    author,
    version,
    about,
    long_about = r#"cachef resolves each PATH to its absolute, symlink-free form and appends it
to the cache file, skipping paths that are already cached.

The cache file lives at $XDG_CACHE_HOME/cachef/cachef.txt, or at
$HOME/cachef/cachef.txt when XDG_CACHE_HOME is unset or empty.

Examples:
    cachef README.md src/main.rs
    cachef --cache-file
    cachef --clean
"#
)]
pub struct Cli {
    /// Filepaths to be cached.
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Print the cache file path and exit.
    #[arg(
        long,
        long_help = "Print the location of the cache file and exit without modifying it."
    )]
    pub cache_file: bool,

    /// Remove cached paths that no longer exist.
    #[arg(
        long,
        long_help = "Rewrite the cache file keeping only paths that still exist.\n\n\
Exits with status 1 if the cache file does not exist yet."
    )]
    pub clean: bool,

    /// Use FILE as the cache file.
    #[arg(
        long,
        env = "CACHEF_STORE",
        value_name = "FILE",
        long_help = "Use FILE as the cache file instead of the default location.\n\n\
Can also be set through the CACHEF_STORE environment variable."
    )]
    pub store: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,

    /// Verbose mode (debug diagnostics on stderr).
    #[arg(short, long)]
    pub verbose: bool,
}

/// Dispatch the parsed command line, returning the process exit status
pub fn run(cli: Cli) -> Result<u8> {
    let location = match cli.store {
        Some(file) => CacheLocation::new(file),
        None => CacheLocation::from_env()
            .context("Cannot locate cache file: XDG_CACHE_HOME is unset and no home directory")?,
    };
    let cache_file = location.file();
    debug!(file = %cache_file.display(), "using cache file");

    if cli.cache_file {
        println!("{}", cache_file.display());
        return Ok(0);
    }

    if cli.clean {
        return run_clean(cache_file);
    }

    if !cli.paths.is_empty() {
        let appended = insert_many(&cli.paths, cache_file)?;
        debug!(
            appended = appended.len(),
            skipped = cli.paths.len() - appended.len(),
            "insert finished"
        );
    }

    Ok(0)
}

fn run_clean(cache_file: &Path) -> Result<u8> {
    match clean(cache_file) {
        Ok(_) => Ok(0),
        Err(err) => match err {
            CacheError::NotFound { ref path } => {
                debug!(file = %path.display(), "nothing to clean");
                println!("{}", err);
                Ok(1)
            }
            other => Err(other.into()),
        },
    }
}
