//! Logging setup. The terminal belongs to the UI, so logs go to a file.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use directories::ProjectDirs;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "CONSTELLA_LOG";

/// Install the global subscriber writing to the data directory.
///
/// Returns the log file path, or `None` when no data directory is available.
pub fn init(verbose: bool) -> color_eyre::Result<Option<PathBuf>> {
    let Some(dirs) = ProjectDirs::from("", "", "constella") else {
        return Ok(None);
    };
    let dir = dirs.data_local_dir();
    fs::create_dir_all(dir)?;
    let path = dir.join("constella.log");
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(filter)
        .init();

    Ok(Some(path))
}
