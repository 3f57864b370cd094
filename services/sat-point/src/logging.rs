//! Tracing subscriber setup.

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::cli::Args;

/// Level from the flags: `--debug`, then `--verbose`, then `--log-level`,
/// warnings only otherwise.
pub fn resolve_level(log_level: Option<&str>, debug: bool, verbose: bool) -> Level {
    if debug {
        return Level::DEBUG;
    }
    if verbose {
        return Level::INFO;
    }
    match log_level.map(|l| l.to_lowercase()).as_deref() {
        Some("trace") => Level::TRACE,
        Some("debug") => Level::DEBUG,
        Some("info") => Level::INFO,
        Some("error") => Level::ERROR,
        _ => Level::WARN,
    }
}

/// Install the global subscriber. Logs go to `--log-filename` when given,
/// stderr otherwise, so stdout only carries results.
pub fn init_tracing(args: &Args) -> Result<()> {
    let level = resolve_level(args.log_level.as_deref(), args.debug, args.verbose);
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    match &args.log_filename {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            let writer = Mutex::new(file);
            if args.json_logs {
                tracing::subscriber::set_global_default(builder.json().with_writer(writer).finish())?;
            } else {
                tracing::subscriber::set_global_default(
                    builder.with_ansi(false).with_writer(writer).finish(),
                )?;
            }
        }
        None => {
            if args.json_logs {
                tracing::subscriber::set_global_default(
                    builder.json().with_writer(std::io::stderr).finish(),
                )?;
            } else {
                tracing::subscriber::set_global_default(
                    builder.with_writer(std::io::stderr).finish(),
                )?;
            }
        }
    }

    Ok(())
}
