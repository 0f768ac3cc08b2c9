//! nimbus-setup entry point.
//!
//! Launches the full-screen installer wizard. There are no functional
//! flags; clap provides the conventional --help/--version surface.
//! Exit code 0 on a graceful quit, 1 if the terminal environment
//! fails to initialize or the event loop errors out.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use nimbus_setup::tui;

/// Environment variable naming the debug log file. Logging is off
/// when unset: the wizard owns the terminal, so there is no console
/// layer to fall back to.
const LOG_PATH_VAR: &str = "NIMBUS_SETUP_LOG";

#[derive(Parser)]
#[command(name = "nimbus-setup")]
#[command(about = "Interactive terminal installer for Nimbus Desktop")]
#[command(version)]
struct Cli {}

fn main() -> ExitCode {
    Cli::parse();

    let _log_guard = init_logging();
    info!(version = env!("CARGO_PKG_VERSION"), "starting nimbus-setup");

    match tui::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Set up file-only logging when `NIMBUS_SETUP_LOG` names a path.
///
/// The returned guard must stay alive for the process lifetime so the
/// non-blocking writer flushes on exit. Failure to open the log file
/// is reported once and the wizard runs unlogged.
fn init_logging() -> Option<WorkerGuard> {
    let path = PathBuf::from(std::env::var_os(LOG_PATH_VAR)?);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            let _ = std::fs::create_dir_all(parent);
        }
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
    {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Note: cannot open log file {}: {}", path.display(), e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let env_filter = EnvFilter::builder()
        .with_default_directive(Level::DEBUG.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .init();

    Some(guard)
}
