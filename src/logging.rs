/// Logging setup.
///
/// The terminal is in raw mode on the alternate screen while the game runs,
/// so log lines go to a file instead of stdout/stderr. `RUST_LOG` overrides
/// the default filter (`info` for this crate, `warn` elsewhere).

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

fn default_filter() -> EnvFilter {
    EnvFilter::new(format!("warn,{name}=info", name = env!("CARGO_CRATE_NAME")))
}

/// Configure and initialize logging to `path`.
///
/// Returns false (and the game runs without logs) when the file can't be
/// created or a subscriber is already installed.
pub fn setup_logging(path: &Path) -> bool {
    let file = match File::create(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: could not open log file {}: {e}", path.display());
            return false;
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .is_ok()
}
