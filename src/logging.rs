//! Tracing subscriber setup.
//!
//! CLI commands log to stderr. The dashboard owns the terminal, so it only
//! logs when a file is given.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Default filter for a `-v` count. `RUST_LOG` takes precedence when set.
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn filter(verbose: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Log to stderr.
pub fn init_stderr(verbose: u8) {
    // A second init (e.g. in tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log to `path` when given, otherwise stay silent.
pub fn init_file(verbose: u8, path: Option<&Path>) -> Result<(), AppError> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create log file '{}': {e}", path.display())))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(default_directive(0), "warn");
        assert_eq!(default_directive(1), "info");
        assert_eq!(default_directive(2), "debug");
        assert_eq!(default_directive(9), "trace");
    }

    #[test]
    fn unwritable_log_file_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = init_file(0, Some(&dir.path().join("missing/dir/log.txt"))).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(init_file(0, None).is_ok());
    }
}
