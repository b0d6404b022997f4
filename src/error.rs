//! Global error handling for clipcat
//!
//! Only failures that invalidate a whole run live here. Problems with a single
//! file are never errors; they are recorded as a [`crate::types::SkipReason`].

use std::io;
use thiserror::Error;

use crate::clipboard::ClipboardError;

/// Global error type for clipcat operations
#[derive(Error, Debug)]
pub enum ClipcatError {
    /// File system errors outside per-file scope
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A whitelist or ignore pattern is not a valid glob
    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// The initial selection could not be enumerated
    #[error("Selection error: {0}")]
    Selection(String),

    /// Worker pool could not be created
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Clipboard sink failures
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    /// Sink failures other than the clipboard
    #[error("Sink error: {0}")]
    Sink(String),
}

/// Specialized Result type for clipcat operations
pub type Result<T> = std::result::Result<T, ClipcatError>;

/// Creates a ClipcatError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::ClipcatError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}
