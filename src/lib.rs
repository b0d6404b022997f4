/*!
 * clipcat - Concatenate selected files into one path-annotated text blob
 *
 * This library expands a selection of files and directories, filters it
 * through whitelist and ignore patterns, skips binary and oversized files,
 * and joins the remaining contents into a single text ready to paste into an
 * LLM prompt.
 */

pub mod classifier;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod formatter;
pub mod matcher;
pub mod pipeline;
pub mod progress;
pub mod report;
pub mod selection;
pub mod sink;
pub mod types;
pub mod utils;
pub mod walker;


// Re-export main components for easier access
pub use config::{Args, Configuration};
pub use error::{ClipcatError, Result};
pub use matcher::{FilterMode, PathMatcher};
pub use pipeline::{Outcome, Pipeline, PipelineResult, Termination};
pub use progress::{NoProgress, ProgressReporter, ProgressUpdate};
pub use report::{ReportFormat, Reporter};
pub use selection::{ExplicitArgs, InteractiveDialog, OpenDocuments, SelectionSource};
pub use sink::{ClipboardSink, FileSink, Sink, WriterSink};
pub use types::{EntryKind, FileRecord, FormattedBlock, PathEntry, SkipReason, Skipped};
pub use walker::{Expansion, Walker};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
