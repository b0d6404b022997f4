/*!
 * Destinations for the joined output
 *
 * A sink is handed the complete text exactly once per run.
 */

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;

use crate::clipboard;
use crate::error::Result;

/// Receiver of the final joined text
pub trait Sink {
    /// Accept the complete output
    fn accept(&mut self, text: &str) -> Result<()>;

    /// Short description for the final message
    fn describe(&self) -> String;
}

/// Copies the output to the system clipboard
#[derive(Debug, Default)]
pub struct ClipboardSink;

impl Sink for ClipboardSink {
    fn accept(&mut self, text: &str) -> Result<()> {
        clipboard::copy_to_clipboard(text)?;
        Ok(())
    }

    fn describe(&self) -> String {
        "clipboard".to_string()
    }
}

/// Writes the output to any writer, stdout by default
pub struct WriterSink<W: Write> {
    writer: W,
    name: String,
}

impl WriterSink<io::Stdout> {
    /// Sink writing to standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout(), "stdout")
    }
}

impl<W: Write> WriterSink<W> {
    /// Create a sink over a writer
    pub fn new(writer: W, name: impl Into<String>) -> Self {
        Self {
            writer,
            name: name.into(),
        }
    }

    /// Get the underlying writer back
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for WriterSink<W> {
    fn accept(&mut self, text: &str) -> Result<()> {
        // A single buffered write, then flush
        let mut lock = io::BufWriter::new(&mut self.writer);
        lock.write_all(text.as_bytes())?;
        lock.write_all(b"\n")?;
        lock.flush()?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

/// Writes the output to a file, replacing it atomically
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Create a file sink
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn accept(&mut self, text: &str) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        // Write next to the target, then rename over it
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(text.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path)
            .map_err(|e| crate::error!(Sink, "Cannot write {}: {}", self.path.display(), e))?;

        info!(path = %self.path.display(), bytes = text.len(), "output written");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
