/*!
 * Sources of the initial file and directory selection
 */

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::absolute;
use crate::error::Result;
use crate::types::PathEntry;

/// Something that produces the initial selection
pub trait SelectionSource {
    /// Resolve the selection into entries.
    ///
    /// An error means the selection could not be enumerated at all; missing
    /// individual paths are not errors.
    fn resolve(&mut self) -> Result<Vec<PathEntry>>;
}

/// Paths given directly, e.g. as command-line arguments
#[derive(Debug, Clone)]
pub struct ExplicitArgs {
    base: PathBuf,
    paths: Vec<PathBuf>,
}

impl ExplicitArgs {
    /// Relative paths are resolved against `base`
    pub fn new(base: impl Into<PathBuf>, paths: Vec<PathBuf>) -> Self {
        Self {
            base: base.into(),
            paths,
        }
    }
}

impl SelectionSource for ExplicitArgs {
    fn resolve(&mut self) -> Result<Vec<PathEntry>> {
        Ok(self
            .paths
            .iter()
            .map(|path| PathEntry::detect(absolute(&self.base, path)))
            .collect())
    }
}

/// Prompts on a terminal and reads one path per line until a blank line or EOF
pub struct InteractiveDialog<R: BufRead, W: Write> {
    base: PathBuf,
    input: R,
    prompt: W,
}

impl InteractiveDialog<io::StdinLock<'static>, io::Stderr> {
    /// Dialog over the process stdin, prompting on stderr
    pub fn stdio(base: impl Into<PathBuf>) -> Self {
        Self::new(base, io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> InteractiveDialog<R, W> {
    /// Create a dialog over arbitrary streams
    pub fn new(base: impl Into<PathBuf>, input: R, prompt: W) -> Self {
        Self {
            base: base.into(),
            input,
            prompt,
        }
    }
}

impl<R: BufRead, W: Write> SelectionSource for InteractiveDialog<R, W> {
    fn resolve(&mut self) -> Result<Vec<PathEntry>> {
        writeln!(
            self.prompt,
            "Select files and folders (one path per line, empty line to finish):"
        )?;
        self.prompt.flush()?;

        let mut entries = Vec::new();
        for line in (&mut self.input).lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                break;
            }
            entries.push(PathEntry::detect(absolute(&self.base, Path::new(line))));
        }
        debug!(count = entries.len(), "paths entered interactively");
        Ok(entries)
    }
}

/// Documents currently open in an editor, read from an exported list file
#[derive(Debug, Clone)]
pub struct OpenDocuments {
    base: PathBuf,
    list_file: PathBuf,
}

impl OpenDocuments {
    /// Relative entries in the list are resolved against `base`
    pub fn new(base: impl Into<PathBuf>, list_file: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            list_file: list_file.into(),
        }
    }
}

impl SelectionSource for OpenDocuments {
    fn resolve(&mut self) -> Result<Vec<PathEntry>> {
        let list_file = absolute(&self.base, &self.list_file);
        let text = match fs::read_to_string(&list_file) {
            Ok(text) => text,
            Err(e) => crate::bail!(
                Selection,
                "Cannot read open documents list {}: {}",
                list_file.display(),
                e
            ),
        };

        let entries: Vec<PathEntry> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| PathEntry::detect(absolute(&self.base, Path::new(line))))
            .collect();
        debug!(count = entries.len(), list = %list_file.display(), "open documents");
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClipcatError;
    use crate::types::EntryKind;

    use tempfile::tempdir;

    #[test]
    fn test_explicit_args_detects_kinds() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();

        let mut source = ExplicitArgs::new(
            dir.path(),
            vec!["src".into(), "a.txt".into(), "missing.txt".into()],
        );
        let entries = source.resolve().unwrap();

        assert_eq!(entries[0], PathEntry::directory(dir.path().join("src")));
        assert_eq!(entries[1], PathEntry::file(dir.path().join("a.txt")));
        assert_eq!(entries[2].kind(), EntryKind::File);
        assert_eq!(entries[2].path(), dir.path().join("missing.txt"));
    }

    #[test]
    fn test_interactive_dialog_stops_at_blank_line() {
        let input = io::Cursor::new("a.txt\n  b.txt  \n\nc.txt\n");
        let mut prompt = Vec::new();
        let entries = InteractiveDialog::new("/base", input, &mut prompt)
            .resolve()
            .unwrap();

        let paths: Vec<_> = entries.iter().map(|e| e.path().to_path_buf()).collect();
        assert_eq!(
            paths,
            vec![PathBuf::from("/base/a.txt"), PathBuf::from("/base/b.txt")]
        );
        assert!(String::from_utf8(prompt).unwrap().contains("one path per line"));
    }

    #[test]
    fn test_open_documents_list() {
        let dir = tempdir().unwrap();
        let list = dir.path().join("open.txt");
        fs::write(&list, "# session\nsrc/main.rs\n\n/abs/lib.rs\n").unwrap();

        let entries = OpenDocuments::new(dir.path(), &list).resolve().unwrap();
        assert_eq!(
            entries,
            vec![
                PathEntry::file(dir.path().join("src/main.rs")),
                PathEntry::file("/abs/lib.rs"),
            ]
        );
    }

    #[test]
    fn test_open_documents_missing_list_is_fatal() {
        let dir = tempdir().unwrap();
        let err = OpenDocuments::new(dir.path(), dir.path().join("nope.txt"))
            .resolve()
            .unwrap_err();
        assert!(matches!(err, ClipcatError::Selection(_)));
    }
}
