/*!
 * Expansion of selected entries into a flat list of files
 */

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::types::{EntryKind, PathEntry, SkipReason, Skipped};

/// Files produced by [`Walker::expand`] plus the entries that could not be read
#[derive(Debug, Clone, Default)]
pub struct Expansion {
    /// Files in input-entry order, deduplicated
    pub files: Vec<PathBuf>,
    /// Non-fatal problems met while walking
    pub warnings: Vec<Skipped>,
}

impl Expansion {
    fn push_file(&mut self, seen: &mut HashSet<PathBuf>, path: PathBuf) {
        if seen.insert(path.clone()) {
            self.files.push(path);
        } else {
            debug!(path = %path.display(), "duplicate path dropped");
        }
    }

    fn push_warning(&mut self, warning: Skipped) {
        warn!(
            path = %warning.path.display(),
            reason = %warning.reason,
            detail = warning.detail.as_deref().unwrap_or(""),
            "skipping entry while expanding"
        );
        self.warnings.push(warning);
    }
}

/// Recursive directory expander
#[derive(Debug, Clone, Default)]
pub struct Walker {
    /// Honor `.gitignore`, `.ignore` and `.git/info/exclude` inside walked directories
    respect_gitignore: bool,
}

impl Walker {
    /// Create a new walker
    pub fn new(respect_gitignore: bool) -> Self {
        Self { respect_gitignore }
    }

    /// Expand entries into files.
    ///
    /// File entries are kept as they are. Directory entries are walked depth
    /// first with children sorted by name; symlinks are followed and symlink
    /// loops are reported instead of recursed into.
    pub fn expand(&self, entries: &[PathEntry]) -> Expansion {
        let mut expansion = Expansion::default();
        let mut seen = HashSet::new();

        for entry in entries {
            match entry.kind() {
                EntryKind::File => expansion.push_file(&mut seen, entry.path().to_path_buf()),
                EntryKind::Directory => {
                    let before = expansion.files.len();
                    if self.respect_gitignore {
                        self.walk_with_ignore(entry.path(), &mut expansion, &mut seen);
                    } else {
                        self.walk_plain(entry.path(), &mut expansion, &mut seen);
                    }
                    debug!(
                        dir = %entry.path().display(),
                        files = expansion.files.len() - before,
                        "expanded directory"
                    );
                }
            }
        }

        expansion
    }

    /// Walk a directory with walkdir, without any ignore files
    fn walk_plain(&self, dir: &Path, expansion: &mut Expansion, seen: &mut HashSet<PathBuf>) {
        let walker = WalkDir::new(dir).follow_links(true).sort_by_file_name();

        for item in walker {
            match item {
                Ok(entry) => {
                    if entry.file_type().is_file() {
                        expansion.push_file(seen, entry.into_path());
                    }
                }
                Err(err) => {
                    let path = err.path().unwrap_or(dir).to_path_buf();
                    let reason = if err.loop_ancestor().is_some() {
                        SkipReason::SymlinkLoop
                    } else {
                        err.io_error()
                            .map(SkipReason::from_io)
                            .unwrap_or(SkipReason::ReadError)
                    };
                    expansion.push_warning(Skipped::new(path, reason).with_detail(err.to_string()));
                }
            }
        }
    }

    /// Walk a directory with the `ignore` crate so that ignore files are honored
    fn walk_with_ignore(&self, dir: &Path, expansion: &mut Expansion, seen: &mut HashSet<PathBuf>) {
        let walker = WalkBuilder::new(dir)
            .standard_filters(false)
            .git_ignore(true)
            .git_exclude(true)
            .ignore(true)
            .parents(true)
            .require_git(false)
            .follow_links(true)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for item in walker {
            match item {
                Ok(entry) => {
                    if entry.file_type().map_or(false, |ft| ft.is_file()) {
                        expansion.push_file(seen, entry.into_path());
                    }
                }
                Err(err) => {
                    let path = error_path(&err).unwrap_or_else(|| dir.to_path_buf());
                    let reason = error_reason(&err);
                    expansion.push_warning(Skipped::new(path, reason).with_detail(err.to_string()));
                }
            }
        }
    }
}

/// Find the path an `ignore` error refers to
fn error_path(err: &ignore::Error) -> Option<PathBuf> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.clone()),
        ignore::Error::Loop { child, .. } => Some(child.clone()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        _ => None,
    }
}

/// Map an `ignore` error onto a skip reason
fn error_reason(err: &ignore::Error) -> SkipReason {
    match err {
        ignore::Error::Loop { .. } => SkipReason::SymlinkLoop,
        ignore::Error::WithPath { err, .. }
        | ignore::Error::WithDepth { err, .. }
        | ignore::Error::WithLineNumber { err, .. } => error_reason(err),
        ignore::Error::Io(io_err) => SkipReason::from_io(io_err),
        _ => SkipReason::ReadError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use tempfile::tempdir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn test_expand_only_emits_files() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("a/b/c.txt"));
        touch(&dir.path().join("a/d.txt"));
        fs::create_dir_all(dir.path().join("empty")).unwrap();

        let expansion = Walker::default().expand(&[PathEntry::directory(dir.path())]);

        assert_eq!(
            expansion.files,
            vec![dir.path().join("a/b/c.txt"), dir.path().join("a/d.txt")]
        );
        assert!(expansion.files.iter().all(|p| p.is_file()));
        assert!(expansion.warnings.is_empty());
    }

    #[test]
    fn test_expand_deduplicates_overlapping_entries() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("src/main.rs");
        touch(&file);
        touch(&dir.path().join("src/lib.rs"));

        let entries = vec![
            PathEntry::file(&file),
            PathEntry::directory(dir.path().join("src")),
            PathEntry::directory(dir.path()),
        ];
        let expansion = Walker::default().expand(&entries);

        assert_eq!(
            expansion.files,
            vec![file.clone(), dir.path().join("src/lib.rs")]
        );
    }

    #[test]
    fn test_expand_keeps_entry_order() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("z.txt"));
        touch(&dir.path().join("a.txt"));

        let entries = vec![
            PathEntry::file(dir.path().join("z.txt")),
            PathEntry::file(dir.path().join("a.txt")),
        ];
        let expansion = Walker::default().expand(&entries);
        assert_eq!(
            expansion.files,
            vec![dir.path().join("z.txt"), dir.path().join("a.txt")]
        );
    }

    #[test]
    fn test_missing_directory_is_a_warning() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("ok.txt"));

        let entries = vec![
            PathEntry::directory(dir.path().join("missing")),
            PathEntry::file(dir.path().join("ok.txt")),
        ];
        let expansion = Walker::default().expand(&entries);

        assert_eq!(expansion.files, vec![dir.path().join("ok.txt")]);
        assert_eq!(expansion.warnings.len(), 1);
        assert_eq!(expansion.warnings[0].reason, SkipReason::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_loop_terminates() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("a/file.txt"));
        std::os::unix::fs::symlink(dir.path().join("a"), dir.path().join("a/back")).unwrap();

        for respect_gitignore in [false, true] {
            let expansion =
                Walker::new(respect_gitignore).expand(&[PathEntry::directory(dir.path())]);

            assert_eq!(expansion.files, vec![dir.path().join("a/file.txt")]);
            assert!(expansion
                .warnings
                .iter()
                .any(|w| w.reason == SkipReason::SymlinkLoop));
        }
    }

    #[test]
    fn test_respect_gitignore() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".gitignore"), "*.log\n").unwrap();
        touch(&dir.path().join("keep.txt"));
        touch(&dir.path().join("debug.log"));

        let plain = Walker::new(false).expand(&[PathEntry::directory(dir.path())]);
        assert!(plain.files.contains(&dir.path().join("debug.log")));

        let ignoring = Walker::new(true).expand(&[PathEntry::directory(dir.path())]);
        assert!(ignoring.files.contains(&dir.path().join("keep.txt")));
        assert!(!ignoring.files.contains(&dir.path().join("debug.log")));
    }
}
