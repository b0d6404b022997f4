/*!
 * Glob matching for whitelist and ignore patterns
 *
 * Patterns follow gitignore conventions without negation:
 * - a pattern without `/` matches at any depth (`*.rs` matches `src/lib.rs`)
 * - a leading `/` anchors the pattern to the root
 * - a trailing `/` only matches directories
 * - a path matches when the path itself or any of its parent directories matches
 *
 * `*` and `?` never cross a `/`, `**` spans any number of segments and
 * dotfiles are not treated specially.
 */

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::{debug, warn};

use crate::error::{ClipcatError, Result};

/// Whether matching paths are kept or dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Keep only paths matching at least one pattern
    Include,
    /// Drop every path matching at least one pattern
    Exclude,
}

/// A compiled list of glob patterns
#[derive(Debug, Clone)]
pub struct PathMatcher {
    /// Patterns that may match files or directories
    any: GlobSet,
    /// Patterns written with a trailing `/`
    dirs_only: GlobSet,
    /// Number of patterns that were compiled
    len: usize,
}

impl PathMatcher {
    /// Compile a list of patterns.
    ///
    /// Blank lines and `#` comments are skipped. Negated patterns (`!foo`) are
    /// not supported; they are logged and dropped.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut any = GlobSetBuilder::new();
        let mut dirs_only = GlobSetBuilder::new();
        let mut len = 0;

        for pattern in patterns {
            let pattern = pattern.as_ref().trim();
            if pattern.is_empty() || pattern.starts_with('#') {
                continue;
            }
            if pattern.starts_with('!') {
                warn!(pattern, "negated patterns are not supported, ignoring");
                continue;
            }

            let dir_only = pattern.ends_with('/');
            let body = pattern.trim_end_matches('/');
            let glob_text = if let Some(anchored) = body.strip_prefix('/') {
                anchored.to_string()
            } else if body.contains('/') {
                body.to_string()
            } else {
                format!("**/{}", body)
            };

            let glob = GlobBuilder::new(&glob_text)
                .literal_separator(true)
                .build()
                .map_err(|source| ClipcatError::Pattern {
                    pattern: pattern.to_string(),
                    source,
                })?;

            if dir_only {
                dirs_only.add(glob);
            } else {
                any.add(glob);
            }
            len += 1;
        }

        let build = |builder: GlobSetBuilder| {
            builder.build().map_err(|source| ClipcatError::Pattern {
                pattern: "<set>".to_string(),
                source,
            })
        };

        Ok(Self {
            any: build(any)?,
            dirs_only: build(dirs_only)?,
            len,
        })
    }

    /// Number of usable patterns
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no usable pattern was given
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check a `/`-separated path (relative to the root) against the patterns
    pub fn is_match(&self, path: &str) -> bool {
        if self.any.is_match(path) {
            return true;
        }

        // Walk up the parent directories
        let mut end = path.len();
        while let Some(idx) = path[..end].rfind('/') {
            let parent = &path[..idx];
            if !parent.is_empty() && (self.any.is_match(parent) || self.dirs_only.is_match(parent))
            {
                return true;
            }
            end = idx;
        }

        false
    }
}

/// Make `path` relative to `root` using `/` separators.
///
/// Without a root, or for paths outside of it, the path is used verbatim.
pub fn relative_path(path: &Path, root: Option<&Path>) -> String {
    let rel = root
        .and_then(|root| path.strip_prefix(root).ok())
        .unwrap_or(path);
    let text = rel.to_string_lossy();
    if MAIN_SEPARATOR == '/' {
        text.into_owned()
    } else {
        text.replace(MAIN_SEPARATOR, "/")
    }
}

/// Filter paths through a matcher without changing their order
pub fn filter(
    paths: &[PathBuf],
    matcher: &PathMatcher,
    root: Option<&Path>,
    mode: FilterMode,
) -> Vec<PathBuf> {
    paths
        .iter()
        .filter(|path| {
            let rel = relative_path(path, root);
            let matched = matcher.is_match(&rel);
            debug!(path = %rel, matched, ?mode, "pattern check");
            match mode {
                FilterMode::Include => matched,
                FilterMode::Exclude => !matched,
            }
        })
        .cloned()
        .collect()
}
