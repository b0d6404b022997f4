/*!
 * Configuration handling for clipcat
 */

use std::fs;
use std::path::{Component, Path, PathBuf};

use clap::Parser;
use clap_complete::Shell;
use serde::Deserialize;
use tracing::debug;

use crate::error::Result;
use crate::utils::{megabytes_to_bytes, BASELINE_IGNORE};
use crate::{bail, ensure};

/// Default size ceiling in megabytes
pub const DEFAULT_MAX_FILE_SIZE_MB: f64 = 0.5;

/// File looked up in the root when no `--config` is given
pub const CONFIG_FILE_NAME: &str = "clipcat.json";

/// Command-line arguments for clipcat
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "clipcat",
    version = env!("CARGO_PKG_VERSION"),
    about = "Concatenate files into one path-annotated text blob",
    long_about = "Expands the selected files and directories, filters them through whitelist and ignore patterns, skips binary and oversized files, and copies the concatenated contents (each file wrapped in START/END markers with its path) to the clipboard."
)]
pub struct Args {
    /// Files and directories to collect
    pub paths: Vec<PathBuf>,

    /// Workspace root that patterns and printed paths are relative to
    #[clap(long)]
    pub root: Option<PathBuf>,

    /// JSON configuration file (defaults to clipcat.json in the root, if present)
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Comma-separated list of patterns a file must match to be included
    #[clap(long, value_delimiter = ',')]
    pub whitelist: Vec<String>,

    /// Comma-separated list of patterns to ignore
    #[clap(long, value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Maximum file size in megabytes
    #[clap(long)]
    pub max_size_mb: Option<f64>,

    /// Number of threads used to check and read files (0 = number of CPUs)
    #[clap(long, default_value = "0")]
    pub threads: usize,

    /// Respect .gitignore files inside selected directories
    #[clap(long)]
    pub respect_gitignore: bool,

    /// Newline-separated list of open documents to collect
    #[clap(long, value_name = "FILE")]
    pub open_documents: Option<PathBuf>,

    /// Write the result to a file instead of the clipboard
    #[clap(long, short = 'o', conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Write the result to stdout instead of the clipboard
    #[clap(long)]
    pub stdout: bool,

    /// Do not print the summary tables
    #[clap(long)]
    pub no_report: bool,

    /// Enable debug logging
    #[clap(long, short = 'v')]
    pub verbose: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Settings persisted in a JSON configuration file
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigFile {
    /// Patterns a file must match to be included
    pub whitelist_patterns: Vec<String>,
    /// Patterns to ignore, added to the baseline list
    pub ignore_patterns: Vec<String>,
    /// Size ceiling in megabytes
    #[serde(rename = "maxFileSizeMB")]
    pub max_file_size_mb: Option<f64>,
}

impl ConfigFile {
    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => bail!(Config, "Cannot read {}: {}", path.display(), e),
        };
        let file: Self = serde_json::from_str(&text)?;
        debug!(path = %path.display(), ?file, "loaded configuration file");
        Ok(file)
    }
}

/// Pipeline configuration, passed explicitly into every run
#[derive(Clone, Debug, PartialEq)]
pub struct Configuration {
    /// Root that patterns and printed paths are relative to
    pub root: Option<PathBuf>,

    /// Patterns a file must match to be included (if empty, include all)
    pub whitelist_patterns: Vec<String>,

    /// User patterns to ignore; the baseline list is always added
    pub ignore_patterns: Vec<String>,

    /// Files larger than this many bytes are skipped
    pub max_file_size_bytes: u64,

    /// Worker threads for classification and reading (0 = number of CPUs)
    pub concurrency: usize,

    /// Whether to respect .gitignore files while expanding directories
    pub respect_gitignore: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            root: None,
            whitelist_patterns: Vec::new(),
            ignore_patterns: Vec::new(),
            max_file_size_bytes: megabytes_to_bytes(DEFAULT_MAX_FILE_SIZE_MB),
            concurrency: 0,
            respect_gitignore: false,
        }
    }
}

impl Configuration {
    /// Build the configuration from command-line arguments.
    ///
    /// The configuration file is read first; CLI patterns are appended to its
    /// lists and a CLI size overrides its size.
    pub fn from_args(args: &Args) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let root = absolute(&cwd, args.root.as_deref().unwrap_or(&cwd));

        let file = match &args.config {
            Some(path) => ConfigFile::load(&absolute(&cwd, path))?,
            None => {
                let default_path = root.join(CONFIG_FILE_NAME);
                if default_path.is_file() {
                    ConfigFile::load(&default_path)?
                } else {
                    ConfigFile::default()
                }
            }
        };

        let mut config = Self::default().with_file(file);
        config.root = Some(root);
        config
            .whitelist_patterns
            .extend(args.whitelist.iter().cloned());
        config.ignore_patterns.extend(args.ignore.iter().cloned());
        if let Some(mb) = args.max_size_mb {
            config.max_file_size_bytes = megabytes_to_bytes(mb);
        }
        config.concurrency = args.threads;
        config.respect_gitignore = args.respect_gitignore;

        config.validate()?;
        Ok(config)
    }

    /// Apply the settings of a configuration file
    pub fn with_file(mut self, file: ConfigFile) -> Self {
        self.whitelist_patterns = file.whitelist_patterns;
        self.ignore_patterns = file.ignore_patterns;
        if let Some(mb) = file.max_file_size_mb {
            self.max_file_size_bytes = megabytes_to_bytes(mb);
        }
        self
    }

    /// Baseline ignore patterns followed by the user's
    pub fn effective_ignore_patterns(&self) -> Vec<String> {
        BASELINE_IGNORE
            .iter()
            .map(|p| p.to_string())
            .chain(self.ignore_patterns.iter().cloned())
            .collect()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(root) = &self.root {
            ensure!(
                root.is_dir(),
                Config,
                "Root directory not found: {}",
                root.display()
            );
        }
        Ok(())
    }
}

/// Resolve `path` against `base` when it is relative.
///
/// `.` and `..` segments are resolved lexically, so two spellings of the same
/// path compare equal. Symlinks are not resolved.
pub fn absolute(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last_is_normal = matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                );
                if last_is_normal {
                    normalized.pop();
                } else if !normalized.has_root() {
                    // `..` above the root stays at the root
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}
