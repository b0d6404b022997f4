/*!
 * Utility functions for clipcat
 */

use once_cell::sync::Lazy;

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

/// Convert a size in megabytes (1 MB = 1024 * 1024 bytes) into bytes
pub fn megabytes_to_bytes(megabytes: f64) -> u64 {
    (megabytes.max(0.0) * 1024.0 * 1024.0) as u64
}

/// Bumped whenever [`BASELINE_IGNORE`] changes
pub const BASELINE_IGNORE_VERSION: u32 = 1;

/// Patterns that are always ignored, in addition to user patterns
pub static BASELINE_IGNORE: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // Version Control
        ".git/",
        ".svn/",
        ".hg/",
        ".bzr/",
        // OS Files
        ".DS_Store",
        "Thumbs.db",
        "desktop.ini",
        // Dependencies
        "node_modules/",
        "bower_components/",
        ".pnpm-store/",
        ".yarn/",
        // Lock files
        "package-lock.json",
        "yarn.lock",
        "pnpm-lock.yaml",
        "composer.lock",
        "Cargo.lock",
        "Gemfile.lock",
        "poetry.lock",
        // Python
        "__pycache__/",
        ".pytest_cache/",
        ".venv/",
        "*.pyc",
        // Caches
        ".cache/",
        ".sass-cache/",
        ".eslintcache",
        // Minified bundles
        "*.min.js",
        "*.min.css",
    ]
});
