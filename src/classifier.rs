/*!
 * Per-file eligibility checks: existence, size ceiling and binary sniffing
 */

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use tracing::{debug, warn};

use crate::matcher::relative_path;
use crate::types::{FileRecord, SkipReason};
use crate::utils::format_file_size;

/// Number of leading bytes inspected by [`looks_binary`]
pub const SNIFF_LEN: usize = 8192;

/// Result of classifying a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The file may be read and emitted
    Eligible(FileRecord),
    /// The file is dropped
    Skip(SkipReason),
}

/// Classify one file.
///
/// The size check happens on metadata alone, so oversized files are never
/// opened. Only files within the ceiling are sniffed for binary content.
pub fn classify(path: &Path, root: Option<&Path>, max_file_size: u64) -> Classification {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "stat failed");
            return Classification::Skip(SkipReason::from_io(&err));
        }
    };

    if !metadata.is_file() {
        debug!(path = %path.display(), "not a regular file");
        return Classification::Skip(SkipReason::ReadError);
    }

    let size = metadata.len();
    if size > max_file_size {
        debug!(
            path = %path.display(),
            size = %format_file_size(size),
            limit = %format_file_size(max_file_size),
            "file too large"
        );
        return Classification::Skip(SkipReason::TooLarge);
    }

    let is_binary = match sniff(path) {
        Ok(is_binary) => is_binary,
        Err(err) => {
            // Unreadable prefix counts as text; the read stage reports the real error
            warn!(path = %path.display(), error = %err, "binary sniff failed");
            false
        }
    };

    if is_binary {
        debug!(path = %path.display(), "binary file");
        return Classification::Skip(SkipReason::Binary);
    }

    Classification::Eligible(FileRecord {
        path: path.to_path_buf(),
        relative_path: relative_path(path, root),
        size,
        is_binary,
        content: None,
    })
}

/// Read the bounded prefix of a file and check it
fn sniff(path: &Path) -> io::Result<bool> {
    let file = File::open(path)?;
    let mut buffer = Vec::with_capacity(SNIFF_LEN);
    file.take(SNIFF_LEN as u64).read_to_end(&mut buffer)?;
    Ok(looks_binary(&buffer))
}

/// Heuristic text/binary check on a content prefix.
///
/// Binary means: a NUL byte, invalid UTF-8 (a multi-byte character cut off at
/// the end of the prefix is fine), or more than 10% control characters other
/// than common whitespace.
pub fn looks_binary(prefix: &[u8]) -> bool {
    if prefix.is_empty() {
        return false;
    }

    if prefix.contains(&0) {
        return true;
    }

    if let Err(err) = std::str::from_utf8(prefix) {
        // error_len() is None only for a truncated sequence at the very end
        if err.error_len().is_some() {
            return true;
        }
    }

    // Count control characters (0x00-0x08, 0x0E-0x1F)
    let control = prefix
        .iter()
        .filter(|&&b| b < 9 || (b > 13 && b < 32))
        .count();
    let ratio = control as f32 / prefix.len() as f32;

    ratio > 0.1
}

/// Read the full content of an eligible file.
///
/// Invalid UTF-8 past the sniffed prefix is replaced rather than rejected.
pub fn read_content(record: &mut FileRecord) -> Result<(), (SkipReason, io::Error)> {
    match fs::read(&record.path) {
        Ok(bytes) => {
            let content = match String::from_utf8(bytes) {
                Ok(content) => content,
                Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
            };
            record.content = Some(content);
            Ok(())
        }
        Err(err) => Err((SkipReason::from_io(&err), err)),
    }
}
