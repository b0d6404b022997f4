/*!
 * Rendering of files into path-delimited text blocks
 *
 * A block looks like:
 *
 * ```text
 * === START OF FILE: src/lib.rs ===
 * <content verbatim>
 * === END OF FILE: src/lib.rs ===
 * ```
 *
 * Blocks are joined with a blank line. [`parse`] recovers the original pairs
 * as long as no content contains the marker lines itself.
 */

use crate::types::FormattedBlock;

/// Separator placed between two blocks
pub const BLOCK_SEPARATOR: &str = "\n\n";

const START_PREFIX: &str = "=== START OF FILE: ";
const END_PREFIX: &str = "=== END OF FILE: ";
const MARKER_SUFFIX: &str = " ===";

/// Render one file into a block
pub fn format(relative_path: &str, content: &str) -> FormattedBlock {
    let text = format!(
        "{START_PREFIX}{relative_path}{MARKER_SUFFIX}\n{content}\n{END_PREFIX}{relative_path}{MARKER_SUFFIX}"
    );

    FormattedBlock {
        relative_path: relative_path.to_string(),
        text,
        lines: content.lines().count(),
        chars: content.chars().count(),
    }
}

/// Join blocks in the order given
pub fn join(blocks: &[FormattedBlock]) -> String {
    blocks
        .iter()
        .map(|block| block.text.as_str())
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

/// Split joined output back into `(path, content)` pairs.
///
/// Text outside of blocks is ignored. A start marker without its end marker
/// stops parsing.
pub fn parse(output: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut rest = output;

    while let Some(start) = rest.find(START_PREFIX) {
        let after_prefix = &rest[start + START_PREFIX.len()..];
        let Some(header_end) = after_prefix.find(&format!("{MARKER_SUFFIX}\n")) else {
            break;
        };
        let path = &after_prefix[..header_end];
        let body = &after_prefix[header_end + MARKER_SUFFIX.len() + 1..];

        let end_marker = format!("\n{END_PREFIX}{path}{MARKER_SUFFIX}");
        let Some(content_end) = body.find(&end_marker) else {
            break;
        };

        pairs.push((path.to_string(), body[..content_end].to_string()));
        rest = &body[content_end + end_marker.len()..];
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_shape() {
        let block = format("src/a.rs", "fn a() {}\n");
        assert_eq!(
            block.text,
            "=== START OF FILE: src/a.rs ===\nfn a() {}\n\n=== END OF FILE: src/a.rs ==="
        );
        assert_eq!(block.lines, 1);
        assert_eq!(block.chars, 10);
    }

    #[test]
    fn test_join_uses_blank_line() {
        let joined = join(&[format("a", "1"), format("b", "2")]);
        assert_eq!(
            joined,
            "=== START OF FILE: a ===\n1\n=== END OF FILE: a ===\n\n=== START OF FILE: b ===\n2\n=== END OF FILE: b ==="
        );
    }

    #[test]
    fn test_parse_round_trip() {
        let files = vec![
            ("README.md", "# Title\n\nSome text\n"),
            ("empty.txt", ""),
            ("src/main.rs", "fn main() {\n    println!(\"===\");\n}"),
            ("notes/trailing.txt", "line\n\n\n"),
            ("weird name.txt", "=== START OF nothing ===\n"),
        ];

        let blocks: Vec<_> = files.iter().map(|(p, c)| format(p, c)).collect();
        let parsed = parse(&join(&blocks));

        let expected: Vec<(String, String)> = files
            .iter()
            .map(|(p, c)| (p.to_string(), c.to_string()))
            .collect();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_parse_ignores_incomplete_block() {
        let text = "=== START OF FILE: a ===\nno end marker";
        assert!(parse(text).is_empty());
    }
}
