/*!
 * Reporting functionality for clipcat
 *
 * Renders the end-of-run summary with tabled: the included files, the
 * skipped files with their reasons, and overall totals.
 */

use std::collections::HashMap;

use strum::IntoEnumIterator;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::pipeline::PipelineResult;
use crate::types::SkipReason;

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for pipeline results
pub struct Reporter {
    format: ReportFormat,
    /// Included files beyond this count are summarised
    max_rows: usize,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self {
            format,
            max_rows: 15,
        }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate the report text
    pub fn generate_report(&self, result: &PipelineResult, destination: &str) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(result, destination),
        }
    }

    /// Print the report to stderr, keeping stdout free for the output itself
    pub fn print_report(&self, result: &PipelineResult, destination: &str) {
        eprintln!("\n{}", self.generate_report(result, destination));
    }

    // Shorten long paths from the left, keeping whole trailing segments
    fn format_path(&self, path: &str, max_len: usize) -> String {
        if path.chars().count() <= max_len {
            return path.to_string();
        }

        let mut segments = Vec::new();
        let mut current_len = 3; // "..."
        for part in path.rsplit('/') {
            let part_len = part.chars().count() + 1;
            if current_len + part_len > max_len {
                break;
            }
            segments.push(part);
            current_len += part_len;
        }

        if segments.is_empty() {
            let tail: String = path
                .chars()
                .skip(path.chars().count() - (max_len - 3))
                .collect();
            return format!("...{}", tail);
        }

        segments.reverse();
        format!(".../{}", segments.join("/"))
    }

    fn styled(mut table: Table) -> String {
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));
        table.to_string()
    }

    fn create_files_table(&self, result: &PipelineResult) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Est. Tokens")]
            tokens: String,
        }

        // Largest files first when the list has to be cut
        let mut blocks: Vec<_> = result.blocks.iter().collect();
        if blocks.len() > self.max_rows {
            blocks.sort_by(|a, b| b.chars.cmp(&a.chars));
            blocks.truncate(10);
        }

        let rows: Vec<FileRow> = blocks
            .iter()
            .map(|block| FileRow {
                path: self.format_path(&block.relative_path, 60),
                lines: self.format_number(block.lines),
                tokens: self.format_number(block.estimated_tokens()),
            })
            .collect();

        Self::styled(Table::new(rows))
    }

    fn create_skipped_table(&self, result: &PipelineResult) -> String {
        #[derive(Tabled)]
        struct SkipRow {
            #[tabled(rename = "Skipped Path")]
            path: String,

            #[tabled(rename = "Reason")]
            reason: String,
        }

        let rows: Vec<SkipRow> = result
            .skipped
            .iter()
            .take(self.max_rows)
            .map(|skipped| SkipRow {
                path: self.format_path(&skipped.path.to_string_lossy(), 60),
                reason: skipped.reason.to_string(),
            })
            .collect();

        Self::styled(Table::new(rows))
    }

    fn create_summary_table(&self, result: &PipelineResult, destination: &str) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let total_lines: usize = result.blocks.iter().map(|b| b.lines).sum();
        let total_tokens: usize = result.blocks.iter().map(|b| b.estimated_tokens()).sum();

        let mut rows = vec![
            SummaryRow {
                key: "📋 Destination".to_string(),
                value: destination.to_string(),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", result.duration),
            },
            SummaryRow {
                key: "📂 Files Found".to_string(),
                value: self.format_number(result.counts.expanded),
            },
            SummaryRow {
                key: "📄 Files Included".to_string(),
                value: self.format_number(result.included()),
            },
            SummaryRow {
                key: "📝 Total Lines".to_string(),
                value: self.format_number(total_lines),
            },
            SummaryRow {
                key: "📦 LLM Tokens".to_string(),
                value: format!("{} tokens (estimated)", self.format_number(total_tokens)),
            },
        ];

        let mut by_reason: HashMap<SkipReason, usize> = HashMap::new();
        for skipped in &result.skipped {
            *by_reason.entry(skipped.reason).or_default() += 1;
        }
        for reason in SkipReason::iter() {
            if let Some(count) = by_reason.get(&reason) {
                rows.push(SummaryRow {
                    key: format!("⏭️ Skipped ({})", reason),
                    value: self.format_number(*count),
                });
            }
        }

        Self::styled(Table::new(rows))
    }

    fn generate_console_report(&self, result: &PipelineResult, destination: &str) -> String {
        let mut sections = Vec::new();

        if !result.blocks.is_empty() {
            let title = if result.blocks.len() > self.max_rows {
                "📋  TOP 10 LARGEST FILES BY CHARACTER COUNT  📋"
            } else {
                "📋  INCLUDED FILES"
            };
            sections.push(format!("{}\n{}", title, self.create_files_table(result)));
        }

        if !result.skipped.is_empty() {
            let title = if result.skipped.len() > self.max_rows {
                format!("⚠️  SKIPPED FILES (first {})", self.max_rows)
            } else {
                "⚠️  SKIPPED FILES".to_string()
            };
            sections.push(format!("{}\n{}", title, self.create_skipped_table(result)));
        }

        let summary_title = match result.termination() {
            None => "✅  COPY COMPLETE".to_string(),
            Some(termination) => format!("ℹ️  {}", termination),
        };
        sections.push(format!(
            "{}\n{}",
            summary_title,
            self.create_summary_table(result, destination)
        ));

        sections.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    use crate::formatter;
    use crate::pipeline::{Outcome, StageCounts, Termination};
    use crate::types::Skipped;

    fn result_with(blocks: usize, skipped: Vec<Skipped>) -> PipelineResult {
        let blocks: Vec<_> = (0..blocks)
            .map(|i| formatter::format(&format!("src/file{}.rs", i), &"x".repeat(i * 10)))
            .collect();
        let outcome = if blocks.is_empty() {
            Outcome::Terminated(Termination::NoEligibleFiles)
        } else {
            Outcome::Joined(formatter::join(&blocks))
        };
        PipelineResult {
            outcome,
            blocks,
            skipped,
            counts: StageCounts::default(),
            duration: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_format_number() {
        let reporter = Reporter::new(ReportFormat::ConsoleTable);
        assert_eq!(reporter.format_number(999), "999");
        assert_eq!(reporter.format_number(1_500), "1.5K");
        assert_eq!(reporter.format_number(2_000_000), "2.0M");
    }

    #[test]
    fn test_format_path_truncates_from_left() {
        let reporter = Reporter::new(ReportFormat::ConsoleTable);
        assert_eq!(reporter.format_path("src/lib.rs", 60), "src/lib.rs");

        let long = format!("{}/deep/file.rs", "a".repeat(80));
        assert_eq!(reporter.format_path(&long, 20), ".../deep/file.rs");
    }

    #[test]
    fn test_report_lists_files_and_skips() {
        let reporter = Reporter::new(ReportFormat::ConsoleTable);
        let result = result_with(
            2,
            vec![Skipped::new(PathBuf::from("big.md"), SkipReason::TooLarge)],
        );

        let report = reporter.generate_report(&result, "clipboard");
        assert!(report.contains("src/file1.rs"));
        assert!(report.contains("big.md"));
        assert!(report.contains("too large"));
        assert!(report.contains("COPY COMPLETE"));
        assert!(report.contains("clipboard"));
    }

    #[test]
    fn test_report_for_terminated_run() {
        let reporter = Reporter::new(ReportFormat::ConsoleTable);
        let result = result_with(
            0,
            vec![Skipped::new(PathBuf::from("b.bin"), SkipReason::Binary)],
        );

        let report = reporter.generate_report(&result, "stdout");
        assert!(report.contains("No valid files to copy"));
        assert!(report.contains("Skipped (binary)"));
    }

    #[test]
    fn test_report_truncates_large_file_lists() {
        let reporter = Reporter::new(ReportFormat::ConsoleTable);
        let result = result_with(20, Vec::new());

        let report = reporter.generate_report(&result, "stdout");
        assert!(report.contains("TOP 10 LARGEST FILES"));
        assert!(report.contains("src/file19.rs"));
        assert!(!report.contains("src/file0.rs"));
    }
}
