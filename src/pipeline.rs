/*!
 * The selection, filtering and aggregation pipeline
 *
 * Stages run one after the other on the whole batch:
 * `Selected -> Expanded -> WhitelistFiltered -> IgnoreFiltered -> Classified -> Read -> Joined`.
 * An empty stage ends the run with a [`Termination`]. Per-file failures are
 * collected as [`Skipped`] records and never abort the run.
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use strum::Display;
use tracing::{debug, info};

use crate::classifier::{classify, read_content, Classification};
use crate::config::Configuration;
use crate::error::Result;
use crate::formatter;
use crate::matcher::{filter, relative_path, FilterMode, PathMatcher};
use crate::progress::{ProgressReporter, ProgressUpdate, StageProgress};
use crate::types::{FileRecord, FormattedBlock, PathEntry, Skipped};
use crate::walker::Walker;

/// Why a run produced no output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Termination {
    /// The selection was empty
    #[strum(to_string = "No files or folders selected")]
    NothingSelected,
    /// Expansion yielded no files
    #[strum(to_string = "No files found in the selection")]
    NoFilesFound,
    /// No file matched a whitelist pattern
    #[strum(to_string = "No files match the whitelist patterns")]
    NoWhitelistMatch,
    /// Every file matched an ignore pattern
    #[strum(to_string = "All files are excluded by ignore patterns")]
    AllIgnored,
    /// Every file was skipped by classification
    #[strum(to_string = "No valid files to copy")]
    NoEligibleFiles,
    /// Every read failed
    #[strum(to_string = "No content to copy")]
    NoContent,
}

/// End state of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Blocks were joined into the output text
    Joined(String),
    /// The run stopped early
    Terminated(Termination),
}

/// Number of files left after each stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageCounts {
    pub selected: usize,
    pub expanded: usize,
    pub whitelisted: usize,
    pub after_ignore: usize,
    pub eligible: usize,
    pub read: usize,
}

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Joined text or the reason there is none
    pub outcome: Outcome,
    /// Blocks in canonical order
    pub blocks: Vec<FormattedBlock>,
    /// Entries and files that were dropped, with reasons
    pub skipped: Vec<Skipped>,
    /// Per-stage counts
    pub counts: StageCounts,
    /// Wall time of the run
    pub duration: Duration,
}

impl PipelineResult {
    fn new() -> Self {
        Self {
            outcome: Outcome::Terminated(Termination::NothingSelected),
            blocks: Vec::new(),
            skipped: Vec::new(),
            counts: StageCounts::default(),
            duration: Duration::ZERO,
        }
    }

    /// The joined output, if any
    pub fn text(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Joined(text) => Some(text.as_str()),
            Outcome::Terminated(_) => None,
        }
    }

    /// The early termination, if any
    pub fn termination(&self) -> Option<Termination> {
        match self.outcome {
            Outcome::Joined(_) => None,
            Outcome::Terminated(termination) => Some(termination),
        }
    }

    /// Number of files in the output
    pub fn included(&self) -> usize {
        self.blocks.len()
    }

    /// One-line user-facing summary
    pub fn summary(&self) -> String {
        let skipped = if self.skipped.is_empty() {
            String::new()
        } else {
            format!(" ({} skipped)", self.skipped.len())
        };
        match &self.outcome {
            Outcome::Joined(_) => format!("{} files collected{}", self.included(), skipped),
            Outcome::Terminated(termination) => format!("{}{}", termination, skipped),
        }
    }
}

/// Runs the stages for one selection
pub struct Pipeline {
    config: Configuration,
    whitelist: PathMatcher,
    ignore: PathMatcher,
    reporter: Arc<dyn ProgressReporter>,
}

impl Pipeline {
    /// Create a pipeline.
    ///
    /// Fails if a whitelist or ignore pattern is not a valid glob.
    pub fn new(config: Configuration, reporter: Arc<dyn ProgressReporter>) -> Result<Self> {
        let whitelist = PathMatcher::new(&config.whitelist_patterns)?;
        let ignore = PathMatcher::new(config.effective_ignore_patterns())?;
        debug!(
            whitelist = whitelist.len(),
            ignore = ignore.len(),
            max_file_size = config.max_file_size_bytes,
            "pipeline configured"
        );

        Ok(Self {
            config,
            whitelist,
            ignore,
            reporter,
        })
    }

    /// Run all stages over the selection
    pub fn run(&self, entries: &[PathEntry]) -> Result<PipelineResult> {
        let start = Instant::now();
        let mut result = PipelineResult::new();
        let outcome = self.run_stages(entries, &mut result)?;

        if let Outcome::Terminated(termination) = &outcome {
            info!(%termination, skipped = result.skipped.len(), "pipeline stopped early");
        } else {
            info!(
                files = result.blocks.len(),
                skipped = result.skipped.len(),
                "pipeline finished"
            );
        }
        self.progress(100.0, result_message(&outcome));

        result.outcome = outcome;
        result.duration = start.elapsed();
        Ok(result)
    }

    fn run_stages(&self, entries: &[PathEntry], result: &mut PipelineResult) -> Result<Outcome> {
        let root = self.config.root.as_deref();

        // Selected
        result.counts.selected = entries.len();
        if entries.is_empty() {
            return Ok(Outcome::Terminated(Termination::NothingSelected));
        }

        // Expanded
        self.progress(0.0, format!("Expanding {} entries...", entries.len()));
        let expansion = Walker::new(self.config.respect_gitignore).expand(entries);
        result.skipped.extend(expansion.warnings);
        let files = expansion.files;
        result.counts.expanded = files.len();
        debug!(files = files.len(), "expanded selection");
        if files.is_empty() {
            return Ok(Outcome::Terminated(Termination::NoFilesFound));
        }

        // WhitelistFiltered
        let files = if self.whitelist.is_empty() {
            files
        } else {
            filter(&files, &self.whitelist, root, FilterMode::Include)
        };
        result.counts.whitelisted = files.len();
        if files.is_empty() {
            return Ok(Outcome::Terminated(Termination::NoWhitelistMatch));
        }

        // IgnoreFiltered
        let files = filter(&files, &self.ignore, root, FilterMode::Exclude);
        result.counts.after_ignore = files.len();
        debug!(files = files.len(), "filtered selection");
        if files.is_empty() {
            return Ok(Outcome::Terminated(Termination::AllIgnored));
        }

        let pool = self.thread_pool()?;

        // Classified
        let records = self.classify_all(&pool, &files, root, result);
        result.counts.eligible = records.len();
        if records.is_empty() {
            return Ok(Outcome::Terminated(Termination::NoEligibleFiles));
        }

        // Read
        let stage = StageProgress::new(self.reporter.as_ref(), "Reading", 50.0, 50.0, records.len());
        stage.begin();
        let read: Vec<std::result::Result<FormattedBlock, Skipped>> = pool.install(|| {
            records
                .into_par_iter()
                .map(|mut record| {
                    let outcome = match read_content(&mut record) {
                        Ok(()) => {
                            let content = record.content.take().unwrap_or_default();
                            Ok(formatter::format(&record.relative_path, &content))
                        }
                        Err((reason, err)) => {
                            Err(Skipped::new(record.path, reason).with_detail(err.to_string()))
                        }
                    };
                    stage.file_done(&record.relative_path);
                    outcome
                })
                .collect()
        });

        for item in read {
            match item {
                Ok(block) => result.blocks.push(block),
                Err(skipped) => {
                    debug!(path = %skipped.path.display(), reason = %skipped.reason, "read failed");
                    result.skipped.push(skipped);
                }
            }
        }
        result.counts.read = result.blocks.len();
        if result.blocks.is_empty() {
            return Ok(Outcome::Terminated(Termination::NoContent));
        }

        // Joined
        Ok(Outcome::Joined(formatter::join(&result.blocks)))
    }

    /// Classify every file in parallel, keeping canonical order
    fn classify_all(
        &self,
        pool: &ThreadPool,
        files: &[PathBuf],
        root: Option<&Path>,
        result: &mut PipelineResult,
    ) -> Vec<FileRecord> {
        let max_file_size = self.config.max_file_size_bytes;
        let stage = StageProgress::new(self.reporter.as_ref(), "Checking", 0.0, 50.0, files.len());
        stage.begin();

        let classified: Vec<Classification> = pool.install(|| {
            files
                .par_iter()
                .map(|path| {
                    let classification = classify(path, root, max_file_size);
                    stage.file_done(&relative_path(path, root));
                    classification
                })
                .collect()
        });

        let mut records = Vec::with_capacity(classified.len());
        for (path, classification) in files.iter().zip(classified) {
            match classification {
                Classification::Eligible(record) => records.push(record),
                Classification::Skip(reason) => {
                    result.skipped.push(Skipped::new(path.clone(), reason));
                }
            }
        }
        records
    }

    fn thread_pool(&self) -> Result<ThreadPool> {
        Ok(ThreadPoolBuilder::new()
            .num_threads(self.config.concurrency)
            .thread_name(|i| format!("clipcat-worker-{}", i))
            .build()?)
    }

    fn progress(&self, percent: f64, message: impl Into<String>) {
        self.reporter.report(ProgressUpdate {
            percent,
            message: message.into(),
        });
    }
}

fn result_message(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Joined(_) => "Done".to_string(),
        Outcome::Terminated(termination) => termination.to_string(),
    }
}
