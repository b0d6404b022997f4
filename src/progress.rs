/*!
 * Progress reporting for pipeline runs
 *
 * Reporters only observe. A pipeline produces the same output with any
 * reporter, including [`NoProgress`].
 */

use std::sync::Mutex;

use indicatif::ProgressBar;

/// A single progress notification
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    /// Overall completion, 0.0 to 100.0
    pub percent: f64,
    /// Human readable description of the current step
    pub message: String,
}

/// Observer for pipeline progress
pub trait ProgressReporter: Send + Sync {
    /// Receive one update
    fn report(&self, update: ProgressUpdate);
}

/// Reporter that drops every update
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _update: ProgressUpdate) {}
}

/// Drives an indicatif bar whose length is 100
impl ProgressReporter for ProgressBar {
    fn report(&self, update: ProgressUpdate) {
        self.set_position(update.percent.round().clamp(0.0, 100.0) as u64);

        // Truncate long messages to avoid display issues
        let message = if update.message.chars().count() > 60 {
            let tail: String = update
                .message
                .chars()
                .rev()
                .take(57)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("...{}", tail)
        } else {
            update.message
        };
        self.set_message(message);
    }
}

/// Per-file progress for one stage, mapped onto a slice of the overall range
pub(crate) struct StageProgress<'a> {
    reporter: &'a dyn ProgressReporter,
    label: &'static str,
    start: f64,
    span: f64,
    total: usize,
    /// Files finished so far, also held while reporting so updates stay ordered
    done: Mutex<usize>,
}

impl<'a> StageProgress<'a> {
    /// Create a stage covering `start..start + span` percent
    pub(crate) fn new(
        reporter: &'a dyn ProgressReporter,
        label: &'static str,
        start: f64,
        span: f64,
        total: usize,
    ) -> Self {
        Self {
            reporter,
            label,
            start,
            span,
            total,
            done: Mutex::new(0),
        }
    }

    /// Report the stage boundary
    pub(crate) fn begin(&self) {
        self.reporter.report(ProgressUpdate {
            percent: self.start,
            message: format!("{} {} files...", self.label, self.total),
        });
    }

    /// Count one finished file
    pub(crate) fn file_done(&self, relative_path: &str) {
        let mut done = self.done.lock().unwrap_or_else(|e| e.into_inner());
        *done += 1;
        let fraction = if self.total == 0 {
            1.0
        } else {
            *done as f64 / self.total as f64
        };
        self.reporter.report(ProgressUpdate {
            percent: self.start + self.span * fraction,
            message: format!("{}: {}", self.label, relative_path),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<ProgressUpdate>>);

    impl ProgressReporter for Recorder {
        fn report(&self, update: ProgressUpdate) {
            self.0.lock().unwrap().push(update);
        }
    }

    #[test]
    fn test_stage_progress_maps_into_span() {
        let recorder = Recorder::default();
        let stage = StageProgress::new(&recorder, "Reading", 50.0, 50.0, 2);

        stage.begin();
        stage.file_done("a.txt");
        stage.file_done("b.txt");

        let updates = recorder.0.lock().unwrap();
        let percents: Vec<f64> = updates.iter().map(|u| u.percent).collect();
        assert_eq!(percents, vec![50.0, 75.0, 100.0]);
        assert_eq!(updates[1].message, "Reading: a.txt");
    }

    #[test]
    fn test_stage_progress_never_moves_backwards() {
        use rayon::prelude::*;

        let recorder = Recorder::default();
        let stage = StageProgress::new(&recorder, "Checking", 0.0, 50.0, 2000);

        let pool = rayon::ThreadPoolBuilder::new().num_threads(8).build().unwrap();
        pool.install(|| {
            (0..2000).into_par_iter().for_each(|i| {
                stage.file_done(&format!("f{}.txt", i));
            })
        });

        let updates = recorder.0.lock().unwrap();
        assert_eq!(updates.len(), 2000);
        assert!(updates.windows(2).all(|w| w[0].percent < w[1].percent));
        assert_eq!(updates.last().map(|u| u.percent), Some(50.0));
    }

    #[test]
    fn test_progress_bar_reporter() {
        let bar = ProgressBar::hidden();
        bar.set_length(100);
        bar.report(ProgressUpdate {
            percent: 42.4,
            message: "x".repeat(100),
        });
        assert_eq!(bar.position(), 42);
        assert_eq!(bar.message().chars().count(), 60);
    }
}
