/*!
 * Command-line interface for clipcat
 */

use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use clipcat::config::{Args, Configuration};
use clipcat::pipeline::Pipeline;
use clipcat::report::{ReportFormat, Reporter};
use clipcat::selection::{ExplicitArgs, InteractiveDialog, OpenDocuments, SelectionSource};
use clipcat::sink::{ClipboardSink, FileSink, Sink, WriterSink};

fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        clap_complete::generate(shell, &mut Args::command(), "clipcat", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("clipcat=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> clipcat::Result<()> {
    // Create configuration
    let config = Configuration::from_args(args)?;
    let cwd = std::env::current_dir()?;

    // Resolve the selection once, before the pipeline starts
    let mut source: Box<dyn SelectionSource> = if !args.paths.is_empty() {
        Box::new(ExplicitArgs::new(&cwd, args.paths.clone()))
    } else if let Some(list) = &args.open_documents {
        Box::new(OpenDocuments::new(&cwd, list))
    } else {
        Box::new(InteractiveDialog::stdio(&cwd))
    };
    let entries = source.resolve()?;

    let mut sink: Box<dyn Sink> = if let Some(path) = &args.output {
        Box::new(FileSink::new(path))
    } else if args.stdout {
        Box::new(WriterSink::stdout())
    } else {
        Box::new(ClipboardSink)
    };

    // Create progress bar
    let progress = ProgressBar::new(100);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {percent:>3}% {wide_msg:.dim.white}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-"),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_prefix("📋 Collecting");
    let progress = Arc::new(progress);

    let pipeline = Pipeline::new(config, progress.clone())?;
    let result = pipeline.run(&entries)?;
    progress.finish_and_clear();

    if let Some(text) = result.text() {
        sink.accept(text)?;
    }

    if !args.no_report {
        let reporter = Reporter::new(ReportFormat::ConsoleTable);
        reporter.print_report(&result, &sink.describe());
    }

    match result.termination() {
        None => eprintln!("✅ {} and copied to {}", result.summary(), sink.describe()),
        Some(_) => eprintln!("ℹ️  {}", result.summary()),
    }

    Ok(())
}
