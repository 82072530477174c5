//! Xtract CLI - Command-line tool for X4: Foundations game file extraction.
//!
//! This is the main entry point for the Xtract command-line application.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use parking_lot::Mutex;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use xtract::cat::DEFAULT_TYPES;
use xtract::prelude::*;

/// Xtract - X4: Foundations cat/dat extraction tool
#[derive(Parser)]
#[command(name = "xtract")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging. By default only warnings and errors are logged.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract files from the cat files of a game installation
    Extract {
        /// The directory where the cat files are located
        #[arg(env = "XTRACT_SOURCE")]
        sourcedir: PathBuf,

        /// The directory where to extract any matching files
        #[arg(env = "XTRACT_OUTPUT")]
        destdir: PathBuf,

        /// Also extract the installed expansions
        #[arg(short, long)]
        expansions: bool,

        /// Specific cat files to extract. By default all cat files are used.
        #[arg(short, long, num_args = 1..)]
        include: Vec<String>,

        /// Comma separated list of file extensions to extract
        #[arg(short, long, default_value = DEFAULT_TYPES)]
        types: String,

        /// Number of worker threads (defaults to the number of CPUs)
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// List the contents of a cat file
    List {
        /// Path to the cat file
        cat: PathBuf,

        /// Only list files with these extensions (comma separated)
        #[arg(short, long)]
        types: Option<String>,

        /// Show sizes and data offsets
        #[arg(short, long)]
        detailed: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let multi = MultiProgress::new();
    init_logging(cli.verbose, &multi);

    match cli.command {
        Commands::Extract {
            sourcedir,
            destdir,
            expansions,
            include,
            types,
            jobs,
        } => {
            cmd_extract(&multi, sourcedir, destdir, expansions, include, &types, jobs)?;
        }
        Commands::List { cat, types, detailed } => {
            cmd_list(&cat, types.as_deref(), detailed)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, multi: &MultiProgress) {
    let default = if verbose { "debug" } else { "warn" };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(LogWriter::new(multi)))
        .init();
}

/// Writes log lines to stderr with the progress bars hidden, so a line
/// never lands in the middle of a bar redraw.
#[derive(Clone)]
struct LogWriter {
    multi: MultiProgress,
}

impl LogWriter {
    fn new(multi: &MultiProgress) -> Self {
        Self {
            multi: multi.clone(),
        }
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.multi.suspend(|| io::stderr().lock().write_all(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

impl<'a> MakeWriter<'a> for LogWriter {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn cmd_extract(
    multi: &MultiProgress,
    source: PathBuf,
    output: PathBuf,
    expansions: bool,
    include: Vec<String>,
    types: &str,
    jobs: Option<usize>,
) -> Result<()> {
    let filter = ExtensionFilter::parse(types);

    let mut options = ExtractOptions::new(source, output, filter)
        .with_expansions(expansions)
        .with_include(include);
    if let Some(jobs) = jobs {
        options = options.with_jobs(jobs);
    }

    println!("Extracting files to {}", options.output.display());
    println!("Extracting types: {}", options.filter);

    let start = Instant::now();
    let progress = BarProgress::new(multi)?;
    let report = Orchestrator::new(options)
        .run(&progress)
        .context("Extraction failed")?;

    for job in &report.completed {
        println!(
            "{}: {} files written from {} cat files ({} without data, {} failed)",
            job.target, job.stats.written, job.pairs, job.missing_data, job.failed_pairs
        );
    }
    for failure in &report.failed {
        eprintln!("{}: {}", failure.target, failure.error);
    }

    println!(
        "Extracted {} files in {:?}",
        report.files_written(),
        start.elapsed()
    );

    Ok(())
}

fn cmd_list(cat: &Path, types: Option<&str>, detailed: bool) -> Result<()> {
    let index = fs::read(cat).with_context(|| format!("Failed to read {}", cat.display()))?;
    let filter = types.map(ExtensionFilter::parse);

    let mut offset = 0u64;
    let mut count = 0;
    for (i, line) in String::from_utf8_lossy(&index).lines().enumerate() {
        let Some(record) = IndexRecord::parse(line, i + 1)? else {
            continue;
        };
        let start = offset;
        offset = offset.checked_add(record.length).with_context(|| {
            format!(
                "Record {} on line {} overflows the data offset",
                record.path,
                i + 1
            )
        })?;

        if let Some(filter) = &filter {
            if !record.extension().is_some_and(|ext| filter.matches(ext)) {
                continue;
            }
        }

        if detailed {
            println!("{:>12} {:>12} {}", record.length, start, record.path);
        } else {
            println!("{}", record.path);
        }
        count += 1;
    }

    println!("\nTotal: {} entries", count);

    Ok(())
}

/// One progress bar per target.
struct BarProgress {
    multi: MultiProgress,
    style: ProgressStyle,
    bars: Mutex<HashMap<String, ProgressBar>>,
}

impl BarProgress {
    fn new(multi: &MultiProgress) -> Result<Self> {
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:>20} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-");

        Ok(Self {
            multi: multi.clone(),
            style,
            bars: Mutex::new(HashMap::new()),
        })
    }
}

impl ProgressSink for BarProgress {
    fn begin(&self, target: &str, total: u64) {
        let pb = self.multi.add(ProgressBar::new(total));
        pb.set_style(self.style.clone());
        pb.set_prefix(target.to_string());
        self.bars.lock().insert(target.to_string(), pb);
    }

    fn advance(&self, target: &str, current: &str) {
        if let Some(pb) = self.bars.lock().get(target) {
            pb.set_message(current.to_string());
            pb.inc(1);
        }
    }

    fn finish(&self, target: &str) {
        if let Some(pb) = self.bars.lock().get(target) {
            pb.finish_with_message("Done");
        }
    }
}
