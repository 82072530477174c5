//! Concurrent extraction of the base game and its expansions.
//!
//! A run resolves one [`ExtractionTarget`] per archive set, then extracts
//! all targets in parallel on a rayon pool. Targets share nothing but the
//! read-only options and the progress sink, and each writes into its own
//! output subtree.

use std::fs;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{error, info, warn};
use xtract_cat::{collect_archives, ExtensionFilter};

use crate::expansion::{discover_expansions, ExpansionCatalog};
use crate::job::{ExtractionJob, ExtractionTarget, JobReport, BASE_TARGET};
use crate::progress::ProgressSink;
use crate::{Error, Result};

/// Label of the base game target.
const BASE_LABEL: &str = "Base game";

/// Options for one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Game directory holding the base cat files.
    pub source: PathBuf,
    /// Directory extracted files are written under.
    pub output: PathBuf,
    /// Also extract every expansion found under `source/extensions`.
    pub expansions: bool,
    pub filter: ExtensionFilter,
    /// Cat file names to restrict extraction to. Empty means all.
    pub include: Vec<String>,
    /// Worker threads; defaults to the available parallelism.
    pub jobs: Option<usize>,
    pub catalog: ExpansionCatalog,
}

impl ExtractOptions {
    pub fn new<S: Into<PathBuf>, O: Into<PathBuf>>(source: S, output: O, filter: ExtensionFilter) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            expansions: false,
            filter,
            include: Vec::new(),
            jobs: None,
            catalog: ExpansionCatalog::default(),
        }
    }

    pub fn with_expansions(mut self, expansions: bool) -> Self {
        self.expansions = expansions;
        self
    }

    pub fn with_include<I, S>(mut self, include: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = include.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    pub fn with_catalog(mut self, catalog: ExpansionCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    fn worker_count(&self) -> usize {
        self.jobs.filter(|&n| n > 0).unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        })
    }
}

/// A target that could not be extracted.
#[derive(Debug)]
pub struct TargetFailure {
    pub target: String,
    pub error: Error,
}

/// Outcome of a run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Targets whose jobs ran to completion, in target order.
    pub completed: Vec<JobReport>,
    /// Targets that failed during resolution or extraction.
    pub failed: Vec<TargetFailure>,
}

impl RunReport {
    /// Total files written across all targets.
    pub fn files_written(&self) -> usize {
        self.completed.iter().map(|r| r.stats.written).sum()
    }

    /// Whether every target completed.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs extraction for the base game and, optionally, its expansions.
pub struct Orchestrator {
    options: ExtractOptions,
}

impl Orchestrator {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// Extract all targets.
    ///
    /// Returns an error only for problems with the run itself: no file types,
    /// a missing source directory, an unknown expansion or an unusable output
    /// directory. Failures of single targets are collected in the report.
    pub fn run(&self, progress: &dyn ProgressSink) -> Result<RunReport> {
        let options = &self.options;

        if options.filter.is_empty() {
            return Err(Error::NoFileTypes);
        }
        if !options.source.is_dir() {
            return Err(Error::SourceRootMissing(options.source.clone()));
        }

        fs::create_dir_all(&options.output)?;
        info!("extracting files to {}", options.output.display());
        info!("extracting types: {}", options.filter);

        let mut report = RunReport::default();
        let targets = self.resolve_targets(&mut report.failed)?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.worker_count())
            .thread_name(|i| format!("xtract-worker-{i}"))
            .build()?;

        let results: Vec<(String, Result<JobReport>)> = pool.install(|| {
            targets
                .par_iter()
                .map(|target| (target.identifier.clone(), run_job(target, &options.filter, progress)))
                .collect()
        });

        for (target, result) in results {
            match result {
                Ok(job) => report.completed.push(job),
                Err(error) => {
                    error!(set = %target, "extraction failed: {error}");
                    report.failed.push(TargetFailure { target, error });
                }
            }
        }

        info!(
            completed = report.completed.len(),
            failed = report.failed.len(),
            written = report.files_written(),
            "run finished"
        );

        Ok(report)
    }

    /// Build the targets of this run.
    ///
    /// Targets whose directory holds no cat files are recorded in `failed`
    /// and left out.
    fn resolve_targets(&self, failed: &mut Vec<TargetFailure>) -> Result<Vec<ExtractionTarget>> {
        let options = &self.options;
        let mut roots = vec![(
            BASE_TARGET.to_string(),
            BASE_LABEL.to_string(),
            options.source.clone(),
            options.output.clone(),
        )];

        if options.expansions {
            if let Some(expansions) = discover_expansions(&options.source)? {
                for expansion in expansions {
                    let label = options.catalog.display_name(&expansion.identifier)?;
                    let output = options.output.join(&expansion.identifier);
                    roots.push((expansion.identifier, label.to_string(), expansion.root, output));
                }
            }
        }

        let mut targets = Vec::with_capacity(roots.len());
        for (identifier, label, root, output) in roots {
            match collect_archives(&root, options.include.as_slice()) {
                Ok(archives) => {
                    info!(set = %identifier, "{} cat files found for extraction", archives.len());
                    targets.push(ExtractionTarget {
                        identifier,
                        label,
                        archives,
                        output,
                    });
                }
                Err(err) => {
                    warn!(set = %identifier, "skipping target: {err}");
                    failed.push(TargetFailure {
                        target: identifier,
                        error: err.into(),
                    });
                }
            }
        }

        Ok(targets)
    }
}

fn run_job(
    target: &ExtractionTarget,
    filter: &ExtensionFilter,
    progress: &dyn ProgressSink,
) -> Result<JobReport> {
    panic::catch_unwind(AssertUnwindSafe(|| ExtractionJob::new(target, filter).run(progress)))
        .unwrap_or_else(|payload| {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(Error::JobPanicked(message))
        })
}
