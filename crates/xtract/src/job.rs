//! Extraction of one target (base game or one expansion).

use std::fs;
use std::path::PathBuf;

use tracing::{error, info, info_span};
use xtract_cat::{extract_pair, ArchivePair, ExtensionFilter, ExtractStats, PairOutcome};

use crate::progress::ProgressSink;
use crate::Result;

/// Identifier of the base game target.
pub const BASE_TARGET: &str = "base";

/// One archive set and where to extract it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionTarget {
    /// `base` or the expansion directory name.
    pub identifier: String,
    /// Human readable name used for progress.
    pub label: String,
    /// Archive pairs in processing order.
    pub archives: Vec<ArchivePair>,
    /// Root the record paths are mirrored under.
    pub output: PathBuf,
}

/// Summary of a finished job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobReport {
    pub target: String,
    /// Archive pairs processed, whatever their outcome.
    pub pairs: usize,
    /// Pairs skipped because their data file is missing.
    pub missing_data: usize,
    /// Pairs that could not be processed to the end.
    pub failed_pairs: usize,
    pub stats: ExtractStats,
}

/// Drives the extractor over every archive pair of a target.
pub struct ExtractionJob<'a> {
    target: &'a ExtractionTarget,
    filter: &'a ExtensionFilter,
}

impl<'a> ExtractionJob<'a> {
    pub fn new(target: &'a ExtractionTarget, filter: &'a ExtensionFilter) -> Self {
        Self { target, filter }
    }

    /// Run the job.
    ///
    /// Errors from single pairs are logged and counted. Only failing to create
    /// the output directory fails the job.
    pub fn run(&self, progress: &dyn ProgressSink) -> Result<JobReport> {
        let target = self.target;
        let _span = info_span!("target", name = %target.identifier).entered();

        fs::create_dir_all(&target.output)?;

        let mut report = JobReport {
            target: target.identifier.clone(),
            ..JobReport::default()
        };

        progress.begin(&target.label, target.archives.len() as u64);

        for pair in &target.archives {
            match extract_pair(pair, &target.output, self.filter) {
                Ok(PairOutcome::Extracted(stats)) => report.stats.merge(&stats),
                Ok(PairOutcome::MissingData(_)) => report.missing_data += 1,
                Err(err) => {
                    error!(archive = %pair.index.display(), "extraction failed: {err}");
                    report.failed_pairs += 1;
                }
            }

            report.pairs += 1;
            progress.advance(&target.label, pair.name());
        }

        progress.finish(&target.label);
        info!(
            written = report.stats.written,
            failed = report.stats.failed,
            "extracted {} to {}",
            target.label,
            target.output.display()
        );

        Ok(report)
    }
}
