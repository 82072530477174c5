//! Extraction of one archive pair.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::filter::ExtensionFilter;
use crate::pair::ArchivePair;
use crate::reader::CatReader;
use crate::record::IndexRecord;
use crate::{Error, Result};

/// How often the extractor reports how far into an index it is.
const PROGRESS_INTERVAL: usize = 10_000;

/// Counters for one extracted pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    /// Records read from the index.
    pub records: usize,
    /// Records written to disk.
    pub written: usize,
    /// Records skipped by the extension filter.
    pub skipped: usize,
    /// Selected records that could not be written.
    pub failed: usize,
}

impl ExtractStats {
    pub fn merge(&mut self, other: &ExtractStats) {
        self.records += other.records;
        self.written += other.written;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Result of extracting one pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairOutcome {
    /// The pair was processed to the end of its index.
    Extracted(ExtractStats),
    /// The data file does not exist; nothing was extracted.
    MissingData(PathBuf),
}

impl PairOutcome {
    /// Number of files written for this pair.
    pub fn written(&self) -> usize {
        match self {
            PairOutcome::Extracted(stats) => stats.written,
            PairOutcome::MissingData(_) => 0,
        }
    }
}

/// Extract every record of `pair` whose extension is selected by `filter`
/// into `output`, mirroring the record paths.
///
/// Records that fail to write are logged and counted; they do not stop the
/// pass. Errors returned from here mean the pair could not be processed (or
/// could not be processed past some record) at all.
pub fn extract_pair(
    pair: &ArchivePair,
    output: &Path,
    filter: &ExtensionFilter,
) -> Result<PairOutcome> {
    info!(archive = %pair.index.display(), "processing");

    if !pair.index.is_file() {
        return Err(Error::ArchivePairNotFound(pair.index.clone()));
    }

    if !pair.data.is_file() {
        warn!(
            archive = %pair.index.display(),
            "associated data file {} does not exist, skipping extraction",
            pair.data.display()
        );
        return Ok(PairOutcome::MissingData(pair.data.clone()));
    }

    let mut reader = CatReader::open(pair)?;
    let mut stats = ExtractStats::default();

    while let Some(record) = reader.next_record()? {
        stats.records += 1;
        if stats.records % PROGRESS_INTERVAL == 0 {
            debug!(archive = pair.name(), "processed {} records", stats.records);
        }

        let selected = record.extension().is_some_and(|ext| filter.matches(ext));
        if !selected {
            stats.skipped += 1;
            continue;
        }

        let Some(destination) = record.output_path(output) else {
            let err = Error::MalformedRecord {
                line_number: reader.line_number(),
                line: record.path.clone(),
                reason: "path is not relative to the archive root".to_string(),
            };
            warn!(archive = pair.name(), "{err}");
            stats.failed += 1;
            continue;
        };

        match write_record(&mut reader, &record, &destination) {
            Ok(()) => stats.written += 1,
            Err(err) => {
                warn!(archive = pair.name(), record = %record.path, "{err}");
                stats.failed += 1;
            }
        }
    }

    debug!(
        archive = pair.name(),
        written = stats.written,
        skipped = stats.skipped,
        failed = stats.failed,
        "files of types {filter} extracted to {}",
        output.display()
    );

    Ok(PairOutcome::Extracted(stats))
}

fn write_record(reader: &mut CatReader, record: &IndexRecord, destination: &Path) -> Result<()> {
    let write_failure = |source| Error::WriteFailure {
        path: destination.to_path_buf(),
        source,
    };

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(write_failure)?;
    }

    let mut writer = BufWriter::new(File::create(destination).map_err(write_failure)?);
    reader.copy_to(&mut writer).map_err(write_failure)?;
    writer.flush().map_err(write_failure)?;

    debug!(record = %record.path, bytes = record.length, "extracted");
    Ok(())
}
