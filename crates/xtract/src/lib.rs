//! Xtract - X4: Foundations game file extraction library.
//!
//! This crate runs extraction of whole game installations: the base game's
//! cat/dat pairs and, optionally, those of every installed expansion, with
//! one worker per archive set.
//!
//! # Crates
//!
//! - [`xtract_cat`] - CAT/DAT archive reading and single-pair extraction
//!
//! # Example
//!
//! ```no_run
//! use xtract::prelude::*;
//!
//! let options = ExtractOptions::new("X4 Foundations", "unpacked", ExtensionFilter::parse("xml, lua"))
//!     .with_expansions(true);
//!
//! let report = Orchestrator::new(options).run(&NoProgress)?;
//! println!("{} files written", report.files_written());
//! # Ok::<(), xtract::Error>(())
//! ```

mod error;
mod expansion;
mod job;
mod orchestrator;
mod progress;

pub use xtract_cat as cat;

pub use error::{Error, Result};
pub use expansion::{discover_expansions, Expansion, ExpansionCatalog, EXPANSIONS_DIR, EXPANSION_PREFIX};
pub use job::{ExtractionJob, ExtractionTarget, JobReport, BASE_TARGET};
pub use orchestrator::{ExtractOptions, Orchestrator, RunReport, TargetFailure};
pub use progress::{NoProgress, ProgressSink};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{ExtractOptions, NoProgress, Orchestrator, ProgressSink, RunReport};
    pub use xtract_cat::{
        collect_archives, extract_pair, ArchivePair, CatReader, ExtensionFilter, IndexRecord,
        PairOutcome,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
