//! CAT/DAT archive reader for X4: Foundations game files.
//!
//! X4 packages its assets as pairs of files:
//!
//! - `NN.cat` - a text index, one line per packaged file
//! - `NN.dat` - the payloads of those files, concatenated in index order
//!
//! Index lines have the form `<path> ... <size> <timestamp> <hash>`; only
//! the path and the size are used. The data file carries no offsets, so a
//! pair can only be read front to back, skipping the payloads that are not
//! wanted.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use xtract_cat::{collect_archives, extract_pair, ExtensionFilter};
//!
//! let filter = ExtensionFilter::parse("xml, lua");
//! for pair in collect_archives(Path::new("X4 Foundations"), &[] as &[&str])? {
//!     let outcome = extract_pair(&pair, Path::new("unpacked"), &filter)?;
//!     println!("{}: {} files", pair.name(), outcome.written());
//! }
//! # Ok::<(), xtract_cat::Error>(())
//! ```

mod collect;
mod error;
mod extract;
mod filter;
mod pair;
mod reader;
mod record;

pub use collect::collect_archives;
pub use error::{Error, Result};
pub use extract::{extract_pair, ExtractStats, PairOutcome};
pub use filter::{ExtensionFilter, DEFAULT_TYPES};
pub use pair::{is_signature_file, ArchivePair, DATA_EXTENSION, INDEX_EXTENSION, SIGNATURE_SUFFIX};
pub use reader::CatReader;
pub use record::IndexRecord;
