//! Lock-step reader over a CAT index and its DAT payloads.
//!
//! Payload offsets are not stored anywhere: a record's data starts where the
//! previous record's data ended. [`CatReader`] owns both streams so the data
//! cursor can only move forward, one record at a time, in index order.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};

use crate::pair::ArchivePair;
use crate::record::IndexRecord;
use crate::{Error, Result};

/// Streaming reader over one archive pair.
///
/// Each call to [`next_record`](Self::next_record) hands out the next record
/// and makes its payload current. The payload can be copied out with
/// [`copy_to`](Self::copy_to); whatever is not copied is skipped when the
/// next record is requested.
pub struct CatReader {
    index: BufReader<File>,
    data: BufReader<File>,
    data_len: u64,
    /// Current offset in the data file.
    position: u64,
    /// End offset of the current record's payload.
    record_end: u64,
    line_number: usize,
    line: Vec<u8>,
}

impl CatReader {
    /// Open both files of a pair.
    ///
    /// Fails with [`Error::ArchivePairNotFound`] if the index is missing and
    /// with [`Error::Io`] if the data file cannot be opened.
    pub fn open(pair: &ArchivePair) -> Result<Self> {
        let index = File::open(&pair.index).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::ArchivePairNotFound(pair.index.clone()),
            _ => Error::Io(e),
        })?;
        let data = File::open(&pair.data)?;
        let data_len = data.metadata()?.len();

        Ok(Self {
            index: BufReader::new(index),
            data: BufReader::new(data),
            data_len,
            position: 0,
            record_end: 0,
            line_number: 0,
            line: Vec::with_capacity(256),
        })
    }

    /// Offset in the data file where the current record's payload starts,
    /// or where the next one will start if the current one was consumed.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// 1-based number of the last index line read.
    #[inline]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Advance to the next record.
    ///
    /// Skips the remainder of the current payload first. Returns `Ok(None)`
    /// at the end of the index. Any error leaves the data cursor in an
    /// unknown place, so the pass must stop.
    pub fn next_record(&mut self) -> Result<Option<IndexRecord>> {
        self.skip()?;

        loop {
            self.line.clear();
            if self.index.read_until(b'\n', &mut self.line)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let text = String::from_utf8_lossy(&self.line);
            let Some(record) = IndexRecord::parse(&text, self.line_number)? else {
                continue;
            };

            let end = match self.position.checked_add(record.length) {
                Some(end) if end <= self.data_len => end,
                end => {
                    return Err(Error::TruncatedData {
                        path: record.path,
                        needed: end.unwrap_or(u64::MAX),
                        data_len: self.data_len,
                    });
                }
            };

            self.record_end = end;
            return Ok(Some(record));
        }
    }

    /// Move the cursor past the rest of the current payload without reading it.
    pub fn skip(&mut self) -> Result<()> {
        let remaining = self.record_end.saturating_sub(self.position);
        if remaining > 0 {
            let offset = i64::try_from(remaining).map_err(|_| {
                io::Error::new(io::ErrorKind::InvalidInput, "payload too large to skip")
            })?;
            self.data.seek_relative(offset)?;
            self.position = self.record_end;
        }
        Ok(())
    }

    /// Copy the current payload into `writer`.
    ///
    /// Returns the number of bytes copied. On a write error the cursor stays
    /// inside the payload; the next [`next_record`](Self::next_record) or
    /// [`skip`](Self::skip) realigns it.
    pub fn copy_to<W: Write>(&mut self, writer: &mut W) -> io::Result<u64> {
        let remaining = self.record_end.saturating_sub(self.position);
        let mut payload = (&mut self.data).take(remaining);
        let result = io::copy(&mut payload, writer);

        // Count whatever was consumed, even if the writer failed part way.
        let consumed = remaining - payload.limit();
        self.position += consumed;

        let copied = result?;
        if copied < remaining {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "data file ended inside a payload",
            ));
        }
        Ok(copied)
    }
}
