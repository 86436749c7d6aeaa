//! Read-only access to the scoreboard file.
//!
//! The producer rewrites slots while we read, so the reader never assumes a
//! consistent snapshot: a truncated or malformed slot simply ends the scan.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};

use ftptop_core::error::ScoreboardError;
use ftptop_core::models::RawSessionRecord;
use tracing::{debug, trace};

use crate::layout::{self, ScoreboardHeader, HEADER_LEN, RECORD_LEN};

// ── ScoreboardReader ──────────────────────────────────────────────────────────

/// An open, validated scoreboard yielding session records lazily.
///
/// The underlying handle is released when the reader is dropped or
/// [`close`](ScoreboardReader::close)d, whichever comes first.
#[derive(Debug)]
pub struct ScoreboardReader<R = BufReader<File>> {
    source: R,
    path: PathBuf,
    header: ScoreboardHeader,
    records_read: usize,
    finished: bool,
}

impl ScoreboardReader<BufReader<File>> {
    /// Open `path` read-only and validate its header.
    pub fn open(path: &Path) -> Result<Self, ScoreboardError> {
        let file = File::open(path).map_err(|source| ScoreboardError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(BufReader::new(file), path)
    }
}

impl<R: Read> ScoreboardReader<R> {
    /// Wrap an already-open source. `path` is used for diagnostics only.
    pub fn new(mut source: R, path: &Path) -> Result<Self, ScoreboardError> {
        let mut buf = [0u8; HEADER_LEN];
        let n = read_full(&mut source, &mut buf).map_err(|source| ScoreboardError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if n < HEADER_LEN {
            debug!(
                "Scoreboard header in {} truncated at {} bytes",
                path.display(),
                n
            );
            let mut magic = [0u8; 4];
            let len = n.min(4);
            magic[..len].copy_from_slice(&buf[..len]);
            return Err(ScoreboardError::BadMagic {
                found: u32::from_le_bytes(magic),
            });
        }

        let header = ScoreboardHeader::decode(&buf);
        header.validate()?;

        trace!(
            "Opened scoreboard {} (version {:#010x}, producer pid {})",
            path.display(),
            header.version,
            header.producer_pid
        );

        Ok(Self {
            source,
            path: path.to_path_buf(),
            header,
            records_read: 0,
            finished: false,
        })
    }

    pub fn header(&self) -> &ScoreboardHeader {
        &self.header
    }

    /// Occupied records yielded so far.
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Release the handle.
    pub fn close(self) {
        trace!(
            "Closing scoreboard {} after {} records",
            self.path.display(),
            self.records_read
        );
    }

    fn end_stream(&mut self, reason: std::fmt::Arguments<'_>) {
        debug!(
            "Scoreboard {} ended after {} records: {}",
            self.path.display(),
            self.records_read,
            reason
        );
        self.finished = true;
    }
}

impl<R: Read> Iterator for ScoreboardReader<R> {
    type Item = RawSessionRecord;

    fn next(&mut self) -> Option<RawSessionRecord> {
        while !self.finished {
            let mut buf = [0u8; RECORD_LEN];
            match read_full(&mut self.source, &mut buf) {
                Ok(0) => self.finished = true,
                Ok(n) if n < RECORD_LEN => {
                    self.end_stream(format_args!("truncated slot ({n} of {RECORD_LEN} bytes)"));
                }
                Ok(_) => match layout::decode_record(&buf) {
                    Ok(Some(record)) => {
                        self.records_read += 1;
                        return Some(record);
                    }
                    // Vacant slot left by an exited session.
                    Ok(None) => {}
                    Err(e) => self.end_stream(format_args!("{e}")),
                },
                Err(e) => self.end_stream(format_args!("read error: {e}")),
            }
        }
        None
    }
}

impl<R: Read> FusedIterator for ScoreboardReader<R> {}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Fill `buf` from `source`, stopping early only at end of file.
///
/// Returns the number of bytes read.
fn read_full<R: Read>(source: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
