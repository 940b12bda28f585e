//! Opaque export sources.
//!
//! All file access lives here; decoding never touches I/O. A source hands
//! over one raw export buffer per call, capped at the maximum record size.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

use crate::record::layout::MAX_RECORD_LEN;

/// Supplies the raw bytes of one opaque export.
pub trait OpaqueSource {
    fn read_value(&mut self) -> Result<Vec<u8>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads an opaque export from a local file.
///
/// The file is opened eagerly, so an unreadable path fails at construction
/// rather than mid-pipeline. Reads are capped at [`MAX_RECORD_LEN`] bytes;
/// anything beyond the cap is left unread, the same as filling a
/// fixed-capacity buffer.
pub struct OpaqueFileSource {
    file: File,
}

impl OpaqueFileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Ok(Self { file })
    }
}

impl OpaqueSource for OpaqueFileSource {
    fn read_value(&mut self) -> Result<Vec<u8>, SourceError> {
        let mut value = Vec::with_capacity(MAX_RECORD_LEN);
        (&mut self.file)
            .take(MAX_RECORD_LEN as u64)
            .read_to_end(&mut value)?;
        Ok(value)
    }
}
