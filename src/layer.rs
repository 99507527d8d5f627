//! Scans one layer blob's nested tar stream and reports where each regular
//! file's data sits relative to the start of that stream.
//!
//! The scan is strictly forward and single-pass: the reader is consumed once,
//! no seeks. Offsets come from the parser's own position accounting, which
//! advances past each entry by its header plus the entry's own data length
//! padded to the 512-byte block boundary. An entry's alignment is never
//! derived from a sibling entry or from the enclosing blob's size.
//!
//! The contract is all-or-nothing: a stream that fails to parse at any point,
//! including a truncated final entry, yields [`LayerScanError::Malformed`] and
//! no entries at all. Partial results from a half-parsed layer would carry
//! offsets nothing can vouch for.

use crate::error::is_malformed_kind;
use std::io::{self, Read};
use tar_rs as tar;

/// One regular file found inside a layer stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerEntry {
    /// Entry name exactly as stored in the layer tar (no leading slash yet).
    pub path: String,
    /// Byte offset of the file's data from the start of the layer stream.
    pub relative_offset: u64,
    /// Declared length of the file's data in bytes.
    pub size: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum LayerScanError {
    /// The bytes are not a parsable tar stream (bad header, truncation, ...).
    #[error("malformed tar stream: {0}")]
    Malformed(String),
    /// Transport-level read failure underneath the parser.
    #[error(transparent)]
    Io(io::Error),
}

impl LayerScanError {
    fn from_io(err: io::Error) -> Self {
        if is_malformed_kind(err.kind()) {
            LayerScanError::Malformed(err.to_string())
        } else {
            LayerScanError::Io(err)
        }
    }
}

/// Walks the nested tar stream `reader`, positioned at its first byte, and
/// collects every regular-file entry with its offset relative to the stream
/// start. Non-file entries (directories, symlinks, device nodes) advance the
/// cursor but are not reported.
pub fn scan_layer<R: Read>(reader: R) -> Result<Vec<LayerEntry>, LayerScanError> {
    let mut archive = tar::Archive::new(reader);
    let mut entries = Vec::new();

    for entry in archive.entries().map_err(LayerScanError::from_io)? {
        let entry = entry.map_err(LayerScanError::from_io)?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        entries.push(LayerEntry {
            path: String::from_utf8_lossy(&entry.path_bytes()).into_owned(),
            relative_offset: entry.raw_file_position(),
            size: entry.size(),
        });
    }

    Ok(entries)
}
