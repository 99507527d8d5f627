//! The index produced by a scan, and its JSON emission.
//!
//! Records are immutable once produced and kept in discovery order: outer
//! entry order first, then entry order within each layer. The JSON shape is a
//! machine-readable contract — one top-level `files` field, stable field
//! names, nothing else on stdout.

use serde::Serialize;
use std::io::{self, Write};

/// Where one file's data lives inside the outer archive stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Absolute archive-rooted path, always with a single leading `/`.
    pub path: String,
    /// Name of the layer blob entry this file belongs to,
    /// e.g. `blobs/sha256/<digest>`.
    pub layer: String,
    /// Absolute byte offset of the file's data in the outer archive stream.
    pub offset: u64,
    /// Length of the file's data in bytes.
    pub size: u64,
}

/// The full index for one oci-archive.
#[derive(Debug, Default, Serialize)]
pub struct ImageIndex {
    pub files: Vec<FileRecord>,
}

impl ImageIndex {
    /// Writes the index as pretty-printed JSON followed by a newline.
    pub fn write_pretty<W: Write>(&self, mut writer: W) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)
    }
}
