//! Walks the outer oci-archive stream and assembles the absolute index.
//!
//! [`ArchiveWalker`] owns the single forward pass over the outer tar. For each
//! regular-file entry under `blobs/sha256/` it notes where that blob's data
//! starts in the outer stream, hands the blob's bytes to
//! [`scan_layer`](crate::layer::scan_layer), and lifts the scanner's relative
//! offsets into absolute ones. The nested scan runs to completion (or failure)
//! before the walker touches the next outer entry; the entry reader it borrows
//! is released either way.
//!
//! A blob that turns out not to be a tar stream contributes nothing and the
//! walk continues — one bad layer must not discard the index for the rest.
//! Strict mode turns that skip into a hard failure. Anything that undermines
//! the *outer* stream's accounting (unparsable outer tar, transport errors,
//! missing OCI markers) is always fatal: a partial index with untrustworthy
//! offsets is worse than none.

use crate::error::{is_malformed_kind, IndexError};
use crate::format::aligned_data_size;
use crate::index::{FileRecord, ImageIndex};
use crate::layer::{scan_layer, LayerEntry, LayerScanError};
use crate::notifier::Notifier;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tar_rs as tar;

/// Outer entries under this prefix are treated as layer blobs.
pub const LAYER_BLOB_PREFIX: &str = "blobs/sha256/";

const OCI_LAYOUT_MARKER: &str = "oci-layout";
const INDEX_MANIFEST_MARKER: &str = "index.json";

/// One layer blob as positioned in the outer stream. Built when the walker
/// reaches the blob's entry, consumed immediately by the nested scan.
struct LayerBlobDescriptor {
    name: String,
    absolute_data_offset: u64,
    declared_size: u64,
}

pub struct ArchiveWalker<'a> {
    strict: bool,
    notifier: &'a Notifier,
}

impl<'a> ArchiveWalker<'a> {
    pub fn new(notifier: &'a Notifier) -> Self {
        Self {
            strict: false,
            notifier,
        }
    }

    /// In strict mode an unparsable layer blob aborts the whole run instead
    /// of being skipped. Note that on archives whose `blobs/sha256/` also
    /// holds JSON manifests this will trip on the first non-tar blob.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn index_path(&self, path: &Path) -> Result<ImageIndex, IndexError> {
        let file = File::open(path)?;
        self.index(file)
    }

    /// Runs the full indexing pass over `reader`, which must be positioned at
    /// the first byte of the outer archive. Records come back in discovery
    /// order: outer entry order, then entry order within each layer.
    pub fn index<R: Read>(&self, reader: R) -> Result<ImageIndex, IndexError> {
        let mut archive = tar::Archive::new(reader);
        let mut files = Vec::new();
        let mut seen_layout = false;
        let mut seen_manifest = false;

        self.notifier.info("Scanning outer archive stream");
        for entry in archive.entries().map_err(structural)? {
            let mut entry = entry.map_err(structural)?;
            let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
            let is_regular = entry.header().entry_type().is_file();

            if is_regular {
                match name.as_str() {
                    OCI_LAYOUT_MARKER => seen_layout = true,
                    INDEX_MANIFEST_MARKER => seen_manifest = true,
                    _ => {}
                }
            }

            if !is_regular || !name.starts_with(LAYER_BLOB_PREFIX) {
                // The iterator still consumes the entry, so the outer
                // position stays exact.
                self.notifier.trace(&format!("Skipping non-layer entry {}", name));
                continue;
            }

            let blob = LayerBlobDescriptor {
                absolute_data_offset: entry.raw_file_position(),
                declared_size: entry.size(),
                name,
            };
            self.notifier
                .info(&format!("Found layer blob {}", blob.name));
            self.notifier.debug(&format!(
                "Layer blob {} occupies bytes [{}, {}) of the outer stream",
                blob.name,
                blob.absolute_data_offset,
                blob.absolute_data_offset + aligned_data_size(blob.declared_size)
            ));

            match scan_layer(&mut entry) {
                Ok(entries) => match self.translate(&blob, entries) {
                    Ok(records) => {
                        self.notifier.debug(&format!(
                            "Layer {} contributed {} file(s)",
                            blob.name,
                            records.len()
                        ));
                        files.extend(records);
                    }
                    Err(reason) => self.skip_or_fail(&blob, reason)?,
                },
                Err(LayerScanError::Malformed(reason)) => self.skip_or_fail(&blob, reason)?,
                Err(LayerScanError::Io(source)) => {
                    return Err(IndexError::UnreadableLayerBlob {
                        name: blob.name,
                        source,
                    });
                }
            }
        }

        if !seen_layout {
            return Err(IndexError::InvalidArchiveStructure(
                "no regular-file entry named 'oci-layout'".to_string(),
            ));
        }
        if !seen_manifest {
            return Err(IndexError::InvalidArchiveStructure(
                "no regular-file entry named 'index.json'".to_string(),
            ));
        }

        Ok(ImageIndex { files })
    }

    /// Lifts one layer's relative entries into absolute [`FileRecord`]s. Any
    /// entry claiming bytes outside the blob's declared extent poisons the
    /// whole layer, same as a parse failure.
    fn translate(
        &self,
        blob: &LayerBlobDescriptor,
        entries: Vec<LayerEntry>,
    ) -> Result<Vec<FileRecord>, String> {
        let mut records = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry.relative_offset.checked_add(entry.size) {
                Some(end) if end <= blob.declared_size => {}
                _ => {
                    return Err(format!(
                        "entry '{}' claims bytes beyond the blob's {}-byte extent",
                        entry.path, blob.declared_size
                    ));
                }
            }
            let record = FileRecord {
                path: normalize_path(&entry.path),
                layer: blob.name.clone(),
                offset: blob.absolute_data_offset + entry.relative_offset,
                size: entry.size,
            };
            self.notifier.trace(&format!(
                "{} -> offset {} size {}",
                record.path, record.offset, record.size
            ));
            records.push(record);
        }
        Ok(records)
    }

    fn skip_or_fail(&self, blob: &LayerBlobDescriptor, reason: String) -> Result<(), IndexError> {
        if self.strict {
            return Err(IndexError::CorruptLayer {
                name: blob.name.clone(),
                reason,
            });
        }
        self.notifier.warn(&format!(
            "Skipping layer blob {}: {}",
            blob.name, reason
        ));
        Ok(())
    }
}

/// Archive-rooted form of a layer entry name: exactly one leading `/`.
/// Idempotent, so names stored with or without a slash come out the same.
fn normalize_path(name: &str) -> String {
    format!("/{}", name.trim_start_matches('/'))
}

fn structural(err: io::Error) -> IndexError {
    if is_malformed_kind(err.kind()) {
        IndexError::InvalidArchiveStructure(err.to_string())
    } else {
        IndexError::Io(err)
    }
}
