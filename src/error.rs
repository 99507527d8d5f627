use std::io;
use thiserror::Error;

/// Failures the indexing pass can surface to the caller.
///
/// Only failures that invalidate the outer scan's offset accounting are fatal.
/// A layer blob that is present but unparsable is recovered internally (the
/// blob contributes zero records) unless strict mode is enabled, in which case
/// it surfaces as [`IndexError::CorruptLayer`].
#[derive(Debug, Error)]
pub enum IndexError {
    /// The outer stream is not a parsable tar archive, or it lacks the
    /// `oci-layout`/`index.json` marker entries an oci-archive must carry.
    #[error("invalid oci-archive structure: {0}")]
    InvalidArchiveStructure(String),

    /// A layer blob's bytes could not be read at the transport level. The
    /// outer stream itself is untrustworthy at this point, so no partial
    /// index is produced.
    #[error("failed to read layer blob '{name}': {source}")]
    UnreadableLayerBlob {
        name: String,
        #[source]
        source: io::Error,
    },

    /// A layer blob opened but could not be parsed as a nested tar stream.
    /// Returned only in strict mode; otherwise the blob is skipped.
    #[error("layer blob '{name}' is not a valid tar stream: {reason}")]
    CorruptLayer { name: String, reason: String },

    #[error("failed to read archive: {0}")]
    Io(#[from] io::Error),
}

/// Whether an I/O error coming out of the tar parser describes malformed or
/// truncated archive data, as opposed to a transport-level read failure.
///
/// tar parse errors are reported as `InvalidData`/`InvalidInput`/`Other`;
/// `UnexpectedEof` means the stream ended inside an entry, which for our
/// purposes is the same thing: the bytes do not form a complete archive.
pub(crate) fn is_malformed_kind(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::InvalidData
            | io::ErrorKind::InvalidInput
            | io::ErrorKind::UnexpectedEof
            | io::ErrorKind::Other
    )
}
