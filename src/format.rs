//! Structural constants of the tar format shared by both scan levels.
//!
//! A tar stream is a sequence of 512-byte blocks: every entry starts with one
//! header block and its data occupies whole blocks, padded with zeros up to the
//! next block boundary. Both the outer oci-archive and each nested layer stream
//! follow the same rule, so the offset arithmetic lives here once.

/// Length of a tar entry header, in bytes.
pub const HEADER_LEN: u64 = 512;

/// Tar block size; entry data is padded up to a multiple of this.
pub const BLOCK_LEN: u64 = 512;

/// Number of bytes the data region of an entry occupies in the stream,
/// i.e. `size` rounded up to the next multiple of [`BLOCK_LEN`].
pub fn aligned_data_size(size: u64) -> u64 {
    size.div_ceil(BLOCK_LEN) * BLOCK_LEN
}
