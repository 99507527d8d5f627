pub mod error;
pub mod format;
pub mod index;
pub mod layer;
pub mod notifier;
pub mod walker;

// Re-exports for easy access
pub use error::IndexError;
pub use index::{FileRecord, ImageIndex};
pub use layer::{scan_layer, LayerEntry, LayerScanError};
pub use notifier::Notifier;
pub use walker::ArchiveWalker;
