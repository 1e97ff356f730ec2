//! Storage for crawl exports.
//!
//! Records are rendered with `crate::output` and written to the local
//! filesystem atomically, so a failed run never leaves a half-written file.

pub mod local;

use std::path::PathBuf;

use chrono::{DateTime, Utc};

// Re-export for convenience
pub use local::LocalStorage;

/// Metadata about a storage write operation.
#[derive(Debug, Clone)]
pub struct WriteMetadata {
    /// Number of registrations written
    pub record_count: usize,
    /// Size of the written file in bytes
    pub bytes_written: usize,
    /// Final location of the file
    pub location: PathBuf,
    /// Timestamp of the write
    pub timestamp: DateTime<Utc>,
}
