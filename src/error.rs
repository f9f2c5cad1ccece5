//! Error types for configuration, ByteMap I/O, and registry misuse.
//!
//! The hot path (`hash`, `pow`) is infallible by construction and never
//! returns a `Result`; only construction-time and I/O boundaries can fail.

use std::path::PathBuf;

/// Errors surfaced by `lxrhash` at its few fallible boundaries.
#[derive(Debug, thiserror::Error)]
pub enum LxrError {
    /// `map_size_bits` was below the minimum of 8, or another parameter
    /// combination was rejected at construction time.
    #[error("rejected hash config: {reason}")]
    ConfigRejected {
        /// Human-readable explanation of what was wrong.
        reason: String,
    },

    /// The ByteMap cache file could not be read or written.
    ///
    /// Reading failures fall back to regeneration transparently and are not
    /// surfaced; this variant is returned only when a write after
    /// generation fails, since at that point the instance is usable but the
    /// caller should know the cache was not persisted.
    #[error("ByteMap table I/O failed for {path:?}: {source}")]
    TableIoFailure {
        /// Path the table was being read from or written to.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A handle was released that does not match the registered singleton
    /// for its parameters. This is a programmer error.
    #[error("released a handle that is not the registered singleton for key {key}")]
    RegistryMisuse {
        /// The registry key the caller thought it was releasing.
        key: String,
    },
}
