//! Error types for flowaudit.
//!
//! Provides [`FlowauditError`] as the single error type shared by the audit
//! engine and its collaborators. It is non-exhaustive to allow future
//! extension without breaking downstream.

use thiserror::Error;

/// Top-level error type for flowaudit.
///
/// Variants are grouped into caller input errors (rejected before any
/// reporter runs) and collaborator failures (config or corpus loading),
/// which are surfaced unmodified.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FlowauditError {
    // ── Caller input ─────────────────────────────────────────────────

    /// A risk category identifier is not part of the known enumeration.
    #[error("unknown risk category: {name} (expected one of: {expected})")]
    UnknownCategory {
        /// The identifier as supplied by the caller.
        name: String,
        /// Comma-separated list of accepted identifiers.
        expected: String,
    },

    // ── Collaborator failures ────────────────────────────────────────

    /// Configuration is malformed or semantically invalid.
    #[error("invalid config: {reason}")]
    ConfigInvalid {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// A workflow export could not be interpreted as a corpus.
    #[error("invalid corpus at {source_name}: {reason}")]
    CorpusInvalid {
        /// File or stream the corpus was read from.
        source_name: String,
        /// What is wrong with its contents.
        reason: String,
    },

    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used across the flowaudit crates.
pub type Result<T> = std::result::Result<T, FlowauditError>;
