//! Error taxonomy for the fragment storage pipeline.
//!
//! Component-level operations that the `Consumer` must branch on (does this
//! replica's failure mean "try the next one" or "abort the whole store")
//! return `FragmentError` directly rather than an opaque `anyhow::Error`, so
//! callers can match on the kind. Top-level orchestration (`Pipeline::store`/
//! `retrieve`) still surfaces failures as `anyhow::Result`, matching the
//! `Context`/`bail!` idiom used elsewhere in this codebase.

use std::fmt;

/// One of the error kinds from the pipeline's error taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentError {
    /// Blob shorter than the minimum framing size.
    MalformedFrame { len: usize, minimum: usize },
    /// Ciphertext checksum stored in the trailer does not match.
    ChecksumMismatch,
    /// AES-256-GCM authentication failed.
    AuthFailure,
    /// Decompression refused the plaintext.
    BadCompression(String),
    /// Blob file absent at the computed path.
    NotFound,
    /// Underlying read/write failure.
    IoFailure(String),
    /// Non-positive fragment size, empty node list, or similar.
    InvalidInput(String),
}

impl fmt::Display for FragmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedFrame { len, minimum } => {
                write!(f, "malformed frame: {len} bytes, minimum is {minimum}")
            }
            Self::ChecksumMismatch => write!(f, "ciphertext checksum mismatch"),
            Self::AuthFailure => write!(f, "gcm authentication failed"),
            Self::BadCompression(msg) => write!(f, "bad compression: {msg}"),
            Self::NotFound => write!(f, "blob not found"),
            Self::IoFailure(msg) => write!(f, "io failure: {msg}"),
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
        }
    }
}

impl std::error::Error for FragmentError {}

impl FragmentError {
    /// Whether this error should trigger replica fallback on the read path
    /// (as opposed to a hard abort). Every per-replica decode/storage failure
    /// is recoverable; only `InvalidInput` is a caller/construction mistake.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvalidInput(_))
    }
}

/// The outcome of a `Consumer::retrieve` call: the reassembled bytes plus
/// any fragment-ids that had no surviving replica, elevated into an
/// explicit signal rather than silently truncating the payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RetrieveOutcome {
    pub data: Vec<u8>,
    pub missing_fragments: Vec<u64>,
}

impl RetrieveOutcome {
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.missing_fragments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverable_kinds() {
        assert!(FragmentError::ChecksumMismatch.is_recoverable());
        assert!(FragmentError::AuthFailure.is_recoverable());
        assert!(FragmentError::NotFound.is_recoverable());
        assert!(!FragmentError::InvalidInput("bad".into()).is_recoverable());
    }

    #[test]
    fn outcome_completeness() {
        let complete = RetrieveOutcome { data: vec![1, 2, 3], missing_fragments: vec![] };
        assert!(complete.is_complete());

        let partial = RetrieveOutcome { data: vec![1, 2, 3], missing_fragments: vec![5] };
        assert!(!partial.is_complete());
    }
}
