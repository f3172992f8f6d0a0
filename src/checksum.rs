//! SHA-256 checksumming, used both for the payload identity (`H`) and for
//! the per-blob ciphertext trailer.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::config::CHECKSUM_SIZE;
use crate::error::FragmentError;

/// A 32-byte SHA-256 digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checksum([u8; CHECKSUM_SIZE]);

impl Checksum {
    /// Computes the SHA-256 digest of `data`. Pure, side-effect-free.
    #[must_use]
    pub fn of(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        let digest = hasher.finalize();
        let mut out = [0u8; CHECKSUM_SIZE];
        out.copy_from_slice(&digest);
        Self(out)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; CHECKSUM_SIZE] {
        &self.0
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    /// Constant-time equality against a 32-byte slice pulled out of a blob
    /// trailer, so a malformed or tampered checksum field is never cheaper
    /// to reject than a matching one.
    #[must_use]
    pub fn matches(&self, other: &[u8]) -> bool {
        other.len() == CHECKSUM_SIZE && bool::from(self.0.ct_eq(other))
    }
}

impl From<[u8; CHECKSUM_SIZE]> for Checksum {
    fn from(bytes: [u8; CHECKSUM_SIZE]) -> Self {
        Self(bytes)
    }
}

/// Free function form of `checksum(bytes) → 32-byte digest`, exposed
/// directly on the crate's API surface.
#[must_use]
pub fn checksum(data: &[u8]) -> [u8; CHECKSUM_SIZE] {
    *Checksum::of(data).as_bytes()
}

pub(crate) fn verify_trailer(ciphertext: &[u8], expected: &[u8]) -> Result<(), FragmentError> {
    if Checksum::of(ciphertext).matches(expected) {
        Ok(())
    } else {
        Err(FragmentError::ChecksumMismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        assert_eq!(checksum(b"hello"), checksum(b"hello"));
    }

    #[test]
    fn sensitive_to_single_bit() {
        assert_ne!(checksum(b"hello"), checksum(b"hellp"));
    }

    #[test]
    fn empty_input_is_valid() {
        let c = Checksum::of(b"");
        assert_eq!(c.as_bytes().len(), CHECKSUM_SIZE);
    }

    #[test]
    fn trailer_rejects_mismatch() {
        let good = checksum(b"ciphertext");
        assert!(verify_trailer(b"ciphertext", &good).is_ok());
        assert!(verify_trailer(b"ciphertext", &checksum(b"other")).is_err());
    }
}
