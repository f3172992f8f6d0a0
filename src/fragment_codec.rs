//! AEAD encode/decode of one compressed fragment into a framed, checked
//! blob: `ciphertext ‖ tag(16) ‖ checksum(ciphertext)(32)`.
//!
//! The ciphertext checksum is redundant with GCM authentication, but lets a
//! corrupted blob be rejected cheaply, without re-deriving the key — both
//! checks must pass.

use aes_gcm::aead::AeadInPlace;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use anyhow::{Context, anyhow};

use crate::checksum::{Checksum, verify_trailer};
use crate::config::{KEY_SIZE, NONCE_SIZE, TAG_SIZE, TRAILER_SIZE};
use crate::error::FragmentError;
use crate::key_deriver::DerivedKey;

/// Encrypts `compressed` under the key/nonce derived for `(fragment_id,
/// replica_id)` and frames it as a stored blob.
pub fn encode(derived: &DerivedKey, compressed: &[u8]) -> anyhow::Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(&derived.key).context("invalid aes-256-gcm key length")?;
    let nonce = Nonce::from_slice(&derived.nonce);

    let mut ciphertext = compressed.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(nonce, b"", &mut ciphertext)
        .map_err(|e| anyhow!("aes-gcm encryption failed: {e}"))?;

    let csum = Checksum::of(&ciphertext);

    let mut blob = Vec::with_capacity(ciphertext.len() + TRAILER_SIZE);
    blob.extend_from_slice(&ciphertext);
    blob.extend_from_slice(tag.as_slice());
    blob.extend_from_slice(csum.as_bytes());
    Ok(blob)
}

/// Decodes a stored blob back into the compressed fragment it frames.
///
/// # Errors
/// `FragmentError::MalformedFrame` if shorter than the 48-byte trailer,
/// `ChecksumMismatch` if the ciphertext checksum doesn't match, or
/// `AuthFailure` if GCM authentication fails.
pub fn decode(derived: &DerivedKey, blob: &[u8]) -> Result<Vec<u8>, FragmentError> {
    if blob.len() < TRAILER_SIZE {
        return Err(FragmentError::MalformedFrame { len: blob.len(), minimum: TRAILER_SIZE });
    }

    let split = blob.len() - TRAILER_SIZE;
    let ciphertext = &blob[..split];
    let tag = &blob[split..split + TAG_SIZE];
    let csum = &blob[split + TAG_SIZE..];

    verify_trailer(ciphertext, csum)?;

    let cipher = Aes256Gcm::new_from_slice(&derived.key).map_err(|_| FragmentError::InvalidInput("bad key length".into()))?;
    let nonce = Nonce::from_slice(&derived.nonce);
    let tag = aes_gcm::Tag::<Aes256Gcm>::from_slice(tag);

    let mut plaintext = ciphertext.to_vec();
    cipher.decrypt_in_place_detached(nonce, b"", &mut plaintext, tag).map_err(|_| FragmentError::AuthFailure)?;

    Ok(plaintext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key_deriver::derive;

    fn key(fragment_id: u64, replica_id: u64) -> DerivedKey {
        derive(&[7u8; 32], fragment_id, replica_id)
    }

    #[test]
    fn roundtrip() {
        let derived = key(0, 0);
        let blob = encode(&derived, b"compressed fragment bytes").unwrap();
        assert_eq!(decode(&derived, &blob).unwrap(), b"compressed fragment bytes");
    }

    #[test]
    fn blob_carries_trailer() {
        let derived = key(0, 0);
        let blob = encode(&derived, b"x").unwrap();
        assert_eq!(blob.len(), 1 + TAG_SIZE + crate::config::CHECKSUM_SIZE);
    }

    #[test]
    fn too_short_is_malformed() {
        let derived = key(0, 0);
        let err = decode(&derived, &[0u8; TRAILER_SIZE - 1]).unwrap_err();
        assert!(matches!(err, FragmentError::MalformedFrame { .. }));
    }

    #[test]
    fn tampered_ciphertext_is_rejected() {
        let derived = key(0, 0);
        let mut blob = encode(&derived, b"compressed fragment bytes").unwrap();
        blob[0] ^= 0x01;
        let err = decode(&derived, &blob).unwrap_err();
        assert_eq!(err, FragmentError::ChecksumMismatch);
    }

    #[test]
    fn tampered_tag_passes_checksum_but_fails_auth() {
        let derived = key(0, 0);
        let mut blob = encode(&derived, b"compressed fragment bytes").unwrap();
        // Flip a tag byte and recompute the checksum over the (unchanged)
        // ciphertext so the cheap check passes and GCM is exercised.
        let split = blob.len() - TRAILER_SIZE;
        blob[split] ^= 0x01;
        let csum = Checksum::of(&blob[..split]);
        blob[split + TAG_SIZE..].copy_from_slice(csum.as_bytes());

        let err = decode(&derived, &blob).unwrap_err();
        assert_eq!(err, FragmentError::AuthFailure);
    }

    #[test]
    fn wrong_replica_key_fails_auth() {
        let derived = key(0, 0);
        let blob = encode(&derived, b"compressed fragment bytes").unwrap();
        let wrong = key(0, 1);
        let err = decode(&wrong, &blob).unwrap_err();
        assert_eq!(err, FragmentError::AuthFailure);
    }
}
