//! Deterministic per-`(payload, fragment, replica)` key and nonce derivation.
//!
//! Unlike a password KDF, there is no secret here to protect: the input is
//! the payload's own checksum, and determinism is the point — it lets the
//! `Consumer` re-derive keys from `H`, `i`, and `r` alone, so no key material
//! is ever stored alongside a blob. Correctness instead depends on `(H, i,
//! r)` never repeating for two different plaintexts.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

use crate::config::{KEY_SIZE, NONCE_SIZE, PBKDF2_ITERATIONS};

/// A derived `(key, nonce)` pair for one `(fragment-id, replica-id)`.
pub struct DerivedKey {
    pub key: [u8; KEY_SIZE],
    pub nonce: [u8; NONCE_SIZE],
}

/// Builds the `decimal(i) ":" hex(H) ":" decimal(r)` seed the key and nonce
/// are both sliced from.
fn seed(payload_checksum: &[u8; 32], fragment_id: u64, replica_id: u64) -> Vec<u8> {
    format!("{fragment_id}:{}:{replica_id}", hex::encode(payload_checksum)).into_bytes()
}

/// Derives the `(key, nonce)` pair for one replica of one fragment.
///
/// `salt = seed[0..16]`, `nonce = seed[0..12]` — both slices of the same
/// seed; the seed is always at least 16 bytes since the hex digest alone
/// contributes 64 bytes.
#[must_use]
pub fn derive(payload_checksum: &[u8; 32], fragment_id: u64, replica_id: u64) -> DerivedKey {
    let seed = seed(payload_checksum, fragment_id, replica_id);
    let salt = &seed[0..16];

    let mut key = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(&seed, salt, PBKDF2_ITERATIONS, &mut key);

    let mut nonce = [0u8; NONCE_SIZE];
    nonce.copy_from_slice(&seed[0..NONCE_SIZE]);

    DerivedKey { key, nonce }
}
