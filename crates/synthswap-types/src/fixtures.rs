//! Deterministic principals for tests.

use ed25519_dalek::SigningKey;

use crate::Address;

/// A signing key derived from a single repeated byte.
#[must_use]
pub fn signing_key(seed: u8) -> SigningKey {
    SigningKey::from_bytes(&[seed; 32])
}

/// The principal address controlled by [`signing_key`]`(seed)`.
#[must_use]
pub fn principal(seed: u8) -> Address {
    Address::from_verifying_key(&signing_key(seed).verifying_key())
}
