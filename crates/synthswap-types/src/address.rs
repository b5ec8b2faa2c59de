//! Addresses and deterministic (seed-based) address derivation.
//!
//! Principals are raw ed25519 public keys. Every record the settlement core
//! owns lives at a *derived* address: SHA-256 over a domain tag, the seed
//! components and a one-byte bump. The bump is searched from 255 downward
//! until the digest is **not** a valid ed25519 point, so a derived address
//! can never be signed for by any principal.
//!
//! The accepted bump is stored in the record as its `storage_proof` and is
//! used to re-derive (and so validate) the address when the record is loaded.

use std::fmt;
use std::str::FromStr;

use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::{
    ASSET_MINT_SEED, ASSET_REGISTRY_SEED, BUY_ORDER_SEED, DERIVATION_DOMAIN, ESCROW_SEED,
    HOLDING_SEED, MAX_SEED_LEN, MAX_SEEDS, SELL_ORDER_SEED, TRADING_POOL_SEED, VAULT_SEED,
};
use crate::{OrderId, OrderSide, Result, Symbol, SynthswapError};

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A 32-byte account address: either a principal's public key or a derived
/// record address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// The all-zero address. Never a valid principal or derived address.
    pub const ZERO: Self = Self([0u8; 32]);

    #[must_use]
    pub fn from_verifying_key(key: &VerifyingKey) -> Self {
        Self(key.to_bytes())
    }

    /// Interpret this address as an ed25519 public key.
    ///
    /// # Errors
    /// Returns [`SynthswapError::SignatureInvalid`] if the bytes are not a
    /// valid curve point (every derived address falls in this case).
    pub fn to_verifying_key(&self) -> Result<VerifyingKey> {
        VerifyingKey::from_bytes(&self.0).map_err(|_| SynthswapError::SignatureInvalid)
    }

    /// Whether these bytes decode to an ed25519 point.
    #[must_use]
    pub fn is_on_curve(&self) -> bool {
        VerifyingKey::from_bytes(&self.0).is_ok()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.short())
    }
}

impl FromStr for Address {
    type Err = SynthswapError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)
            .map_err(|e| SynthswapError::Serialization(format!("bad address hex: {e}")))?;
        let arr: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
            SynthswapError::Serialization(format!("address must be 32 bytes, got {}", v.len()))
        })?;
        Ok(Self(arr))
    }
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Compute the address for `seeds` with an explicit bump, without checking
/// that the result is off-curve.
///
/// Each seed is length-prefixed so `["ab", "c"]` and `["a", "bc"]` never
/// collide.
///
/// # Errors
/// Returns [`SynthswapError::InvalidSeeds`] if there are too many seeds or a
/// seed is longer than [`MAX_SEED_LEN`].
pub fn create_derived_address(seeds: &[&[u8]], bump: u8) -> Result<Address> {
    if seeds.len() > MAX_SEEDS {
        return Err(SynthswapError::InvalidSeeds {
            reason: format!("{} seeds > max {MAX_SEEDS}", seeds.len()),
        });
    }
    let mut hasher = Sha256::new();
    hasher.update(DERIVATION_DOMAIN);
    for seed in seeds {
        if seed.len() > MAX_SEED_LEN {
            return Err(SynthswapError::InvalidSeeds {
                reason: format!("seed of {} bytes > max {MAX_SEED_LEN}", seed.len()),
            });
        }
        // Bounded by MAX_SEED_LEN above.
        #[allow(clippy::cast_possible_truncation)]
        hasher.update([seed.len() as u8]);
        hasher.update(seed);
    }
    hasher.update([bump]);
    let bytes: [u8; 32] = hasher.finalize().into();
    Ok(Address(bytes))
}

/// Find the canonical derived address for `seeds`: the first bump, counting
/// down from 255, whose address is off the ed25519 curve.
///
/// # Errors
/// Returns [`SynthswapError::InvalidSeeds`] for oversized seeds, or
/// [`SynthswapError::Internal`] if every bump lands on-curve (probability
/// ~2^-256).
pub fn find_derived_address(seeds: &[&[u8]]) -> Result<(Address, u8)> {
    for bump in (0..=u8::MAX).rev() {
        let candidate = create_derived_address(seeds, bump)?;
        if !candidate.is_on_curve() {
            return Ok((candidate, bump));
        }
    }
    Err(SynthswapError::Internal(
        "no off-curve bump found for seeds".into(),
    ))
}

/// Re-derive an address from its seeds and stored bump and compare it
/// against the address the record was loaded from.
///
/// # Errors
/// Returns [`SynthswapError::AddressMismatch`] if they differ.
pub fn verify_derived_address(seeds: &[&[u8]], bump: u8, actual: &Address) -> Result<()> {
    let expected = create_derived_address(seeds, bump)?;
    if expected != *actual {
        return Err(SynthswapError::AddressMismatch {
            expected,
            actual: *actual,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Seed layouts, one per record kind
// ---------------------------------------------------------------------------

/// Address of the trading pool singleton.
pub fn trading_pool_address() -> Result<(Address, u8)> {
    find_derived_address(&[TRADING_POOL_SEED])
}

/// Address of the pooled native-currency vault.
pub fn vault_address() -> Result<(Address, u8)> {
    find_derived_address(&[VAULT_SEED])
}

/// Address of the share-token identity (mint) for `symbol`.
pub fn asset_mint_address(symbol: &Symbol) -> Result<(Address, u8)> {
    find_derived_address(&[ASSET_MINT_SEED, symbol.as_bytes()])
}

/// Address of the registry entry for `symbol`.
pub fn asset_registry_address(symbol: &Symbol) -> Result<(Address, u8)> {
    find_derived_address(&[ASSET_REGISTRY_SEED, symbol.as_bytes()])
}

/// Seed tag for an order of the given side.
#[must_use]
pub fn order_seed_tag(side: OrderSide) -> &'static [u8] {
    match side {
        OrderSide::Buy => BUY_ORDER_SEED,
        OrderSide::Sell => SELL_ORDER_SEED,
    }
}

/// Address of the order placed by `user` with sequence `order_id`.
pub fn order_address(side: OrderSide, user: &Address, order_id: OrderId) -> Result<(Address, u8)> {
    find_derived_address(&[order_seed_tag(side), user.as_bytes(), &order_id.to_le_bytes()])
}

/// Re-check a loaded order's address against its owner, sequence and bump.
pub fn verify_order_address(
    side: OrderSide,
    user: &Address,
    order_id: OrderId,
    bump: u8,
    actual: &Address,
) -> Result<()> {
    verify_derived_address(
        &[order_seed_tag(side), user.as_bytes(), &order_id.to_le_bytes()],
        bump,
        actual,
    )
}

/// Address of the sell escrow holding for the asset identity `mint`.
pub fn escrow_address(mint: &Address) -> Result<(Address, u8)> {
    find_derived_address(&[ESCROW_SEED, mint.as_bytes()])
}

/// Address of `owner`'s share holding for the asset identity `mint`.
pub fn holding_address(owner: &Address, mint: &Address) -> Result<(Address, u8)> {
    find_derived_address(&[HOLDING_SEED, owner.as_bytes(), mint.as_bytes()])
}
