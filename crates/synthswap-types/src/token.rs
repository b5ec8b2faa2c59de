//! Share-token records: the issuable asset identity (mint) and holdings.

use serde::{Deserialize, Serialize};

use crate::{Address, Result, SynthswapError};

/// An issuable share token. Only `mint_authority` may mint or burn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMint {
    /// Always the trading pool's derived address, never a principal.
    pub mint_authority: Address,
    pub supply: u64,
    pub decimals: u8,
}

impl AssetMint {
    pub const LEN: usize = 8 + 32 + 8 + 1;
}

/// A balance of one share token held on behalf of `owner`.
///
/// For a principal's holding `owner` is the principal; for a symbol's sell
/// escrow it is the trading pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHolding {
    pub mint: Address,
    pub owner: Address,
    pub amount: u64,
}

impl TokenHolding {
    pub const LEN: usize = 8 + 32 + 32 + 8;

    #[must_use]
    pub fn new(mint: Address, owner: Address) -> Self {
        Self {
            mint,
            owner,
            amount: 0,
        }
    }

    /// Remove `amount` from this holding.
    ///
    /// # Errors
    /// Returns `InsufficientShares` if the holding is too small.
    pub fn debit(&mut self, amount: u64) -> Result<()> {
        self.amount = self
            .amount
            .checked_sub(amount)
            .ok_or(SynthswapError::InsufficientShares {
                needed: amount,
                available: self.amount,
            })?;
        Ok(())
    }

    /// Add `amount` to this holding.
    ///
    /// # Errors
    /// Returns `ArithmeticOverflow` on `u64` overflow.
    pub fn credit(&mut self, amount: u64) -> Result<()> {
        self.amount = self
            .amount
            .checked_add(amount)
            .ok_or(SynthswapError::ArithmeticOverflow {
                context: "token holding credit",
            })?;
        Ok(())
    }
}
