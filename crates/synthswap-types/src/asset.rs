//! Symbols and the per-symbol asset registry entry.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_SYMBOL_LEN;
use crate::{Address, Result, SynthswapError};

/// A validated ticker symbol: 1..=[`MAX_SYMBOL_LEN`] printable ASCII bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Validate and wrap a symbol.
    ///
    /// # Errors
    /// - `SymbolTooLong` if longer than [`MAX_SYMBOL_LEN`] bytes
    /// - `InvalidSymbol` if empty or containing non-graphic / non-ASCII bytes
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if raw.len() > MAX_SYMBOL_LEN {
            return Err(SynthswapError::SymbolTooLong {
                len: raw.len(),
                max: MAX_SYMBOL_LEN,
            });
        }
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(SynthswapError::InvalidSymbol(raw));
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Symbol {
    type Error = SynthswapError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

/// Registry entry binding a symbol to its share-token identity.
///
/// `total_supply` always equals the net shares issued across fulfilled
/// orders for the symbol: minted on buy fulfillment, burned on sell
/// fulfillment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRegistry {
    pub symbol: Symbol,
    /// Address of the issuable share-token (mint) record.
    pub asset_handle: Address,
    pub total_supply: u64,
    pub decimals: u8,
    pub storage_proof: u8,
}

impl AssetRegistry {
    /// Serialized size in bytes: discriminator, length-prefixed symbol,
    /// handle, supply, decimals, proof.
    pub const LEN: usize = 8 + (4 + MAX_SYMBOL_LEN) + 32 + 8 + 1 + 1;

    /// Account for shares minted by a buy fulfillment.
    ///
    /// # Errors
    /// Returns `ArithmeticOverflow` if supply would exceed `u64::MAX`.
    pub fn record_mint(&mut self, shares: u64) -> Result<()> {
        self.total_supply = self
            .total_supply
            .checked_add(shares)
            .ok_or(SynthswapError::ArithmeticOverflow {
                context: "asset total_supply mint",
            })?;
        Ok(())
    }

    /// Account for shares burned by a sell fulfillment.
    ///
    /// # Errors
    /// Returns `ArithmeticOverflow` if supply would go negative.
    pub fn record_burn(&mut self, shares: u64) -> Result<()> {
        self.total_supply = self
            .total_supply
            .checked_sub(shares)
            .ok_or(SynthswapError::ArithmeticOverflow {
                context: "asset total_supply burn",
            })?;
        Ok(())
    }

    /// Outstanding supply in whole-share units.
    pub fn ui_supply(&self) -> Result<Decimal> {
        ui_amount(self.total_supply, self.decimals)
    }
}

/// Convert a raw integer amount into display units with `decimals` places.
///
/// # Errors
/// Returns `InvalidAmount` if `decimals` exceeds what `Decimal` can scale.
pub fn ui_amount(raw: u64, decimals: u8) -> Result<Decimal> {
    Decimal::try_from_i128_with_scale(i128::from(raw), u32::from(decimals)).map_err(|e| {
        SynthswapError::InvalidAmount {
            reason: format!("cannot scale {raw} by {decimals} decimals: {e}"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> AssetRegistry {
        AssetRegistry {
            symbol: Symbol::new("AAPL").unwrap(),
            asset_handle: Address([9u8; 32]),
            total_supply: 0,
            decimals: 0,
            storage_proof: 255,
        }
    }

    #[test]
    fn symbol_validation() {
        assert!(Symbol::new("AAPL").is_ok());
        assert!(Symbol::new("BRK.B").is_ok());
        assert!(matches!(
            Symbol::new("ABCDEFGHIJK"),
            Err(SynthswapError::SymbolTooLong { len: 11, max: 10 })
        ));
        assert!(matches!(Symbol::new(""), Err(SynthswapError::InvalidSymbol(_))));
        assert!(matches!(
            Symbol::new("A B"),
            Err(SynthswapError::InvalidSymbol(_))
        ));
        assert!(matches!(
            Symbol::new("ÄPL"),
            Err(SynthswapError::InvalidSymbol(_))
        ));
    }

    #[test]
    fn symbol_serde_validates() {
        let json = serde_json::to_string(&Symbol::new("MSFT").unwrap()).unwrap();
        assert_eq!(json, "\"MSFT\"");
        let bad: std::result::Result<Symbol, _> = serde_json::from_str("\"WAYTOOLONGSYM\"");
        assert!(bad.is_err());
    }

    #[test]
    fn mint_then_burn_tracks_supply() {
        let mut reg = registry();
        reg.record_mint(2000).unwrap();
        reg.record_burn(800).unwrap();
        assert_eq!(reg.total_supply, 1200);
    }

    #[test]
    fn burn_below_zero_fails() {
        let mut reg = registry();
        reg.record_mint(5).unwrap();
        let err = reg.record_burn(6).unwrap_err();
        assert!(matches!(err, SynthswapError::ArithmeticOverflow { .. }));
        assert_eq!(reg.total_supply, 5);
    }

    #[test]
    fn mint_overflow_fails() {
        let mut reg = registry();
        reg.total_supply = u64::MAX;
        assert!(reg.record_mint(1).is_err());
    }

    #[test]
    fn ui_amount_scales() {
        assert_eq!(ui_amount(2_000_000_000, 9).unwrap(), Decimal::new(2, 0));
        assert_eq!(ui_amount(1500, 3).unwrap(), Decimal::new(15, 1));
        assert!(ui_amount(1, 40).is_err());
        let mut reg = registry();
        reg.record_mint(2000).unwrap();
        assert_eq!(reg.ui_supply().unwrap(), Decimal::new(2000, 0));
    }
}
