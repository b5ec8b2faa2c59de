//! Configuration for a Synthswap ledger instance.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{constants, Result, SynthswapError};

/// Rent model: creating a record moves a one-off deposit from the payer into
/// the new account, proportional to its size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentConfig {
    /// Lamports charged per stored byte (overhead included).
    pub lamports_per_byte: u64,
    /// Fixed bytes added to every record's size.
    pub account_overhead: u64,
}

impl RentConfig {
    /// Deposit required to create a record of `data_len` bytes.
    ///
    /// # Errors
    /// Returns `ArithmeticOverflow` for absurd parameters.
    pub fn minimum_balance(&self, data_len: usize) -> Result<u64> {
        let len = u64::try_from(data_len).map_err(|_| SynthswapError::ArithmeticOverflow {
            context: "rent data length",
        })?;
        self.account_overhead
            .checked_add(len)
            .and_then(|bytes| bytes.checked_mul(self.lamports_per_byte))
            .ok_or(SynthswapError::ArithmeticOverflow {
                context: "rent minimum balance",
            })
    }
}

impl Default for RentConfig {
    fn default() -> Self {
        Self {
            lamports_per_byte: constants::DEFAULT_LAMPORTS_PER_BYTE,
            account_overhead: constants::ACCOUNT_STORAGE_OVERHEAD,
        }
    }
}

/// Top-level ledger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub rent: RentConfig,
    /// Decimal places of the native currency, for display conversion.
    pub native_decimals: u8,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            rent: RentConfig::default(),
            native_decimals: constants::NATIVE_DECIMALS,
        }
    }
}

impl LedgerConfig {
    /// A configuration with rent disabled, for scenarios that reason about
    /// exact balances.
    #[must_use]
    pub fn rent_free() -> Self {
        Self {
            rent: RentConfig {
                lamports_per_byte: 0,
                account_overhead: 0,
            },
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(raw)
            .map_err(|e| SynthswapError::Configuration(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// # Errors
    /// Returns `Configuration` for values the ledger can't operate with.
    pub fn validate(&self) -> Result<()> {
        if self.native_decimals > 18 {
            return Err(SynthswapError::Configuration(format!(
                "native_decimals {} > 18",
                self.native_decimals
            )));
        }
        self.rent.minimum_balance(0).map_err(|_| {
            SynthswapError::Configuration("rent parameters overflow".into())
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rent_matches_constants() {
        let rent = RentConfig::default();
        assert_eq!(rent.minimum_balance(0).unwrap(), 128 * 6960);
        assert_eq!(rent.minimum_balance(100).unwrap(), 228 * 6960);
    }

    #[test]
    fn rent_free_charges_nothing() {
        let cfg = LedgerConfig::rent_free();
        assert_eq!(cfg.rent.minimum_balance(4096).unwrap(), 0);
    }

    #[test]
    fn partial_json_takes_defaults() {
        let cfg = LedgerConfig::from_json_str(r#"{"native_decimals": 6}"#).unwrap();
        assert_eq!(cfg.native_decimals, 6);
        assert_eq!(cfg.rent, RentConfig::default());
    }

    #[test]
    fn invalid_config_rejected() {
        let err = LedgerConfig::from_json_str(r#"{"native_decimals": 30}"#).unwrap_err();
        assert!(matches!(err, SynthswapError::Configuration(_)));
        let err = LedgerConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, SynthswapError::Configuration(_)));
    }

    #[test]
    fn overflowing_rent_rejected() {
        let cfg = LedgerConfig {
            rent: RentConfig {
                lamports_per_byte: u64::MAX,
                account_overhead: 2,
            },
            ..LedgerConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = LedgerConfig::from_json_file("/nonexistent/synthswap.json").unwrap_err();
        assert!(matches!(err, SynthswapError::Io(_)));
    }
}
