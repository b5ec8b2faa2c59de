//! The trading pool singleton and the vault's obligation ledger.

use serde::{Deserialize, Serialize};

use crate::{Address, OrderId, Result, SynthswapError};

/// Singleton holding the two trusted authorities and the global order
/// sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingPool {
    /// Manages vault funds, creates assets, rotates authorities.
    pub vault_authority: Address,
    /// Attests fills.
    pub backend_authority: Address,
    /// Number of orders ever placed. Never reused or decremented.
    pub total_orders: u64,
    pub storage_proof: u8,
}

impl TradingPool {
    pub const LEN: usize = 8 + 32 + 32 + 8 + 1;

    #[must_use]
    pub fn new(vault_authority: Address, backend_authority: Address, storage_proof: u8) -> Self {
        Self {
            vault_authority,
            backend_authority,
            total_orders: 0,
            storage_proof,
        }
    }

    /// The id the next placed order will receive.
    #[must_use]
    pub fn next_order_id(&self) -> OrderId {
        OrderId(self.total_orders)
    }

    /// Consume the next order id, advancing the sequence by exactly one.
    ///
    /// # Errors
    /// Returns `ArithmeticOverflow` once the sequence is exhausted.
    pub fn advance_order_sequence(&mut self) -> Result<OrderId> {
        let assigned = self.next_order_id();
        self.total_orders = self
            .total_orders
            .checked_add(1)
            .ok_or(SynthswapError::ArithmeticOverflow {
                context: "trading pool total_orders",
            })?;
        Ok(assigned)
    }

    /// # Errors
    /// Returns `Unauthorized` unless `signer` is the vault authority.
    pub fn require_vault_authority(&self, signer: &Address) -> Result<()> {
        if *signer != self.vault_authority {
            return Err(SynthswapError::Unauthorized { signer: *signer });
        }
        Ok(())
    }

    /// # Errors
    /// Returns `UnauthorizedBackend` unless `signer` is the backend authority.
    pub fn require_backend_authority(&self, signer: &Address) -> Result<()> {
        if *signer != self.backend_authority {
            return Err(SynthswapError::UnauthorizedBackend { signer: *signer });
        }
        Ok(())
    }
}

/// Bookkeeping carried by the vault account.
///
/// `committed` is the sum of `sol_amount` over all pending buy orders. The
/// vault's native balance must never fall below it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultState {
    pub committed: u64,
    pub storage_proof: u8,
}

impl VaultState {
    pub const LEN: usize = 8 + 8 + 1;

    /// Balance above the committed floor, i.e. what may leave the vault
    /// without touching buy escrow.
    #[must_use]
    pub fn withdrawable(&self, vault_balance: u64) -> u64 {
        vault_balance.saturating_sub(self.committed)
    }

    /// # Errors
    /// Returns `ArithmeticOverflow` on `u64` overflow.
    pub fn commit(&mut self, amount: u64) -> Result<()> {
        self.committed = self
            .committed
            .checked_add(amount)
            .ok_or(SynthswapError::ArithmeticOverflow {
                context: "vault committed",
            })?;
        Ok(())
    }

    /// # Errors
    /// Returns `VaultInvariantViolation` if more is released than committed.
    pub fn release(&mut self, amount: u64) -> Result<()> {
        self.committed = self.committed.checked_sub(amount).ok_or_else(|| {
            SynthswapError::VaultInvariantViolation {
                reason: format!(
                    "releasing {amount} but only {} committed",
                    self.committed
                ),
            }
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> TradingPool {
        TradingPool::new(Address([1u8; 32]), Address([2u8; 32]), 254)
    }

    #[test]
    fn sequence_advances_by_one() {
        let mut p = pool();
        assert_eq!(p.advance_order_sequence().unwrap(), OrderId(0));
        assert_eq!(p.advance_order_sequence().unwrap(), OrderId(1));
        assert_eq!(p.total_orders, 2);
        assert_eq!(p.next_order_id(), OrderId(2));
    }

    #[test]
    fn exhausted_sequence_fails_without_reuse() {
        let mut p = pool();
        p.total_orders = u64::MAX;
        assert!(p.advance_order_sequence().is_err());
        assert_eq!(p.total_orders, u64::MAX);
    }

    #[test]
    fn authority_checks() {
        let p = pool();
        assert!(p.require_vault_authority(&Address([1u8; 32])).is_ok());
        assert!(matches!(
            p.require_vault_authority(&Address([2u8; 32])),
            Err(SynthswapError::Unauthorized { .. })
        ));
        assert!(p.require_backend_authority(&Address([2u8; 32])).is_ok());
        assert!(matches!(
            p.require_backend_authority(&Address([1u8; 32])),
            Err(SynthswapError::UnauthorizedBackend { .. })
        ));
    }

    #[test]
    fn vault_floor() {
        let mut v = VaultState::default();
        v.commit(700).unwrap();
        assert_eq!(v.withdrawable(1000), 300);
        assert_eq!(v.withdrawable(500), 0);
        v.release(700).unwrap();
        assert!(v.release(1).is_err());
    }
}
