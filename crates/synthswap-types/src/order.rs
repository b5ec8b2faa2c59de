//! Buy and sell order records.
//!
//! ## State Machine
//!
//! ```text
//!   ┌─────────┐  fulfill   ┌───────────┐
//!   │ PENDING ├───────────▶│ FULFILLED │
//!   └────┬────┘            └───────────┘
//!        │ cancel (placer only)
//!        ▼
//!   ┌───────────┐
//!   │ CANCELLED │
//!   └───────────┘
//! ```
//!
//! Both terminal states are final: a fulfilled or cancelled order never
//! moves again. Records are never deleted.

use serde::{Deserialize, Serialize};

use crate::constants::MAX_SYMBOL_LEN;
use crate::{Address, OrderId, Result, Symbol, SynthswapError};

/// Which side of the trade this order is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Escrow is held; waiting for the backend to attest a fill.
    Pending,
    /// Settled at an attested price. **Terminal.**
    Fulfilled,
    /// Withdrawn by the placer before any fill; escrow returned. **Terminal.**
    Cancelled,
}

impl OrderStatus {
    /// Can an order in this state move to `target`?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!((self, target), (Self::Pending, Self::Fulfilled | Self::Cancelled))
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Fulfilled => write!(f, "FULFILLED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

fn transition(order_id: OrderId, status: &mut OrderStatus, target: OrderStatus) -> Result<()> {
    if !status.can_transition_to(target) {
        return Err(SynthswapError::InvalidOrderState {
            order_id: order_id.0,
            status: *status,
        });
    }
    *status = target;
    Ok(())
}

/// A request to buy shares of `symbol` with escrowed native currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyOrder {
    pub user: Address,
    pub symbol: Symbol,
    /// Escrowed native currency. Immutable once placed.
    pub sol_amount: u64,
    /// Price ceiling, in lamports per share.
    pub max_price_per_share: u64,
    pub order_id: OrderId,
    pub status: OrderStatus,
    /// Unix seconds at placement.
    pub timestamp: i64,
    pub shares_received: u64,
    pub actual_price_per_share: u64,
    pub storage_proof: u8,
}

impl BuyOrder {
    pub const LEN: usize = 8 + 32 + (4 + MAX_SYMBOL_LEN) + 8 + 8 + 8 + 1 + 8 + 8 + 8 + 1;

    /// # Errors
    /// Returns `InvalidOrderState` unless the order is pending.
    pub fn require_pending(&self) -> Result<()> {
        if self.status != OrderStatus::Pending {
            return Err(SynthswapError::InvalidOrderState {
                order_id: self.order_id.0,
                status: self.status,
            });
        }
        Ok(())
    }

    /// Record a fill. Only valid from `Pending`.
    pub fn mark_fulfilled(&mut self, shares: u64, price_per_share: u64) -> Result<()> {
        transition(self.order_id, &mut self.status, OrderStatus::Fulfilled)?;
        self.shares_received = shares;
        self.actual_price_per_share = price_per_share;
        Ok(())
    }

    /// Record a cancellation. Only valid from `Pending`.
    pub fn mark_cancelled(&mut self) -> Result<()> {
        transition(self.order_id, &mut self.status, OrderStatus::Cancelled)
    }
}

/// A request to sell escrowed shares of `symbol` for native currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellOrder {
    pub user: Address,
    pub symbol: Symbol,
    /// Escrowed shares. Immutable once placed.
    pub shares_to_sell: u64,
    /// Price floor, in lamports per share.
    pub min_price_per_share: u64,
    pub order_id: OrderId,
    pub status: OrderStatus,
    /// Unix seconds at placement.
    pub timestamp: i64,
    pub sol_received: u64,
    pub actual_price_per_share: u64,
    pub storage_proof: u8,
}

impl SellOrder {
    pub const LEN: usize = 8 + 32 + (4 + MAX_SYMBOL_LEN) + 8 + 8 + 8 + 1 + 8 + 8 + 8 + 1;

    /// # Errors
    /// Returns `InvalidOrderState` unless the order is pending.
    pub fn require_pending(&self) -> Result<()> {
        if self.status != OrderStatus::Pending {
            return Err(SynthswapError::InvalidOrderState {
                order_id: self.order_id.0,
                status: self.status,
            });
        }
        Ok(())
    }

    /// Record a fill. Only valid from `Pending`.
    pub fn mark_fulfilled(&mut self, proceeds: u64, price_per_share: u64) -> Result<()> {
        transition(self.order_id, &mut self.status, OrderStatus::Fulfilled)?;
        self.sol_received = proceeds;
        self.actual_price_per_share = price_per_share;
        Ok(())
    }

    /// Record a cancellation. Only valid from `Pending`.
    pub fn mark_cancelled(&mut self) -> Result<()> {
        transition(self.order_id, &mut self.status, OrderStatus::Cancelled)
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl BuyOrder {
    pub fn dummy(user: Address, sol_amount: u64, max_price_per_share: u64) -> Self {
        Self {
            user,
            symbol: Symbol::new("AAPL").expect("valid symbol"),
            sol_amount,
            max_price_per_share,
            order_id: OrderId(0),
            status: OrderStatus::Pending,
            timestamp: 0,
            shares_received: 0,
            actual_price_per_share: 0,
            storage_proof: 255,
        }
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl SellOrder {
    pub fn dummy(user: Address, shares_to_sell: u64, min_price_per_share: u64) -> Self {
        Self {
            user,
            symbol: Symbol::new("AAPL").expect("valid symbol"),
            shares_to_sell,
            min_price_per_share,
            order_id: OrderId(0),
            status: OrderStatus::Pending,
            timestamp: 0,
            sol_received: 0,
            actual_price_per_share: 0,
            storage_proof: 255,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_transitions_valid() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Fulfilled));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn terminal_states_are_final() {
        for terminal in [OrderStatus::Fulfilled, OrderStatus::Cancelled] {
            for target in [
                OrderStatus::Pending,
                OrderStatus::Fulfilled,
                OrderStatus::Cancelled,
            ] {
                assert!(!terminal.can_transition_to(target), "{terminal} -> {target}");
            }
        }
    }

    #[test]
    fn buy_fulfil_records_outcome() {
        let mut order = BuyOrder::dummy(Address([1u8; 32]), 2_000_000_000, 1_000_000);
        order.mark_fulfilled(2000, 1_000_000).unwrap();
        assert_eq!(order.status, OrderStatus::Fulfilled);
        assert_eq!(order.shares_received, 2000);
        assert_eq!(order.actual_price_per_share, 1_000_000);
    }

    #[test]
    fn double_fulfil_blocked_and_outcome_untouched() {
        let mut order = BuyOrder::dummy(Address([1u8; 32]), 100, 10);
        order.mark_fulfilled(10, 10).unwrap();
        let err = order.mark_fulfilled(99, 1).unwrap_err();
        assert!(matches!(err, SynthswapError::InvalidOrderState { .. }));
        assert_eq!(order.shares_received, 10);
    }

    #[test]
    fn cancelled_sell_cannot_be_fulfilled() {
        let mut order = SellOrder::dummy(Address([1u8; 32]), 1000, 5);
        order.mark_cancelled().unwrap();
        assert!(order.require_pending().is_err());
        assert!(order.mark_fulfilled(5000, 5).is_err());
        assert_eq!(order.sol_received, 0);
    }

    #[test]
    fn status_display() {
        assert_eq!(OrderStatus::Pending.to_string(), "PENDING");
        assert_eq!(OrderSide::Sell.to_string(), "SELL");
    }
}
