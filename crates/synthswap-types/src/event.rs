//! Typed events emitted by committed operations.
//!
//! Events form an append-only audit trail. Fill events carry the attested
//! price and amounts exactly as the backend authority submitted them, so
//! every trusted attestation can be reviewed after the fact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Address, OrderId, Symbol, TxId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    TradingPoolInitialized {
        vault_authority: Address,
        backend_authority: Address,
    },
    StockMintCreated {
        symbol: Symbol,
        mint: Address,
        decimals: u8,
    },
    BuyOrderPlaced {
        order_id: OrderId,
        user: Address,
        symbol: Symbol,
        sol_amount: u64,
        max_price_per_share: u64,
        timestamp: i64,
    },
    BuyOrderFulfilled {
        order_id: OrderId,
        user: Address,
        symbol: Symbol,
        shares_purchased: u64,
        price_per_share: u64,
        total_cost: u64,
        refund_amount: u64,
        attested_by: Address,
    },
    BuyOrderCancelled {
        order_id: OrderId,
        user: Address,
        refunded: u64,
    },
    SellOrderPlaced {
        order_id: OrderId,
        user: Address,
        symbol: Symbol,
        shares_to_sell: u64,
        min_price_per_share: u64,
        timestamp: i64,
    },
    SellOrderFulfilled {
        order_id: OrderId,
        user: Address,
        symbol: Symbol,
        shares_sold: u64,
        price_per_share: u64,
        total_proceeds: u64,
        shares_returned: u64,
        attested_by: Address,
    },
    SellOrderCancelled {
        order_id: OrderId,
        user: Address,
        shares_returned: u64,
    },
    VaultFundsDeposited {
        authority: Address,
        amount: u64,
    },
    VaultFundsWithdrawn {
        authority: Address,
        amount: u64,
    },
    AuthoritiesUpdated {
        vault_authority: Address,
        backend_authority: Address,
    },
}

impl LedgerEvent {
    /// Whether this event records a backend price attestation.
    #[must_use]
    pub fn is_attested_fill(&self) -> bool {
        matches!(
            self,
            Self::BuyOrderFulfilled { .. } | Self::SellOrderFulfilled { .. }
        )
    }
}

/// One entry of the event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the log, starting at 0.
    pub sequence: u64,
    /// The transaction that emitted the event.
    pub tx_id: TxId,
    pub emitted_at: DateTime<Utc>,
    pub event: LedgerEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_events_are_attestations() {
        let fill = LedgerEvent::SellOrderFulfilled {
            order_id: OrderId(1),
            user: Address([1u8; 32]),
            symbol: Symbol::new("AAPL").unwrap(),
            shares_sold: 800,
            price_per_share: 10,
            total_proceeds: 8000,
            shares_returned: 200,
            attested_by: Address([2u8; 32]),
        };
        assert!(fill.is_attested_fill());
        let deposit = LedgerEvent::VaultFundsDeposited {
            authority: Address([1u8; 32]),
            amount: 5,
        };
        assert!(!deposit.is_attested_fill());
    }

    #[test]
    fn event_tag_serialization() {
        let ev = LedgerEvent::VaultFundsWithdrawn {
            authority: Address([3u8; 32]),
            amount: 9,
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["event"], "vault_funds_withdrawn");
    }
}
