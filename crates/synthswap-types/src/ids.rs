//! Identifiers used throughout Synthswap.
//!
//! Order identifiers are positions in the trading pool's global sequence,
//! never random: the sequence is the sole source of order-address
//! uniqueness. Transaction identifiers use UUIDv7 for time-ordered sorting
//! in the event log.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// OrderId
// ---------------------------------------------------------------------------

/// Position of an order in the trading pool's global sequence.
///
/// Buy and sell orders share one sequence, so `OrderId(n)` is assigned to
/// exactly one placement, ever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl OrderId {
    /// Little-endian bytes used as the order's address seed.
    #[must_use]
    pub fn to_le_bytes(self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    /// The following sequence number, or `None` at `u64::MAX`.
    #[must_use]
    pub fn checked_next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order:{}", self.0)
    }
}

impl From<u64> for OrderId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

// ---------------------------------------------------------------------------
// TxId
// ---------------------------------------------------------------------------

/// Identifier of one committed transaction. Uses UUIDv7 for time ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TxId(pub Uuid);

impl TxId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for TxId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tx:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_id_le_bytes() {
        assert_eq!(OrderId(1).to_le_bytes(), [1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(OrderId(256).to_le_bytes(), [0, 1, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn order_id_next_saturates_to_none() {
        assert_eq!(OrderId(5).checked_next(), Some(OrderId(6)));
        assert_eq!(OrderId(u64::MAX).checked_next(), None);
    }

    #[test]
    fn tx_id_ordering() {
        let a = TxId::new();
        let b = TxId::new();
        assert_ne!(a, b);
        assert!(a < b);
    }

    #[test]
    fn order_id_display() {
        assert_eq!(OrderId(42).to_string(), "order:42");
    }
}
