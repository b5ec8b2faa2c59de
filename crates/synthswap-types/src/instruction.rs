//! Named instructions accepted by the settlement core.
//!
//! Each instruction carries a fixed argument payload: `u64` amounts, bounded
//! ASCII symbols and principal addresses. The addresses the instruction will
//! touch are declared separately on the transaction.

use serde::{Deserialize, Serialize};

use crate::{Address, OrderId, Symbol};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Instruction {
    /// Create the trading pool singleton. Any signer may pay for it once.
    InitializeTradingPool {
        vault_authority: Address,
        backend_authority: Address,
    },
    /// Register a new symbol and its share token. Vault authority only.
    CreateAsset { symbol: Symbol, decimals: u8 },
    /// Escrow native currency and open a buy order.
    PlaceBuyOrder {
        symbol: Symbol,
        sol_amount: u64,
        max_price_per_share: u64,
    },
    /// Attest a buy fill. Backend authority only.
    FulfillBuyOrder {
        user: Address,
        order_id: OrderId,
        shares_purchased: u64,
        price_per_share: u64,
        total_cost: u64,
        refund_amount: u64,
    },
    /// Escrow shares and open a sell order.
    PlaceSellOrder {
        symbol: Symbol,
        shares_to_sell: u64,
        min_price_per_share: u64,
    },
    /// Attest a sell fill. Backend authority only.
    FulfillSellOrder {
        user: Address,
        order_id: OrderId,
        shares_sold: u64,
        price_per_share: u64,
        total_proceeds: u64,
        shares_returned: u64,
    },
    /// Top up fulfillment liquidity. Vault authority only.
    DepositVaultFunds { amount: u64 },
    /// Withdraw discretionary vault funds. Vault authority only.
    WithdrawVaultFunds { amount: u64 },
    /// Replace either or both authorities. Current vault authority only.
    UpdateAuthorities {
        new_vault_authority: Option<Address>,
        new_backend_authority: Option<Address>,
    },
    /// Withdraw a pending buy order and refund its escrow. Placer only.
    CancelBuyOrder { user: Address, order_id: OrderId },
    /// Withdraw a pending sell order and return its shares. Placer only.
    CancelSellOrder { user: Address, order_id: OrderId },
}

impl Instruction {
    /// Stable operation tag, as used on the wire and in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::InitializeTradingPool { .. } => "initialize_trading_pool",
            Self::CreateAsset { .. } => "create_asset",
            Self::PlaceBuyOrder { .. } => "place_buy_order",
            Self::FulfillBuyOrder { .. } => "fulfill_buy_order",
            Self::PlaceSellOrder { .. } => "place_sell_order",
            Self::FulfillSellOrder { .. } => "fulfill_sell_order",
            Self::DepositVaultFunds { .. } => "deposit_vault_funds",
            Self::WithdrawVaultFunds { .. } => "withdraw_vault_funds",
            Self::UpdateAuthorities { .. } => "update_authorities",
            Self::CancelBuyOrder { .. } => "cancel_buy_order",
            Self::CancelSellOrder { .. } => "cancel_sell_order",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_tag_matches_name() {
        let ix = Instruction::PlaceBuyOrder {
            symbol: Symbol::new("AAPL").unwrap(),
            sol_amount: 10,
            max_price_per_share: 1,
        };
        let json = serde_json::to_value(&ix).unwrap();
        assert_eq!(json["op"], ix.name());
        let back: Instruction = serde_json::from_value(json).unwrap();
        assert_eq!(back, ix);
    }

    #[test]
    fn invalid_symbol_rejected_on_decode() {
        let raw = r#"{"op":"create_asset","symbol":"NOT A SYMBOL","decimals":0}"#;
        assert!(serde_json::from_str::<Instruction>(raw).is_err());
    }
}
