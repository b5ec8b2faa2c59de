//! Instruction dispatch.

use synthswap_ledger::Transaction;
use synthswap_types::{Instruction, Result};

use crate::instructions::{
    cancel_buy_order, cancel_sell_order, create_asset, deposit_vault_funds, fulfill_buy_order,
    fulfill_sell_order, initialize_trading_pool, place_buy_order, place_sell_order,
    update_authorities, withdraw_vault_funds,
};

/// Run `instruction` against an open transaction.
pub fn process(tx: &mut Transaction<'_>, instruction: Instruction) -> Result<()> {
    match instruction {
        Instruction::InitializeTradingPool {
            vault_authority,
            backend_authority,
        } => initialize_trading_pool::handler(tx, vault_authority, backend_authority),
        Instruction::CreateAsset { symbol, decimals } => {
            create_asset::handler(tx, symbol, decimals)
        }
        Instruction::PlaceBuyOrder {
            symbol,
            sol_amount,
            max_price_per_share,
        } => place_buy_order::handler(tx, symbol, sol_amount, max_price_per_share),
        Instruction::FulfillBuyOrder {
            user,
            order_id,
            shares_purchased,
            price_per_share,
            total_cost,
            refund_amount,
        } => fulfill_buy_order::handler(
            tx,
            user,
            order_id,
            shares_purchased,
            price_per_share,
            total_cost,
            refund_amount,
        ),
        Instruction::PlaceSellOrder {
            symbol,
            shares_to_sell,
            min_price_per_share,
        } => place_sell_order::handler(tx, symbol, shares_to_sell, min_price_per_share),
        Instruction::FulfillSellOrder {
            user,
            order_id,
            shares_sold,
            price_per_share,
            total_proceeds,
            shares_returned,
        } => fulfill_sell_order::handler(
            tx,
            user,
            order_id,
            shares_sold,
            price_per_share,
            total_proceeds,
            shares_returned,
        ),
        Instruction::DepositVaultFunds { amount } => deposit_vault_funds::handler(tx, amount),
        Instruction::WithdrawVaultFunds { amount } => withdraw_vault_funds::handler(tx, amount),
        Instruction::UpdateAuthorities {
            new_vault_authority,
            new_backend_authority,
        } => update_authorities::handler(tx, new_vault_authority, new_backend_authority),
        Instruction::CancelBuyOrder { user, order_id } => {
            cancel_buy_order::handler(tx, user, order_id)
        }
        Instruction::CancelSellOrder { user, order_id } => {
            cancel_sell_order::handler(tx, user, order_id)
        }
    }
}
