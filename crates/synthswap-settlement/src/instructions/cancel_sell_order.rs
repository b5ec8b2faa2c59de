use synthswap_ledger::{Transaction, token};
use synthswap_types::{
    Address, LedgerEvent, OrderId, Result, SynthswapError, escrow_address, holding_address,
};

use crate::accounts::{load_asset, load_pool, load_sell_order, pool_authority};

/// Withdraw a pending sell order and return the escrowed shares. Placer only.
pub fn handler(tx: &mut Transaction<'_>, user: Address, order_id: OrderId) -> Result<()> {
    let signer = tx.signer();
    let (order_address, mut order) = load_sell_order(tx, &user, order_id)?;
    if signer != order.user {
        return Err(SynthswapError::Unauthorized { signer });
    }
    order.mark_cancelled()?;

    let (_, pool) = load_pool(tx)?;
    let (_, registry) = load_asset(tx, &order.symbol)?;
    let mint = registry.asset_handle;
    let (escrow, _) = escrow_address(&mint)?;
    let (user_holding, _) = holding_address(&user, &mint)?;

    let shares_returned = order.shares_to_sell;
    token::ensure_holding(tx, &user_holding, &user, mint, user)?;
    token::transfer(tx, &escrow, &user_holding, pool_authority(&pool), shares_returned)?;
    tx.save(&order_address, order)?;

    tx.emit(LedgerEvent::SellOrderCancelled {
        order_id,
        user,
        shares_returned,
    });
    Ok(())
}
