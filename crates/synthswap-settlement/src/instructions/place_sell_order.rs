use synthswap_ledger::{TokenAuthority, Transaction, token};
use synthswap_types::{
    LedgerEvent, OrderSide, OrderStatus, Result, SellOrder, Symbol, SynthswapError,
    escrow_address, holding_address, order_address,
};

use crate::accounts::{load_asset, load_pool, require_nonzero_amount, require_nonzero_price};

/// Move `shares_to_sell` from the seller's holding into the symbol escrow
/// and open a pending sell order. The escrow holding is created on first
/// use, paid by the seller.
pub fn handler(
    tx: &mut Transaction<'_>,
    symbol: Symbol,
    shares_to_sell: u64,
    min_price_per_share: u64,
) -> Result<()> {
    require_nonzero_amount(shares_to_sell, "shares_to_sell")?;
    require_nonzero_price(min_price_per_share, "min_price_per_share")?;

    let (pool_address, mut pool) = load_pool(tx)?;
    let (_, registry) = load_asset(tx, &symbol)?;
    let mint = registry.asset_handle;

    let user = tx.signer();
    let (user_holding, _) = holding_address(&user, &mint)?;
    if !tx.has_record(&user_holding)? {
        return Err(SynthswapError::InsufficientShares {
            needed: shares_to_sell,
            available: 0,
        });
    }

    let (escrow, _) = escrow_address(&mint)?;
    token::ensure_holding(tx, &escrow, &user, mint, pool_address)?;

    let order_id = pool.next_order_id();
    let (order_address, order_bump) = order_address(OrderSide::Sell, &user, order_id)?;
    let timestamp = tx.unix_timestamp();
    tx.create(
        &order_address,
        &user,
        SellOrder {
            user,
            symbol: symbol.clone(),
            shares_to_sell,
            min_price_per_share,
            order_id,
            status: OrderStatus::Pending,
            timestamp,
            sol_received: 0,
            actual_price_per_share: 0,
            storage_proof: order_bump,
        },
    )?;
    token::transfer(tx, &user_holding, &escrow, TokenAuthority::Signer, shares_to_sell)?;

    pool.advance_order_sequence()?;
    tx.save(&pool_address, pool)?;

    tracing::debug!(%order_id, user = %user.short(), %symbol, shares_to_sell, "sell order escrowed");
    tx.emit(LedgerEvent::SellOrderPlaced {
        order_id,
        user,
        symbol,
        shares_to_sell,
        min_price_per_share,
        timestamp,
    });
    Ok(())
}
