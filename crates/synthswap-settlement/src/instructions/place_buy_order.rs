use synthswap_ledger::Transaction;
use synthswap_types::{
    BuyOrder, LedgerEvent, OrderSide, OrderStatus, Result, Symbol, SynthswapError, order_address,
};

use crate::accounts::{
    load_asset, load_pool, load_vault, require_nonzero_amount, require_nonzero_price,
};

/// Escrow `sol_amount` into the vault and open a pending buy order at the
/// next sequence number.
pub fn handler(
    tx: &mut Transaction<'_>,
    symbol: Symbol,
    sol_amount: u64,
    max_price_per_share: u64,
) -> Result<()> {
    require_nonzero_amount(sol_amount, "sol_amount")?;
    require_nonzero_price(max_price_per_share, "max_price_per_share")?;

    let (pool_address, mut pool) = load_pool(tx)?;
    let (vault_address, mut vault) = load_vault(tx)?;
    load_asset(tx, &symbol)?;

    let user = tx.signer();
    let order_id = pool.next_order_id();
    let (order_address, order_bump) = order_address(OrderSide::Buy, &user, order_id)?;

    let needed = sol_amount
        .checked_add(tx.rent_for::<BuyOrder>()?)
        .ok_or(SynthswapError::ArithmeticOverflow {
            context: "buy order escrow plus rent",
        })?;
    let available = tx.lamports(&user)?;
    if available < needed {
        return Err(SynthswapError::InsufficientFunds { needed, available });
    }

    let timestamp = tx.unix_timestamp();
    tx.create(
        &order_address,
        &user,
        BuyOrder {
            user,
            symbol: symbol.clone(),
            sol_amount,
            max_price_per_share,
            order_id,
            status: OrderStatus::Pending,
            timestamp,
            shares_received: 0,
            actual_price_per_share: 0,
            storage_proof: order_bump,
        },
    )?;
    tx.transfer_lamports(&user, &vault_address, sol_amount)?;

    vault.commit(sol_amount)?;
    tx.save(&vault_address, vault)?;

    let assigned = pool.advance_order_sequence()?;
    debug_assert_eq!(assigned, order_id);
    tx.save(&pool_address, pool)?;

    tracing::debug!(%order_id, user = %user.short(), %symbol, sol_amount, "buy order escrowed");
    tx.emit(LedgerEvent::BuyOrderPlaced {
        order_id,
        user,
        symbol,
        sol_amount,
        max_price_per_share,
        timestamp,
    });
    Ok(())
}
