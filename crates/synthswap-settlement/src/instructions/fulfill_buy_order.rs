use synthswap_ledger::{Transaction, token};
use synthswap_types::{Address, LedgerEvent, OrderId, Result, SynthswapError, holding_address};

use crate::accounts::{load_asset, load_buy_order, load_pool, load_vault, pool_authority};

/// Backend-attested fill of a pending buy order.
///
/// Checks run in a fixed order: backend signer, pending status, price
/// ceiling, then accounting closure (`total_cost + refund_amount ==
/// sol_amount`). On success the shares are minted to the buyer, the refund
/// leaves the vault and `total_cost` stays behind as settled proceeds.
pub fn handler(
    tx: &mut Transaction<'_>,
    user: Address,
    order_id: OrderId,
    shares_purchased: u64,
    price_per_share: u64,
    total_cost: u64,
    refund_amount: u64,
) -> Result<()> {
    let (_, pool) = load_pool(tx)?;
    let backend = tx.signer();
    pool.require_backend_authority(&backend)?;

    let (order_address, mut order) = load_buy_order(tx, &user, order_id)?;
    order.require_pending()?;

    if price_per_share > order.max_price_per_share {
        return Err(SynthswapError::PriceExceedsLimit {
            price: price_per_share,
            limit: order.max_price_per_share,
        });
    }
    if total_cost.checked_add(refund_amount) != Some(order.sol_amount) {
        return Err(SynthswapError::AccountingMismatch {
            reason: format!(
                "total_cost {total_cost} + refund_amount {refund_amount} != sol_amount {}",
                order.sol_amount
            ),
        });
    }

    let (registry_address, mut registry) = load_asset(tx, &order.symbol)?;
    let (vault_address, mut vault) = load_vault(tx)?;
    let mint = registry.asset_handle;
    let (holding, _) = holding_address(&user, &mint)?;

    token::ensure_holding(tx, &holding, &backend, mint, user)?;
    token::mint_to(tx, &mint, &holding, pool_authority(&pool), shares_purchased)?;
    registry.record_mint(shares_purchased)?;
    tx.save(&registry_address, registry)?;

    vault.release(order.sol_amount)?;
    tx.save(&vault_address, vault)?;
    tx.transfer_lamports(&vault_address, &user, refund_amount)?;

    order.mark_fulfilled(shares_purchased, price_per_share)?;
    let symbol = order.symbol.clone();
    tx.save(&order_address, order)?;

    tx.emit(LedgerEvent::BuyOrderFulfilled {
        order_id,
        user,
        symbol,
        shares_purchased,
        price_per_share,
        total_cost,
        refund_amount,
        attested_by: backend,
    });
    Ok(())
}
