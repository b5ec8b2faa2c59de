use synthswap_ledger::{Transaction, token};
use synthswap_types::{
    Address, LedgerEvent, OrderId, Result, SynthswapError, escrow_address, holding_address,
};

use crate::accounts::{
    load_asset, load_pool, load_sell_order, load_vault, pool_authority, vault_withdrawable,
};

/// Backend-attested fill of a pending sell order.
///
/// Every escrowed share is either burned as sold or returned to the seller.
/// The attested `total_proceeds` is recorded as submitted; the only
/// consistency rule enforced is that nothing is paid when nothing is sold.
pub fn handler(
    tx: &mut Transaction<'_>,
    user: Address,
    order_id: OrderId,
    shares_sold: u64,
    price_per_share: u64,
    total_proceeds: u64,
    shares_returned: u64,
) -> Result<()> {
    let (_, pool) = load_pool(tx)?;
    let backend = tx.signer();
    pool.require_backend_authority(&backend)?;

    let (order_address, mut order) = load_sell_order(tx, &user, order_id)?;
    order.require_pending()?;

    if price_per_share < order.min_price_per_share {
        return Err(SynthswapError::PriceBelowLimit {
            price: price_per_share,
            limit: order.min_price_per_share,
        });
    }
    if shares_sold.checked_add(shares_returned) != Some(order.shares_to_sell) {
        return Err(SynthswapError::AccountingMismatch {
            reason: format!(
                "shares_sold {shares_sold} + shares_returned {shares_returned} != shares_to_sell {}",
                order.shares_to_sell
            ),
        });
    }
    if shares_sold == 0 && total_proceeds != 0 {
        return Err(SynthswapError::AccountingMismatch {
            reason: format!("total_proceeds {total_proceeds} attested for zero shares sold"),
        });
    }

    let (registry_address, mut registry) = load_asset(tx, &order.symbol)?;
    let (vault_address, vault) = load_vault(tx)?;
    let mint = registry.asset_handle;
    let (escrow, _) = escrow_address(&mint)?;
    let (user_holding, _) = holding_address(&user, &mint)?;

    let withdrawable = vault_withdrawable(tx, &vault_address, &vault)?;
    if total_proceeds > withdrawable {
        return Err(SynthswapError::InsufficientVaultBalance {
            requested: total_proceeds,
            withdrawable,
        });
    }

    token::burn(tx, &mint, &escrow, pool_authority(&pool), shares_sold)?;
    registry.record_burn(shares_sold)?;
    tx.save(&registry_address, registry)?;

    if shares_returned > 0 {
        token::ensure_holding(tx, &user_holding, &backend, mint, user)?;
        token::transfer(tx, &escrow, &user_holding, pool_authority(&pool), shares_returned)?;
    }
    tx.transfer_lamports(&vault_address, &user, total_proceeds)?;

    order.mark_fulfilled(total_proceeds, price_per_share)?;
    let symbol = order.symbol.clone();
    tx.save(&order_address, order)?;

    tx.emit(LedgerEvent::SellOrderFulfilled {
        order_id,
        user,
        symbol,
        shares_sold,
        price_per_share,
        total_proceeds,
        shares_returned,
        attested_by: backend,
    });
    Ok(())
}
