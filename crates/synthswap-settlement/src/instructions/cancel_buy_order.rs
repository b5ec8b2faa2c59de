use synthswap_ledger::Transaction;
use synthswap_types::{Address, LedgerEvent, OrderId, Result, SynthswapError};

use crate::accounts::{load_buy_order, load_vault};

/// Withdraw a pending buy order and refund its full escrow. Placer only.
pub fn handler(tx: &mut Transaction<'_>, user: Address, order_id: OrderId) -> Result<()> {
    let signer = tx.signer();
    let (order_address, mut order) = load_buy_order(tx, &user, order_id)?;
    if signer != order.user {
        return Err(SynthswapError::Unauthorized { signer });
    }
    order.mark_cancelled()?;

    let (vault_address, mut vault) = load_vault(tx)?;
    let refunded = order.sol_amount;
    vault.release(refunded)?;
    tx.save(&vault_address, vault)?;
    tx.transfer_lamports(&vault_address, &user, refunded)?;
    tx.save(&order_address, order)?;

    tx.emit(LedgerEvent::BuyOrderCancelled {
        order_id,
        user,
        refunded,
    });
    Ok(())
}
