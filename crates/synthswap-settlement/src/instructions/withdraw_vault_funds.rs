use synthswap_ledger::Transaction;
use synthswap_types::{LedgerEvent, Result, SynthswapError};

use crate::accounts::{load_pool, load_vault, require_nonzero_amount, vault_withdrawable};

/// Withdraw discretionary vault funds. The committed escrow of pending buy
/// orders is a hard floor.
pub fn handler(tx: &mut Transaction<'_>, amount: u64) -> Result<()> {
    require_nonzero_amount(amount, "withdraw amount")?;
    let (_, pool) = load_pool(tx)?;
    let authority = tx.signer();
    pool.require_vault_authority(&authority)?;

    let (vault_address, vault) = load_vault(tx)?;
    let withdrawable = vault_withdrawable(tx, &vault_address, &vault)?;
    if amount > withdrawable {
        return Err(SynthswapError::InsufficientVaultBalance {
            requested: amount,
            withdrawable,
        });
    }
    tx.transfer_lamports(&vault_address, &authority, amount)?;

    tx.emit(LedgerEvent::VaultFundsWithdrawn { authority, amount });
    Ok(())
}
