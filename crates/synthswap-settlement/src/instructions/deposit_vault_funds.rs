use synthswap_ledger::Transaction;
use synthswap_types::{LedgerEvent, Result};

use crate::accounts::{load_pool, load_vault, require_nonzero_amount};

pub fn handler(tx: &mut Transaction<'_>, amount: u64) -> Result<()> {
    require_nonzero_amount(amount, "deposit amount")?;
    let (_, pool) = load_pool(tx)?;
    let authority = tx.signer();
    pool.require_vault_authority(&authority)?;

    let (vault_address, _) = load_vault(tx)?;
    tx.transfer_lamports(&authority, &vault_address, amount)?;

    tx.emit(LedgerEvent::VaultFundsDeposited { authority, amount });
    Ok(())
}
