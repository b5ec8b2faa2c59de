use synthswap_ledger::Transaction;
use synthswap_types::{Address, LedgerEvent, Result};

use crate::accounts::load_pool;

/// Replace either or both authorities. Takes effect for the very next
/// transaction; an omitted value is kept.
pub fn handler(
    tx: &mut Transaction<'_>,
    new_vault_authority: Option<Address>,
    new_backend_authority: Option<Address>,
) -> Result<()> {
    let (pool_address, mut pool) = load_pool(tx)?;
    pool.require_vault_authority(&tx.signer())?;

    if let Some(vault_authority) = new_vault_authority {
        pool.vault_authority = vault_authority;
    }
    if let Some(backend_authority) = new_backend_authority {
        pool.backend_authority = backend_authority;
    }
    let event = LedgerEvent::AuthoritiesUpdated {
        vault_authority: pool.vault_authority,
        backend_authority: pool.backend_authority,
    };
    tx.save(&pool_address, pool)?;

    tx.emit(event);
    Ok(())
}
