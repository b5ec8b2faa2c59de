use synthswap_ledger::Transaction;
use synthswap_types::{
    Address, LedgerEvent, Result, SynthswapError, TradingPool, VaultState, trading_pool_address,
    vault_address,
};

/// Create the trading pool singleton and its vault. The signer pays for
/// both records.
pub fn handler(
    tx: &mut Transaction<'_>,
    vault_authority: Address,
    backend_authority: Address,
) -> Result<()> {
    let payer = tx.signer();
    let (pool_address, pool_bump) = trading_pool_address()?;
    let (vault_address, vault_bump) = vault_address()?;

    if tx.has_record(&pool_address)? {
        return Err(SynthswapError::AlreadyInitialized);
    }

    tx.create(
        &pool_address,
        &payer,
        TradingPool::new(vault_authority, backend_authority, pool_bump),
    )?;
    tx.create(
        &vault_address,
        &payer,
        VaultState {
            committed: 0,
            storage_proof: vault_bump,
        },
    )?;

    tx.emit(LedgerEvent::TradingPoolInitialized {
        vault_authority,
        backend_authority,
    });
    Ok(())
}
