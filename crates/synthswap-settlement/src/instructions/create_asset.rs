use synthswap_ledger::{Transaction, token};
use synthswap_types::constants::MAX_ASSET_DECIMALS;
use synthswap_types::{
    AssetRegistry, LedgerEvent, Result, Symbol, SynthswapError, asset_mint_address,
    asset_registry_address,
};

use crate::accounts::load_pool;

/// Register `symbol` with a fresh share token whose only mint authority is
/// the trading pool.
pub fn handler(tx: &mut Transaction<'_>, symbol: Symbol, decimals: u8) -> Result<()> {
    let (pool_address, pool) = load_pool(tx)?;
    let payer = tx.signer();
    pool.require_vault_authority(&payer)?;

    if decimals > MAX_ASSET_DECIMALS {
        return Err(SynthswapError::InvalidAmount {
            reason: format!("decimals {decimals} > max {MAX_ASSET_DECIMALS}"),
        });
    }

    let (mint, _) = asset_mint_address(&symbol)?;
    let (registry_address, registry_bump) = asset_registry_address(&symbol)?;
    if tx.has_record(&registry_address)? {
        return Err(SynthswapError::AlreadyExists(registry_address));
    }

    token::create_mint(tx, &mint, &payer, pool_address, decimals)?;
    tx.create(
        &registry_address,
        &payer,
        AssetRegistry {
            symbol: symbol.clone(),
            asset_handle: mint,
            total_supply: 0,
            decimals,
            storage_proof: registry_bump,
        },
    )?;

    tx.emit(LedgerEvent::StockMintCreated {
        symbol,
        mint,
        decimals,
    });
    Ok(())
}
