//! Loaders for the seeded records every instruction works with.
//!
//! Each loader derives the canonical address, loads the record through the
//! transaction and re-checks the stored `storage_proof` against the seeds.

use synthswap_ledger::{TokenAuthority, Transaction};
use synthswap_types::constants::{ASSET_REGISTRY_SEED, TRADING_POOL_SEED, VAULT_SEED};
use synthswap_types::{
    Address, AssetRegistry, BuyOrder, OrderId, OrderSide, Result, SellOrder, Symbol,
    SynthswapError, TradingPool, VaultState, asset_registry_address, order_address,
    trading_pool_address, vault_address, verify_derived_address, verify_order_address,
};

pub fn load_pool(tx: &Transaction<'_>) -> Result<(Address, TradingPool)> {
    let (address, _) = trading_pool_address()?;
    let pool: TradingPool = tx.load(&address).map_err(|e| match e {
        SynthswapError::AccountNotFound(_) => SynthswapError::NotInitialized,
        other => other,
    })?;
    verify_derived_address(&[TRADING_POOL_SEED], pool.storage_proof, &address)?;
    Ok((address, pool))
}

pub fn load_vault(tx: &Transaction<'_>) -> Result<(Address, VaultState)> {
    let (address, _) = vault_address()?;
    let vault: VaultState = tx.load(&address).map_err(|e| match e {
        SynthswapError::AccountNotFound(_) => SynthswapError::NotInitialized,
        other => other,
    })?;
    verify_derived_address(&[VAULT_SEED], vault.storage_proof, &address)?;
    Ok((address, vault))
}

pub fn load_asset(tx: &Transaction<'_>, symbol: &Symbol) -> Result<(Address, AssetRegistry)> {
    let (address, _) = asset_registry_address(symbol)?;
    let registry: AssetRegistry = tx.load(&address).map_err(|e| match e {
        SynthswapError::AccountNotFound(_) => SynthswapError::AssetNotFound(symbol.to_string()),
        other => other,
    })?;
    verify_derived_address(
        &[ASSET_REGISTRY_SEED, symbol.as_bytes()],
        registry.storage_proof,
        &address,
    )?;
    Ok((address, registry))
}

pub fn load_buy_order(
    tx: &Transaction<'_>,
    user: &Address,
    order_id: OrderId,
) -> Result<(Address, BuyOrder)> {
    let (address, _) = order_address(OrderSide::Buy, user, order_id)?;
    let order: BuyOrder = tx.load(&address).map_err(|e| order_not_found(e, address))?;
    verify_order_address(OrderSide::Buy, &order.user, order.order_id, order.storage_proof, &address)?;
    Ok((address, order))
}

pub fn load_sell_order(
    tx: &Transaction<'_>,
    user: &Address,
    order_id: OrderId,
) -> Result<(Address, SellOrder)> {
    let (address, _) = order_address(OrderSide::Sell, user, order_id)?;
    let order: SellOrder = tx.load(&address).map_err(|e| order_not_found(e, address))?;
    verify_order_address(OrderSide::Sell, &order.user, order.order_id, order.storage_proof, &address)?;
    Ok((address, order))
}

fn order_not_found(err: SynthswapError, address: Address) -> SynthswapError {
    match err {
        SynthswapError::AccountNotFound(_) => SynthswapError::OrderNotFound(address),
        other => other,
    }
}

/// The trading pool signing for itself, as mint authority and escrow owner.
#[must_use]
pub fn pool_authority(pool: &TradingPool) -> TokenAuthority<'static> {
    TokenAuthority::Derived {
        seeds: &[TRADING_POOL_SEED],
        bump: pool.storage_proof,
    }
}

/// Vault balance that may leave without touching pending buy escrow or the
/// vault record's own rent deposit.
pub fn vault_withdrawable(
    tx: &Transaction<'_>,
    vault_address: &Address,
    vault: &VaultState,
) -> Result<u64> {
    let reserve = tx.rent_for::<VaultState>()?;
    let balance = tx.lamports(vault_address)?;
    Ok(vault.withdrawable(balance).saturating_sub(reserve))
}

/// Reject zero amounts.
pub fn require_nonzero_amount(amount: u64, what: &str) -> Result<()> {
    if amount == 0 {
        return Err(SynthswapError::InvalidAmount {
            reason: format!("{what} must be > 0"),
        });
    }
    Ok(())
}

/// Reject zero price bounds.
pub fn require_nonzero_price(price: u64, what: &str) -> Result<()> {
    if price == 0 {
        return Err(SynthswapError::InvalidPrice {
            reason: format!("{what} must be > 0"),
        });
    }
    Ok(())
}
