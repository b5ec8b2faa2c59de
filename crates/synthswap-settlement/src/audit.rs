//! Invariant audit over committed state.
//!
//! Conservation identities checked:
//! ```text
//! ∀ symbol: registry.total_supply == mint.supply == Σ holdings(mint)
//! ∀ symbol: escrow(mint)          == Σ shares_to_sell (pending sells of symbol)
//! vault.committed                 == Σ sol_amount     (pending buys)
//! vault balance                   >= vault.committed
//! Σ lamports                      == Σ airdrops
//! ```
//!
//! The audit scans every account, so it runs between transactions (tests,
//! tooling), never inside one.

use std::collections::HashMap;

use rust_decimal::Decimal;
use synthswap_ledger::AccountStore;
use synthswap_types::{
    Address, AssetMint, AssetRegistry, BuyOrder, OrderStatus, Result, SellOrder, Symbol, SynthswapError,
    TokenHolding, VaultState, escrow_address, vault_address,
};

/// Per-asset figures gathered by the audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetAudit {
    pub symbol: Symbol,
    pub total_supply: u64,
    /// Outstanding supply in whole-share units.
    pub ui_supply: Decimal,
    pub escrowed: u64,
    pub holders: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditReport {
    pub assets: Vec<AssetAudit>,
    pub vault_balance: u64,
    pub vault_committed: u64,
    pub pending_buys: usize,
    pub pending_sells: usize,
    pub total_lamports: u128,
}

/// Verify every conservation identity.
///
/// # Errors
/// `SupplyInvariantViolation` or `VaultInvariantViolation` describing the
/// first identity that fails.
pub fn audit(store: &AccountStore) -> Result<AuditReport> {
    let mut holdings: HashMap<Address, (u128, usize)> = HashMap::new();
    for (_, holding) in store.records::<TokenHolding>() {
        let entry = holdings.entry(holding.mint).or_insert((0, 0));
        entry.0 += u128::from(holding.amount);
        if holding.amount > 0 {
            entry.1 += 1;
        }
    }

    let mut pending_sell_shares: HashMap<&Symbol, u128> = HashMap::new();
    let mut pending_sells = 0;
    for (_, order) in store.records::<SellOrder>() {
        if order.status == OrderStatus::Pending {
            *pending_sell_shares.entry(&order.symbol).or_default() +=
                u128::from(order.shares_to_sell);
            pending_sells += 1;
        }
    }

    let mut assets = Vec::new();
    for (_, registry) in store.records::<AssetRegistry>() {
        assets.push(audit_asset(store, registry, &holdings, &pending_sell_shares)?);
    }
    assets.sort_by(|a, b| a.symbol.cmp(&b.symbol));

    let (pending_buys, pending_buy_total) = store
        .records::<BuyOrder>()
        .filter(|(_, o)| o.status == OrderStatus::Pending)
        .fold((0usize, 0u128), |(n, sum), (_, o)| {
            (n + 1, sum + u128::from(o.sol_amount))
        });

    let (vault_address, _) = vault_address()?;
    let vault_balance = store.lamports(&vault_address);
    let vault_committed = match store.record::<VaultState>(&vault_address) {
        Ok(vault) => vault.committed,
        Err(SynthswapError::AccountNotFound(_)) => 0,
        Err(e) => return Err(e),
    };
    if u128::from(vault_committed) != pending_buy_total {
        return Err(SynthswapError::VaultInvariantViolation {
            reason: format!(
                "vault committed {vault_committed} != pending buy escrow {pending_buy_total}"
            ),
        });
    }
    if vault_balance < vault_committed {
        return Err(SynthswapError::VaultInvariantViolation {
            reason: format!("vault balance {vault_balance} < committed {vault_committed}"),
        });
    }

    let total_lamports = store.total_lamports();
    if total_lamports != u128::from(store.total_airdropped()) {
        return Err(SynthswapError::SupplyInvariantViolation {
            reason: format!(
                "native currency {total_lamports} != airdropped {}",
                store.total_airdropped()
            ),
        });
    }

    Ok(AuditReport {
        assets,
        vault_balance,
        vault_committed,
        pending_buys,
        pending_sells,
        total_lamports,
    })
}

fn audit_asset(
    store: &AccountStore,
    registry: &AssetRegistry,
    holdings: &HashMap<Address, (u128, usize)>,
    pending_sell_shares: &HashMap<&Symbol, u128>,
) -> Result<AssetAudit> {
    let symbol = &registry.symbol;
    let mint = store.record::<AssetMint>(&registry.asset_handle)?;
    let (held, holders) = holdings
        .get(&registry.asset_handle)
        .copied()
        .unwrap_or((0, 0));

    if registry.total_supply != mint.supply || u128::from(mint.supply) != held {
        return Err(SynthswapError::SupplyInvariantViolation {
            reason: format!(
                "{symbol}: registry supply {} / mint supply {} / held {held}",
                registry.total_supply, mint.supply
            ),
        });
    }

    let (escrow, _) = escrow_address(&registry.asset_handle)?;
    let escrowed = store
        .record::<TokenHolding>(&escrow)
        .map_or(0, |h| h.amount);
    let expected = pending_sell_shares.get(symbol).copied().unwrap_or(0);
    if u128::from(escrowed) != expected {
        return Err(SynthswapError::SupplyInvariantViolation {
            reason: format!("{symbol}: escrow holds {escrowed}, pending sells total {expected}"),
        });
    }

    Ok(AssetAudit {
        symbol: symbol.clone(),
        total_supply: registry.total_supply,
        ui_supply: registry.ui_supply()?,
        escrowed,
        holders,
    })
}
