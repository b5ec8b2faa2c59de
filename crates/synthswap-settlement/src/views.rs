//! Read-only views over committed state.
//!
//! Everything here is addressed by deterministic derivation except
//! [`LedgerView::orders_of`], which scans and is meant for tooling, not for
//! the settlement path.

use rust_decimal::Decimal;
use synthswap_ledger::AccountStore;
use synthswap_types::{
    Address, AssetRegistry, BuyOrder, OrderId, OrderSide, Result, SellOrder, Symbol,
    TokenHolding, TradingPool, VaultState, asset_registry_address, escrow_address,
    holding_address, order_address, trading_pool_address, ui_amount, vault_address,
};

/// All orders placed by one principal, sorted by order id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderBookEntries {
    pub buys: Vec<BuyOrder>,
    pub sells: Vec<SellOrder>,
}

pub struct LedgerView<'a> {
    store: &'a AccountStore,
    native_decimals: u8,
}

impl<'a> LedgerView<'a> {
    #[must_use]
    pub fn new(store: &'a AccountStore, native_decimals: u8) -> Self {
        Self {
            store,
            native_decimals,
        }
    }

    pub fn trading_pool(&self) -> Result<&'a TradingPool> {
        self.store.record(&trading_pool_address()?.0)
    }

    pub fn vault(&self) -> Result<&'a VaultState> {
        self.store.record(&vault_address()?.0)
    }

    /// Native balance of the vault, rent deposit included.
    pub fn vault_balance(&self) -> Result<u64> {
        Ok(self.store.lamports(&vault_address()?.0))
    }

    pub fn asset(&self, symbol: &Symbol) -> Result<&'a AssetRegistry> {
        self.store.record(&asset_registry_address(symbol)?.0)
    }

    pub fn buy_order(&self, user: &Address, order_id: OrderId) -> Result<&'a BuyOrder> {
        self.store
            .record(&order_address(OrderSide::Buy, user, order_id)?.0)
    }

    pub fn sell_order(&self, user: &Address, order_id: OrderId) -> Result<&'a SellOrder> {
        self.store
            .record(&order_address(OrderSide::Sell, user, order_id)?.0)
    }

    /// Raw share balance of `owner` in `symbol`. A missing holding reads as 0.
    pub fn share_balance(&self, owner: &Address, symbol: &Symbol) -> Result<u64> {
        let registry = self.asset(symbol)?;
        let (holding, _) = holding_address(owner, &registry.asset_handle)?;
        Ok(self.holding_amount(&holding))
    }

    /// Shares currently held in escrow for `symbol`'s pending sell orders.
    pub fn escrow_balance(&self, symbol: &Symbol) -> Result<u64> {
        let registry = self.asset(symbol)?;
        let (escrow, _) = escrow_address(&registry.asset_handle)?;
        Ok(self.holding_amount(&escrow))
    }

    #[must_use]
    pub fn lamports(&self, address: &Address) -> u64 {
        self.store.lamports(address)
    }

    /// Share balance in whole-share units, using the asset's decimals.
    pub fn ui_share_balance(&self, owner: &Address, symbol: &Symbol) -> Result<Decimal> {
        let decimals = self.asset(symbol)?.decimals;
        ui_amount(self.share_balance(owner, symbol)?, decimals)
    }

    /// Native balance in whole currency units.
    pub fn ui_lamports(&self, address: &Address) -> Result<Decimal> {
        ui_amount(self.lamports(address), self.native_decimals)
    }

    /// Every order `user` has placed.
    #[must_use]
    pub fn orders_of(&self, user: &Address) -> OrderBookEntries {
        let mut buys: Vec<BuyOrder> = self
            .store
            .records::<BuyOrder>()
            .filter(|(_, o)| o.user == *user)
            .map(|(_, o)| o.clone())
            .collect();
        let mut sells: Vec<SellOrder> = self
            .store
            .records::<SellOrder>()
            .filter(|(_, o)| o.user == *user)
            .map(|(_, o)| o.clone())
            .collect();
        buys.sort_by_key(|o| o.order_id);
        sells.sort_by_key(|o| o.order_id);
        OrderBookEntries { buys, sells }
    }

    fn holding_amount(&self, address: &Address) -> u64 {
        self.store
            .record::<TokenHolding>(address)
            .map_or(0, |h| h.amount)
    }
}
