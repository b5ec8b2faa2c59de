//! Client-side transaction building.
//!
//! [`resolve_accounts`] derives the account list an instruction needs from
//! current ledger state, the way an off-chain client computes program
//! addresses before submitting. A placement's order address depends on the
//! pool's `total_orders` at build time; if another placement commits first
//! the transaction fails with `UndeclaredAccount` and must be rebuilt.

use std::collections::BTreeSet;

use ed25519_dalek::SigningKey;
use synthswap_ledger::AccountStore;
use synthswap_types::{
    Address, BuyOrder, Instruction, OrderId, OrderSide, Result, SellOrder, Symbol, TradingPool,
    asset_mint_address, asset_registry_address, escrow_address, holding_address, order_address,
    trading_pool_address, vault_address,
};

use crate::runtime::Ledger;
use crate::signed::{SignedTransaction, TransactionMessage};

/// Every address `instruction`, signed by `signer`, will touch.
pub fn resolve_accounts(
    store: &AccountStore,
    signer: &Address,
    instruction: &Instruction,
) -> Result<Vec<Address>> {
    let (pool, _) = trading_pool_address()?;
    let (vault, _) = vault_address()?;
    let mut accounts = BTreeSet::from([*signer, pool]);

    match instruction {
        Instruction::InitializeTradingPool { .. }
        | Instruction::DepositVaultFunds { .. }
        | Instruction::WithdrawVaultFunds { .. } => {
            accounts.insert(vault);
        }
        Instruction::UpdateAuthorities { .. } => {}
        Instruction::CreateAsset { symbol, .. } => {
            accounts.insert(asset_mint_address(symbol)?.0);
            accounts.insert(asset_registry_address(symbol)?.0);
        }
        Instruction::PlaceBuyOrder { symbol, .. } => {
            accounts.insert(vault);
            accounts.insert(asset_registry_address(symbol)?.0);
            let next = next_order_id(store, &pool);
            accounts.insert(order_address(OrderSide::Buy, signer, next)?.0);
        }
        Instruction::PlaceSellOrder { symbol, .. } => {
            add_share_accounts(&mut accounts, symbol, signer)?;
            let next = next_order_id(store, &pool);
            accounts.insert(order_address(OrderSide::Sell, signer, next)?.0);
        }
        Instruction::FulfillBuyOrder { user, order_id, .. }
        | Instruction::CancelBuyOrder { user, order_id } => {
            let (order, _) = order_address(OrderSide::Buy, user, *order_id)?;
            accounts.extend([vault, *user, order]);
            if let Ok(record) = store.record::<BuyOrder>(&order) {
                add_share_accounts(&mut accounts, &record.symbol, user)?;
            }
        }
        Instruction::FulfillSellOrder { user, order_id, .. }
        | Instruction::CancelSellOrder { user, order_id } => {
            let (order, _) = order_address(OrderSide::Sell, user, *order_id)?;
            accounts.extend([vault, *user, order]);
            if let Ok(record) = store.record::<SellOrder>(&order) {
                add_share_accounts(&mut accounts, &record.symbol, user)?;
            }
        }
    }
    Ok(accounts.into_iter().collect())
}

fn next_order_id(store: &AccountStore, pool: &Address) -> OrderId {
    store
        .record::<TradingPool>(pool)
        .map_or(OrderId(0), TradingPool::next_order_id)
}

/// Registry, mint, escrow and `owner`'s holding for `symbol`.
fn add_share_accounts(
    accounts: &mut BTreeSet<Address>,
    symbol: &Symbol,
    owner: &Address,
) -> Result<()> {
    let (mint, _) = asset_mint_address(symbol)?;
    accounts.insert(mint);
    accounts.insert(asset_registry_address(symbol)?.0);
    accounts.insert(escrow_address(&mint)?.0);
    accounts.insert(holding_address(owner, &mint)?.0);
    Ok(())
}

/// A principal's signing handle with a per-client nonce counter.
pub struct Client {
    key: SigningKey,
    address: Address,
    nonce: u64,
}

impl Client {
    #[must_use]
    pub fn new(key: SigningKey) -> Self {
        let address = Address::from_verifying_key(&key.verifying_key());
        Self {
            key,
            address,
            nonce: 0,
        }
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign `instruction` with an explicit account list.
    pub fn sign(
        &mut self,
        instruction: Instruction,
        accounts: Vec<Address>,
    ) -> Result<SignedTransaction> {
        let message = TransactionMessage {
            signer: self.address,
            nonce: self.nonce,
            accounts,
            instruction,
        };
        let signed = SignedTransaction::sign(message, &self.key)?;
        self.nonce = self.nonce.wrapping_add(1);
        Ok(signed)
    }

    /// Resolve accounts against `ledger` and sign. The nonce is raised to
    /// the ledger's floor for this signer first, so a fresh client for a key
    /// with history still produces an acceptable message.
    pub fn build(&mut self, ledger: &Ledger, instruction: Instruction) -> Result<SignedTransaction> {
        self.nonce = self.nonce.max(ledger.next_nonce(&self.address));
        let accounts = resolve_accounts(ledger.store(), &self.address, &instruction)?;
        self.sign(instruction, accounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthswap_types::fixtures::{principal, signing_key};

    #[test]
    fn placement_declares_next_order_address() {
        let store = AccountStore::new();
        let user = principal(3);
        let symbol = Symbol::new("AAPL").unwrap();
        let ix = Instruction::PlaceBuyOrder {
            symbol: symbol.clone(),
            sol_amount: 1,
            max_price_per_share: 1,
        };
        let accounts = resolve_accounts(&store, &user, &ix).unwrap();
        let (expected, _) = order_address(OrderSide::Buy, &user, OrderId(0)).unwrap();
        assert!(accounts.contains(&expected));
        assert!(accounts.contains(&user));
        assert!(accounts.contains(&asset_registry_address(&symbol).unwrap().0));
    }

    #[test]
    fn accounts_are_deduplicated() {
        let store = AccountStore::new();
        let user = principal(3);
        let ix = Instruction::UpdateAuthorities {
            new_vault_authority: None,
            new_backend_authority: None,
        };
        let accounts = resolve_accounts(&store, &user, &ix).unwrap();
        assert_eq!(accounts.len(), 2);
    }

    #[test]
    fn nonce_advances_per_signature() {
        let mut client = Client::new(signing_key(5));
        let ix = Instruction::DepositVaultFunds { amount: 1 };
        let a = client.sign(ix.clone(), vec![]).unwrap();
        let b = client.sign(ix, vec![]).unwrap();
        assert_eq!(a.message.nonce, 0);
        assert_eq!(b.message.nonce, 1);
        assert_ne!(a.signature, b.signature);
    }
}
