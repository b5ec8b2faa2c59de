//! The Ledger Account Store: the committed, content-addressed account map.
//!
//! The store is only ever mutated in three ways:
//! 1. Genesis funding via [`AccountStore::airdrop`]
//! 2. Committing a successful [`Transaction`](crate::Transaction) overlay
//! 3. Consuming a signer nonce via [`AccountStore::consume_nonce`]
//!
//! Accounts are never removed, and a signer's nonce never moves backwards.

use std::collections::{BTreeMap, HashMap};

use synthswap_types::{Address, Result, SynthswapError};

use crate::account::{Account, Record};

/// Committed account state keyed by address.
#[derive(Debug, Default)]
pub struct AccountStore {
    accounts: HashMap<Address, Account>,
    /// Native currency created by airdrops since genesis.
    airdropped: u64,
    /// Lowest nonce each signer may still use.
    nonces: HashMap<Address, u64>,
}

impl AccountStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit newly created native currency to `address`, creating a plain
    /// currency account if none exists.
    ///
    /// # Errors
    /// Returns `ArithmeticOverflow` if the balance or the total supply would
    /// overflow.
    pub fn airdrop(&mut self, address: Address, lamports: u64) -> Result<()> {
        let airdropped = self
            .airdropped
            .checked_add(lamports)
            .ok_or(SynthswapError::ArithmeticOverflow {
                context: "airdrop total",
            })?;
        let balance = self.lamports(&address).checked_add(lamports).ok_or(
            SynthswapError::ArithmeticOverflow {
                context: "airdrop balance",
            },
        )?;
        self.accounts
            .entry(address)
            .or_insert_with(|| Account::system(0))
            .lamports = balance;
        self.airdropped = airdropped;
        tracing::debug!(address = %address.short(), lamports, "airdrop");
        Ok(())
    }

    #[must_use]
    pub fn get(&self, address: &Address) -> Option<&Account> {
        self.accounts.get(address)
    }

    /// Native balance at `address` (0 if no account exists).
    #[must_use]
    pub fn lamports(&self, address: &Address) -> u64 {
        self.accounts.get(address).map_or(0, |a| a.lamports)
    }

    /// Typed read of the record at `address`.
    ///
    /// # Errors
    /// - `AccountNotFound` if nothing lives at the address
    /// - `AccountTypeMismatch` if a different record kind lives there
    pub fn record<R: Record>(&self, address: &Address) -> Result<&R> {
        let account = self
            .accounts
            .get(address)
            .ok_or(SynthswapError::AccountNotFound(*address))?;
        R::from_data(&account.data).ok_or(SynthswapError::AccountTypeMismatch {
            address: *address,
            expected: R::KIND,
        })
    }

    /// Iterate every account. Order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &Account)> {
        self.accounts.iter()
    }

    /// Iterate every record of kind `R`.
    pub fn records<R: Record>(&self) -> impl Iterator<Item = (&Address, &R)> {
        self.accounts
            .iter()
            .filter_map(|(addr, acct)| R::from_data(&acct.data).map(|r| (addr, r)))
    }

    /// Number of accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Total native currency ever airdropped.
    #[must_use]
    pub fn total_airdropped(&self) -> u64 {
        self.airdropped
    }

    /// Sum of every account's native balance.
    #[must_use]
    pub fn total_lamports(&self) -> u128 {
        self.accounts.values().map(|a| u128::from(a.lamports)).sum()
    }

    /// Lowest nonce `signer` may submit next (0 for a signer never seen).
    #[must_use]
    pub fn next_nonce(&self, signer: &Address) -> u64 {
        self.nonces.get(signer).copied().unwrap_or(0)
    }

    /// Accept `nonce` for `signer` and move the signer's floor past it.
    /// Gaps are allowed; going backwards is not.
    ///
    /// # Errors
    /// - `TransactionReplayed` if `nonce` is below [`Self::next_nonce`]
    /// - `ArithmeticOverflow` if `nonce` is `u64::MAX`
    pub fn consume_nonce(&mut self, signer: Address, nonce: u64) -> Result<()> {
        let expected = self.next_nonce(&signer);
        if nonce < expected {
            return Err(SynthswapError::TransactionReplayed);
        }
        let next = nonce.checked_add(1).ok_or(SynthswapError::ArithmeticOverflow {
            context: "signer nonce",
        })?;
        self.nonces.insert(signer, next);
        Ok(())
    }

    /// Apply a committed overlay. Each entry replaces the stored account.
    pub(crate) fn apply(&mut self, writes: BTreeMap<Address, Account>) {
        self.accounts.extend(writes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthswap_types::{TradingPool, VaultState};

    use crate::account::AccountData;

    #[test]
    fn airdrop_creates_and_accumulates() {
        let mut store = AccountStore::new();
        let user = Address([4u8; 32]);
        store.airdrop(user, 100).unwrap();
        store.airdrop(user, 50).unwrap();
        assert_eq!(store.lamports(&user), 150);
        assert_eq!(store.total_airdropped(), 150);
        assert_eq!(store.total_lamports(), 150);
    }

    #[test]
    fn airdrop_overflow_leaves_state() {
        let mut store = AccountStore::new();
        let user = Address([4u8; 32]);
        store.airdrop(user, u64::MAX).unwrap();
        assert!(store.airdrop(user, 1).is_err());
        assert_eq!(store.lamports(&user), u64::MAX);
        assert_eq!(store.total_airdropped(), u64::MAX);
    }

    #[test]
    fn typed_record_access() {
        let mut store = AccountStore::new();
        let addr = Address([8u8; 32]);
        let pool = TradingPool::new(Address([1u8; 32]), Address([2u8; 32]), 255);
        let mut writes = BTreeMap::new();
        writes.insert(
            addr,
            Account {
                lamports: 0,
                data: AccountData::TradingPool(pool.clone()),
            },
        );
        store.apply(writes);

        assert_eq!(store.record::<TradingPool>(&addr).unwrap(), &pool);
        assert!(matches!(
            store.record::<VaultState>(&addr),
            Err(SynthswapError::AccountTypeMismatch { .. })
        ));
        assert!(matches!(
            store.record::<TradingPool>(&Address([9u8; 32])),
            Err(SynthswapError::AccountNotFound(_))
        ));
        assert_eq!(store.records::<TradingPool>().count(), 1);
    }

    #[test]
    fn nonces_only_move_forward() {
        let mut store = AccountStore::new();
        let signer = Address([4u8; 32]);
        assert_eq!(store.next_nonce(&signer), 0);

        store.consume_nonce(signer, 0).unwrap();
        store.consume_nonce(signer, 5).unwrap();
        assert_eq!(store.next_nonce(&signer), 6);

        for stale in [0, 4, 5] {
            assert_eq!(
                store.consume_nonce(signer, stale),
                Err(SynthswapError::TransactionReplayed)
            );
        }
        assert_eq!(store.next_nonce(&Address([5u8; 32])), 0);

        assert!(matches!(
            store.consume_nonce(signer, u64::MAX),
            Err(SynthswapError::ArithmeticOverflow { .. })
        ));
        assert_eq!(store.next_nonce(&signer), 6);
    }
}
