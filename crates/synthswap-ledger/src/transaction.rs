//! The atomic transaction envelope.
//!
//! A [`Transaction`] is a copy-on-write overlay over the committed
//! [`AccountStore`]:
//! - reads fall through to the store unless the overlay already holds the
//!   account
//! - writes only ever touch the overlay
//! - every access is checked against the addresses the transaction declared
//!
//! Committing hands the overlay to [`AccountStore::commit`]. Dropping the
//! transaction (any error path) discards every write and every emitted
//! event, so an operation either applies in full or not at all.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use synthswap_types::{Address, LedgerEvent, RentConfig, Result, SynthswapError};

use crate::account::{Account, Record};
use crate::store::AccountStore;

/// Writes and events produced by a transaction that ran to completion.
#[derive(Debug)]
pub struct TransactionEffects {
    pub(crate) writes: BTreeMap<Address, Account>,
    pub events: Vec<LedgerEvent>,
}

impl TransactionEffects {
    /// Addresses the transaction wrote.
    pub fn written(&self) -> impl Iterator<Item = &Address> {
        self.writes.keys()
    }
}

/// An in-flight, all-or-nothing unit of work.
pub struct Transaction<'a> {
    store: &'a AccountStore,
    rent: &'a RentConfig,
    signer: Address,
    declared: BTreeSet<Address>,
    writes: BTreeMap<Address, Account>,
    events: Vec<LedgerEvent>,
    now: DateTime<Utc>,
}

impl<'a> Transaction<'a> {
    /// Open a transaction signed by `signer` that may touch only `declared`
    /// (the signer is always implicitly declared).
    pub fn new(
        store: &'a AccountStore,
        rent: &'a RentConfig,
        signer: Address,
        declared: impl IntoIterator<Item = Address>,
    ) -> Self {
        let mut declared: BTreeSet<Address> = declared.into_iter().collect();
        declared.insert(signer);
        Self {
            store,
            rent,
            signer,
            declared,
            writes: BTreeMap::new(),
            events: Vec::new(),
            now: Utc::now(),
        }
    }

    /// The principal that signed this transaction.
    #[must_use]
    pub fn signer(&self) -> Address {
        self.signer
    }

    /// Wall-clock time the transaction was opened, in unix seconds.
    #[must_use]
    pub fn unix_timestamp(&self) -> i64 {
        self.now.timestamp()
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// # Errors
    /// Returns `UndeclaredAccount` if `address` was not declared.
    pub fn require_declared(&self, address: &Address) -> Result<()> {
        if self.declared.contains(address) {
            Ok(())
        } else {
            Err(SynthswapError::UndeclaredAccount(*address))
        }
    }

    fn current(&self, address: &Address) -> Option<&Account> {
        self.writes
            .get(address)
            .or_else(|| self.store.get(address))
    }

    /// The account at `address` as this transaction currently sees it.
    pub fn account(&self, address: &Address) -> Result<Option<&Account>> {
        self.require_declared(address)?;
        Ok(self.current(address))
    }

    /// Native balance at `address` (0 if absent).
    pub fn lamports(&self, address: &Address) -> Result<u64> {
        Ok(self.account(address)?.map_or(0, |a| a.lamports))
    }

    /// Whether any record (not just a currency balance) lives at `address`.
    pub fn has_record(&self, address: &Address) -> Result<bool> {
        Ok(self.account(address)?.is_some_and(Account::has_record))
    }

    /// Load a copy of the record at `address`.
    ///
    /// # Errors
    /// `UndeclaredAccount`, `AccountNotFound` or `AccountTypeMismatch`.
    pub fn load<R: Record>(&self, address: &Address) -> Result<R> {
        let account = self
            .account(address)?
            .ok_or(SynthswapError::AccountNotFound(*address))?;
        R::from_data(&account.data)
            .cloned()
            .ok_or(SynthswapError::AccountTypeMismatch {
                address: *address,
                expected: R::KIND,
            })
    }

    /// Overwrite the record at `address`. The account must already hold a
    /// record of the same kind.
    pub fn save<R: Record>(&mut self, address: &Address, record: R) -> Result<()> {
        let account = self.account_mut(address)?;
        if R::from_data(&account.data).is_none() {
            return Err(SynthswapError::AccountTypeMismatch {
                address: *address,
                expected: R::KIND,
            });
        }
        account.data = record.into_data();
        Ok(())
    }

    /// Create a new record at `address`, charging its rent deposit to
    /// `payer`.
    ///
    /// # Errors
    /// - `AlreadyExists` if a record already lives at `address`
    /// - `InsufficientFunds` if `payer` can't cover the rent deposit
    pub fn create<R: Record>(&mut self, address: &Address, payer: &Address, record: R) -> Result<()> {
        self.require_declared(address)?;
        if self.has_record(address)? {
            return Err(SynthswapError::AlreadyExists(*address));
        }
        let deposit = self.rent_for::<R>()?;
        self.transfer_lamports(payer, address, deposit)?;
        let account = self.account_mut_or_system(address)?;
        account.data = record.into_data();
        tracing::debug!(
            address = %address.short(),
            kind = R::KIND,
            deposit,
            "record created"
        );
        Ok(())
    }

    /// Rent deposit for a record of kind `R`.
    pub fn rent_for<R: Record>(&self) -> Result<u64> {
        self.rent.minimum_balance(R::SIZE)
    }

    /// Move native currency between accounts.
    ///
    /// Only the signer's own account or a derived (program-owned) account
    /// may be debited.
    ///
    /// # Errors
    /// - `Unauthorized` if `from` is another principal
    /// - `InsufficientFunds` if `from` holds less than `amount`
    pub fn transfer_lamports(&mut self, from: &Address, to: &Address, amount: u64) -> Result<()> {
        self.require_declared(from)?;
        self.require_declared(to)?;
        if amount == 0 || from == to {
            return Ok(());
        }
        if from.is_on_curve() && *from != self.signer {
            return Err(SynthswapError::Unauthorized { signer: *from });
        }
        let available = self.lamports(from)?;
        let remaining = available
            .checked_sub(amount)
            .ok_or(SynthswapError::InsufficientFunds {
                needed: amount,
                available,
            })?;
        let credited = self
            .lamports(to)?
            .checked_add(amount)
            .ok_or(SynthswapError::ArithmeticOverflow {
                context: "lamport credit",
            })?;
        self.account_mut(from)?.lamports = remaining;
        self.account_mut_or_system(to)?.lamports = credited;
        Ok(())
    }

    /// Queue an event. It reaches the event log only if the transaction
    /// commits.
    pub fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }

    #[must_use]
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Finish the transaction, handing back its writes for commit.
    #[must_use]
    pub fn into_effects(self) -> TransactionEffects {
        TransactionEffects {
            writes: self.writes,
            events: self.events,
        }
    }

    fn account_mut(&mut self, address: &Address) -> Result<&mut Account> {
        self.require_declared(address)?;
        match self.writes.entry(*address) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(v) => {
                let account = self
                    .store
                    .get(address)
                    .cloned()
                    .ok_or(SynthswapError::AccountNotFound(*address))?;
                Ok(v.insert(account))
            }
        }
    }

    fn account_mut_or_system(&mut self, address: &Address) -> Result<&mut Account> {
        self.require_declared(address)?;
        match self.writes.entry(*address) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(v) => {
                let account = self
                    .store
                    .get(address)
                    .cloned()
                    .unwrap_or_else(|| Account::system(0));
                Ok(v.insert(account))
            }
        }
    }
}

impl AccountStore {
    /// Apply a finished transaction's writes and return its events.
    pub fn commit(&mut self, effects: TransactionEffects) -> Vec<LedgerEvent> {
        self.apply(effects.writes);
        effects.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthswap_types::fixtures::principal;
    use synthswap_types::{TradingPool, VaultState};

    fn derived(seed: u8) -> Address {
        let (addr, _) = synthswap_types::find_derived_address(&[&[seed]]).unwrap();
        addr
    }

    fn rent_free() -> RentConfig {
        RentConfig {
            lamports_per_byte: 0,
            account_overhead: 0,
        }
    }

    #[test]
    fn undeclared_access_rejected() {
        let store = AccountStore::new();
        let rent = rent_free();
        let tx = Transaction::new(&store, &rent, principal(1), []);
        let other = derived(9);
        assert!(matches!(
            tx.lamports(&other),
            Err(SynthswapError::UndeclaredAccount(_))
        ));
    }

    #[test]
    fn dropped_transaction_leaves_store_untouched() {
        let mut store = AccountStore::new();
        let user = principal(1);
        let vault = derived(2);
        store.airdrop(user, 1000).unwrap();
        let rent = rent_free();
        {
            let mut tx = Transaction::new(&store, &rent, user, [vault]);
            tx.transfer_lamports(&user, &vault, 400).unwrap();
            assert_eq!(tx.lamports(&vault).unwrap(), 400);
        }
        assert_eq!(store.lamports(&user), 1000);
        assert_eq!(store.lamports(&vault), 0);
    }

    #[test]
    fn committed_transaction_applies_writes_and_events() {
        let mut store = AccountStore::new();
        let user = principal(1);
        let vault = derived(2);
        store.airdrop(user, 1000).unwrap();
        let rent = rent_free();
        let effects = {
            let mut tx = Transaction::new(&store, &rent, user, [vault]);
            tx.transfer_lamports(&user, &vault, 400).unwrap();
            tx.emit(LedgerEvent::VaultFundsDeposited {
                authority: user,
                amount: 400,
            });
            tx.into_effects()
        };
        let events = store.commit(effects);
        assert_eq!(events.len(), 1);
        assert_eq!(store.lamports(&user), 600);
        assert_eq!(store.lamports(&vault), 400);
    }

    #[test]
    fn insufficient_funds_reports_shortfall() {
        let mut store = AccountStore::new();
        let user = principal(1);
        let vault = derived(2);
        store.airdrop(user, 10).unwrap();
        let rent = rent_free();
        let mut tx = Transaction::new(&store, &rent, user, [vault]);
        let err = tx.transfer_lamports(&user, &vault, 11).unwrap_err();
        assert_eq!(
            err,
            SynthswapError::InsufficientFunds {
                needed: 11,
                available: 10
            }
        );
    }

    #[test]
    fn cannot_debit_another_principal() {
        let mut store = AccountStore::new();
        let signer = principal(7);
        let victim = principal(1);
        store.airdrop(victim, 10).unwrap();
        let rent = rent_free();
        let mut tx = Transaction::new(&store, &rent, signer, [victim]);
        let err = tx.transfer_lamports(&victim, &signer, 5).unwrap_err();
        assert!(matches!(err, SynthswapError::Unauthorized { .. }));
    }

    #[test]
    fn create_charges_rent_and_rejects_duplicates() {
        let mut store = AccountStore::new();
        let payer = principal(1);
        let addr = derived(3);
        store.airdrop(payer, 10_000_000).unwrap();
        let rent = RentConfig::default();
        let mut tx = Transaction::new(&store, &rent, payer, [addr]);
        let deposit = tx.rent_for::<VaultState>().unwrap();
        tx.create(&addr, &payer, VaultState::default()).unwrap();
        assert_eq!(tx.lamports(&addr).unwrap(), deposit);
        assert_eq!(tx.lamports(&payer).unwrap(), 10_000_000 - deposit);

        let err = tx
            .create(&addr, &payer, VaultState::default())
            .unwrap_err();
        assert_eq!(err, SynthswapError::AlreadyExists(addr));
    }

    #[test]
    fn save_requires_matching_kind() {
        let mut store = AccountStore::new();
        let payer = principal(1);
        let addr = derived(3);
        store.airdrop(payer, 1).unwrap();
        let rent = rent_free();
        let mut tx = Transaction::new(&store, &rent, payer, [addr]);
        tx.create(&addr, &payer, VaultState::default()).unwrap();
        let pool = TradingPool::new(payer, payer, 1);
        assert!(matches!(
            tx.save(&addr, pool),
            Err(SynthswapError::AccountTypeMismatch { .. })
        ));
        let mut vault: VaultState = tx.load(&addr).unwrap();
        vault.committed = 5;
        tx.save(&addr, vault).unwrap();
        assert_eq!(tx.load::<VaultState>(&addr).unwrap().committed, 5);
    }
}
