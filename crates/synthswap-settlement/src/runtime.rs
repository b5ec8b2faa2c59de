//! The settlement runtime: committed state, the event log and the entry
//! points that run instructions atomically.
//!
//! Execution is serialized: [`Ledger::execute`] and [`Ledger::submit`] take
//! `&mut self`, so every transaction observes the state left by the previous
//! one and no partially applied state is ever visible.

use chrono::{DateTime, Utc};
use synthswap_ledger::{AccountStore, EventLog, Transaction};
use synthswap_types::{Address, Instruction, LedgerConfig, LedgerEvent, Result, TxId};

use crate::client::resolve_accounts;
use crate::processor;
use crate::signed::SignedTransaction;
use crate::views::LedgerView;

/// Outcome of a committed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_id: TxId,
    pub instruction: &'static str,
    pub signer: Address,
    pub committed_at: DateTime<Utc>,
    pub events: Vec<LedgerEvent>,
}

pub struct Ledger {
    store: AccountStore,
    events: EventLog,
    config: LedgerConfig,
}

impl Ledger {
    /// # Errors
    /// Returns `Configuration` if `config` does not validate.
    pub fn new(config: LedgerConfig) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            lamports_per_byte = config.rent.lamports_per_byte,
            native_decimals = config.native_decimals,
            "ledger created"
        );
        Ok(Self {
            store: AccountStore::new(),
            events: EventLog::new(),
            config,
        })
    }

    /// Fund `address` with newly created native currency.
    pub fn airdrop(&mut self, address: Address, lamports: u64) -> Result<()> {
        self.store.airdrop(address, lamports)
    }

    /// Run `instruction` as `signer`, declaring the accounts a client would
    /// resolve against current state. No signature is checked: this is the
    /// trusted in-process entry point.
    pub fn execute(&mut self, signer: Address, instruction: Instruction) -> Result<TxReceipt> {
        let accounts = resolve_accounts(&self.store, &signer, &instruction)?;
        self.execute_with_accounts(signer, instruction, &accounts)
    }

    /// Run `instruction` as `signer` with an explicit account declaration.
    pub fn execute_with_accounts(
        &mut self,
        signer: Address,
        instruction: Instruction,
        accounts: &[Address],
    ) -> Result<TxReceipt> {
        let tx_id = TxId::new();
        let name = instruction.name();
        let mut tx = Transaction::new(
            &self.store,
            &self.config.rent,
            signer,
            accounts.iter().copied(),
        );

        if let Err(err) = processor::process(&mut tx, instruction) {
            tracing::warn!(
                %tx_id,
                instruction = name,
                signer = %signer.short(),
                error = %err,
                category = %err.category(),
                "transaction rejected"
            );
            return Err(err);
        }

        let committed_at = tx.now();
        let effects = tx.into_effects();
        let written = effects.written().count();
        let events = self.store.commit(effects);
        self.events
            .append(tx_id, committed_at, events.iter().cloned());

        tracing::info!(
            %tx_id,
            instruction = name,
            signer = %signer.short(),
            accounts_written = written,
            events = events.len(),
            "transaction committed"
        );
        Ok(TxReceipt {
            tx_id,
            instruction: name,
            signer,
            committed_at,
            events,
        })
    }

    /// Verify, nonce-check and run a signed transaction.
    ///
    /// The message nonce must be at least the signer's
    /// [`next_nonce`](Self::next_nonce). It is consumed once the signature
    /// verifies, whether or not the instruction then succeeds, so no signed
    /// message can ever run twice.
    pub fn submit(&mut self, signed: SignedTransaction) -> Result<TxReceipt> {
        let signature = signed.verify().inspect_err(|_| {
            tracing::warn!(signer = %signed.message.signer.short(), "bad signature");
        })?;
        self.store
            .consume_nonce(signed.message.signer, signed.message.nonce)
            .inspect_err(|_| {
                tracing::warn!(
                    signature = %hex::encode(&signature.to_bytes()[..8]),
                    "replayed transaction"
                );
            })?;

        let message = signed.message;
        self.execute_with_accounts(message.signer, message.instruction, &message.accounts)
    }

    /// Lowest nonce `signer` may use in its next signed transaction.
    #[must_use]
    pub fn next_nonce(&self, signer: &Address) -> u64 {
        self.store.next_nonce(signer)
    }

    #[must_use]
    pub fn store(&self) -> &AccountStore {
        &self.store
    }

    #[must_use]
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Read-only access to records by their deterministic addresses.
    #[must_use]
    pub fn view(&self) -> LedgerView<'_> {
        LedgerView::new(&self.store, self.config.native_decimals)
    }

    /// Run the invariant audit over committed state.
    pub fn audit(&self) -> Result<crate::audit::AuditReport> {
        crate::audit::audit(&self.store)
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("accounts", &self.store.len())
            .field("events", &self.events.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Client;
    use synthswap_types::SynthswapError;
    use synthswap_types::fixtures::{principal, signing_key};

    fn ledger() -> Ledger {
        Ledger::new(LedgerConfig::rent_free()).unwrap()
    }

    fn init_ix() -> Instruction {
        Instruction::InitializeTradingPool {
            vault_authority: principal(1),
            backend_authority: principal(2),
        }
    }

    #[test]
    fn invalid_config_rejected() {
        let config = LedgerConfig {
            native_decimals: 30,
            ..LedgerConfig::default()
        };
        assert!(matches!(
            Ledger::new(config),
            Err(SynthswapError::Configuration(_))
        ));
    }

    #[test]
    fn failed_transaction_leaves_no_trace() {
        let mut ledger = ledger();
        ledger.execute(principal(1), init_ix()).unwrap();
        let accounts = ledger.store().len();
        let events = ledger.events().len();

        let err = ledger.execute(principal(1), init_ix()).unwrap_err();
        assert_eq!(err, SynthswapError::AlreadyInitialized);
        assert_eq!(ledger.store().len(), accounts);
        assert_eq!(ledger.events().len(), events);
    }

    #[test]
    fn signed_submission_runs_once() {
        let mut ledger = ledger();
        let mut client = Client::new(signing_key(1));
        let signed = client.build(&ledger, init_ix()).unwrap();

        let receipt = ledger.submit(signed.clone()).unwrap();
        assert_eq!(receipt.instruction, "initialize_trading_pool");
        assert_eq!(receipt.events.len(), 1);

        let err = ledger.submit(signed).unwrap_err();
        assert_eq!(err, SynthswapError::TransactionReplayed);
        assert_eq!(ledger.next_nonce(&principal(1)), 1);
    }

    #[test]
    fn failed_instruction_still_consumes_its_nonce() {
        let mut ledger = ledger();
        let mut client = Client::new(signing_key(1));
        // no pool yet, so the deposit fails after the signature verifies
        let deposit = client
            .build(&ledger, Instruction::DepositVaultFunds { amount: 1 })
            .unwrap();
        assert_eq!(
            ledger.submit(deposit.clone()).unwrap_err(),
            SynthswapError::NotInitialized
        );
        assert_eq!(ledger.next_nonce(&principal(1)), 1);

        ledger.execute(principal(1), init_ix()).unwrap();
        assert_eq!(
            ledger.submit(deposit).unwrap_err(),
            SynthswapError::TransactionReplayed
        );
    }

    #[test]
    fn forged_signature_does_not_burn_a_nonce() {
        let mut ledger = ledger();
        let mut client = Client::new(signing_key(1));
        let mut signed = client.build(&ledger, init_ix()).unwrap();
        signed.signature[0] ^= 0xff;
        assert_eq!(
            ledger.submit(signed).unwrap_err(),
            SynthswapError::SignatureInvalid
        );
        assert_eq!(ledger.next_nonce(&principal(1)), 0);
    }

    #[test]
    fn forged_signer_rejected() {
        let mut ledger = ledger();
        let mut client = Client::new(signing_key(1));
        let mut signed = client.build(&ledger, init_ix()).unwrap();
        signed.message.signer = principal(9);
        assert_eq!(
            ledger.submit(signed).unwrap_err(),
            SynthswapError::SignatureInvalid
        );
        assert!(ledger.store().is_empty());
    }

    #[test]
    fn undeclared_account_rejected() {
        let mut ledger = ledger();
        let err = ledger
            .execute_with_accounts(principal(1), init_ix(), &[])
            .unwrap_err();
        assert!(matches!(err, SynthswapError::UndeclaredAccount(_)));
    }
}
