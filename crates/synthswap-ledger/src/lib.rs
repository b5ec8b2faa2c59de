//! # synthswap-ledger
//!
//! The **Ledger Account Store** the settlement core runs on.
//!
//! ## Model
//!
//! - Every account lives at a 32-byte [`Address`](synthswap_types::Address)
//!   and carries a native-currency balance plus at most one typed record.
//! - Records are created at most once and never removed.
//! - Creating a record charges its rent deposit to a payer.
//! - All mutation goes through a [`Transaction`]: a copy-on-write overlay
//!   that either commits whole or is dropped whole.
//!
//! ## Primitives
//!
//! - [`Transaction::transfer_lamports`]: native currency movement
//! - [`token`]: asset identities, holdings, mint, burn, transfer
//! - [`EventLog`]: the append-only trail of committed events

pub mod account;
pub mod events;
pub mod store;
pub mod token;
pub mod transaction;

pub use account::{Account, AccountData, Record};
pub use events::EventLog;
pub use store::AccountStore;
pub use token::TokenAuthority;
pub use transaction::{Transaction, TransactionEffects};
