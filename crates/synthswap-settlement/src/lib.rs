//! # synthswap-settlement
//!
//! **Settlement operations** for native-currency / synthetic-share trades.
//!
//! ## Flow
//!
//! ```text
//!  user ──place_buy──▶ vault escrow ──fulfill_buy (backend)──▶ shares minted
//!  user ──place_sell─▶ share escrow ─fulfill_sell (backend)─▶ shares burned,
//!                                                              proceeds paid
//! ```
//!
//! Placement and fulfillment are always two independent transactions. The
//! backend authority attests fill prices; the core only checks them against
//! the order's price bound and enforces accounting closure.
//!
//! ## Modules
//!
//! - [`instructions`]: one handler per operation
//! - [`processor`]: instruction dispatch
//! - [`runtime`]: [`Ledger`], the atomic, serialized entry point
//! - [`signed`] / [`client`]: ed25519-signed, nonce-ordered transactions and
//!   account resolution
//! - [`audit`]: conservation checks over committed state
//! - [`views`]: read-only record access

pub mod accounts;
pub mod audit;
pub mod client;
pub mod instructions;
pub mod processor;
pub mod runtime;
pub mod signed;
pub mod views;

pub use audit::{AssetAudit, AuditReport, audit};
pub use client::{Client, resolve_accounts};
pub use runtime::{Ledger, TxReceipt};
pub use signed::{SignedTransaction, TransactionMessage};
pub use views::{LedgerView, OrderBookEntries};
