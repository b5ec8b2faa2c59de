//! # synthswap-types
//!
//! Shared types, errors, and configuration for the **Synthswap** settlement
//! core.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Addresses**: [`Address`] and deterministic seed-based derivation
//! - **Identifiers**: [`OrderId`], [`TxId`], [`Symbol`]
//! - **Records**: [`TradingPool`], [`VaultState`], [`AssetRegistry`],
//!   [`AssetMint`], [`TokenHolding`], [`BuyOrder`], [`SellOrder`]
//! - **Instructions**: [`Instruction`]
//! - **Events**: [`LedgerEvent`], [`EventRecord`]
//! - **Configuration**: [`LedgerConfig`], [`RentConfig`]
//! - **Errors**: [`SynthswapError`] with `SS_ERR_` prefix codes
//! - **Constants**: seed tags and system-wide limits

pub mod address;
pub mod asset;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
#[cfg(any(test, feature = "test-helpers"))]
pub mod fixtures;
pub mod ids;
pub mod instruction;
pub mod order;
pub mod pool;
pub mod token;

pub use address::*;
pub use asset::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use instruction::*;
pub use order::*;
pub use pool::*;
pub use token::*;

// Constants are accessed via `synthswap_types::constants::FOO`
// (not re-exported to avoid name collisions).
