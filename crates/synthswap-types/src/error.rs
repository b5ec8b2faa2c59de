//! Error types for the Synthswap settlement core.
//!
//! All errors use the `SS_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Authorization errors
//! - 2xx: Record state errors
//! - 3xx: Price bound errors
//! - 4xx: Accounting / conservation errors
//! - 5xx: Ledger runtime errors (addresses, accounts, transactions)
//! - 9xx: General / internal errors
//!
//! Every error aborts the whole operation. The transaction envelope discards
//! its overlay, so a returned error always means "nothing changed".

use thiserror::Error;

use crate::{Address, OrderStatus};

/// Coarse classification of a failure, used by callers deciding whether a
/// rejected operation is worth resubmitting with different parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The signer is not the required principal.
    Authorization,
    /// Preconditions on existing records were violated.
    State,
    /// An attested price is outside the caller's declared limit.
    Bound,
    /// A conservation-of-value check failed.
    Accounting,
    /// The request itself was malformed or the runtime refused it.
    Runtime,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Authorization => write!(f, "AUTHORIZATION"),
            Self::State => write!(f, "STATE"),
            Self::Bound => write!(f, "BOUND"),
            Self::Accounting => write!(f, "ACCOUNTING"),
            Self::Runtime => write!(f, "RUNTIME"),
        }
    }
}

/// Central error enum for all Synthswap operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SynthswapError {
    // =================================================================
    // Authorization Errors (1xx)
    // =================================================================
    /// Signer is not the vault authority (or not the order's owner).
    #[error("SS_ERR_100: Unauthorized signer {signer}")]
    Unauthorized { signer: Address },

    /// Signer is not the current backend authority.
    #[error("SS_ERR_101: Unauthorized backend signer {signer}")]
    UnauthorizedBackend { signer: Address },

    /// The ed25519 signature on a submitted transaction didn't verify.
    #[error("SS_ERR_102: Transaction signature verification failed")]
    SignatureInvalid,

    /// The token authority presented for a mint/burn/transfer is wrong.
    #[error("SS_ERR_103: Invalid token authority {authority}")]
    InvalidTokenAuthority { authority: Address },

    // =================================================================
    // State Errors (2xx)
    // =================================================================
    /// The trading pool singleton already exists.
    #[error("SS_ERR_200: Trading pool already initialized")]
    AlreadyInitialized,

    /// A record already occupies the derived address.
    #[error("SS_ERR_201: Account already exists at {0}")]
    AlreadyExists(Address),

    /// The order is not in a state that permits this transition.
    #[error("SS_ERR_202: Invalid order state: order {order_id} is {status}")]
    InvalidOrderState { order_id: u64, status: OrderStatus },

    /// The trading pool singleton has not been created yet.
    #[error("SS_ERR_203: Trading pool not initialized")]
    NotInitialized,

    /// No asset is registered under this symbol.
    #[error("SS_ERR_204: Asset not registered: {0}")]
    AssetNotFound(String),

    /// No order record exists at the derived address.
    #[error("SS_ERR_205: Order not found at {0}")]
    OrderNotFound(Address),

    // =================================================================
    // Bound Errors (3xx)
    // =================================================================
    /// Attested buy price is above the buyer's ceiling.
    #[error("SS_ERR_300: Price {price} exceeds limit {limit}")]
    PriceExceedsLimit { price: u64, limit: u64 },

    /// Attested sell price is below the seller's floor.
    #[error("SS_ERR_301: Price {price} below limit {limit}")]
    PriceBelowLimit { price: u64, limit: u64 },

    // =================================================================
    // Accounting Errors (4xx)
    // =================================================================
    /// Settled + returned amounts don't add up to the escrowed amount.
    #[error("SS_ERR_400: Accounting mismatch: {reason}")]
    AccountingMismatch { reason: String },

    /// Payer cannot cover the transfer plus record creation cost.
    #[error("SS_ERR_401: Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    /// Seller holds fewer shares than requested.
    #[error("SS_ERR_402: Insufficient shares: need {needed}, have {available}")]
    InsufficientShares { needed: u64, available: u64 },

    /// The vault would drop below its committed buy-order obligations.
    #[error("SS_ERR_403: Insufficient vault balance: requested {requested}, withdrawable {withdrawable}")]
    InsufficientVaultBalance { requested: u64, withdrawable: u64 },

    /// A checked arithmetic step overflowed or underflowed.
    #[error("SS_ERR_404: Arithmetic overflow in {context}")]
    ArithmeticOverflow { context: &'static str },

    /// An amount that must be non-zero was zero.
    #[error("SS_ERR_405: Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// A price bound that must be non-zero was zero.
    #[error("SS_ERR_406: Invalid price: {reason}")]
    InvalidPrice { reason: String },

    /// Token supply bookkeeping disagrees with holdings. Critical alert.
    #[error("SS_ERR_407: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    /// Vault bookkeeping disagrees with pending buy orders. Critical alert.
    #[error("SS_ERR_408: Vault invariant violation: {reason}")]
    VaultInvariantViolation { reason: String },

    // =================================================================
    // Ledger Runtime Errors (5xx)
    // =================================================================
    /// The symbol is longer than the fixed bound.
    #[error("SS_ERR_500: Symbol too long: {len} > {max}")]
    SymbolTooLong { len: usize, max: usize },

    /// The symbol is empty or contains non-printable / non-ASCII bytes.
    #[error("SS_ERR_501: Invalid symbol: {0:?}")]
    InvalidSymbol(String),

    /// No account exists at the address.
    #[error("SS_ERR_502: Account not found: {0}")]
    AccountNotFound(Address),

    /// The account at the address holds a different record type.
    #[error("SS_ERR_503: Account {address} is not a {expected}")]
    AccountTypeMismatch {
        address: Address,
        expected: &'static str,
    },

    /// The operation touched an address the transaction did not declare.
    #[error("SS_ERR_504: Account {0} was not declared by the transaction")]
    UndeclaredAccount(Address),

    /// A record's storage proof doesn't re-derive its own address.
    #[error("SS_ERR_505: Address mismatch: expected {expected}, got {actual}")]
    AddressMismatch { expected: Address, actual: Address },

    /// Seed material exceeded the derivation limits.
    #[error("SS_ERR_506: Invalid seeds: {reason}")]
    InvalidSeeds { reason: String },

    /// The same signed transaction was submitted twice.
    #[error("SS_ERR_507: Transaction replayed")]
    TransactionReplayed,

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("SS_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("SS_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, out-of-range values, etc.).
    #[error("SS_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// I/O error (reading a config file).
    #[error("SS_ERR_903: I/O error: {0}")]
    Io(String),
}

impl SynthswapError {
    /// Taxonomy bucket for this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthorized { .. }
            | Self::UnauthorizedBackend { .. }
            | Self::SignatureInvalid
            | Self::InvalidTokenAuthority { .. } => ErrorCategory::Authorization,
            Self::AlreadyInitialized
            | Self::AlreadyExists(_)
            | Self::InvalidOrderState { .. }
            | Self::NotInitialized
            | Self::AssetNotFound(_)
            | Self::OrderNotFound(_) => ErrorCategory::State,
            Self::PriceExceedsLimit { .. } | Self::PriceBelowLimit { .. } => ErrorCategory::Bound,
            Self::AccountingMismatch { .. }
            | Self::InsufficientFunds { .. }
            | Self::InsufficientShares { .. }
            | Self::InsufficientVaultBalance { .. }
            | Self::ArithmeticOverflow { .. }
            | Self::InvalidAmount { .. }
            | Self::InvalidPrice { .. }
            | Self::SupplyInvariantViolation { .. }
            | Self::VaultInvariantViolation { .. } => ErrorCategory::Accounting,
            Self::SymbolTooLong { .. }
            | Self::InvalidSymbol(_)
            | Self::AccountNotFound(_)
            | Self::AccountTypeMismatch { .. }
            | Self::UndeclaredAccount(_)
            | Self::AddressMismatch { .. }
            | Self::InvalidSeeds { .. }
            | Self::TransactionReplayed
            | Self::Internal(_)
            | Self::Serialization(_)
            | Self::Configuration(_)
            | Self::Io(_) => ErrorCategory::Runtime,
        }
    }

    /// The numeric code embedded in the message (e.g. `300` for `SS_ERR_300`).
    #[must_use]
    pub fn code(&self) -> u16 {
        let msg = self.to_string();
        msg.get(7..10)
            .and_then(|digits| digits.parse().ok())
            .unwrap_or(900)
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, SynthswapError>;

impl From<std::io::Error> for SynthswapError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SynthswapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = SynthswapError::AlreadyInitialized;
        let msg = format!("{err}");
        assert!(msg.starts_with("SS_ERR_200"), "Got: {msg}");
    }

    #[test]
    fn insufficient_funds_display() {
        let err = SynthswapError::InsufficientFunds {
            needed: 100,
            available: 50,
        };
        let msg = format!("{err}");
        assert!(msg.contains("SS_ERR_401"));
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn invalid_order_state_display() {
        let err = SynthswapError::InvalidOrderState {
            order_id: 7,
            status: OrderStatus::Fulfilled,
        };
        let msg = format!("{err}");
        assert!(msg.contains("SS_ERR_202"));
        assert!(msg.contains("FULFILLED"));
    }

    #[test]
    fn categories_follow_taxonomy() {
        let signer = Address([1u8; 32]);
        assert_eq!(
            SynthswapError::UnauthorizedBackend { signer }.category(),
            ErrorCategory::Authorization
        );
        assert_eq!(
            SynthswapError::AlreadyExists(signer).category(),
            ErrorCategory::State
        );
        assert_eq!(
            SynthswapError::PriceBelowLimit { price: 1, limit: 2 }.category(),
            ErrorCategory::Bound
        );
        assert_eq!(
            SynthswapError::InsufficientVaultBalance {
                requested: 5,
                withdrawable: 1
            }
            .category(),
            ErrorCategory::Accounting
        );
        assert_eq!(
            SynthswapError::TransactionReplayed.category(),
            ErrorCategory::Runtime
        );
    }

    #[test]
    fn code_parses_from_message() {
        assert_eq!(
            SynthswapError::PriceExceedsLimit { price: 2, limit: 1 }.code(),
            300
        );
        assert_eq!(SynthswapError::Internal("x".into()).code(), 900);
    }

    #[test]
    fn all_errors_have_ss_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(SynthswapError::NotInitialized),
            Box::new(SynthswapError::SignatureInvalid),
            Box::new(SynthswapError::TransactionReplayed),
            Box::new(SynthswapError::Internal("test".into())),
            Box::new(SynthswapError::AccountingMismatch {
                reason: "a".into(),
            }),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("SS_ERR_"),
                "Error missing SS_ERR_ prefix: {msg}"
            );
        }
    }
}
