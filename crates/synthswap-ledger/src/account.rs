//! Accounts: a native-currency balance plus one typed record.

use serde::{Deserialize, Serialize};
use synthswap_types::{
    AssetMint, AssetRegistry, BuyOrder, SellOrder, TokenHolding, TradingPool, VaultState,
};

/// The record stored at an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum AccountData {
    /// A plain currency account (principals hold these).
    Empty,
    TradingPool(TradingPool),
    Vault(VaultState),
    AssetMint(AssetMint),
    AssetRegistry(AssetRegistry),
    TokenHolding(TokenHolding),
    BuyOrder(BuyOrder),
    SellOrder(SellOrder),
}

impl AccountData {
    /// Human-readable record kind, used in mismatch errors.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty account",
            Self::TradingPool(_) => TradingPool::KIND,
            Self::Vault(_) => VaultState::KIND,
            Self::AssetMint(_) => AssetMint::KIND,
            Self::AssetRegistry(_) => AssetRegistry::KIND,
            Self::TokenHolding(_) => TokenHolding::KIND,
            Self::BuyOrder(_) => BuyOrder::KIND,
            Self::SellOrder(_) => SellOrder::KIND,
        }
    }
}

/// A single ledger account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub lamports: u64,
    pub data: AccountData,
}

impl Account {
    /// A currency-only account.
    #[must_use]
    pub fn system(lamports: u64) -> Self {
        Self {
            lamports,
            data: AccountData::Empty,
        }
    }

    /// Whether a record (anything but a plain currency account) lives here.
    #[must_use]
    pub fn has_record(&self) -> bool {
        !matches!(self.data, AccountData::Empty)
    }
}

/// A typed record that can live inside an [`Account`].
pub trait Record: Clone + Sized + 'static {
    /// Name used in `AccountTypeMismatch` errors.
    const KIND: &'static str;
    /// Stored size in bytes, charged by the rent model.
    const SIZE: usize;

    fn from_data(data: &AccountData) -> Option<&Self>;
    fn into_data(self) -> AccountData;
}

macro_rules! impl_record {
    ($ty:ident, $variant:ident, $kind:literal) => {
        impl Record for $ty {
            const KIND: &'static str = $kind;
            const SIZE: usize = $ty::LEN;

            fn from_data(data: &AccountData) -> Option<&Self> {
                match data {
                    AccountData::$variant(record) => Some(record),
                    _ => None,
                }
            }

            fn into_data(self) -> AccountData {
                AccountData::$variant(self)
            }
        }
    };
}

impl_record!(TradingPool, TradingPool, "trading pool");
impl_record!(VaultState, Vault, "vault");
impl_record!(AssetMint, AssetMint, "asset mint");
impl_record!(AssetRegistry, AssetRegistry, "asset registry entry");
impl_record!(TokenHolding, TokenHolding, "token holding");
impl_record!(BuyOrder, BuyOrder, "buy order");
impl_record!(SellOrder, SellOrder, "sell order");
