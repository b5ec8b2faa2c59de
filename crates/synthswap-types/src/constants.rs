//! System-wide constants for the Synthswap settlement core.

/// Domain separator mixed into every derived address.
pub const DERIVATION_DOMAIN: &[u8] = b"synthswap:address:v1:";

/// Seed tag for the trading pool singleton.
pub const TRADING_POOL_SEED: &[u8] = b"trading_pool";

/// Seed tag for the pooled native-currency vault.
pub const VAULT_SEED: &[u8] = b"trading_pool_vault";

/// Seed tag for a symbol's share-token identity (the mint).
pub const ASSET_MINT_SEED: &[u8] = b"stock_mint";

/// Seed tag for a symbol's registry entry.
pub const ASSET_REGISTRY_SEED: &[u8] = b"stock_mint_info";

/// Seed tag for buy orders.
pub const BUY_ORDER_SEED: &[u8] = b"buy_order";

/// Seed tag for sell orders.
pub const SELL_ORDER_SEED: &[u8] = b"sell_order";

/// Seed tag for a symbol's sell escrow holding.
pub const ESCROW_SEED: &[u8] = b"escrow";

/// Seed tag for a principal's share holding of one asset.
pub const HOLDING_SEED: &[u8] = b"holding";

/// Maximum number of seed components in one derivation.
pub const MAX_SEEDS: usize = 8;

/// Maximum length of a single seed component in bytes.
pub const MAX_SEED_LEN: usize = 32;

/// Maximum decimal places accepted for a share token.
pub const MAX_ASSET_DECIMALS: u8 = 18;

/// Maximum symbol length in bytes.
pub const MAX_SYMBOL_LEN: usize = 10;

/// Fixed per-account storage overhead charged by the rent model, in bytes.
pub const ACCOUNT_STORAGE_OVERHEAD: u64 = 128;

/// Default lamports charged per stored byte for a rent-exempt record.
pub const DEFAULT_LAMPORTS_PER_BYTE: u64 = 6960;

/// Decimal places of the native currency (lamports per whole unit = 10^9).
pub const NATIVE_DECIMALS: u8 = 9;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Synthswap";
