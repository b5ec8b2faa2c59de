//! One module per instruction. Each exposes a `handler` that runs inside an
//! open [`Transaction`](synthswap_ledger::Transaction) and returns an error
//! to abort it.

pub mod cancel_buy_order;
pub mod cancel_sell_order;
pub mod create_asset;
pub mod deposit_vault_funds;
pub mod fulfill_buy_order;
pub mod fulfill_sell_order;
pub mod initialize_trading_pool;
pub mod place_buy_order;
pub mod place_sell_order;
pub mod update_authorities;
pub mod withdraw_vault_funds;
