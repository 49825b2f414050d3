//! Instruction handlers for the synthetic-unit AMM
//!
//! - `initialize` - Set up config and the vUSD mint (once)
//! - `admin` - Official listings, pool status/price, roles, fees, rebalancing
//! - `list_new_token` - Permissionless listing with a token seed
//! - `liquidity` - Single-sided deposits and share redemption
//! - `swap` - Asset/asset and asset/vUSD swaps, including native SOL
//! - `view` - Pool snapshots and swap quotes

pub mod admin;
pub mod initialize;
pub mod list_new_token;
pub mod liquidity;
pub mod settlement;
pub mod swap;
pub mod view;

pub use admin::*;
pub use initialize::*;
pub use list_new_token::*;
pub use liquidity::*;
pub use swap::*;
pub use view::*;
