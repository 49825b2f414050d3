pub mod add_official_token;
pub mod configure;
pub mod rebalance;
pub mod set_pool_price;
pub mod update_pool;

pub use add_official_token::*;
pub use configure::*;
pub use rebalance::*;
pub use set_pool_price::*;
pub use update_pool::*;
