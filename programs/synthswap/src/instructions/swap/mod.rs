pub mod swap_tokens;
pub mod swap_vusd;

pub use swap_tokens::*;
pub use swap_vusd::*;
