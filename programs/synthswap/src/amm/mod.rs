//! # Synthetic-Unit AMM Engine
//!
//! Every asset is quoted against one synthetic unit, vUSD, instead of being
//! paired with another asset. A pool holds a single asset and prices it on a
//! virtual constant-product curve whose vUSD side is never deposited.
//!
//! ```text
//!   ┌──────────┐   sell    ┌────────┐    buy    ┌──────────┐
//!   │ Pool  A  │ ────────▶ │  vUSD  │ ────────▶ │ Pool  B  │
//!   │ price_A  │           │ minted │           │ price_B  │
//!   │ debt  ▲  │           │ burned │           │ credit ▲ │
//!   └──────────┘           └────────┘           └──────────┘
//! ```
//!
//! vUSD paid out by a pool becomes its debt; vUSD paid into a pool repays
//! debt and then becomes credit. Liquidity providers own shares of a pool's
//! equity `price * balance + credit - debt`.
//!
//! Everything in this module is pure: it works on `Pool` and
//! `LiquidityPosition` values and never touches accounts or tokens.

pub mod fees;
pub mod fixed_point;
pub mod liquidity;
pub mod router;
pub mod solvency;
pub mod virtual_curve;

pub use fees::*;
pub use fixed_point::WAD;
pub use liquidity::*;
pub use router::*;
pub use solvency::*;
pub use virtual_curve::*;
