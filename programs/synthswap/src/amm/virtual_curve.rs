//! # Virtual Constant-Product Curve
//!
//! A pool never holds a real vUSD reserve. Instead, at the moment of a trade
//! it is priced as one side of a constant-product curve against a notional
//! reserve worth exactly its own balance:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                                                              │
//! │        vres = price * balance        k = balance * vres      │
//! │                                                              │
//! │   Selling n tokens:                                          │
//! │     balance' = balance + n                                   │
//! │     vusd_out = vres - k / balance'                           │
//! │     price'   = (k / balance') / balance'                     │
//! │                                                              │
//! │   Buying with v vUSD:                                        │
//! │     vres'      = vres + v                                    │
//! │     amount_out = balance - k / vres'                         │
//! │     price'     = vres' / (k / vres')                         │
//! │                                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices are WAD scaled, so with `p = price` and `b = balance` the closed
//! forms used below are:
//!
//! ```text
//! vusd_out   = p*b*n / (WAD*(b+n))        price' = p*b² / (b+n)²
//! amount_out = b*v*WAD / (p*b + v*WAD)    price' = (p*b + v*WAD)² / (p*b²)
//! ```
//!
//! Outputs round down and required inputs round up, so rounding never
//! favours the trader.

use anchor_lang::prelude::*;

use crate::amm::fixed_point::{
    checked_add, checked_mul, checked_sub, mul_div_ceil, mul_div_floor, to_u128, to_u64, U256, WAD,
};
use crate::errors::AmmError;

/// Result of selling asset into a pool
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SellQuote {
    pub vusd_out: u64,
    pub new_price: u128,
}

/// Result of buying asset from a pool
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuyQuote {
    pub amount_out: u64,
    pub new_price: u128,
}

/// Pricing math for one pool against vUSD
pub struct VirtualCurve;

impl VirtualCurve {
    /// Notional vUSD reserve `price * balance`, in vUSD base units
    pub fn virtual_reserve(price: u128, balance: u64) -> Result<u128> {
        to_u128(mul_div_floor(
            U256::from(price),
            U256::from(balance),
            U256::from(WAD),
        )?)
    }

    /// Sell `amount_in` (already net of fees) into the pool
    pub fn sell(price: u128, balance: u64, amount_in: u64) -> Result<SellQuote> {
        Self::check_pool(price, balance)?;
        require!(amount_in > 0, AmmError::ZeroAmount);

        let p = U256::from(price);
        let b = U256::from(balance);
        let n = U256::from(amount_in);
        let b_after = checked_add(b, n)?;

        // vusd_out = p*b*n / (WAD*(b+n))
        let vusd_out = mul_div_floor(
            checked_mul(p, b)?,
            n,
            checked_mul(U256::from(WAD), b_after)?,
        )?;

        // price' = p*b² / (b+n)²
        let new_price = mul_div_floor(
            p,
            checked_mul(b, b)?,
            checked_mul(b_after, b_after)?,
        )?;
        require!(!new_price.is_zero(), AmmError::MathUnderflow);

        Ok(SellQuote {
            vusd_out: to_u64(vusd_out)?,
            new_price: to_u128(new_price)?,
        })
    }

    /// Buy asset out of the pool with `vusd_in` (already net of fees)
    pub fn buy(price: u128, balance: u64, vusd_in: u64) -> Result<BuyQuote> {
        Self::check_pool(price, balance)?;
        require!(vusd_in > 0, AmmError::ZeroAmount);

        let p = U256::from(price);
        let b = U256::from(balance);
        let v_scaled = checked_mul(U256::from(vusd_in), U256::from(WAD))?;

        // N = WAD * vres'
        let n = checked_add(checked_mul(p, b)?, v_scaled)?;

        // amount_out = b*v*WAD / N
        let amount_out = mul_div_floor(b, v_scaled, n)?;
        require!(amount_out < b, AmmError::InsufficientLiquidity);

        // price' = N² / (p*b²)
        let new_price = mul_div_floor(n, n, checked_mul(p, checked_mul(b, b)?)?)?;

        Ok(BuyQuote {
            amount_out: to_u64(amount_out)?,
            new_price: to_u128(new_price)?,
        })
    }

    /// Net asset input that makes `sell` pay out at least `vusd_out`
    pub fn sell_input_for(price: u128, balance: u64, vusd_out: u64) -> Result<u64> {
        Self::check_pool(price, balance)?;
        require!(vusd_out > 0, AmmError::ZeroAmount);

        let b = U256::from(balance);
        let pb = checked_mul(U256::from(price), b)?;
        let v_scaled = checked_mul(U256::from(vusd_out), U256::from(WAD))?;
        require!(v_scaled < pb, AmmError::InsufficientLiquidity);

        // n = v*WAD*b / (p*b - v*WAD)
        to_u64(mul_div_ceil(v_scaled, b, checked_sub(pb, v_scaled)?)?)
    }

    /// Net vUSD input that makes `buy` pay out at least `amount_out`
    pub fn buy_input_for(price: u128, balance: u64, amount_out: u64) -> Result<u64> {
        Self::check_pool(price, balance)?;
        require!(amount_out > 0, AmmError::ZeroAmount);
        require!(amount_out < balance, AmmError::InsufficientLiquidity);

        let b = U256::from(balance);
        let o = U256::from(amount_out);
        let remaining = checked_sub(b, o)?;

        // v = o*p*b / (WAD*(b - o))
        to_u64(mul_div_ceil(
            checked_mul(o, U256::from(price))?,
            b,
            checked_mul(U256::from(WAD), remaining)?,
        )?)
    }

    fn check_pool(price: u128, balance: u64) -> Result<()> {
        require!(price > 0, AmmError::InvalidPrice);
        require!(balance > 0, AmmError::InsufficientLiquidity);
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
