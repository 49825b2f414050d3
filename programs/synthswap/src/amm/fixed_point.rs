//! 256-bit helpers for curve intermediates.
//!
//! Prices are `u128` WAD values and balances are `u64`, so products such as
//! `price * balance^2` need more headroom than `u128` gives. Every helper is
//! checked and reports `MathOverflow` instead of wrapping.

use anchor_lang::prelude::*;

use crate::errors::AmmError;

// kept apart from the anchor prelude, whose `Result` alias breaks the macro
mod wide {
    use uint::construct_uint;

    construct_uint! {
        /// 256-bit unsigned integer for curve intermediates
        pub struct U256(4);
    }
}

pub use wide::U256;

/// Fixed-point scale of `Pool::price` (1e18)
pub const WAD: u128 = 1_000_000_000_000_000_000;

pub fn checked_mul(a: U256, b: U256) -> Result<U256> {
    Ok(a.checked_mul(b).ok_or(AmmError::MathOverflow)?)
}

pub fn checked_add(a: U256, b: U256) -> Result<U256> {
    Ok(a.checked_add(b).ok_or(AmmError::MathOverflow)?)
}

pub fn checked_sub(a: U256, b: U256) -> Result<U256> {
    Ok(a.checked_sub(b).ok_or(AmmError::MathUnderflow)?)
}

/// floor(a * b / c)
pub fn mul_div_floor(a: U256, b: U256, c: U256) -> Result<U256> {
    require!(!c.is_zero(), AmmError::MathOverflow);
    Ok(checked_mul(a, b)? / c)
}

/// ceil(a * b / c)
pub fn mul_div_ceil(a: U256, b: U256, c: U256) -> Result<U256> {
    require!(!c.is_zero(), AmmError::MathOverflow);
    let product = checked_mul(a, b)?;
    let quotient = product / c;
    if (product % c).is_zero() {
        Ok(quotient)
    } else {
        checked_add(quotient, U256::one())
    }
}

pub fn to_u64(value: U256) -> Result<u64> {
    require!(value <= U256::from(u64::MAX), AmmError::MathOverflow);
    Ok(value.as_u64())
}

pub fn to_u128(value: U256) -> Result<u128> {
    require!(value <= U256::from(u128::MAX), AmmError::MathOverflow);
    Ok(value.as_u128())
}
