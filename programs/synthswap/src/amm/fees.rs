//! Swap fees
//!
//! Every leg pays `fee_rate` of its input before the input reaches the curve.
//! A `protocol_fee_rate` slice of the input goes to the fee recipient and the
//! remainder stays with the pool's liquidity providers.

use anchor_lang::prelude::*;

use crate::amm::fixed_point::{mul_div_floor, to_u64, U256};
use crate::errors::AmmError;
use crate::state::{FEE_DENOMINATOR, MAX_FEE_RATE};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeSchedule {
    pub fee_rate: u32,
    pub protocol_fee_rate: u32,
}

impl FeeSchedule {
    pub fn new(fee_rate: u32, protocol_fee_rate: u32) -> Result<Self> {
        require!(fee_rate <= MAX_FEE_RATE, AmmError::InvalidFee);
        require!(protocol_fee_rate <= fee_rate, AmmError::InvalidFee);
        Ok(Self {
            fee_rate,
            protocol_fee_rate,
        })
    }

    /// Splits a gross leg input into the part entering the curve and the fees
    pub fn split(&self, gross: u64) -> Result<FeeSplit> {
        let denominator = U256::from(FEE_DENOMINATOR);
        let fee = to_u64(mul_div_floor(
            U256::from(gross),
            U256::from(self.fee_rate),
            denominator,
        )?)?;
        let protocol_fee = to_u64(mul_div_floor(
            U256::from(gross),
            U256::from(self.protocol_fee_rate),
            denominator,
        )?)?;

        Ok(FeeSplit {
            gross,
            net: gross.checked_sub(fee).ok_or(AmmError::MathUnderflow)?,
            lp_fee: fee.checked_sub(protocol_fee).ok_or(AmmError::MathUnderflow)?,
            protocol_fee,
        })
    }

    /// Smallest gross input whose `split(..).net` is at least `net`
    pub fn gross_up(&self, net: u64) -> Result<u64> {
        if net == 0 {
            return Ok(0);
        }
        let kept = FEE_DENOMINATOR
            .checked_sub(self.fee_rate)
            .filter(|kept| *kept > 0)
            .ok_or(AmmError::InvalidFee)?;
        // net(g) = ceil(g * kept / D), so the minimum is floor((net - 1) * D / kept) + 1
        let below = to_u64(mul_div_floor(
            U256::from(net - 1),
            U256::from(FEE_DENOMINATOR),
            U256::from(kept),
        )?)?;
        Ok(below.checked_add(1).ok_or(AmmError::MathOverflow)?)
    }
}

/// One leg's input, broken down
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeSplit {
    pub gross: u64,
    /// Enters the curve
    pub net: u64,
    /// Retained by the pool outside the curve
    pub lp_fee: u64,
    /// Paid to the fee recipient
    pub protocol_fee: u64,
}

impl FeeSplit {
    /// Input the pool keeps: everything except the protocol share
    pub fn retained(&self) -> Result<u64> {
        Ok(self
            .net
            .checked_add(self.lp_fee)
            .ok_or(AmmError::MathOverflow)?)
    }
}
