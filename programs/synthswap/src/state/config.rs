//! Global Protocol Configuration
//!
//! This account stores the roles and fee schedule that apply to every pool,
//! plus the address of the synthetic vUSD mint the program controls.

use anchor_lang::prelude::*;

use crate::amm::FeeSchedule;
use crate::errors::AmmError;

/// Fees are expressed over this denominator (300 = 0.3%)
pub const FEE_DENOMINATOR: u32 = 100_000;

/// Default swap fee per leg (0.3%)
pub const DEFAULT_FEE_RATE: u32 = 300;

/// Default protocol sub-share of each leg's input (0.05%)
pub const DEFAULT_PROTOCOL_FEE_RATE: u32 = 50;

/// Upper bound accepted by `set_fees` (5%)
pub const MAX_FEE_RATE: u32 = 5_000;

/// Maximum number of price adjusters
pub const MAX_PRICE_ADJUSTERS: usize = 16;

/// Global configuration account (singleton PDA)
///
/// Seeds: ["config"]
#[account]
#[derive(InitSpace, Debug, Default, PartialEq)]
pub struct Config {
    /// Protocol administrator: lists official pools, repricing, rebalancing
    pub admin: Pubkey,

    /// Receives the protocol share of every swap fee
    pub fee_recipient: Pubkey,

    /// Synthetic USD mint, mint authority is this account
    pub vusd_mint: Pubkey,

    /// Swap fee per leg over `FEE_DENOMINATOR`
    pub fee_rate: u32,

    /// Protocol share of each leg's input over `FEE_DENOMINATOR`
    pub protocol_fee_rate: u32,

    /// Addresses allowed to reprice synthetic pools
    #[max_len(16)]
    pub price_adjusters: Vec<Pubkey>,

    /// Pools listed so far (used as incrementing pool id)
    pub pool_count: u64,

    /// PDA bump seed
    pub bump: u8,
}

impl Config {
    pub const SEED: &'static [u8] = b"config";

    pub fn fee_schedule(&self) -> FeeSchedule {
        FeeSchedule {
            fee_rate: self.fee_rate,
            protocol_fee_rate: self.protocol_fee_rate,
        }
    }

    pub fn ensure_admin(&self, caller: &Pubkey) -> Result<()> {
        require_keys_eq!(self.admin, *caller, AmmError::Unauthorized);
        Ok(())
    }

    pub fn is_price_adjuster(&self, caller: &Pubkey) -> bool {
        self.price_adjusters.contains(caller)
    }

    pub fn ensure_price_adjuster(&self, caller: &Pubkey) -> Result<()> {
        require!(self.is_price_adjuster(caller), AmmError::Unauthorized);
        Ok(())
    }

    /// Adds `adjuster` to the role set. Adding an existing member is a no-op.
    ///
    /// Returns whether the set changed.
    pub fn add_price_adjuster(&mut self, adjuster: Pubkey) -> Result<bool> {
        if self.is_price_adjuster(&adjuster) {
            return Ok(false);
        }
        require!(
            self.price_adjusters.len() < MAX_PRICE_ADJUSTERS,
            AmmError::TooManyPriceAdjusters
        );
        self.price_adjusters.push(adjuster);
        Ok(true)
    }

    /// Removes `adjuster` from the role set. Removing a non-member is a no-op.
    pub fn remove_price_adjuster(&mut self, adjuster: &Pubkey) -> bool {
        let before = self.price_adjusters.len();
        self.price_adjusters.retain(|member| member != adjuster);
        before != self.price_adjusters.len()
    }

    pub fn set_fees(&mut self, fee_rate: u32, protocol_fee_rate: u32) -> Result<()> {
        FeeSchedule::new(fee_rate, protocol_fee_rate)?;
        self.fee_rate = fee_rate;
        self.protocol_fee_rate = protocol_fee_rate;
        Ok(())
    }

    pub fn next_pool_id(&mut self) -> Result<u64> {
        let id = self.pool_count;
        self.pool_count = id.checked_add(1).ok_or(AmmError::MathOverflow)?;
        Ok(id)
    }
}
