//! Liquidity Positions
//!
//! Shares are tracked per (provider, asset) instead of through an LP mint so
//! the program can enforce the withdrawal lock on each provider.

use anchor_lang::prelude::*;

use crate::errors::AmmError;

/// Slots a provider must wait after depositing before withdrawing
pub const LIQUIDITY_LOCK: u64 = 36_000;

/// Seeds: ["position", asset_mint, owner]
#[account]
#[derive(InitSpace, Debug, Default, PartialEq)]
pub struct LiquidityPosition {
    /// Provider owning the shares
    pub owner: Pubkey,

    /// Pool asset mint
    pub asset: Pubkey,

    /// Shares held
    pub shares: u64,

    /// Slot of the most recent deposit into this position
    pub last_added_slot: u64,

    /// PDA bump seed
    pub bump: u8,
}

impl LiquidityPosition {
    pub const SEED: &'static [u8] = b"position";

    pub fn new(owner: Pubkey, asset: Pubkey, bump: u8) -> Self {
        Self {
            owner,
            asset,
            bump,
            ..Default::default()
        }
    }

    pub fn is_open(&self) -> bool {
        self.owner != Pubkey::default()
    }

    pub fn ensure_unlocked(&self, now_slot: u64) -> Result<()> {
        let unlocks_at = self
            .last_added_slot
            .checked_add(LIQUIDITY_LOCK)
            .ok_or(AmmError::MathOverflow)?;
        require!(now_slot >= unlocks_at, AmmError::LiquidityLocked);
        Ok(())
    }
}
