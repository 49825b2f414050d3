//! Share redemption
//!
//! The owner burns shares for a slice of the pool's equity: asset from the
//! vault, plus newly minted vUSD when the pool holds credit.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::amm::{withdraw, Withdrawal};
use crate::instructions::settlement::{mint_vusd, transfer_tokens};
use crate::state::{Config, LiquidityPosition, Pool};

#[event]
pub struct LiquidityRemoved {
    pub asset: Pubkey,
    pub owner: Pubkey,
    pub shares: u64,
    pub asset_out: u64,
    pub vusd_out: u64,
    pub total_shares: u64,
}

#[derive(Accounts)]
pub struct RemoveLiquidity<'info> {
    pub owner: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    #[account(address = pool.asset)]
    pub asset_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        seeds = [Pool::SEED, asset_mint.key().as_ref()],
        bump = pool.bump,
    )]
    pub pool: Box<Account<'info, Pool>>,

    #[account(
        mut,
        seeds = [LiquidityPosition::SEED, asset_mint.key().as_ref(), owner.key().as_ref()],
        bump = position.bump,
        has_one = owner,
    )]
    pub position: Box<Account<'info, LiquidityPosition>>,

    #[account(
        mut,
        associated_token::mint = asset_mint,
        associated_token::authority = pool,
        associated_token::token_program = token_program,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Receives the asset
    #[account(
        mut,
        token::mint = asset_mint,
    )]
    pub recipient_asset: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        address = config.vusd_mint,
    )]
    pub vusd_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Receives vUSD when the pool holds credit
    #[account(
        mut,
        token::mint = vusd_mint,
    )]
    pub recipient_vusd: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> RemoveLiquidity<'info> {
    pub fn remove_liquidity(
        &mut self,
        shares: u64,
        min_asset_out: u64,
        min_vusd_out: u64,
    ) -> Result<Withdrawal> {
        let slot = Clock::get()?.slot;
        let payout = withdraw(
            &mut self.pool,
            &mut self.position,
            shares,
            min_asset_out,
            min_vusd_out,
            slot,
        )?;

        let asset = self.pool.asset;
        let bump = [self.pool.bump];
        let pool_seeds: &[&[u8]] = &[Pool::SEED, asset.as_ref(), &bump];

        transfer_tokens(
            self.token_program.to_account_info(),
            &self.asset_mint,
            self.vault.to_account_info(),
            self.recipient_asset.to_account_info(),
            self.pool.to_account_info(),
            payout.asset_out,
            &[pool_seeds],
        )?;

        mint_vusd(
            self.token_program.to_account_info(),
            self.vusd_mint.to_account_info(),
            self.recipient_vusd.to_account_info(),
            &self.config,
            payout.vusd_out,
        )?;

        msg!(
            "Removed {} shares from {}: {} asset, {} vUSD",
            shares,
            asset,
            payout.asset_out,
            payout.vusd_out
        );

        emit!(LiquidityRemoved {
            asset,
            owner: self.owner.key(),
            shares,
            asset_out: payout.asset_out,
            vusd_out: payout.vusd_out,
            total_shares: self.pool.total_shares,
        });

        Ok(payout)
    }
}
