//! Single-sided deposits
//!
//! Any signer can open a position for a `provider` with a first deposit.
//! Once the position holds shares only its owner can add to it, and each of
//! their deposits restarts the withdrawal lock.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::amm::deposit;
use crate::instructions::settlement::transfer_tokens;
use crate::state::{LiquidityPosition, Pool};

#[event]
pub struct LiquidityAdded {
    pub asset: Pubkey,
    pub depositor: Pubkey,
    pub provider: Pubkey,
    pub amount: u64,
    pub shares: u64,
    pub total_shares: u64,
}

#[derive(Accounts)]
#[instruction(amount: u64, provider: Pubkey)]
pub struct AddLiquidity<'info> {
    #[account(mut)]
    pub depositor: Signer<'info>,

    #[account(address = pool.asset)]
    pub asset_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        seeds = [Pool::SEED, asset_mint.key().as_ref()],
        bump = pool.bump,
    )]
    pub pool: Box<Account<'info, Pool>>,

    #[account(
        init_if_needed,
        payer = depositor,
        space = 8 + LiquidityPosition::INIT_SPACE,
        seeds = [LiquidityPosition::SEED, asset_mint.key().as_ref(), provider.as_ref()],
        bump,
    )]
    pub position: Box<Account<'info, LiquidityPosition>>,

    #[account(
        mut,
        token::mint = asset_mint,
        token::authority = depositor,
    )]
    pub depositor_asset: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = asset_mint,
        associated_token::authority = pool,
        associated_token::token_program = token_program,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> AddLiquidity<'info> {
    /// Returns the shares minted
    pub fn add_liquidity(
        &mut self,
        amount: u64,
        provider: Pubkey,
        bumps: &AddLiquidityBumps,
    ) -> Result<u64> {
        if !self.position.is_open() {
            self.position
                .set_inner(LiquidityPosition::new(provider, self.pool.asset, bumps.position));
        }

        let slot = Clock::get()?.slot;
        let shares = deposit(
            self.depositor.key(),
            &mut self.pool,
            &mut self.position,
            amount,
            slot,
        )?;

        transfer_tokens(
            self.token_program.to_account_info(),
            &self.asset_mint,
            self.depositor_asset.to_account_info(),
            self.vault.to_account_info(),
            self.depositor.to_account_info(),
            amount,
            &[],
        )?;

        emit!(LiquidityAdded {
            asset: self.pool.asset,
            depositor: self.depositor.key(),
            provider,
            amount,
            shares,
            total_shares: self.pool.total_shares,
        });

        Ok(shares)
    }
}
