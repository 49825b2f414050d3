//! Official Listing
//!
//! The admin opens a pool for an asset at a chosen price. The pool starts
//! empty; liquidity arrives through `add_liquidity`.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::errors::AmmError;
use crate::state::{Config, Pool};

/// Event emitted when the admin lists an asset
#[event]
pub struct OfficialTokenAdded {
    pub pool_id: u64,
    pub asset: Pubkey,
    pub price: u128,
}

#[derive(Accounts)]
pub struct AddOfficialToken<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    #[account(
        constraint = asset_mint.key() != config.vusd_mint @ AmmError::InvalidMint,
    )]
    pub asset_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Created on first listing; an existing pool is rejected in the handler
    #[account(
        init_if_needed,
        payer = admin,
        space = 8 + Pool::INIT_SPACE,
        seeds = [Pool::SEED, asset_mint.key().as_ref()],
        bump,
    )]
    pub pool: Box<Account<'info, Pool>>,

    #[account(
        init_if_needed,
        payer = admin,
        associated_token::mint = asset_mint,
        associated_token::authority = pool,
        associated_token::token_program = token_program,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> AddOfficialToken<'info> {
    pub fn add_official_token(
        &mut self,
        initial_price: u128,
        bumps: &AddOfficialTokenBumps,
    ) -> Result<()> {
        self.config.ensure_admin(&self.admin.key())?;
        require!(!self.pool.is_listed(), AmmError::AlreadyListed);

        let asset = self.asset_mint.key();
        let pool = Pool::official(asset, self.config.pool_count, initial_price, bumps.pool)?;
        let pool_id = self.config.next_pool_id()?;
        self.pool.set_inner(pool);

        msg!("Official pool #{} listed for {}", pool_id, asset);

        emit!(OfficialTokenAdded {
            pool_id,
            asset,
            price: initial_price,
        });

        Ok(())
    }
}
