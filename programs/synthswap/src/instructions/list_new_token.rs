//! Permissionless Listing
//!
//! Anyone can open a pool for an asset that has none by seeding it with
//! tokens. The opening price is either given directly or implied by a vUSD
//! seed:
//!
//! ```text
//! synthetic_amount > 0:  price = synthetic_amount / token_amount
//!                        (the vUSD is burned and becomes pool credit)
//! otherwise:             price = price_hint
//! ```
//!
//! The whole seed is credited to `provider` as the pool's first shares.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::amm::fixed_point::{mul_div_floor, to_u128, U256, WAD};
use crate::amm::seed_listing;
use crate::errors::AmmError;
use crate::instructions::settlement::{burn_vusd, transfer_tokens};
use crate::state::{Config, LiquidityPosition, Pool};

/// Event emitted when a pool is opened by the listing flow
#[event]
pub struct NewTokenListed {
    pub pool_id: u64,
    pub asset: Pubkey,
    pub lister: Pubkey,
    pub provider: Pubkey,
    pub price: u128,
    pub token_amount: u64,
    pub synthetic_amount: u64,
    pub shares: u64,
}

#[derive(Accounts)]
#[instruction(token_amount: u64, price_hint: u128, synthetic_amount: u64, provider: Pubkey)]
pub struct ListNewToken<'info> {
    #[account(mut)]
    pub lister: Signer<'info>,

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

    #[account(
        init_if_needed,
        payer = lister,
        space = 8 + Pool::INIT_SPACE,
        seeds = [Pool::SEED, asset_mint.key().as_ref()],
        bump,
    )]
    pub pool: Box<Account<'info, Pool>>,

    #[account(
        init_if_needed,
        payer = lister,
        associated_token::mint = asset_mint,
        associated_token::authority = pool,
        associated_token::token_program = token_program,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = lister,
        space = 8 + LiquidityPosition::INIT_SPACE,
        seeds = [LiquidityPosition::SEED, asset_mint.key().as_ref(), provider.as_ref()],
        bump,
    )]
    pub position: Box<Account<'info, LiquidityPosition>>,

    /// Lister's source of the token seed
    #[account(
        mut,
        token::mint = asset_mint,
        token::authority = lister,
    )]
    pub lister_asset: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        address = config.vusd_mint,
    )]
    pub vusd_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Only needed when listing with a vUSD seed
    #[account(
        mut,
        token::mint = vusd_mint,
        token::authority = lister,
    )]
    pub lister_vusd: Option<Box<InterfaceAccount<'info, TokenAccount>>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> ListNewToken<'info> {
    pub fn list_new_token(
        &mut self,
        token_amount: u64,
        price_hint: u128,
        synthetic_amount: u64,
        provider: Pubkey,
        bumps: &ListNewTokenBumps,
    ) -> Result<u64> {
        require!(!self.pool.is_listed(), AmmError::AlreadyListed);
        require!(token_amount > 0, AmmError::InsufficientSeed);

        let price = if synthetic_amount > 0 {
            to_u128(mul_div_floor(
                U256::from(synthetic_amount),
                U256::from(WAD),
                U256::from(token_amount),
            )?)?
        } else {
            price_hint
        };

        let asset = self.asset_mint.key();
        let slot = Clock::get()?.slot;
        let mut pool = Pool::listed(asset, self.config.pool_count, price, token_amount, bumps.pool)?;
        let mut position = LiquidityPosition::new(provider, asset, bumps.position);
        let shares = seed_listing(&mut pool, &mut position, synthetic_amount, slot)?;

        transfer_tokens(
            self.token_program.to_account_info(),
            &self.asset_mint,
            self.lister_asset.to_account_info(),
            self.vault.to_account_info(),
            self.lister.to_account_info(),
            token_amount,
            &[],
        )?;

        if synthetic_amount > 0 {
            let lister_vusd = self
                .lister_vusd
                .as_ref()
                .ok_or(anchor_lang::error::ErrorCode::AccountNotEnoughKeys)?;
            burn_vusd(
                self.token_program.to_account_info(),
                self.vusd_mint.to_account_info(),
                lister_vusd.to_account_info(),
                self.lister.to_account_info(),
                synthetic_amount,
            )?;
        }

        let pool_id = self.config.next_pool_id()?;
        self.pool.set_inner(pool);
        self.position.set_inner(position);

        msg!("Pool #{} listed for {} at price {}", pool_id, asset, price);

        emit!(NewTokenListed {
            pool_id,
            asset,
            lister: self.lister.key(),
            provider,
            price,
            token_amount,
            synthetic_amount,
            shares,
        });

        Ok(shares)
    }
}
