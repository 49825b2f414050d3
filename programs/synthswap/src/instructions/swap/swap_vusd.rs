//! Single-Leg Swaps Against vUSD
//!
//! Selling an asset mints vUSD to the recipient; buying an asset burns the
//! trader's vUSD. The buy leg's protocol fee is moved to the fee recipient
//! instead of being burned.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::amm::{execute, Route, SwapAmount, SwapClock, SwapOutcome, SwapRequest};
use crate::errors::AmmError;
use crate::instructions::settlement::{burn_vusd, mint_vusd, transfer_tokens};
use crate::instructions::{SwapResult, Swapped};
use crate::state::{Config, Pool};

/// Direction of a vUSD swap
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VusdSide {
    /// Asset in, vUSD out
    Sell,
    /// vUSD in, asset out
    Buy,
}

#[derive(Accounts)]
pub struct SwapVusd<'info> {
    pub trader: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    #[account(address = pool.asset)]
    pub asset_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        seeds = [Pool::SEED, pool.asset.as_ref()],
        bump = pool.bump,
    )]
    pub pool: Box<Account<'info, Pool>>,

    #[account(
        mut,
        associated_token::mint = asset_mint,
        associated_token::authority = pool,
        associated_token::token_program = token_program,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Asset source when selling, destination when buying
    #[account(
        mut,
        token::mint = asset_mint,
    )]
    pub asset_account: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        address = config.vusd_mint,
    )]
    pub vusd_mint: Box<InterfaceAccount<'info, Mint>>,

    /// vUSD destination when selling, source when buying
    #[account(
        mut,
        token::mint = vusd_mint,
    )]
    pub vusd_account: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = asset_mint,
        token::authority = config.fee_recipient,
    )]
    pub fee_recipient_asset: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = vusd_mint,
        token::authority = config.fee_recipient,
    )]
    pub fee_recipient_vusd: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> SwapVusd<'info> {
    pub fn swap(&mut self, side: VusdSide, amount: SwapAmount, deadline: i64) -> Result<SwapResult> {
        let route = match side {
            VusdSide::Sell => Route::Sell(&self.pool),
            VusdSide::Buy => Route::Buy(&self.pool),
        };
        let outcome = execute(
            route,
            SwapRequest { amount, deadline },
            self.config.fee_schedule(),
            SwapClock::now()?,
        )?;

        match side {
            VusdSide::Sell => self.settle_sell(&outcome)?,
            VusdSide::Buy => self.settle_buy(&outcome)?,
        }

        let (mint_in, mint_out) = match side {
            VusdSide::Sell => (self.asset_mint.key(), self.vusd_mint.key()),
            VusdSide::Buy => (self.vusd_mint.key(), self.asset_mint.key()),
        };

        msg!(
            "Swapped {} {} for {} {}",
            outcome.amount_in,
            mint_in,
            outcome.amount_out,
            mint_out
        );

        emit!(Swapped {
            trader: self.trader.key(),
            mint_in,
            mint_out,
            amount_in: outcome.amount_in,
            amount_out: outcome.amount_out,
            vusd_routed: outcome.vusd_routed,
            sell_protocol_fee: outcome.sell_protocol_fee,
            buy_protocol_fee: outcome.buy_protocol_fee,
        });

        Ok(SwapResult::from(&outcome))
    }

    fn settle_sell(&mut self, outcome: &SwapOutcome) -> Result<()> {
        let to_pool = outcome
            .amount_in
            .checked_sub(outcome.sell_protocol_fee)
            .ok_or(AmmError::MathUnderflow)?;

        transfer_tokens(
            self.token_program.to_account_info(),
            &self.asset_mint,
            self.asset_account.to_account_info(),
            self.vault.to_account_info(),
            self.trader.to_account_info(),
            to_pool,
            &[],
        )?;
        transfer_tokens(
            self.token_program.to_account_info(),
            &self.asset_mint,
            self.asset_account.to_account_info(),
            self.fee_recipient_asset.to_account_info(),
            self.trader.to_account_info(),
            outcome.sell_protocol_fee,
            &[],
        )?;
        mint_vusd(
            self.token_program.to_account_info(),
            self.vusd_mint.to_account_info(),
            self.vusd_account.to_account_info(),
            &self.config,
            outcome.amount_out,
        )?;

        if let Some(sold) = &outcome.sold {
            self.pool.set_inner(sold.clone());
        }
        Ok(())
    }

    fn settle_buy(&mut self, outcome: &SwapOutcome) -> Result<()> {
        let burned = outcome
            .amount_in
            .checked_sub(outcome.buy_protocol_fee)
            .ok_or(AmmError::MathUnderflow)?;

        burn_vusd(
            self.token_program.to_account_info(),
            self.vusd_mint.to_account_info(),
            self.vusd_account.to_account_info(),
            self.trader.to_account_info(),
            burned,
        )?;
        transfer_tokens(
            self.token_program.to_account_info(),
            &self.vusd_mint,
            self.vusd_account.to_account_info(),
            self.fee_recipient_vusd.to_account_info(),
            self.trader.to_account_info(),
            outcome.buy_protocol_fee,
            &[],
        )?;

        let asset = self.pool.asset;
        let bump = [self.pool.bump];
        let pool_seeds: &[&[u8]] = &[Pool::SEED, asset.as_ref(), &bump];

        transfer_tokens(
            self.token_program.to_account_info(),
            &self.asset_mint,
            self.vault.to_account_info(),
            self.asset_account.to_account_info(),
            self.pool.to_account_info(),
            outcome.amount_out,
            &[pool_seeds],
        )?;

        if let Some(bought) = &outcome.bought {
            self.pool.set_inner(bought.clone());
        }
        Ok(())
    }
}
