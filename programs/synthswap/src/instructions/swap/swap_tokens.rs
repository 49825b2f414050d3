//! Asset-to-Asset Swaps
//!
//! A cross swap sells the input asset into its pool for vUSD and immediately
//! buys the output asset with it. The routed vUSD is never minted; only the
//! buy leg's protocol fee is issued, to the fee recipient.
//!
//! ```text
//! trader_in ──(amount_in - fee)──▶ vault_in          fee ──▶ fee_recipient_in
//! vault_out ──(amount_out)───────▶ recipient_out     vUSD fee ──▶ fee_recipient_vusd
//! ```
//!
//! Native SOL variants wrap lamports into the trader's wSOL account before
//! settling, or close the trader's wSOL account afterwards.

use anchor_lang::prelude::*;
use anchor_spl::token::spl_token::native_mint;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::amm::{execute, Route, SwapAmount, SwapClock, SwapOutcome, SwapRequest};
use crate::errors::AmmError;
use crate::instructions::settlement::{mint_vusd, transfer_tokens, unwrap_sol, wrap_sol};
use crate::state::{Config, Pool};

/// Emitted by every swap instruction
#[event]
pub struct Swapped {
    pub trader: Pubkey,
    /// Input mint (the vUSD mint when buying with vUSD)
    pub mint_in: Pubkey,
    /// Output mint (the vUSD mint when selling for vUSD)
    pub mint_out: Pubkey,
    pub amount_in: u64,
    pub amount_out: u64,
    pub vusd_routed: u64,
    pub sell_protocol_fee: u64,
    pub buy_protocol_fee: u64,
}

/// Amounts returned to the caller of a swap instruction
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapResult {
    pub amount_in: u64,
    pub amount_out: u64,
}

impl From<&SwapOutcome> for SwapResult {
    fn from(outcome: &SwapOutcome) -> Self {
        Self {
            amount_in: outcome.amount_in,
            amount_out: outcome.amount_out,
        }
    }
}

/// How native SOL takes part in a swap
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NativeSol {
    None,
    /// Lamports are wrapped into `trader_in` first
    WrapInput,
    /// `recipient_out` is the trader's wSOL account and is closed afterwards
    UnwrapOutput,
}

#[derive(Accounts)]
pub struct SwapTokens<'info> {
    #[account(mut)]
    pub trader: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    #[account(address = pool_in.asset)]
    pub mint_in: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        address = pool_out.asset,
        constraint = mint_out.key() != mint_in.key() @ AmmError::SameAsset,
    )]
    pub mint_out: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        seeds = [Pool::SEED, pool_in.asset.as_ref()],
        bump = pool_in.bump,
    )]
    pub pool_in: Box<Account<'info, Pool>>,

    #[account(
        mut,
        seeds = [Pool::SEED, pool_out.asset.as_ref()],
        bump = pool_out.bump,
    )]
    pub pool_out: Box<Account<'info, Pool>>,

    #[account(
        mut,
        associated_token::mint = mint_in,
        associated_token::authority = pool_in,
        associated_token::token_program = token_program,
    )]
    pub vault_in: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = mint_out,
        associated_token::authority = pool_out,
        associated_token::token_program = token_program,
    )]
    pub vault_out: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = mint_in,
        token::authority = trader,
    )]
    pub trader_in: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = mint_out,
    )]
    pub recipient_out: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = mint_in,
        token::authority = config.fee_recipient,
    )]
    pub fee_recipient_in: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        address = config.vusd_mint,
    )]
    pub vusd_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        token::mint = vusd_mint,
        token::authority = config.fee_recipient,
    )]
    pub fee_recipient_vusd: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

impl<'info> SwapTokens<'info> {
    pub fn swap(
        &mut self,
        amount: SwapAmount,
        deadline: i64,
        native: NativeSol,
    ) -> Result<SwapResult> {
        match native {
            NativeSol::WrapInput => {
                require_keys_eq!(self.mint_in.key(), native_mint::ID, AmmError::NotNativeMint)
            }
            NativeSol::UnwrapOutput => {
                require_keys_eq!(self.mint_out.key(), native_mint::ID, AmmError::NotNativeMint);
                require_keys_eq!(
                    self.recipient_out.owner,
                    self.trader.key(),
                    AmmError::Unauthorized
                );
            }
            NativeSol::None => {}
        }

        let outcome = execute(
            Route::Cross {
                sell: &self.pool_in,
                buy: &self.pool_out,
            },
            SwapRequest { amount, deadline },
            self.config.fee_schedule(),
            SwapClock::now()?,
        )?;

        if native == NativeSol::WrapInput {
            wrap_sol(
                self.system_program.to_account_info(),
                self.token_program.to_account_info(),
                self.trader.to_account_info(),
                self.trader_in.to_account_info(),
                outcome.amount_in,
            )?;
        }

        self.settle(&outcome)?;

        if native == NativeSol::UnwrapOutput {
            unwrap_sol(
                self.token_program.to_account_info(),
                self.recipient_out.to_account_info(),
                self.trader.to_account_info(),
            )?;
        }

        msg!(
            "Swapped {} {} for {} {}",
            outcome.amount_in,
            self.mint_in.key(),
            outcome.amount_out,
            self.mint_out.key()
        );

        emit!(Swapped {
            trader: self.trader.key(),
            mint_in: self.mint_in.key(),
            mint_out: self.mint_out.key(),
            amount_in: outcome.amount_in,
            amount_out: outcome.amount_out,
            vusd_routed: outcome.vusd_routed,
            sell_protocol_fee: outcome.sell_protocol_fee,
            buy_protocol_fee: outcome.buy_protocol_fee,
        });

        Ok(SwapResult::from(&outcome))
    }

    fn settle(&mut self, outcome: &SwapOutcome) -> Result<()> {
        let to_pool = outcome
            .amount_in
            .checked_sub(outcome.sell_protocol_fee)
            .ok_or(AmmError::MathUnderflow)?;

        transfer_tokens(
            self.token_program.to_account_info(),
            &self.mint_in,
            self.trader_in.to_account_info(),
            self.vault_in.to_account_info(),
            self.trader.to_account_info(),
            to_pool,
            &[],
        )?;
        transfer_tokens(
            self.token_program.to_account_info(),
            &self.mint_in,
            self.trader_in.to_account_info(),
            self.fee_recipient_in.to_account_info(),
            self.trader.to_account_info(),
            outcome.sell_protocol_fee,
            &[],
        )?;

        let asset_out = self.pool_out.asset;
        let bump = [self.pool_out.bump];
        let pool_seeds: &[&[u8]] = &[Pool::SEED, asset_out.as_ref(), &bump];

        transfer_tokens(
            self.token_program.to_account_info(),
            &self.mint_out,
            self.vault_out.to_account_info(),
            self.recipient_out.to_account_info(),
            self.pool_out.to_account_info(),
            outcome.amount_out,
            &[pool_seeds],
        )?;

        mint_vusd(
            self.token_program.to_account_info(),
            self.vusd_mint.to_account_info(),
            self.fee_recipient_vusd.to_account_info(),
            &self.config,
            outcome.buy_protocol_fee,
        )?;

        if let Some(sold) = &outcome.sold {
            self.pool_in.set_inner(sold.clone());
        }
        if let Some(bought) = &outcome.bought {
            self.pool_out.set_inner(bought.clone());
        }

        Ok(())
    }
}
