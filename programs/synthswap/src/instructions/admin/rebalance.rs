//! Debt/credit settlement
//!
//! A pool in debt is squared by the admin burning vUSD; a pool in credit
//! releases vUSD to the admin. Neither side changes price or balance.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::amm::{rebalance, RebalanceKind};
use crate::instructions::settlement::{burn_vusd, mint_vusd};
use crate::state::{Config, Pool};

#[event]
pub struct PoolRebalanced {
    pub asset: Pubkey,
    pub kind: RebalanceKind,
    pub amount: u64,
    pub vusd_debt: u64,
    pub vusd_credit: u64,
}

#[derive(Accounts)]
pub struct RebalancePool<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    #[account(
        mut,
        seeds = [Pool::SEED, pool.asset.as_ref()],
        bump = pool.bump,
    )]
    pub pool: Box<Account<'info, Pool>>,

    #[account(
        mut,
        address = config.vusd_mint,
    )]
    pub vusd_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        init_if_needed,
        payer = admin,
        associated_token::mint = vusd_mint,
        associated_token::authority = admin,
        associated_token::token_program = token_program,
    )]
    pub admin_vusd: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> RebalancePool<'info> {
    /// Returns the vUSD amount actually moved
    pub fn rebalance_pool(&mut self, amount: u64) -> Result<u64> {
        self.config.ensure_admin(&self.admin.key())?;
        self.pool.ensure_listed()?;

        let applied = rebalance(&mut self.pool, amount)?;

        match applied.kind {
            RebalanceKind::DebtRepaid => burn_vusd(
                self.token_program.to_account_info(),
                self.vusd_mint.to_account_info(),
                self.admin_vusd.to_account_info(),
                self.admin.to_account_info(),
                applied.amount,
            )?,
            RebalanceKind::CreditWithdrawn => mint_vusd(
                self.token_program.to_account_info(),
                self.vusd_mint.to_account_info(),
                self.admin_vusd.to_account_info(),
                &self.config,
                applied.amount,
            )?,
        }

        msg!(
            "Pool {} rebalanced: {:?} {}",
            self.pool.asset,
            applied.kind,
            applied.amount
        );

        emit!(PoolRebalanced {
            asset: self.pool.asset,
            kind: applied.kind,
            amount: applied.amount,
            vusd_debt: self.pool.vusd_debt,
            vusd_credit: self.pool.vusd_credit,
        });

        Ok(applied.amount)
    }
}
