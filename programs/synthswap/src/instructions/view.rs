//! Read-only queries, returned through Anchor return data.

use anchor_lang::prelude::*;

use crate::amm::{quote_in, quote_out, Route};
use crate::state::{Config, Pool, PoolSnapshot};

#[derive(Accounts)]
#[instruction(asset: Pubkey)]
pub struct GetPool<'info> {
    /// CHECK: may never have been created; decoded by `Pool::load`
    #[account(
        seeds = [Pool::SEED, asset.as_ref()],
        bump,
    )]
    pub pool: UncheckedAccount<'info>,
}

impl<'info> GetPool<'info> {
    pub fn get_pool(&self, asset: Pubkey) -> Result<PoolSnapshot> {
        Ok(Pool::load(&self.pool, &asset)?.snapshot())
    }
}

#[derive(Accounts)]
pub struct GetQuote<'info> {
    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    #[account(
        seeds = [Pool::SEED, pool_in.asset.as_ref()],
        bump = pool_in.bump,
    )]
    pub pool_in: Account<'info, Pool>,

    #[account(
        seeds = [Pool::SEED, pool_out.asset.as_ref()],
        bump = pool_out.bump,
    )]
    pub pool_out: Account<'info, Pool>,
}

impl<'info> GetQuote<'info> {
    fn route(&self) -> Route<'_> {
        Route::Cross {
            sell: &self.pool_in,
            buy: &self.pool_out,
        }
    }

    /// Output of swapping exactly `amount_in` of the input asset
    pub fn get_amount_out(&self, amount_in: u64) -> Result<u64> {
        quote_out(self.route(), amount_in, self.config.fee_schedule())
    }

    /// Input needed to receive exactly `amount_out` of the output asset
    pub fn get_amount_in(&self, amount_out: u64) -> Result<u64> {
        quote_in(self.route(), amount_out, self.config.fee_schedule())
    }
}
