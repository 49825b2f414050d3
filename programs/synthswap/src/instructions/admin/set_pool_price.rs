//! Price adjuster repricing of synthetic pools.

use anchor_lang::prelude::*;

use crate::instructions::PoolPriceUpdated;
use crate::state::{Config, Pool};

#[derive(Accounts)]
pub struct SetPoolPrice<'info> {
    pub price_adjuster: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [Pool::SEED, pool.asset.as_ref()],
        bump = pool.bump,
    )]
    pub pool: Account<'info, Pool>,
}

impl<'info> SetPoolPrice<'info> {
    pub fn set_pool_price(&mut self, price: u128) -> Result<()> {
        self.config.ensure_price_adjuster(&self.price_adjuster.key())?;

        let previous_price = self.pool.price;
        self.pool.adjust_synthetic_price(price, Clock::get()?.slot)?;

        emit!(PoolPriceUpdated {
            asset: self.pool.asset,
            updated_by: self.price_adjuster.key(),
            previous_price,
            price,
        });

        Ok(())
    }
}
