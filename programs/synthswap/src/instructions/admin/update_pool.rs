//! Admin pool maintenance: status changes and direct repricing.

use anchor_lang::prelude::*;

use crate::state::{Config, Pool, PoolStatus};

#[event]
pub struct PoolStatusUpdated {
    pub asset: Pubkey,
    pub previous: PoolStatus,
    pub status: PoolStatus,
}

#[event]
pub struct PoolPriceUpdated {
    pub asset: Pubkey,
    pub updated_by: Pubkey,
    pub previous_price: u128,
    pub price: u128,
}

#[derive(Accounts)]
#[instruction(asset: Pubkey)]
pub struct UpdatePool<'info> {
    pub admin: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    /// CHECK: may never have been created; decoded by `Pool::load`
    #[account(
        mut,
        seeds = [Pool::SEED, asset.as_ref()],
        bump,
    )]
    pub pool: UncheckedAccount<'info>,
}

impl<'info> UpdatePool<'info> {
    pub fn update_pool_status(&mut self, asset: Pubkey, status: PoolStatus) -> Result<()> {
        self.config.ensure_admin(&self.admin.key())?;

        let mut pool = Pool::load(&self.pool, &asset)?;
        let previous = pool.status;
        pool.set_status(status)?;
        pool.store(&self.pool)?;

        msg!("Pool {} status: {:?} -> {:?}", pool.asset, previous, status);

        emit!(PoolStatusUpdated {
            asset: pool.asset,
            previous,
            status,
        });

        Ok(())
    }

    pub fn update_pool_price(&mut self, asset: Pubkey, price: u128) -> Result<()> {
        self.config.ensure_admin(&self.admin.key())?;

        let mut pool = Pool::load(&self.pool, &asset)?;
        let previous_price = pool.price;
        pool.override_price(price, Clock::get()?.slot)?;
        pool.store(&self.pool)?;

        emit!(PoolPriceUpdated {
            asset: pool.asset,
            updated_by: self.admin.key(),
            previous_price,
            price,
        });

        Ok(())
    }
}
