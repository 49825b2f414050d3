//! # Liquidity Shares
//!
//! Providers deposit a single asset and receive shares of that asset's pool.
//!
//! ## Minting
//!
//! ```text
//! bootstrap:  shares = amount * price                       (vUSD value)
//! otherwise:  shares = amount * price * total_shares / base
//!             base   = max(price * balance, price * balance + credit - debt)
//! ```
//!
//! For a flat pool this is `amount / balance * total_shares`. A pool holding
//! credit charges newcomers for it, and a pool in debt never sells shares
//! below its nominal value.
//!
//! ## Burning
//!
//! With `f = shares / total_shares` the provider leaves with `f` of the
//! pool's equity, so the equity per remaining share is unchanged:
//!
//! ```text
//! credit:  asset f * balance,                       vUSD f * credit
//! debt:    asset f * (balance - debt / price),      debt stays in the pool
//! ```
//!
//! Deposits and withdrawals are refused in a slot in which the pool traded,
//! and a provider's shares stay locked for `LIQUIDITY_LOCK` slots after
//! their last deposit. Only the owner can top up a position that already
//! holds shares.

use anchor_lang::prelude::*;

use crate::amm::fixed_point::{checked_mul, checked_sub, mul_div_floor, to_u64, U256, WAD};
use crate::amm::solvency::{book_inflow, scaled_equity};
use crate::errors::AmmError;
use crate::state::{LiquidityPosition, Pool};

/// Shares minted for depositing `amount` of the pool asset
pub fn shares_for_deposit(pool: &Pool, amount: u64) -> Result<u64> {
    require!(pool.price > 0, AmmError::InvalidPrice);
    let value = checked_mul(U256::from(amount), U256::from(pool.price))?;

    if pool.total_shares == 0 {
        return to_u64(value / U256::from(WAD));
    }

    let nominal = checked_mul(U256::from(pool.price), U256::from(pool.token_balance))?;
    let base = match scaled_equity(pool)? {
        Some(equity) if equity > nominal => equity,
        _ => nominal,
    };
    require!(!base.is_zero(), AmmError::InsufficientLiquidity);

    to_u64(mul_div_floor(value, U256::from(pool.total_shares), base)?)
}

/// Deposits `amount` from `depositor` into `pool`, crediting `position`.
///
/// Anyone may fund an empty position; a position that holds shares only
/// takes deposits from its owner, since every deposit restarts its lock.
/// Returns the minted shares. Price is never touched.
pub fn deposit(
    depositor: Pubkey,
    pool: &mut Pool,
    position: &mut LiquidityPosition,
    amount: u64,
    now_slot: u64,
) -> Result<u64> {
    pool.ensure_tradable()?;
    require!(amount > 0, AmmError::ZeroAmount);
    require!(
        position.shares == 0 || depositor == position.owner,
        AmmError::Unauthorized
    );
    require!(pool.last_traded_slot != now_slot, AmmError::TradedThisSlot);

    let shares = shares_for_deposit(pool, amount)?;
    require!(shares > 0, AmmError::ZeroAmount);

    let token_balance = pool
        .token_balance
        .checked_add(amount)
        .ok_or(AmmError::MathOverflow)?;
    let total_shares = pool
        .total_shares
        .checked_add(shares)
        .ok_or(AmmError::MathOverflow)?;
    let held = position
        .shares
        .checked_add(shares)
        .ok_or(AmmError::MathOverflow)?;

    pool.token_balance = token_balance;
    pool.total_shares = total_shares;
    position.shares = held;
    position.last_added_slot = now_slot;

    Ok(shares)
}

/// Mints the first share batch of a freshly listed pool. Any vUSD supplied
/// by the lister is booked as pool credit and counted in the batch.
pub fn seed_listing(
    pool: &mut Pool,
    position: &mut LiquidityPosition,
    synthetic_amount: u64,
    now_slot: u64,
) -> Result<u64> {
    require!(pool.total_shares == 0, AmmError::AlreadyListed);
    require!(pool.token_balance > 0, AmmError::InsufficientSeed);

    book_inflow(pool, synthetic_amount)?;
    let equity = scaled_equity(pool)?.ok_or(AmmError::PoolUnderwater)?;
    let shares = to_u64(equity / U256::from(WAD))?;
    require!(shares > 0, AmmError::InsufficientSeed);

    pool.total_shares = shares;
    position.shares = position
        .shares
        .checked_add(shares)
        .ok_or(AmmError::MathOverflow)?;
    position.last_added_slot = now_slot;

    Ok(shares)
}

/// Payout for burning shares
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Withdrawal {
    pub shares: u64,
    pub asset_out: u64,
    pub vusd_out: u64,
}

pub fn quote_withdrawal(pool: &Pool, shares: u64) -> Result<Withdrawal> {
    require!(shares > 0, AmmError::ZeroAmount);
    require!(shares <= pool.total_shares, AmmError::InsufficientShares);

    let s = U256::from(shares);
    let total = U256::from(pool.total_shares);

    let (asset_out, vusd_out) = if pool.vusd_debt > 0 {
        require!(pool.price > 0, AmmError::InvalidPrice);
        let nominal = checked_mul(U256::from(pool.price), U256::from(pool.token_balance))?;
        let debt = checked_mul(U256::from(pool.vusd_debt), U256::from(WAD))?;
        require!(nominal > debt, AmmError::PoolUnderwater);

        // f * (balance - debt / price)
        let asset_out = mul_div_floor(
            checked_sub(nominal, debt)?,
            s,
            checked_mul(U256::from(pool.price), total)?,
        )?;
        (to_u64(asset_out)?, 0)
    } else {
        let asset_out = mul_div_floor(U256::from(pool.token_balance), s, total)?;
        let vusd_out = mul_div_floor(U256::from(pool.vusd_credit), s, total)?;
        (to_u64(asset_out)?, to_u64(vusd_out)?)
    };

    Ok(Withdrawal {
        shares,
        asset_out,
        vusd_out,
    })
}

/// Burns `shares` from `position` and releases the matching slice of the pool
pub fn withdraw(
    pool: &mut Pool,
    position: &mut LiquidityPosition,
    shares: u64,
    min_asset_out: u64,
    min_vusd_out: u64,
    now_slot: u64,
) -> Result<Withdrawal> {
    pool.ensure_listed()?;
    require!(shares > 0, AmmError::ZeroAmount);
    require!(shares <= position.shares, AmmError::InsufficientShares);
    position.ensure_unlocked(now_slot)?;
    require!(pool.last_traded_slot != now_slot, AmmError::TradedThisSlot);

    let payout = quote_withdrawal(pool, shares)?;
    require!(
        payout.asset_out >= min_asset_out && payout.vusd_out >= min_vusd_out,
        AmmError::SlippageExceeded
    );

    pool.token_balance = pool
        .token_balance
        .checked_sub(payout.asset_out)
        .ok_or(AmmError::MathUnderflow)?;
    pool.vusd_credit = pool
        .vusd_credit
        .checked_sub(payout.vusd_out)
        .ok_or(AmmError::MathUnderflow)?;
    pool.total_shares -= shares;
    position.shares -= shares;

    Ok(payout)
}
