//! Debt/credit ledger
//!
//! vUSD is minted on the far side of every sell and burned on the far side of
//! every buy, so a pool's token reserve alone does not say what it owes. Each
//! pool books its vUSD flows here:
//!
//! - outflow (vUSD leaves the pool): consumes credit first, then adds debt
//! - inflow (vUSD enters the pool): repays debt first, then adds credit
//!
//! Debt and credit are therefore never both non-zero. Only `rebalance` clears
//! them, and it does so without touching price or token balance.

use anchor_lang::prelude::*;

use crate::amm::fixed_point::{checked_add, checked_mul, U256, WAD};
use crate::errors::AmmError;
use crate::state::Pool;

pub fn book_outflow(pool: &mut Pool, amount: u64) -> Result<()> {
    if amount <= pool.vusd_credit {
        pool.vusd_credit -= amount;
    } else {
        let uncovered = amount - pool.vusd_credit;
        pool.vusd_credit = 0;
        pool.vusd_debt = pool
            .vusd_debt
            .checked_add(uncovered)
            .ok_or(AmmError::MathOverflow)?;
    }
    Ok(())
}

pub fn book_inflow(pool: &mut Pool, amount: u64) -> Result<()> {
    if amount <= pool.vusd_debt {
        pool.vusd_debt -= amount;
    } else {
        let surplus = amount - pool.vusd_debt;
        pool.vusd_debt = 0;
        pool.vusd_credit = pool
            .vusd_credit
            .checked_add(surplus)
            .ok_or(AmmError::MathOverflow)?;
    }
    Ok(())
}

/// `price * balance + (credit - debt) * WAD`, or `None` when debt exceeds
/// the pool's nominal value
pub fn scaled_equity(pool: &Pool) -> Result<Option<U256>> {
    let nominal = checked_mul(U256::from(pool.price), U256::from(pool.token_balance))?;
    let credit = checked_mul(U256::from(pool.vusd_credit), U256::from(WAD))?;
    let debt = checked_mul(U256::from(pool.vusd_debt), U256::from(WAD))?;

    let assets = checked_add(nominal, credit)?;
    Ok(assets.checked_sub(debt))
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum RebalanceKind {
    /// vUSD was burned from the rebalancer to cancel debt
    DebtRepaid,
    /// vUSD was minted to the rebalancer out of credit
    CreditWithdrawn,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rebalance {
    pub kind: RebalanceKind,
    pub amount: u64,
}

/// Moves up to `max_amount` vUSD into or out of the pool to shrink its debt
/// or credit. Price and token balance are left exactly as they were.
pub fn rebalance(pool: &mut Pool, max_amount: u64) -> Result<Rebalance> {
    require!(max_amount > 0, AmmError::ZeroAmount);

    if pool.vusd_debt > 0 {
        let amount = max_amount.min(pool.vusd_debt);
        pool.vusd_debt -= amount;
        Ok(Rebalance {
            kind: RebalanceKind::DebtRepaid,
            amount,
        })
    } else if pool.vusd_credit > 0 {
        let amount = max_amount.min(pool.vusd_credit);
        pool.vusd_credit -= amount;
        Ok(Rebalance {
            kind: RebalanceKind::CreditWithdrawn,
            amount,
        })
    } else {
        err!(AmmError::NothingToRebalance)
    }
}
