//! # Swap Routing
//!
//! Every swap is one or two legs against vUSD:
//!
//! ```text
//!   asset A ──sell──▶ vUSD                       (Route::Sell)
//!   vUSD    ──buy───▶ asset B                    (Route::Buy)
//!   asset A ──sell──▶ vUSD ──buy──▶ asset B      (Route::Cross)
//! ```
//!
//! Each leg takes its own fee from its input. `execute` validates, quotes and
//! applies the whole plan to copies of the pools; instruction handlers only
//! write the copies back once every check has passed and tokens have moved.

use anchor_lang::prelude::*;

use crate::amm::fees::{FeeSchedule, FeeSplit};
use crate::amm::solvency::{book_inflow, book_outflow};
use crate::amm::virtual_curve::VirtualCurve;
use crate::errors::AmmError;
use crate::state::{Pool, PoolStatus};

/// Pools a swap goes through
#[derive(Clone, Copy, Debug)]
pub enum Route<'a> {
    /// Asset in, vUSD out
    Sell(&'a Pool),
    /// vUSD in, asset out
    Buy(&'a Pool),
    /// Asset in, another asset out
    Cross { sell: &'a Pool, buy: &'a Pool },
}

impl<'a> Route<'a> {
    fn validate(&self) -> Result<()> {
        match self {
            Route::Sell(pool) | Route::Buy(pool) => pool.ensure_tradable(),
            Route::Cross { sell, buy } => {
                require_keys_neq!(sell.asset, buy.asset, AmmError::SameAsset);
                sell.ensure_tradable()?;
                buy.ensure_tradable()
            }
        }
    }

    fn sell_pool(&self) -> Option<&'a Pool> {
        match *self {
            Route::Sell(pool) => Some(pool),
            Route::Cross { sell, .. } => Some(sell),
            Route::Buy(_) => None,
        }
    }

    fn buy_pool(&self) -> Option<&'a Pool> {
        match *self {
            Route::Buy(pool) => Some(pool),
            Route::Cross { buy, .. } => Some(buy),
            Route::Sell(_) => None,
        }
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapAmount {
    ExactIn { amount_in: u64, min_amount_out: u64 },
    ExactOut { amount_out: u64, max_amount_in: u64 },
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapRequest {
    pub amount: SwapAmount,
    /// Unix timestamp after which the swap is rejected
    pub deadline: i64,
}

/// When the swap executes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapClock {
    pub slot: u64,
    pub unix_timestamp: i64,
}

impl SwapClock {
    pub fn now() -> Result<Self> {
        let clock = Clock::get()?;
        Ok(Self {
            slot: clock.slot,
            unix_timestamp: clock.unix_timestamp,
        })
    }
}

/// Fully applied swap plan
#[derive(Clone, Debug, PartialEq)]
pub struct SwapOutcome {
    /// Gross input taken from the trader (asset or vUSD)
    pub amount_in: u64,
    /// Output delivered to the trader (vUSD or asset)
    pub amount_out: u64,
    /// vUSD paid out by the sell leg or paid into the buy leg
    pub vusd_routed: u64,
    /// Protocol fee of the sell leg, in the input asset
    pub sell_protocol_fee: u64,
    /// Protocol fee of the buy leg, in vUSD
    pub buy_protocol_fee: u64,
    /// Updated sell-side pool
    pub sold: Option<Pool>,
    /// Updated buy-side pool
    pub bought: Option<Pool>,
}

/// Validates, quotes and applies a swap.
pub fn execute(
    route: Route,
    request: SwapRequest,
    fees: FeeSchedule,
    clock: SwapClock,
) -> Result<SwapOutcome> {
    require!(clock.unix_timestamp <= request.deadline, AmmError::Expired);
    route.validate()?;

    match request.amount {
        SwapAmount::ExactIn {
            amount_in,
            min_amount_out,
        } => {
            require!(amount_in > 0, AmmError::ZeroAmount);
            let outcome = apply(route, amount_in, fees, clock.slot)?;
            require!(
                outcome.amount_out >= min_amount_out,
                AmmError::SlippageExceeded
            );
            Ok(outcome)
        }
        SwapAmount::ExactOut {
            amount_out,
            max_amount_in,
        } => {
            require!(amount_out > 0, AmmError::ZeroAmount);
            let amount_in = required_input(route, amount_out, fees)?;
            require!(amount_in <= max_amount_in, AmmError::SlippageExceeded);

            let outcome = apply(route, amount_in, fees, clock.slot)?;
            require!(
                outcome.amount_out >= amount_out,
                AmmError::SlippageExceeded
            );
            Ok(outcome)
        }
    }
}

/// Output of an exact-in swap, without applying it
pub fn quote_out(route: Route, amount_in: u64, fees: FeeSchedule) -> Result<u64> {
    route.validate()?;
    require!(amount_in > 0, AmmError::ZeroAmount);
    Ok(apply(route, amount_in, fees, 0)?.amount_out)
}

/// Gross input needed for an exact-out swap, without applying it
pub fn quote_in(route: Route, amount_out: u64, fees: FeeSchedule) -> Result<u64> {
    route.validate()?;
    require!(amount_out > 0, AmmError::ZeroAmount);
    required_input(route, amount_out, fees)
}

/// Walks the route backwards from the wanted output
fn required_input(route: Route, amount_out: u64, fees: FeeSchedule) -> Result<u64> {
    let vusd_needed = match route.buy_pool() {
        Some(pool) => {
            let net = VirtualCurve::buy_input_for(pool.price, pool.token_balance, amount_out)?;
            fees.gross_up(net)?
        }
        None => amount_out,
    };

    match route.sell_pool() {
        Some(pool) => {
            let net = VirtualCurve::sell_input_for(pool.price, pool.token_balance, vusd_needed)?;
            fees.gross_up(net)
        }
        None => Ok(vusd_needed),
    }
}

fn apply(route: Route, amount_in: u64, fees: FeeSchedule, slot: u64) -> Result<SwapOutcome> {
    let mut sell_protocol_fee = 0;
    let mut buy_protocol_fee = 0;

    let (vusd_routed, sold) = match route.sell_pool() {
        Some(pool) => {
            let split = fees.split(amount_in)?;
            let (vusd_out, pool) = sell_leg(pool, &split, slot)?;
            sell_protocol_fee = split.protocol_fee;
            (vusd_out, Some(pool))
        }
        None => (amount_in, None),
    };

    let (amount_out, bought) = match route.buy_pool() {
        Some(pool) => {
            let split = fees.split(vusd_routed)?;
            let (asset_out, pool) = buy_leg(pool, &split, slot)?;
            buy_protocol_fee = split.protocol_fee;
            (asset_out, Some(pool))
        }
        None => (vusd_routed, None),
    };

    Ok(SwapOutcome {
        amount_in,
        amount_out,
        vusd_routed,
        sell_protocol_fee,
        buy_protocol_fee,
        sold,
        bought,
    })
}

/// Asset in, vUSD out. The LP fee stays in the token balance.
///
/// A permissionlessly listed pool never goes into debt: it only pays out
/// vUSD it already holds as credit.
fn sell_leg(pool: &Pool, split: &FeeSplit, slot: u64) -> Result<(u64, Pool)> {
    let quote = VirtualCurve::sell(pool.price, pool.token_balance, split.net)?;
    if pool.status == PoolStatus::Listed {
        require!(
            quote.vusd_out <= pool.vusd_credit,
            AmmError::InsufficientLiquidity
        );
    }

    let mut next = pool.clone();
    next.token_balance = next
        .token_balance
        .checked_add(split.retained()?)
        .ok_or(AmmError::MathOverflow)?;
    next.price = quote.new_price;
    book_outflow(&mut next, quote.vusd_out)?;
    next.last_traded_slot = slot;

    Ok((quote.vusd_out, next))
}

/// vUSD in, asset out. The LP fee is booked as inflow with the rest.
fn buy_leg(pool: &Pool, split: &FeeSplit, slot: u64) -> Result<(u64, Pool)> {
    let quote = VirtualCurve::buy(pool.price, pool.token_balance, split.net)?;

    let mut next = pool.clone();
    next.token_balance = next
        .token_balance
        .checked_sub(quote.amount_out)
        .ok_or(AmmError::InsufficientLiquidity)?;
    next.price = quote.new_price;
    book_inflow(&mut next, split.retained()?)?;
    next.last_traded_slot = slot;

    Ok((quote.amount_out, next))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amm::fixed_point::WAD;
    use crate::state::{DEFAULT_FEE_RATE, DEFAULT_PROTOCOL_FEE_RATE};

    const UNIT: u64 = 1_000_000;
    const NOW: SwapClock = SwapClock {
        slot: 500_000,
        unix_timestamp: 1_700_000_000,
    };

    fn fees() -> FeeSchedule {
        FeeSchedule::new(DEFAULT_FEE_RATE, DEFAULT_PROTOCOL_FEE_RATE).unwrap()
    }

    fn pool(price: u128, balance: u64) -> Pool {
        let mut pool = Pool::official(Pubkey::new_unique(), 0, price, 255).unwrap();
        pool.token_balance = balance;
        pool
    }

    fn exact_in(amount_in: u64, min_amount_out: u64) -> SwapRequest {
        SwapRequest {
            amount: SwapAmount::ExactIn {
                amount_in,
                min_amount_out,
            },
            deadline: NOW.unix_timestamp,
        }
    }

    fn exact_out(amount_out: u64, max_amount_in: u64) -> SwapRequest {
        SwapRequest {
            amount: SwapAmount::ExactOut {
                amount_out,
                max_amount_in,
            },
            deadline: NOW.unix_timestamp,
        }
    }

    #[test]
    fn test_cross_swap_scenario() {
        let weth = pool(300 * WAD, 1_000_000 * UNIT);
        let dai = pool(WAD, 1_000_000 * UNIT);

        let outcome = execute(
            Route::Cross { sell: &weth, buy: &dai },
            exact_in(2 * UNIT, 550 * UNIT),
            fees(),
            NOW,
        )
        .unwrap();

        assert!(outcome.amount_out > 550 * UNIT && outcome.amount_out < 600 * UNIT);

        let weth_after = outcome.sold.unwrap();
        let dai_after = outcome.bought.unwrap();
        assert!(dai_after.price > WAD && dai_after.price < 2 * WAD);
        assert!(weth_after.price > 200 * WAD && weth_after.price < 300 * WAD);

        assert_eq!(weth_after.vusd_debt, outcome.vusd_routed);
        assert!(dai_after.vusd_credit > 0);
        assert_eq!(dai_after.vusd_debt, 0);
        assert_eq!(weth_after.last_traded_slot, NOW.slot);
        assert_eq!(dai_after.last_traded_slot, NOW.slot);

        // the protocol share never enters the pool
        assert_eq!(
            weth_after.token_balance,
            weth.token_balance + 2 * UNIT - outcome.sell_protocol_fee
        );
        assert_eq!(
            dai_after.vusd_credit + outcome.buy_protocol_fee,
            outcome.vusd_routed
        );
    }

    #[test]
    fn test_round_trip_loses_to_fees() {
        let weth = pool(300 * WAD, 1_000_000 * UNIT);
        let sold = execute(Route::Sell(&weth), exact_in(10 * UNIT, 0), fees(), NOW).unwrap();
        let weth = sold.sold.unwrap();

        let bought = execute(Route::Buy(&weth), exact_in(sold.amount_out, 0), fees(), NOW).unwrap();
        assert!(bought.amount_out < 10 * UNIT);

        let weth = bought.bought.unwrap();
        assert!(weth.vusd_debt == 0 || weth.vusd_credit == 0);
    }

    #[test]
    fn test_exact_out_delivers_at_least_the_request() {
        let weth = pool(300 * WAD, 1_000_000 * UNIT);
        let dai = pool(WAD, 1_000_000 * UNIT);
        let route = Route::Cross { sell: &weth, buy: &dai };

        let wanted = 500 * UNIT;
        let needed = quote_in(route, wanted, fees()).unwrap();
        let outcome = execute(route, exact_out(wanted, needed), fees(), NOW).unwrap();
        assert_eq!(outcome.amount_in, needed);
        assert!(outcome.amount_out >= wanted);

        assert_eq!(
            execute(route, exact_out(wanted, needed - 1), fees(), NOW).unwrap_err(),
            AmmError::SlippageExceeded.into()
        );
    }

    #[test]
    fn test_single_leg_exact_out() {
        let dai = pool(WAD, 1_000_000 * UNIT);

        let sell = execute(Route::Sell(&dai), exact_out(100 * UNIT, u64::MAX), fees(), NOW).unwrap();
        assert!(sell.amount_out >= 100 * UNIT);
        assert!(sell.bought.is_none());

        let buy = execute(Route::Buy(&dai), exact_out(100 * UNIT, u64::MAX), fees(), NOW).unwrap();
        assert!(buy.amount_out >= 100 * UNIT);
        assert!(buy.sold.is_none());
        assert_eq!(buy.vusd_routed, buy.amount_in);
    }

    #[test]
    fn test_quotes_match_execution() {
        let weth = pool(300 * WAD, 1_000_000 * UNIT);
        let dai = pool(WAD, 1_000_000 * UNIT);
        let route = Route::Cross { sell: &weth, buy: &dai };

        let quoted = quote_out(route, 2 * UNIT, fees()).unwrap();
        let outcome = execute(route, exact_in(2 * UNIT, quoted), fees(), NOW).unwrap();
        assert_eq!(outcome.amount_out, quoted);
    }

    #[test]
    fn test_rejections() {
        let weth = pool(300 * WAD, 1_000_000 * UNIT);
        let dai = pool(WAD, 1_000_000 * UNIT);
        let route = Route::Cross { sell: &weth, buy: &dai };

        let mut late = exact_in(2 * UNIT, 0);
        late.deadline = NOW.unix_timestamp - 1;
        assert_eq!(
            execute(route, late, fees(), NOW).unwrap_err(),
            AmmError::Expired.into()
        );

        assert_eq!(
            execute(Route::Cross { sell: &weth, buy: &weth }, exact_in(2 * UNIT, 0), fees(), NOW)
                .unwrap_err(),
            AmmError::SameAsset.into()
        );

        assert_eq!(
            execute(route, exact_in(0, 0), fees(), NOW).unwrap_err(),
            AmmError::ZeroAmount.into()
        );

        assert_eq!(
            execute(route, exact_in(2 * UNIT, 600 * UNIT), fees(), NOW).unwrap_err(),
            AmmError::SlippageExceeded.into()
        );

        let mut closed = dai.clone();
        closed.status = PoolStatus::Unlisted;
        assert_eq!(
            execute(Route::Cross { sell: &weth, buy: &closed }, exact_in(2 * UNIT, 0), fees(), NOW)
                .unwrap_err(),
            AmmError::PoolNotTradable.into()
        );

        let empty = pool(WAD, 0);
        assert_eq!(
            execute(Route::Sell(&empty), exact_in(UNIT, 0), fees(), NOW).unwrap_err(),
            AmmError::InsufficientLiquidity.into()
        );
    }

    #[test]
    fn test_listed_pool_pays_out_only_its_credit() {
        let dai = pool(WAD, 1_000_000 * UNIT);

        // nothing backs this price: no vUSD came in with the listing
        let junk = Pool::listed(Pubkey::new_unique(), 1, 1_000_000 * WAD, 10 * UNIT, 255).unwrap();
        assert_eq!(
            execute(Route::Cross { sell: &junk, buy: &dai }, exact_in(10 * UNIT, 0), fees(), NOW)
                .unwrap_err(),
            AmmError::InsufficientLiquidity.into()
        );
        assert_eq!(
            quote_out(Route::Sell(&junk), UNIT, fees()).unwrap_err(),
            AmmError::InsufficientLiquidity.into()
        );

        // with credit behind it, sales up to that credit go through
        let mut seeded = Pool::listed(Pubkey::new_unique(), 2, 20 * WAD, 50_000 * UNIT, 255).unwrap();
        book_inflow(&mut seeded, 1_000_000 * UNIT).unwrap();
        let outcome = execute(Route::Sell(&seeded), exact_in(1_000 * UNIT, 0), fees(), NOW).unwrap();
        let sold = outcome.sold.unwrap();
        assert_eq!(sold.vusd_debt, 0);
        assert_eq!(sold.vusd_credit, 1_000_000 * UNIT - outcome.amount_out);

        // the same listing promoted to official may borrow
        let mut official = junk.clone();
        official.status = PoolStatus::Official;
        execute(Route::Cross { sell: &official, buy: &dai }, exact_in(UNIT, 0), fees(), NOW).unwrap();
    }
}
