//! End-to-end engine scenarios: listings, deposits, swaps routed through
//! vUSD, rebalancing and the timing guards, driven through the pure API.

use anchor_lang::prelude::*;

use synthswap::amm::{
    deposit, execute, rebalance, seed_listing, withdraw, FeeSchedule, RebalanceKind, Route,
    SwapAmount, SwapClock, SwapOutcome, SwapRequest, WAD,
};
use synthswap::errors::AmmError;
use synthswap::state::{
    LiquidityPosition, Pool, PoolStatus, DEFAULT_FEE_RATE, DEFAULT_PROTOCOL_FEE_RATE,
    LIQUIDITY_LOCK, LOCK_WINDOW,
};

const UNIT: u64 = 1_000_000;
const START_SLOT: u64 = 1_000;
const DEADLINE: i64 = 2_000_000_000;

fn fees() -> FeeSchedule {
    FeeSchedule::new(DEFAULT_FEE_RATE, DEFAULT_PROTOCOL_FEE_RATE).unwrap()
}

fn clock(slot: u64) -> SwapClock {
    SwapClock {
        slot,
        unix_timestamp: 1_700_000_000,
    }
}

fn exact_in(amount_in: u64) -> SwapRequest {
    SwapRequest {
        amount: SwapAmount::ExactIn {
            amount_in,
            min_amount_out: 0,
        },
        deadline: DEADLINE,
    }
}

fn official(price: u128) -> Pool {
    Pool::official(Pubkey::new_unique(), 0, price, 255).unwrap()
}

fn position(pool: &Pool) -> LiquidityPosition {
    LiquidityPosition::new(Pubkey::new_unique(), pool.asset, 254)
}

/// Two official pools (WETH at 300, DAI at 1), each seeded with 1,000,000 units
struct Market {
    weth: Pool,
    dai: Pool,
    weth_lp: LiquidityPosition,
    dai_lp: LiquidityPosition,
    slot: u64,
}

impl Market {
    fn new() -> Self {
        let mut weth = official(300 * WAD);
        let mut dai = official(WAD);
        let mut weth_lp = position(&weth);
        let mut dai_lp = position(&dai);
        deposit(weth_lp.owner, &mut weth, &mut weth_lp, 1_000_000 * UNIT, START_SLOT).unwrap();
        deposit(dai_lp.owner, &mut dai, &mut dai_lp, 1_000_000 * UNIT, START_SLOT).unwrap();
        Self {
            weth,
            dai,
            weth_lp,
            dai_lp,
            slot: START_SLOT,
        }
    }

    fn next_slot(&mut self) -> u64 {
        self.slot += 1;
        self.slot
    }

    /// Cross swap, writing both pools back
    fn swap(&mut self, weth_to_dai: bool, amount_in: u64) -> SwapOutcome {
        let slot = self.next_slot();
        let route = if weth_to_dai {
            Route::Cross {
                sell: &self.weth,
                buy: &self.dai,
            }
        } else {
            Route::Cross {
                sell: &self.dai,
                buy: &self.weth,
            }
        };
        let outcome = execute(route, exact_in(amount_in), fees(), clock(slot)).unwrap();

        let (sold, bought) = (outcome.sold.clone().unwrap(), outcome.bought.clone().unwrap());
        if weth_to_dai {
            self.weth = sold;
            self.dai = bought;
        } else {
            self.dai = sold;
            self.weth = bought;
        }
        outcome
    }
}

fn exclusive(pool: &Pool) -> bool {
    pool.vusd_debt == 0 || pool.vusd_credit == 0
}

#[test]
fn test_bootstrap_keeps_price() {
    let mut pool = official(300 * WAD);
    let mut first = position(&pool);
    let mut second = position(&pool);

    deposit(first.owner, &mut pool, &mut first, 1_000_000 * UNIT, START_SLOT).unwrap();
    assert_eq!(pool.price, 300 * WAD);

    deposit(second.owner, &mut pool, &mut second, 1_000_000 * UNIT, START_SLOT + 1).unwrap();
    assert_eq!(pool.price, 300 * WAD);
    assert_eq!(first.shares, second.shares);
    assert_eq!(first.shares + second.shares, pool.total_shares);
}

#[test]
fn test_swap_two_weth_for_dai() {
    let mut market = Market::new();
    let outcome = market.swap(true, 2 * UNIT);

    assert!(outcome.amount_out > 550 * UNIT);
    assert!(outcome.amount_out < 600 * UNIT);
    assert!(market.dai.price > WAD && market.dai.price < 2 * WAD);
    assert!(market.weth.price > 200 * WAD && market.weth.price < 300 * WAD);

    // WETH paid out the routed vUSD, DAI took it in minus the protocol fee
    assert_eq!(market.weth.vusd_debt, outcome.vusd_routed);
    assert_eq!(
        market.dai.vusd_credit,
        outcome.vusd_routed - outcome.buy_protocol_fee
    );
}

#[test]
fn test_round_trip_through_vusd_loses_value() {
    let weth = {
        let mut pool = official(300 * WAD);
        let mut lp = position(&pool);
        deposit(lp.owner, &mut pool, &mut lp, 1_000_000 * UNIT, START_SLOT).unwrap();
        pool
    };

    let sold = execute(Route::Sell(&weth), exact_in(2 * UNIT), fees(), clock(START_SLOT + 1)).unwrap();
    let weth = sold.sold.unwrap();

    let bought = execute(
        Route::Buy(&weth),
        exact_in(sold.amount_out),
        fees(),
        clock(START_SLOT + 2),
    )
    .unwrap();
    assert!(bought.amount_out < 2 * UNIT);

    // the pool ends with more asset than it started with
    let weth_after = bought.bought.unwrap();
    assert!(weth_after.token_balance > 1_000_000 * UNIT);
}

#[test]
fn test_debt_and_credit_never_coexist() {
    let mut market = Market::new();
    let trades = [
        (true, 2 * UNIT),
        (false, 1_000 * UNIT),
        (false, 250 * UNIT),
        (true, 5 * UNIT),
        (true, UNIT / 3),
        (false, 4_000 * UNIT),
        (true, 9 * UNIT),
    ];

    for (weth_to_dai, amount) in trades {
        market.swap(weth_to_dai, amount);
        assert!(exclusive(&market.weth));
        assert!(exclusive(&market.dai));
    }
}

#[test]
fn test_rebalance_is_value_neutral() {
    let mut market = Market::new();
    market.swap(true, 10 * UNIT);
    market.swap(false, 700 * UNIT);

    for pool in [&mut market.weth, &mut market.dai] {
        let (price, balance, nominal) = (pool.price, pool.token_balance, pool.nominal_value().unwrap());
        let outstanding = pool.vusd_debt.max(pool.vusd_credit);
        let expected = if pool.vusd_debt > 0 {
            RebalanceKind::DebtRepaid
        } else {
            RebalanceKind::CreditWithdrawn
        };

        let applied = rebalance(pool, u64::MAX).unwrap();
        assert_eq!(applied.kind, expected);
        assert_eq!(applied.amount, outstanding);
        assert!(pool.is_flat());
        assert_eq!(pool.price, price);
        assert_eq!(pool.token_balance, balance);
        assert_eq!(pool.nominal_value().unwrap(), nominal);
    }
}

#[test]
fn test_price_update_waits_for_lock_window() {
    let mut market = Market::new();
    market.swap(true, 2 * UNIT);
    let traded_at = market.slot;
    assert_eq!(market.dai.last_traded_slot, traded_at);

    for slot in [traded_at, traded_at + 1, traded_at + LOCK_WINDOW - 1] {
        assert_eq!(
            market.dai.override_price(WAD, slot).unwrap_err(),
            AmmError::PriceUpdateLocked.into()
        );
    }
    market
        .dai
        .override_price(WAD, traded_at + LOCK_WINDOW + 1)
        .unwrap();
    assert_eq!(market.dai.price, WAD);
}

#[test]
fn test_synthetic_pool_repricing() {
    let mut market = Market::new();
    market.dai.set_status(PoolStatus::Synthetic).unwrap();
    market.swap(true, 2 * UNIT);
    let unlocked = market.slot + LOCK_WINDOW + 1;

    market.dai.adjust_synthetic_price(2 * WAD, unlocked).unwrap();
    assert_eq!(market.dai.price, 2 * WAD);

    // WETH is official, adjusters cannot touch it
    assert_eq!(
        market.weth.adjust_synthetic_price(2 * WAD, unlocked).unwrap_err(),
        AmmError::NotSyntheticPool.into()
    );
}

#[test]
fn test_shares_are_conserved() {
    let mut market = Market::new();
    let mut alice = position(&market.dai);
    let mut bob = position(&market.dai);

    let slot = market.next_slot();
    deposit(alice.owner, &mut market.dai, &mut alice, 50_000 * UNIT, slot).unwrap();
    market.swap(true, 3 * UNIT);
    let slot = market.next_slot();
    deposit(bob.owner, &mut market.dai, &mut bob, 125_000 * UNIT, slot).unwrap();
    market.swap(false, 2_000 * UNIT);

    let unlocked = market.slot + LIQUIDITY_LOCK;
    let half = alice.shares / 2;
    withdraw(&mut market.dai, &mut alice, half, 0, 0, unlocked).unwrap();
    let founder_shares = market.dai_lp.shares / 3;
    withdraw(&mut market.dai, &mut market.dai_lp, founder_shares, 0, 0, unlocked).unwrap();

    assert_eq!(
        market.dai_lp.shares + alice.shares + bob.shares,
        market.dai.total_shares
    );
    assert_eq!(market.weth_lp.shares, market.weth.total_shares);
}

#[test]
fn test_liquidity_guards_block_same_slot_round_trips() {
    let mut market = Market::new();
    let mut trader = position(&market.dai);

    // swap then add in the same slot
    market.swap(true, 100 * UNIT);
    let traded_at = market.slot;
    assert_eq!(
        deposit(trader.owner, &mut market.dai, &mut trader, 100_000 * UNIT, traded_at).unwrap_err(),
        AmmError::TradedThisSlot.into()
    );

    // add later, then try to pull out before the lock expires
    let added_at = traded_at + 1;
    deposit(trader.owner, &mut market.dai, &mut trader, 100_000 * UNIT, added_at).unwrap();
    let shares = trader.shares;
    assert_eq!(
        withdraw(&mut market.dai, &mut trader, shares, 0, 0, added_at + 1).unwrap_err(),
        AmmError::LiquidityLocked.into()
    );
    assert_eq!(
        withdraw(&mut market.dai, &mut trader, shares, 0, 0, added_at + LIQUIDITY_LOCK - 1)
            .unwrap_err(),
        AmmError::LiquidityLocked.into()
    );

    // a trade in the withdrawal slot blocks it as well
    let unlocked = added_at + LIQUIDITY_LOCK;
    market.dai.last_traded_slot = unlocked;
    assert_eq!(
        withdraw(&mut market.dai, &mut trader, shares, 0, 0, unlocked).unwrap_err(),
        AmmError::TradedThisSlot.into()
    );
}

#[test]
fn test_idle_deposit_returns_no_more_than_was_put_in() {
    let mut market = Market::new();
    market.swap(true, 20 * UNIT);
    market.swap(false, 5_000 * UNIT);

    let mut alice = position(&market.dai);
    let slot = market.next_slot();
    let deposited = 10_000 * UNIT;
    deposit(alice.owner, &mut market.dai, &mut alice, deposited, slot).unwrap();

    let shares = alice.shares;
    let payout = withdraw(&mut market.dai, &mut alice, shares, 0, 0, slot + LIQUIDITY_LOCK).unwrap();

    // value of what comes back, at the unchanged pool price
    let asset_value = payout.asset_out as u128 * market.dai.price / WAD;
    let deposit_value = deposited as u128 * market.dai.price / WAD;
    assert!(asset_value + payout.vusd_out as u128 <= deposit_value);
}

#[test]
fn test_swap_add_swap_remove_extracts_nothing() {
    let mut market = Market::new();
    let mut actor = position(&market.dai);
    let sold = 600_000 * UNIT;
    let deposited = 100_000 * UNIT;

    // dump DAI, add DAI at the depressed price, buy DAI back
    let first = market.swap(false, sold);
    let added_at = market.next_slot();
    deposit(actor.owner, &mut market.dai, &mut actor, deposited, added_at).unwrap();
    let second = market.swap(true, first.amount_out);

    // the actor's cut of the LP fee the buy-back paid into DAI
    let lp_fee = fees().split(second.vusd_routed).unwrap().lp_fee;
    let fee_share =
        lp_fee as u128 * actor.shares as u128 / market.dai.total_shares as u128;

    let shares = actor.shares;
    let payout = withdraw(
        &mut market.dai,
        &mut actor,
        shares,
        0,
        0,
        added_at + LIQUIDITY_LOCK,
    )
    .unwrap();

    // LP leg, valued at the withdrawal-time price
    let price = market.dai.price;
    let payout_value = payout.asset_out as u128 * price / WAD + payout.vusd_out as u128;
    let deposit_value = deposited as u128 * price / WAD;
    assert!(payout_value <= deposit_value + fee_share);

    // whole sequence: all WETH went back in, and less DAI came out than went in
    let dai_back = second.amount_out + payout.asset_out;
    assert!(dai_back < sold + deposited);
    assert!(exclusive(&market.dai));
}

#[test]
fn test_listed_pool_is_tradable_against_official_pools() {
    let mut market = Market::new();
    // 50,000 GEM seeded with 1,000,000 vUSD lists at 20
    let mut gem = Pool::listed(Pubkey::new_unique(), 2, 20 * WAD, 50_000 * UNIT, 253).unwrap();
    let mut lister = position(&gem);
    let shares = seed_listing(&mut gem, &mut lister, 1_000_000 * UNIT, START_SLOT).unwrap();
    assert_eq!(shares, 2_000_000 * UNIT);

    let slot = market.next_slot();
    let outcome = execute(
        Route::Cross {
            sell: &gem,
            buy: &market.dai,
        },
        exact_in(UNIT),
        fees(),
        clock(slot),
    )
    .unwrap();

    // roughly 20 DAI for one unit, less two legs of fees
    assert!(outcome.amount_out > 19 * UNIT);
    assert!(outcome.amount_out < 20 * UNIT);
}

#[test]
fn test_unbacked_listing_cannot_drain_official_pools() {
    let mut market = Market::new();

    // ten units listed at a made-up price with no vUSD behind them
    let mut junk = Pool::listed(Pubkey::new_unique(), 3, 1_000_000 * WAD, 10 * UNIT, 252).unwrap();
    let mut lister = position(&junk);
    seed_listing(&mut junk, &mut lister, 0, START_SLOT).unwrap();

    let slot = market.next_slot();
    let err = execute(
        Route::Cross {
            sell: &junk,
            buy: &market.dai,
        },
        exact_in(10 * UNIT),
        fees(),
        clock(slot),
    )
    .unwrap_err();
    assert_eq!(err, AmmError::InsufficientLiquidity.into());

    let err = execute(Route::Sell(&junk), exact_in(UNIT), fees(), clock(slot)).unwrap_err();
    assert_eq!(err, AmmError::InsufficientLiquidity.into());
    assert_eq!(junk.vusd_debt, 0);
    assert_eq!(market.dai.token_balance, 1_000_000 * UNIT);
}
