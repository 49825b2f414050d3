//! Pool State
//!
//! Each listed asset has exactly one pool. The pool quotes the asset against
//! vUSD and keeps a ledger of the vUSD it has paid out or taken in.

use anchor_lang::prelude::*;

use crate::amm::fixed_point::{mul_div_floor, to_u128, U256, WAD};
use crate::errors::AmmError;

/// Slots that must pass after a trade before a pool can be repriced directly
pub const LOCK_WINDOW: u64 = 6_000;

/// Per-asset pool account
///
/// Seeds: ["pool", asset_mint]
#[account]
#[derive(InitSpace, Debug, Default, PartialEq)]
pub struct Pool {
    /// Mint of the traded asset (default key while the pool is not listed)
    pub asset: Pubkey,

    /// Sequential listing id
    pub id: u64,

    /// vUSD base units per asset base unit, WAD scaled
    pub price: u128,

    /// Asset base units held on behalf of liquidity providers
    pub token_balance: u64,

    /// Outstanding liquidity shares
    pub total_shares: u64,

    /// Listing status
    pub status: PoolStatus,

    /// vUSD paid out by this pool and not yet covered
    pub vusd_debt: u64,

    /// vUSD taken in by this pool and not yet withdrawn
    pub vusd_credit: u64,

    /// Last slot in which a trade moved this pool
    pub last_traded_slot: u64,

    /// PDA bump seed
    pub bump: u8,
}

impl Pool {
    pub const SEED: &'static [u8] = b"pool";

    /// Pool created by the admin with a caller-supplied price
    pub fn official(asset: Pubkey, id: u64, price: u128, bump: u8) -> Result<Self> {
        require!(price > 0, AmmError::InvalidPrice);
        Ok(Self {
            asset,
            id,
            price,
            status: PoolStatus::Official,
            bump,
            ..Default::default()
        })
    }

    /// Pool created by the permissionless listing flow, already seeded
    pub fn listed(asset: Pubkey, id: u64, price: u128, token_balance: u64, bump: u8) -> Result<Self> {
        require!(token_balance > 0, AmmError::InsufficientSeed);
        require!(price > 0, AmmError::InvalidPrice);
        Ok(Self {
            asset,
            id,
            price,
            token_balance,
            status: PoolStatus::Listed,
            bump,
            ..Default::default()
        })
    }

    pub fn is_listed(&self) -> bool {
        self.asset != Pubkey::default()
    }

    pub fn ensure_listed(&self) -> Result<()> {
        require!(self.is_listed(), AmmError::NoSuchPool);
        Ok(())
    }

    pub fn ensure_tradable(&self) -> Result<()> {
        self.ensure_listed()?;
        require!(self.status.is_tradable(), AmmError::PoolNotTradable);
        Ok(())
    }

    pub fn set_status(&mut self, status: PoolStatus) -> Result<()> {
        self.ensure_listed()?;
        self.status = status;
        Ok(())
    }

    /// Repricing is allowed once `LOCK_WINDOW` slots have passed since the
    /// pool last traded.
    pub fn ensure_price_unlocked(&self, now_slot: u64) -> Result<()> {
        let unlocks_at = self
            .last_traded_slot
            .checked_add(LOCK_WINDOW)
            .ok_or(AmmError::MathOverflow)?;
        require!(now_slot >= unlocks_at, AmmError::PriceUpdateLocked);
        Ok(())
    }

    /// Direct price override (admin path)
    pub fn override_price(&mut self, price: u128, now_slot: u64) -> Result<()> {
        self.ensure_listed()?;
        require!(price > 0, AmmError::InvalidPrice);
        self.ensure_price_unlocked(now_slot)?;
        self.price = price;
        Ok(())
    }

    /// Direct price override (price adjuster path), synthetic pools only
    pub fn adjust_synthetic_price(&mut self, price: u128, now_slot: u64) -> Result<()> {
        self.ensure_listed()?;
        require!(
            self.status == PoolStatus::Synthetic,
            AmmError::NotSyntheticPool
        );
        self.override_price(price, now_slot)
    }

    /// `price * token_balance` in vUSD base units
    pub fn nominal_value(&self) -> Result<u128> {
        let value = mul_div_floor(
            U256::from(self.price),
            U256::from(self.token_balance),
            U256::from(WAD),
        )?;
        to_u128(value)
    }

    pub fn is_flat(&self) -> bool {
        self.vusd_debt == 0 && self.vusd_credit == 0
    }

    /// Decodes the pool stored at a pool PDA. An address this program never
    /// wrote holds no pool.
    pub fn from_account(owner: &Pubkey, data: &[u8]) -> Result<Self> {
        require!(owner == &crate::ID && !data.is_empty(), AmmError::NoSuchPool);
        let pool = Self::try_deserialize(&mut &data[..])?;
        pool.ensure_listed()?;
        Ok(pool)
    }

    /// Loads the pool of `asset` from its PDA
    pub fn load(info: &AccountInfo, asset: &Pubkey) -> Result<Self> {
        let pool = Self::from_account(info.owner, &info.try_borrow_data()?[..])?;
        require_keys_eq!(pool.asset, *asset, AmmError::NoSuchPool);
        Ok(pool)
    }

    /// Writes `self` back over a pool loaded with `load`
    pub fn store(&self, info: &AccountInfo) -> Result<()> {
        let mut data = info.try_borrow_mut_data()?;
        let mut writer: &mut [u8] = &mut data[..];
        self.try_serialize(&mut writer)
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            asset: self.asset,
            id: self.id,
            price: self.price,
            token_balance: self.token_balance,
            total_shares: self.total_shares,
            status: self.status,
            vusd_debt: self.vusd_debt,
            vusd_credit: self.vusd_credit,
            last_traded_slot: self.last_traded_slot,
        }
    }
}

/// Pool listing status
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug, Default)]
pub enum PoolStatus {
    /// Known to the registry but closed for trading
    #[default]
    Unlisted,
    /// Listed permissionlessly
    Listed,
    /// Listed by the admin
    Official,
    /// Price maintained by price adjusters
    Synthetic,
}

impl PoolStatus {
    pub fn is_tradable(self) -> bool {
        matches!(self, Self::Listed | Self::Official | Self::Synthetic)
    }
}

/// Read-only view of a pool returned by `get_pool`
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq)]
pub struct PoolSnapshot {
    pub asset: Pubkey,
    pub id: u64,
    pub price: u128,
    pub token_balance: u64,
    pub total_shares: u64,
    pub status: PoolStatus,
    pub vusd_debt: u64,
    pub vusd_credit: u64,
    pub last_traded_slot: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRADED_AT: u64 = 250_000;

    fn traded_pool() -> Pool {
        let mut pool = Pool::official(Pubkey::new_unique(), 0, 300 * WAD, 255).unwrap();
        pool.last_traded_slot = TRADED_AT;
        pool
    }

    #[test]
    fn test_missing_pool_account() {
        let system = anchor_lang::system_program::ID;
        assert_eq!(
            Pool::from_account(&system, &[]).unwrap_err(),
            AmmError::NoSuchPool.into()
        );
        assert_eq!(
            Pool::from_account(&crate::ID, &[]).unwrap_err(),
            AmmError::NoSuchPool.into()
        );

        let pool = traded_pool();
        let mut data = Vec::new();
        pool.try_serialize(&mut data).unwrap();
        assert_eq!(
            Pool::from_account(&system, &data).unwrap_err(),
            AmmError::NoSuchPool.into()
        );
        assert_eq!(Pool::from_account(&crate::ID, &data).unwrap(), pool);

        // allocated but never listed
        let mut blank = Vec::new();
        Pool::default().try_serialize(&mut blank).unwrap();
        assert_eq!(
            Pool::from_account(&crate::ID, &blank).unwrap_err(),
            AmmError::NoSuchPool.into()
        );
    }

    #[test]
    fn test_official_requires_positive_price() {
        assert_eq!(
            Pool::official(Pubkey::new_unique(), 0, 0, 255).unwrap_err(),
            AmmError::InvalidPrice.into()
        );
    }

    #[test]
    fn test_listed_requires_seed() {
        assert_eq!(
            Pool::listed(Pubkey::new_unique(), 0, WAD, 0, 255).unwrap_err(),
            AmmError::InsufficientSeed.into()
        );
    }

    #[test]
    fn test_price_update_time_lock() {
        let mut pool = traded_pool();

        for elapsed in [0, 1, LOCK_WINDOW / 2, LOCK_WINDOW - 1] {
            assert_eq!(
                pool.override_price(250 * WAD, TRADED_AT + elapsed).unwrap_err(),
                AmmError::PriceUpdateLocked.into()
            );
        }
        assert_eq!(pool.price, 300 * WAD);

        pool.override_price(250 * WAD, TRADED_AT + LOCK_WINDOW + 1).unwrap();
        assert_eq!(pool.price, 250 * WAD);
    }

    #[test]
    fn test_adjuster_path_needs_synthetic_status() {
        let mut pool = traded_pool();
        let unlocked = TRADED_AT + LOCK_WINDOW + 1;

        assert_eq!(
            pool.adjust_synthetic_price(2 * WAD, unlocked).unwrap_err(),
            AmmError::NotSyntheticPool.into()
        );

        pool.set_status(PoolStatus::Synthetic).unwrap();
        assert_eq!(
            pool.adjust_synthetic_price(2 * WAD, TRADED_AT + 10).unwrap_err(),
            AmmError::PriceUpdateLocked.into()
        );
        pool.adjust_synthetic_price(2 * WAD, unlocked).unwrap();
        assert_eq!(pool.price, 2 * WAD);
    }

    #[test]
    fn test_status_transitions() {
        let mut pool = traded_pool();
        pool.set_status(PoolStatus::Unlisted).unwrap();
        assert_eq!(pool.ensure_tradable().unwrap_err(), AmmError::PoolNotTradable.into());
        pool.set_status(PoolStatus::Listed).unwrap();
        assert!(pool.ensure_tradable().is_ok());

        let mut missing = Pool::default();
        assert_eq!(
            missing.set_status(PoolStatus::Official).unwrap_err(),
            AmmError::NoSuchPool.into()
        );
    }

    #[test]
    fn test_nominal_value() {
        let mut pool = traded_pool();
        pool.token_balance = 1_000_000;
        assert_eq!(pool.nominal_value().unwrap(), 300_000_000);
    }
}
