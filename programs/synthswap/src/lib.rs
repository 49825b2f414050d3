//! # Synthswap: Single-Sided Pools Against a Synthetic Dollar
//!
//! An AMM in which every asset trades against one synthetic unit, vUSD,
//! instead of against another asset.
//!
//! ## Overview
//!
//! - Each listed asset has one pool holding only that asset.
//! - Pools price their asset on a virtual constant-product curve against a
//!   notional vUSD reserve, so liquidity is provided single-sided.
//! - Asset-to-asset swaps route through vUSD in one instruction.
//! - vUSD minted or burned by a pool is tracked as that pool's debt or
//!   credit until the admin rebalances it.
//!

use anchor_lang::prelude::*;

pub mod amm;
pub mod errors;
pub mod instructions;
pub mod state;

pub use instructions::*;

use amm::{SwapAmount, Withdrawal};
use state::{PoolSnapshot, PoolStatus};

// Replace with your deployed program ID
declare_id!("6Z1mepewFJZ8MwLWxAELmdDomRfNxEpXBtpKR85jAUde");

#[program]
pub mod synthswap {
    use super::*;

    /// Initialize config and the vUSD mint
    pub fn initialize(
        ctx: Context<Initialize>,
        fee_recipient: Pubkey,
        fee_rate: u32,
        protocol_fee_rate: u32,
    ) -> Result<()> {
        ctx.accounts
            .initialize(fee_recipient, fee_rate, protocol_fee_rate, &ctx.bumps)
    }

    // ------------------------------------------------------------------
    // Pool registry
    // ------------------------------------------------------------------

    /// List an asset at an admin-chosen price
    pub fn add_official_token(ctx: Context<AddOfficialToken>, initial_price: u128) -> Result<()> {
        ctx.accounts.add_official_token(initial_price, &ctx.bumps)
    }

    /// List an asset permissionlessly by seeding its pool
    pub fn list_new_token(
        ctx: Context<ListNewToken>,
        token_amount: u64,
        price_hint: u128,
        synthetic_amount: u64,
        provider: Pubkey,
    ) -> Result<u64> {
        ctx.accounts.list_new_token(
            token_amount,
            price_hint,
            synthetic_amount,
            provider,
            &ctx.bumps,
        )
    }

    pub fn update_pool_status(
        ctx: Context<UpdatePool>,
        asset: Pubkey,
        status: PoolStatus,
    ) -> Result<()> {
        ctx.accounts.update_pool_status(asset, status)
    }

    pub fn update_pool_price(ctx: Context<UpdatePool>, asset: Pubkey, price: u128) -> Result<()> {
        ctx.accounts.update_pool_price(asset, price)
    }

    /// Reprice a synthetic pool (price adjusters only)
    pub fn set_pool_price(ctx: Context<SetPoolPrice>, price: u128) -> Result<()> {
        ctx.accounts.set_pool_price(price)
    }

    pub fn add_price_adjuster(ctx: Context<Configure>, adjuster: Pubkey) -> Result<()> {
        ctx.accounts.add_price_adjuster(adjuster)
    }

    pub fn remove_price_adjuster(ctx: Context<Configure>, adjuster: Pubkey) -> Result<()> {
        ctx.accounts.remove_price_adjuster(adjuster)
    }

    pub fn set_fee_recipient(ctx: Context<Configure>, fee_recipient: Pubkey) -> Result<()> {
        ctx.accounts.set_fee_recipient(fee_recipient)
    }

    pub fn set_fees(ctx: Context<Configure>, fee_rate: u32, protocol_fee_rate: u32) -> Result<()> {
        ctx.accounts.set_fees(fee_rate, protocol_fee_rate)
    }

    pub fn transfer_admin(ctx: Context<Configure>, new_admin: Pubkey) -> Result<()> {
        ctx.accounts.transfer_admin(new_admin)
    }

    // ------------------------------------------------------------------
    // Liquidity
    // ------------------------------------------------------------------

    /// Deposit the pool asset, crediting shares to `provider`
    pub fn add_liquidity(ctx: Context<AddLiquidity>, amount: u64, provider: Pubkey) -> Result<u64> {
        ctx.accounts.add_liquidity(amount, provider, &ctx.bumps)
    }

    /// Burn shares for asset (and vUSD when the pool holds credit)
    pub fn remove_liquidity(
        ctx: Context<RemoveLiquidity>,
        shares: u64,
        min_asset_out: u64,
        min_vusd_out: u64,
    ) -> Result<Withdrawal> {
        ctx.accounts
            .remove_liquidity(shares, min_asset_out, min_vusd_out)
    }

    /// Settle a pool's vUSD debt or credit against the admin
    pub fn rebalance_pool(ctx: Context<RebalancePool>, amount: u64) -> Result<u64> {
        ctx.accounts.rebalance_pool(amount)
    }

    // ------------------------------------------------------------------
    // Swaps
    // ------------------------------------------------------------------

    pub fn swap_exact_token_for_token(
        ctx: Context<SwapTokens>,
        amount_in: u64,
        min_amount_out: u64,
        deadline: i64,
    ) -> Result<SwapResult> {
        ctx.accounts.swap(
            SwapAmount::ExactIn { amount_in, min_amount_out },
            deadline,
            NativeSol::None,
        )
    }

    pub fn swap_token_for_exact_token(
        ctx: Context<SwapTokens>,
        amount_out: u64,
        max_amount_in: u64,
        deadline: i64,
    ) -> Result<SwapResult> {
        ctx.accounts.swap(
            SwapAmount::ExactOut { amount_out, max_amount_in },
            deadline,
            NativeSol::None,
        )
    }

    pub fn swap_exact_sol_for_token(
        ctx: Context<SwapTokens>,
        amount_in: u64,
        min_amount_out: u64,
        deadline: i64,
    ) -> Result<SwapResult> {
        ctx.accounts.swap(
            SwapAmount::ExactIn { amount_in, min_amount_out },
            deadline,
            NativeSol::WrapInput,
        )
    }

    pub fn swap_sol_for_exact_token(
        ctx: Context<SwapTokens>,
        amount_out: u64,
        max_amount_in: u64,
        deadline: i64,
    ) -> Result<SwapResult> {
        ctx.accounts.swap(
            SwapAmount::ExactOut { amount_out, max_amount_in },
            deadline,
            NativeSol::WrapInput,
        )
    }

    pub fn swap_exact_token_for_sol(
        ctx: Context<SwapTokens>,
        amount_in: u64,
        min_amount_out: u64,
        deadline: i64,
    ) -> Result<SwapResult> {
        ctx.accounts.swap(
            SwapAmount::ExactIn { amount_in, min_amount_out },
            deadline,
            NativeSol::UnwrapOutput,
        )
    }

    pub fn swap_token_for_exact_sol(
        ctx: Context<SwapTokens>,
        amount_out: u64,
        max_amount_in: u64,
        deadline: i64,
    ) -> Result<SwapResult> {
        ctx.accounts.swap(
            SwapAmount::ExactOut { amount_out, max_amount_in },
            deadline,
            NativeSol::UnwrapOutput,
        )
    }

    pub fn swap_exact_token_for_vusd(
        ctx: Context<SwapVusd>,
        amount_in: u64,
        min_amount_out: u64,
        deadline: i64,
    ) -> Result<SwapResult> {
        ctx.accounts.swap(
            VusdSide::Sell,
            SwapAmount::ExactIn { amount_in, min_amount_out },
            deadline,
        )
    }

    pub fn swap_token_for_exact_vusd(
        ctx: Context<SwapVusd>,
        amount_out: u64,
        max_amount_in: u64,
        deadline: i64,
    ) -> Result<SwapResult> {
        ctx.accounts.swap(
            VusdSide::Sell,
            SwapAmount::ExactOut { amount_out, max_amount_in },
            deadline,
        )
    }

    pub fn swap_exact_vusd_for_token(
        ctx: Context<SwapVusd>,
        amount_in: u64,
        min_amount_out: u64,
        deadline: i64,
    ) -> Result<SwapResult> {
        ctx.accounts.swap(
            VusdSide::Buy,
            SwapAmount::ExactIn { amount_in, min_amount_out },
            deadline,
        )
    }

    pub fn swap_vusd_for_exact_token(
        ctx: Context<SwapVusd>,
        amount_out: u64,
        max_amount_in: u64,
        deadline: i64,
    ) -> Result<SwapResult> {
        ctx.accounts.swap(
            VusdSide::Buy,
            SwapAmount::ExactOut { amount_out, max_amount_in },
            deadline,
        )
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    pub fn get_pool(ctx: Context<GetPool>, asset: Pubkey) -> Result<PoolSnapshot> {
        ctx.accounts.get_pool(asset)
    }

    pub fn get_amount_out(ctx: Context<GetQuote>, amount_in: u64) -> Result<u64> {
        ctx.accounts.get_amount_out(amount_in)
    }

    pub fn get_amount_in(ctx: Context<GetQuote>, amount_out: u64) -> Result<u64> {
        ctx.accounts.get_amount_in(amount_out)
    }
}
