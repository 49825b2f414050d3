//! Error taxonomy shared by the engine and the instruction handlers.

use anchor_lang::prelude::*;

#[error_code]
pub enum AmmError {
    #[msg("Price must be strictly positive")]
    InvalidPrice,
    #[msg("Asset already has a pool")]
    AlreadyListed,
    #[msg("No pool exists for this asset")]
    NoSuchPool,
    #[msg("Pool is not open for trading")]
    PoolNotTradable,
    #[msg("Listing requires a non-zero token seed")]
    InsufficientSeed,
    #[msg("Slippage tolerance exceeded")]
    SlippageExceeded,
    #[msg("Transaction deadline has passed")]
    Expired,
    #[msg("Not enough liquidity shares")]
    InsufficientShares,
    #[msg("Pool price cannot be updated this soon after a trade")]
    PriceUpdateLocked,
    #[msg("Pool carries no debt or credit")]
    NothingToRebalance,
    #[msg("Caller is not authorized for this action")]
    Unauthorized,
    #[msg("Arithmetic overflow")]
    MathOverflow,
    #[msg("Arithmetic underflow")]
    MathUnderflow,
    #[msg("Amount must be greater than zero")]
    ZeroAmount,
    #[msg("Input and output asset are the same")]
    SameAsset,
    #[msg("Pool does not hold enough liquidity for this trade")]
    InsufficientLiquidity,
    #[msg("Pool debt exceeds its nominal value")]
    PoolUnderwater,
    #[msg("Liquidity is still locked after the last deposit")]
    LiquidityLocked,
    #[msg("Pool already traded in this slot")]
    TradedThisSlot,
    #[msg("Only synthetic pools can be priced by adjusters")]
    NotSyntheticPool,
    #[msg("Price adjuster set is full")]
    TooManyPriceAdjusters,
    #[msg("Fee configuration out of range")]
    InvalidFee,
    #[msg("Mint cannot be used for this pool")]
    InvalidMint,
    #[msg("Native SOL variant requires the wrapped SOL mint")]
    NotNativeMint,
}
