//! Protocol Initialization
//!
//! Creates the global configuration and the vUSD mint. The configuration
//! account is the mint authority, so vUSD can only be issued by the program.
//! This is called once during deployment.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenInterface};

use crate::amm::FeeSchedule;
use crate::state::Config;

/// vUSD base units per whole vUSD (6 decimals)
pub const VUSD_DECIMALS: u8 = 6;

/// Seed of the vUSD mint PDA
pub const VUSD_SEED: &[u8] = b"vusd";

/// Event emitted once the protocol is live
#[event]
pub struct ProtocolInitialized {
    pub admin: Pubkey,
    pub fee_recipient: Pubkey,
    pub vusd_mint: Pubkey,
    pub fee_rate: u32,
    pub protocol_fee_rate: u32,
}

/// Accounts required for protocol initialization
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Protocol administrator (becomes the admin)
    #[account(mut)]
    pub admin: Signer<'info>,

    /// Global configuration account (created)
    #[account(
        init,
        payer = admin,
        space = 8 + Config::INIT_SPACE,
        seeds = [Config::SEED],
        bump,
    )]
    pub config: Account<'info, Config>,

    /// Synthetic USD mint (created, authority = config)
    #[account(
        init,
        payer = admin,
        mint::decimals = VUSD_DECIMALS,
        mint::authority = config,
        seeds = [VUSD_SEED],
        bump,
    )]
    pub vusd_mint: InterfaceAccount<'info, Mint>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

impl<'info> Initialize<'info> {
    pub fn initialize(
        &mut self,
        fee_recipient: Pubkey,
        fee_rate: u32,
        protocol_fee_rate: u32,
        bumps: &InitializeBumps,
    ) -> Result<()> {
        let fees = FeeSchedule::new(fee_rate, protocol_fee_rate)?;

        self.config.set_inner(Config {
            admin: self.admin.key(),
            fee_recipient,
            vusd_mint: self.vusd_mint.key(),
            fee_rate: fees.fee_rate,
            protocol_fee_rate: fees.protocol_fee_rate,
            price_adjusters: Vec::new(),
            pool_count: 0,
            bump: bumps.config,
        });

        msg!("Protocol initialized!");
        msg!("Admin: {}", self.admin.key());
        msg!("vUSD mint: {}", self.vusd_mint.key());
        msg!("Fee: {} / {} (protocol)", fee_rate, protocol_fee_rate);

        emit!(ProtocolInitialized {
            admin: self.admin.key(),
            fee_recipient,
            vusd_mint: self.vusd_mint.key(),
            fee_rate,
            protocol_fee_rate,
        });

        Ok(())
    }
}
