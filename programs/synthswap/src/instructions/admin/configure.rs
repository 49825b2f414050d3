//! Role and fee management
//!
//! All of these are admin only and only touch the config account.

use anchor_lang::prelude::*;

use crate::state::Config;

#[event]
pub struct PriceAdjusterUpdated {
    pub adjuster: Pubkey,
    pub enabled: bool,
}

#[event]
pub struct FeeRecipientUpdated {
    pub fee_recipient: Pubkey,
}

#[event]
pub struct FeesUpdated {
    pub fee_rate: u32,
    pub protocol_fee_rate: u32,
}

#[event]
pub struct AdminTransferred {
    pub previous_admin: Pubkey,
    pub new_admin: Pubkey,
}

#[derive(Accounts)]
pub struct Configure<'info> {
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,
}

impl<'info> Configure<'info> {
    pub fn add_price_adjuster(&mut self, adjuster: Pubkey) -> Result<()> {
        self.config.ensure_admin(&self.admin.key())?;
        if self.config.add_price_adjuster(adjuster)? {
            msg!("Price adjuster added: {}", adjuster);
            emit!(PriceAdjusterUpdated {
                adjuster,
                enabled: true,
            });
        }
        Ok(())
    }

    pub fn remove_price_adjuster(&mut self, adjuster: Pubkey) -> Result<()> {
        self.config.ensure_admin(&self.admin.key())?;
        if self.config.remove_price_adjuster(&adjuster) {
            msg!("Price adjuster removed: {}", adjuster);
            emit!(PriceAdjusterUpdated {
                adjuster,
                enabled: false,
            });
        }
        Ok(())
    }

    pub fn set_fee_recipient(&mut self, fee_recipient: Pubkey) -> Result<()> {
        self.config.ensure_admin(&self.admin.key())?;
        self.config.fee_recipient = fee_recipient;
        emit!(FeeRecipientUpdated { fee_recipient });
        Ok(())
    }

    pub fn set_fees(&mut self, fee_rate: u32, protocol_fee_rate: u32) -> Result<()> {
        self.config.ensure_admin(&self.admin.key())?;
        self.config.set_fees(fee_rate, protocol_fee_rate)?;

        msg!("Fees set to {} / {} (protocol)", fee_rate, protocol_fee_rate);
        emit!(FeesUpdated {
            fee_rate,
            protocol_fee_rate,
        });
        Ok(())
    }

    pub fn transfer_admin(&mut self, new_admin: Pubkey) -> Result<()> {
        self.config.ensure_admin(&self.admin.key())?;
        let previous_admin = self.config.admin;
        self.config.admin = new_admin;

        msg!("Admin transferred from {} to {}", previous_admin, new_admin);
        emit!(AdminTransferred {
            previous_admin,
            new_admin,
        });
        Ok(())
    }
}
