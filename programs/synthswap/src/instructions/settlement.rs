//! Token movements shared by the instruction handlers
//!
//! Pool vaults are associated token accounts owned by the pool PDA, and the
//! config PDA is the vUSD mint authority. Zero amounts are skipped so callers
//! can pass fee legs through unconditionally.

use anchor_lang::prelude::*;
use anchor_lang::system_program;
use anchor_spl::token_interface::{
    burn, close_account, mint_to, sync_native, transfer_checked, Burn, CloseAccount, Mint,
    MintTo, SyncNative, TransferChecked,
};

use crate::state::Config;

/// Moves `amount` of `mint` between token accounts. `signer_seeds` is empty
/// when `authority` signed the transaction.
pub fn transfer_tokens<'info>(
    token_program: AccountInfo<'info>,
    mint: &InterfaceAccount<'info, Mint>,
    from: AccountInfo<'info>,
    to: AccountInfo<'info>,
    authority: AccountInfo<'info>,
    amount: u64,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    transfer_checked(
        CpiContext::new_with_signer(
            token_program,
            TransferChecked {
                from,
                mint: mint.to_account_info(),
                to,
                authority,
            },
            signer_seeds,
        ),
        amount,
        mint.decimals,
    )
}

/// Issues vUSD, signed by the config PDA
pub fn mint_vusd<'info>(
    token_program: AccountInfo<'info>,
    vusd_mint: AccountInfo<'info>,
    to: AccountInfo<'info>,
    config: &Account<'info, Config>,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    let bump = [config.bump];
    let config_seeds: &[&[u8]] = &[Config::SEED, &bump];

    mint_to(
        CpiContext::new_with_signer(
            token_program,
            MintTo {
                mint: vusd_mint,
                to,
                authority: config.to_account_info(),
            },
            &[config_seeds],
        ),
        amount,
    )
}

/// Destroys vUSD held by a signer
pub fn burn_vusd<'info>(
    token_program: AccountInfo<'info>,
    vusd_mint: AccountInfo<'info>,
    from: AccountInfo<'info>,
    authority: AccountInfo<'info>,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    burn(
        CpiContext::new(
            token_program,
            Burn {
                mint: vusd_mint,
                from,
                authority,
            },
        ),
        amount,
    )
}

/// Wraps lamports into an existing wSOL token account
pub fn wrap_sol<'info>(
    system_program: AccountInfo<'info>,
    token_program: AccountInfo<'info>,
    payer: AccountInfo<'info>,
    wsol_account: AccountInfo<'info>,
    lamports: u64,
) -> Result<()> {
    system_program::transfer(
        CpiContext::new(
            system_program,
            system_program::Transfer {
                from: payer,
                to: wsol_account.clone(),
            },
        ),
        lamports,
    )?;
    sync_native(CpiContext::new(
        token_program,
        SyncNative {
            account: wsol_account,
        },
    ))
}

/// Closes a wSOL token account, releasing its lamports to `owner`
pub fn unwrap_sol<'info>(
    token_program: AccountInfo<'info>,
    wsol_account: AccountInfo<'info>,
    owner: AccountInfo<'info>,
) -> Result<()> {
    close_account(CpiContext::new(
        token_program,
        CloseAccount {
            account: wsol_account,
            destination: owner.clone(),
            authority: owner,
        },
    ))
}
