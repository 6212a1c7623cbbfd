//! Instruction construction for the token-sale program.
//!
//! One builder per protocol operation. Each returns a fully-resolved
//! [`Instruction`] whose account list and order match exactly what the
//! deployed program expects; the order is a private wire contract, and a
//! reordered list produces an invalid or unintended transaction rather
//! than a parse error. Argument payloads are a single tag byte followed by
//! little-endian u64 fields in declared order.
//!
//! Builders validate structural preconditions only (nonzero amounts).
//! Business rules (inventory, price bounds, authority) belong to the
//! on-chain program and surface as opaque rejections at submission time.

use crate::address::Pubkey;
use crate::constants::{
    ASSOCIATED_TOKEN_PROGRAM_ID, RENT_SYSVAR_ID, SALE_MINT, SALE_PROGRAM_ID, SYSTEM_PROGRAM_ID,
    TOKEN_PROGRAM_ID,
};
use crate::error::SaleError;
use crate::price::Rate;

/// Instruction tag bytes, fixed by the deployed program.
pub const TAG_INITIALIZE: u8 = 0;
pub const TAG_BUY: u8 = 1;
pub const TAG_WITHDRAW: u8 = 2;
pub const TAG_DEPOSIT: u8 = 3;
pub const TAG_UPDATE_RATE: u8 = 4;

/// A single account reference in an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn writable(pubkey: Pubkey, is_signer: bool) -> Self {
        AccountMeta {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    pub fn readonly(pubkey: Pubkey, is_signer: bool) -> Self {
        AccountMeta {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

/// A fully-resolved instruction: program, ordered accounts, opaque payload.
/// Constructed once, never mutated, submitted by value.
#[derive(Debug, Clone)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

/// The derived addresses every sale operation touches.
///
/// Resolved once per operation from the fixed seeds; carried together so
/// error context can name them when a submission fails.
#[derive(Debug, Clone, Copy)]
pub struct SaleAddresses {
    pub sale_state: Pubkey,
    pub program_vault: Pubkey,
}

impl SaleAddresses {
    /// Derive both sale PDAs for the fixed protocol mint.
    pub fn derive() -> Result<Self, SaleError> {
        let (sale_state, _) = crate::pda::sale_state_address()?;
        let (program_vault, _) = crate::pda::program_vault_address(&SALE_MINT)?;
        Ok(SaleAddresses {
            sale_state,
            program_vault,
        })
    }
}

fn encode_args(tag: u8, args: &[u64]) -> Vec<u8> {
    let mut data = Vec::with_capacity(1 + 8 * args.len());
    data.push(tag);
    for arg in args {
        data.extend_from_slice(&arg.to_le_bytes());
    }
    data
}

fn require_nonzero(amount: u64, what: &str) -> Result<(), SaleError> {
    if amount == 0 {
        return Err(SaleError::InvalidArgument(format!("{what} must be > 0")));
    }
    Ok(())
}

/// Build the "initialize sale" instruction.
///
/// Creates the sale-state PDA and the program token vault, then moves
/// `initial_deposit` token base units from the admin's token account into
/// the vault.
pub fn initialize(
    admin: &Pubkey,
    admin_token_account: &Pubkey,
    addresses: &SaleAddresses,
    rate: Rate,
    initial_deposit: u64,
) -> Result<Instruction, SaleError> {
    require_nonzero(initial_deposit, "initial deposit")?;

    Ok(Instruction {
        program_id: SALE_PROGRAM_ID,
        accounts: vec![
            AccountMeta::writable(*admin, true),
            AccountMeta::readonly(SALE_MINT, false),
            AccountMeta::writable(*admin_token_account, false),
            AccountMeta::writable(addresses.program_vault, false),
            AccountMeta::writable(addresses.sale_state, false),
            AccountMeta::readonly(TOKEN_PROGRAM_ID, false),
            AccountMeta::readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::readonly(RENT_SYSVAR_ID, false),
        ],
        data: encode_args(TAG_INITIALIZE, &[rate.get(), initial_deposit]),
    })
}

/// Build the "buy with SOL" instruction for `lamports` base units.
///
/// The admin signs alongside the buyer. That is the deployed program's
/// access-control model for purchases; it is unusual for a public sale but
/// must be reproduced exactly.
pub fn buy(
    admin: &Pubkey,
    buyer: &Pubkey,
    buyer_token_account: &Pubkey,
    addresses: &SaleAddresses,
    lamports: u64,
) -> Result<Instruction, SaleError> {
    require_nonzero(lamports, "purchase amount")?;

    Ok(Instruction {
        program_id: SALE_PROGRAM_ID,
        accounts: vec![
            AccountMeta::writable(*admin, true),
            AccountMeta::writable(*buyer, true),
            AccountMeta::writable(*buyer_token_account, false),
            AccountMeta::writable(addresses.program_vault, false),
            AccountMeta::writable(addresses.sale_state, false),
            AccountMeta::readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::readonly(TOKEN_PROGRAM_ID, false),
        ],
        data: encode_args(TAG_BUY, &[lamports]),
    })
}

/// Build the "withdraw tokens" instruction: vault → admin token account.
pub fn withdraw(
    admin: &Pubkey,
    admin_token_account: &Pubkey,
    addresses: &SaleAddresses,
    amount: u64,
) -> Result<Instruction, SaleError> {
    require_nonzero(amount, "withdraw amount")?;

    Ok(Instruction {
        program_id: SALE_PROGRAM_ID,
        accounts: admin_vault_accounts(admin, admin_token_account, addresses),
        data: encode_args(TAG_WITHDRAW, &[amount]),
    })
}

/// Build the "deposit tokens" instruction: admin token account → vault.
pub fn deposit(
    admin: &Pubkey,
    admin_token_account: &Pubkey,
    addresses: &SaleAddresses,
    amount: u64,
) -> Result<Instruction, SaleError> {
    require_nonzero(amount, "deposit amount")?;

    Ok(Instruction {
        program_id: SALE_PROGRAM_ID,
        accounts: admin_vault_accounts(admin, admin_token_account, addresses),
        data: encode_args(TAG_DEPOSIT, &[amount]),
    })
}

// Withdraw and deposit address the same accounts in the same order.
fn admin_vault_accounts(
    admin: &Pubkey,
    admin_token_account: &Pubkey,
    addresses: &SaleAddresses,
) -> Vec<AccountMeta> {
    vec![
        AccountMeta::writable(*admin, true),
        AccountMeta::writable(*admin_token_account, false),
        AccountMeta::writable(addresses.program_vault, false),
        AccountMeta::writable(addresses.sale_state, false),
        AccountMeta::readonly(TOKEN_PROGRAM_ID, false),
    ]
}

/// Build the "update rate" instruction.
pub fn update_rate(
    admin: &Pubkey,
    addresses: &SaleAddresses,
    rate: Rate,
) -> Result<Instruction, SaleError> {
    Ok(Instruction {
        program_id: SALE_PROGRAM_ID,
        accounts: vec![
            AccountMeta::writable(*admin, true),
            AccountMeta::writable(addresses.sale_state, false),
        ],
        data: encode_args(TAG_UPDATE_RATE, &[rate.get()]),
    })
}

/// Build the associated-token-program `Create` instruction for the ATA of
/// `owner` + `mint`, funded by `payer`. The payload is empty; the program
/// derives and checks the address itself.
pub fn create_associated_token_account(
    payer: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
) -> Result<Instruction, SaleError> {
    let (ata, _) = crate::pda::associated_token_address(owner, mint)?;

    Ok(Instruction {
        program_id: ASSOCIATED_TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::writable(*payer, true),
            AccountMeta::writable(ata, false),
            AccountMeta::readonly(*owner, false),
            AccountMeta::readonly(*mint, false),
            AccountMeta::readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::readonly(TOKEN_PROGRAM_ID, false),
        ],
        data: Vec::new(),
    })
}
