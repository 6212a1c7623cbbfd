//! Read-snapshot decoding for on-ledger account data.
//!
//! The client never owns durable state; it decodes fresh snapshots of the
//! program's accounts on every query. Layouts are fixed-offset little-endian,
//! owned by the programs that write them.

use crate::address::Pubkey;
use crate::error::SaleError;

/// The sale program's configuration record, living at the sale-state PDA.
///
/// Layout: rate u64 | total_lamports_raised u64 | total_tokens_sold u64 |
/// token_balance u64 | admin [u8; 32] | initialized u8 — 65 bytes.
///
/// A snapshot is valid only at the moment it was fetched; it mutates with
/// every sale-affecting instruction and must never be cached across calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleState {
    /// Sale-token base units per lamport.
    pub rate: u64,
    /// Lamports received from purchases since initialization.
    pub total_lamports_raised: u64,
    /// Sale-token base units sold since initialization.
    pub total_tokens_sold: u64,
    /// Sale-token base units remaining in the program vault.
    pub token_balance: u64,
    /// The administrative wallet recorded at initialization.
    pub admin: Pubkey,
    pub initialized: bool,
}

const SALE_STATE_LEN: usize = 65;

impl SaleState {
    pub fn decode(data: &[u8]) -> Result<Self, SaleError> {
        if data.len() < SALE_STATE_LEN {
            return Err(SaleError::StateDecodeError(format!(
                "sale state: {} bytes, need {SALE_STATE_LEN}",
                data.len()
            )));
        }

        let u64_at = |off: usize| u64::from_le_bytes(data[off..off + 8].try_into().unwrap());
        let mut admin = [0u8; 32];
        admin.copy_from_slice(&data[32..64]);

        Ok(SaleState {
            rate: u64_at(0),
            total_lamports_raised: u64_at(8),
            total_tokens_sold: u64_at(16),
            token_balance: u64_at(24),
            admin: Pubkey::new(admin),
            initialized: data[64] != 0,
        })
    }
}

/// A snapshot of an SPL token account: who holds how much of which mint.
///
/// SPL layout: mint at 0..32, owner at 32..64, amount u64 LE at 64..72.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAccount {
    /// The account's own address (the derived ATA for resolver results).
    pub address: Pubkey,
    pub mint: Pubkey,
    pub owner: Pubkey,
    /// Balance in token base units.
    pub amount: u64,
}

const TOKEN_ACCOUNT_MIN_LEN: usize = 72;

impl TokenAccount {
    pub fn decode(address: Pubkey, data: &[u8]) -> Result<Self, SaleError> {
        if data.len() < TOKEN_ACCOUNT_MIN_LEN {
            return Err(SaleError::StateDecodeError(format!(
                "token account {address}: {} bytes, need {TOKEN_ACCOUNT_MIN_LEN}",
                data.len()
            )));
        }

        let mut mint = [0u8; 32];
        mint.copy_from_slice(&data[0..32]);
        let mut owner = [0u8; 32];
        owner.copy_from_slice(&data[32..64]);

        Ok(TokenAccount {
            address,
            mint: Pubkey::new(mint),
            owner: Pubkey::new(owner),
            amount: u64::from_le_bytes(data[64..72].try_into().unwrap()),
        })
    }
}

/// Offset of the decimals byte in an SPL mint account:
/// mint_authority COption (36) + supply u64 (8).
const MINT_DECIMALS_OFFSET: usize = 44;

/// Extract the decimal precision from raw SPL mint account data.
pub fn mint_decimals(data: &[u8]) -> Result<u8, SaleError> {
    if data.len() <= MINT_DECIMALS_OFFSET {
        return Err(SaleError::StateDecodeError(format!(
            "mint account: {} bytes, decimals at offset {MINT_DECIMALS_OFFSET}",
            data.len()
        )));
    }
    Ok(data[MINT_DECIMALS_OFFSET])
}
