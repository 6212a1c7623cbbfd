//! Fixed protocol constants.
//!
//! These identify the externally-deployed programs and accounts this client
//! talks to. They are part of the external contract, not configuration:
//! changing any of them targets a different deployment. Base58 decoding is
//! not possible in const context, so each constant carries its canonical
//! Base58 form in a comment and a round-trip test below.

use crate::address::Pubkey;

/// The deployed token-sale program: `4bLbF6LwTuiPY5V63A7v4N8Uabcawt2HpjfobrjknLhm`
pub const SALE_PROGRAM_ID: Pubkey = Pubkey::new([
    0x35, 0x5e, 0xf5, 0x8f, 0x60, 0x07, 0xda, 0x2c, 0xbb, 0x4a, 0x6d, 0xfe, 0x42, 0xcc, 0xeb,
    0xbb, 0xa7, 0x23, 0x16, 0xce, 0xf2, 0xd2, 0xc8, 0xc9, 0x98, 0xd2, 0x33, 0xd7, 0x6b, 0xe6,
    0x7b, 0x20,
]);

/// The sale token mint: `AvEt25pkz91AaJM1K2bGcCGvm1AzfELFkQgKQEFUQc7n`
pub const SALE_MINT: Pubkey = Pubkey::new([
    0x93, 0x5c, 0xa8, 0xb2, 0x28, 0x28, 0x4f, 0x02, 0xcf, 0xb8, 0xf6, 0x2d, 0xd4, 0x15, 0x3a,
    0x2a, 0x69, 0x76, 0xba, 0xa7, 0x0e, 0x27, 0x77, 0x4b, 0x13, 0x8b, 0x1a, 0x7d, 0x79, 0x63,
    0x15, 0x3d,
]);

/// SPL Token Program: `TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA`
pub const TOKEN_PROGRAM_ID: Pubkey = Pubkey::new([
    0x06, 0xdd, 0xf6, 0xe1, 0xd7, 0x65, 0xa1, 0x93, 0xd9, 0xcb, 0xe1, 0x46, 0xce, 0xeb, 0x79,
    0xac, 0x1c, 0xb4, 0x85, 0xed, 0x5f, 0x5b, 0x37, 0x91, 0x3a, 0x8c, 0xf5, 0x85, 0x7e, 0xff,
    0x00, 0xa9,
]);

/// Associated Token Account Program: `ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL`
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey = Pubkey::new([
    0x8c, 0x97, 0x25, 0x8f, 0x4e, 0x24, 0x89, 0xf1, 0xbb, 0x3d, 0x10, 0x29, 0x14, 0x8e, 0x0d,
    0x83, 0x0b, 0x5a, 0x13, 0x99, 0xda, 0xff, 0x10, 0x84, 0x04, 0x8e, 0x7b, 0xd8, 0xdb, 0xe9,
    0xf8, 0x59,
]);

/// The System Program: 32 zero bytes, Base58 `11111111111111111111111111111111`
pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey::new([0u8; 32]);

/// Rent sysvar: `SysvarRent111111111111111111111111111111111`
pub const RENT_SYSVAR_ID: Pubkey = Pubkey::new([
    0x06, 0xa7, 0xd5, 0x17, 0x19, 0x2c, 0x5c, 0x51, 0x21, 0x8c, 0xc9, 0x4c, 0x3d, 0x4a, 0xf1,
    0x7f, 0x58, 0xda, 0xee, 0x08, 0x9b, 0xa1, 0xfd, 0x44, 0xe3, 0xdb, 0xd9, 0x8a, 0x00, 0x00,
    0x00, 0x00,
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sale_program_id_roundtrip() {
        assert_eq!(
            SALE_PROGRAM_ID.to_base58(),
            "4bLbF6LwTuiPY5V63A7v4N8Uabcawt2HpjfobrjknLhm"
        );
    }

    #[test]
    fn sale_mint_roundtrip() {
        assert_eq!(
            SALE_MINT.to_base58(),
            "AvEt25pkz91AaJM1K2bGcCGvm1AzfELFkQgKQEFUQc7n"
        );
    }

    #[test]
    fn token_program_id_roundtrip() {
        assert_eq!(
            TOKEN_PROGRAM_ID.to_base58(),
            "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA"
        );
    }

    #[test]
    fn associated_token_program_id_roundtrip() {
        assert_eq!(
            ASSOCIATED_TOKEN_PROGRAM_ID.to_base58(),
            "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL"
        );
    }

    #[test]
    fn system_program_id_roundtrip() {
        assert_eq!(
            SYSTEM_PROGRAM_ID.to_base58(),
            "11111111111111111111111111111111"
        );
    }

    #[test]
    fn rent_sysvar_roundtrip() {
        assert_eq!(
            RENT_SYSVAR_ID.to_base58(),
            "SysvarRent111111111111111111111111111111111"
        );
    }
}
