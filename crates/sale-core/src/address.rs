//! Ledger addresses.
//!
//! Solana addresses are Base58-encoded 32-byte values. Wallet addresses are
//! Ed25519 public keys; program-derived addresses are SHA-256 outputs forced
//! off the Ed25519 curve. Both share the same 32-byte representation, so a
//! single `Pubkey` type covers them.

use std::fmt;
use std::str::FromStr;

use crate::error::SaleError;

/// A 32-byte ledger address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pubkey(pub(crate) [u8; 32]);

impl Pubkey {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Pubkey(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; 32] {
        self.0
    }

    /// Decode a Base58 address string into a `Pubkey`.
    ///
    /// Fails if the string is not valid Base58 or does not decode to exactly
    /// 32 bytes.
    pub fn from_base58(address: &str) -> Result<Self, SaleError> {
        let bytes = bs58::decode(address)
            .into_vec()
            .map_err(|e| SaleError::InvalidAddress(format!("base58 decode failed: {e}")))?;

        let arr: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
            SaleError::InvalidAddress(format!("expected 32 bytes, got {}", v.len()))
        })?;

        Ok(Pubkey(arr))
    }

    /// Encode as the canonical Base58 address string.
    pub fn to_base58(&self) -> String {
        bs58::encode(&self.0).into_string()
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl FromStr for Pubkey {
    type Err = SaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pubkey::from_base58(s)
    }
}

impl From<[u8; 32]> for Pubkey {
    fn from(bytes: [u8; 32]) -> Self {
        Pubkey(bytes)
    }
}

impl AsRef<[u8]> for Pubkey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
