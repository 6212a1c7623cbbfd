//! Deterministic account resolution and instruction construction for a
//! fixed, externally-deployed token-sale program.
//!
//! Everything in this crate is pure and synchronous: Base58 addresses, PDA
//! derivation with bump search, integer price conversion, per-operation
//! instruction builders, the transaction wire format, and account-data
//! decoding. The wire-level details are implemented by hand — no
//! `solana-sdk` (which drags in tokio and 200+ transitive dependencies);
//! `sha2` hashes the derivations, `ed25519-dalek` signs, `bs58` encodes.
//!
//! Network transport lives in the companion `sale-client` crate behind a
//! ledger-client trait.

pub mod address;
pub mod constants;
pub mod error;
pub mod instruction;
pub mod pda;
pub mod price;
pub mod state;
pub mod transaction;

// Re-export key public types for ergonomic imports.
pub use address::Pubkey;
pub use error::SaleError;
pub use instruction::{AccountMeta, Instruction, SaleAddresses};
pub use pda::{associated_token_address, find_program_address, program_vault_address, sale_state_address};
pub use price::{lamports_for_tokens, scale_to_base_units, tokens_for_lamports, Rate};
pub use state::{mint_decimals, SaleState, TokenAccount};
pub use transaction::{
    compile_transaction, serialize_message, sign_transaction, LocalSigner, Signer, Transaction,
};
