//! Async orchestration layer for the token-sale client.
//!
//! Builds on `sale-core` (pure derivation and instruction construction) and
//! two caller-supplied collaborators: a [`ledger::LedgerClient`] for
//! queries and submission, and a [`sale_core::Signer`] for each key. This
//! layer owns no durable state — everything it does is recomputable from
//! the fixed protocol constants plus the live ledger.
//!
//! Cancellation: dropping a pending operation future does NOT mean the
//! underlying transaction failed. If it was already submitted it may still
//! land; re-query sale state before concluding anything.

pub mod client;
pub mod error;
pub mod ledger;
pub mod resolver;
pub mod session;

pub use client::SaleClient;
pub use error::ClientError;
pub use ledger::{
    AccountSnapshot, Commitment, Confirmation, LedgerClient, LedgerError, TransactionId,
};
pub use resolver::resolve_token_account;
pub use session::Session;

// Core types callers need alongside the client.
pub use sale_core::{LocalSigner, Pubkey, Rate, SaleError, SaleState, Signer, TokenAccount};
