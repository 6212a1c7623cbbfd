//! The ledger-client collaborator interface.
//!
//! This crate never talks to a network itself; callers supply an
//! implementation of [`LedgerClient`] (an RPC client in production, an
//! in-memory ledger in tests). Confirmation polling bounds are the
//! implementor's concern — nothing here enforces a timeout.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use sale_core::Pubkey;

/// Confirmation-depth guarantee requested from the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

/// A point-in-time copy of an on-ledger account. Owned by the caller that
/// requested it; never shared for mutation.
#[derive(Debug, Clone)]
pub struct AccountSnapshot {
    pub lamports: u64,
    pub owner: Pubkey,
    pub data: Vec<u8>,
}

/// Opaque transaction identifier (the Base58 first signature).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionId(pub String);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of waiting for a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    /// The caller-supplied bound elapsed. The on-chain outcome is UNKNOWN:
    /// the transaction may still land. Re-query state before treating the
    /// operation as failed.
    TimedOut,
    Rejected(String),
}

/// Transport-level failures from the ledger collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// A create instruction lost a race: the account exists. Recoverable.
    #[error("account already exists")]
    AccountAlreadyExists,

    #[error("transaction rejected: {0}")]
    Rejected(String),

    #[error("transport failure: {0}")]
    Transport(String),
}

/// Read and submission access to the ledger.
///
/// Implementations must be safe to share across concurrent operations; this
/// layer issues no more than one in-flight call per operation but runs
/// operations independently, with no ordering guarantee between them.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Fetch an account snapshot, `None` if the account does not exist.
    async fn query(&self, address: &Pubkey) -> Result<Option<AccountSnapshot>, LedgerError>;

    /// A recent blockhash to anchor a new transaction to.
    async fn latest_blockhash(&self) -> Result<[u8; 32], LedgerError>;

    /// Submit a signed wire-format transaction.
    async fn submit(&self, signed_transaction: Vec<u8>) -> Result<TransactionId, LedgerError>;

    /// Wait for a submitted transaction to reach `commitment`.
    async fn confirm(
        &self,
        transaction: &TransactionId,
        commitment: Commitment,
    ) -> Result<Confirmation, LedgerError>;
}

#[async_trait]
impl<T: LedgerClient + ?Sized> LedgerClient for Arc<T> {
    async fn query(&self, address: &Pubkey) -> Result<Option<AccountSnapshot>, LedgerError> {
        (**self).query(address).await
    }

    async fn latest_blockhash(&self) -> Result<[u8; 32], LedgerError> {
        (**self).latest_blockhash().await
    }

    async fn submit(&self, signed_transaction: Vec<u8>) -> Result<TransactionId, LedgerError> {
        (**self).submit(signed_transaction).await
    }

    async fn confirm(
        &self,
        transaction: &TransactionId,
        commitment: Commitment,
    ) -> Result<Confirmation, LedgerError> {
        (**self).confirm(transaction, commitment).await
    }
}
