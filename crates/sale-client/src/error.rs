//! Client-side error taxonomy.
//!
//! A wrong derivation is the most common real-world failure in this domain,
//! so every network-touching variant names the implicated address. Nothing
//! here is retried automatically: resubmitting a non-idempotent purchase or
//! withdrawal could double-execute if the original landed but confirmation
//! was merely slow. The caller decides.

use thiserror::Error;

use crate::ledger::{LedgerError, TransactionId};
use sale_core::SaleError;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Derivation, construction, or decoding fault from the core layer.
    #[error(transparent)]
    Core(#[from] SaleError),

    /// A token account could not be resolved even after a create attempt.
    #[error("resolving token account {token_account} failed: {source}")]
    ResolutionFailed {
        token_account: String,
        #[source]
        source: LedgerError,
    },

    /// A read-only account the operation depends on could not be fetched.
    #[error("account {address} unavailable: {detail}")]
    AccountUnavailable { address: String, detail: String },

    /// Submission never produced a transaction identifier.
    #[error(
        "{operation} submission failed (sale state {sale_state}, vault {program_vault}): {source}"
    )]
    SubmissionFailed {
        operation: &'static str,
        sale_state: String,
        program_vault: String,
        #[source]
        source: LedgerError,
    },

    /// The ledger executed and rejected the transaction.
    #[error("{operation} transaction {transaction} rejected: {reason}")]
    Rejected {
        operation: &'static str,
        transaction: TransactionId,
        reason: String,
    },

    /// Confirmation timed out. The outcome is unknown — the transaction may
    /// still land. Re-query sale state before treating this as a failure.
    #[error("{operation} transaction {transaction} unconfirmed; outcome unknown, re-query state")]
    Unconfirmed {
        operation: &'static str,
        transaction: TransactionId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_failure_names_the_derived_addresses() {
        let err = ClientError::SubmissionFailed {
            operation: "buy",
            sale_state: "4RHn3QVLFciT59H7r2MYbBkQeMVt8yWGiu8yiyW6THTX".into(),
            program_vault: "BzHGaG6FMXvep2VqMGnbM9CXhcVkx8qGstUaNtSw9X8i".into(),
            source: LedgerError::Transport("connection reset".into()),
        };
        let text = err.to_string();
        assert!(text.contains("buy"));
        assert!(text.contains("4RHn3QVLFciT59H7r2MYbBkQeMVt8yWGiu8yiyW6THTX"));
        assert!(text.contains("BzHGaG6FMXvep2VqMGnbM9CXhcVkx8qGstUaNtSw9X8i"));
    }

    #[test]
    fn core_errors_pass_through_transparently() {
        let err: ClientError = SaleError::DerivationExhausted.into();
        assert!(err.to_string().contains("derivation exhausted"));
    }

    #[test]
    fn unconfirmed_tells_the_caller_to_requery() {
        let err = ClientError::Unconfirmed {
            operation: "withdraw",
            transaction: TransactionId("abc123".into()),
        };
        assert!(err.to_string().contains("re-query"));
    }
}
