use thiserror::Error;

/// Errors produced while deriving addresses or constructing instructions.
#[derive(Debug, Error)]
pub enum SaleError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("derivation exhausted: no off-curve address for the given seeds")]
    DerivationExhausted,

    #[error("amount overflow: {0}")]
    AmountOverflow(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("transaction build error: {0}")]
    TransactionBuildError(String),

    #[error("signing error: {0}")]
    SigningError(String),

    #[error("state decode error: {0}")]
    StateDecodeError(String),
}
