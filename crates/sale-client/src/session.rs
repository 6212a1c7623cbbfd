//! Per-process session over a ledger client.
//!
//! Replaces the ad-hoc global connection/provider pair of script-style
//! clients with an explicit value passed by reference into every operation.
//! The only state a session carries besides the ledger handle is the sale
//! mint's decimal precision, fetched once and cached for the session's
//! lifetime — the value is immutable on-chain, so the cache is safe to
//! share across concurrent operations.

use std::sync::OnceLock;

use log::debug;

use crate::error::ClientError;
use crate::ledger::{Commitment, LedgerClient};
use sale_core::constants::SALE_MINT;

pub struct Session<L> {
    ledger: L,
    commitment: Commitment,
    decimals: OnceLock<u8>,
}

impl<L: LedgerClient> Session<L> {
    pub fn new(ledger: L, commitment: Commitment) -> Self {
        Session {
            ledger,
            commitment,
            decimals: OnceLock::new(),
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn commitment(&self) -> Commitment {
        self.commitment
    }

    /// The sale mint's decimal precision, fetched on first use.
    pub async fn mint_decimals(&self) -> Result<u8, ClientError> {
        if let Some(decimals) = self.decimals.get() {
            return Ok(*decimals);
        }

        let snapshot = self
            .ledger
            .query(&SALE_MINT)
            .await
            .map_err(|e| ClientError::AccountUnavailable {
                address: SALE_MINT.to_base58(),
                detail: e.to_string(),
            })?
            .ok_or_else(|| ClientError::AccountUnavailable {
                address: SALE_MINT.to_base58(),
                detail: "mint account not found".into(),
            })?;

        let decimals = sale_core::state::mint_decimals(&snapshot.data)?;
        debug!("sale mint {SALE_MINT} has {decimals} decimals");

        // A concurrent fetch may have won; both computed the same value.
        Ok(*self.decimals.get_or_init(|| decimals))
    }
}
