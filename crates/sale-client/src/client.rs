//! Operation orchestration.
//!
//! Each public method is an independent, short-lived async task walking the
//! same state machine: resolve addresses, build the instruction, sign,
//! submit, confirm. All derivation and construction is synchronous; the
//! task suspends only at ledger boundaries. No ordering is guaranteed
//! between concurrently issued operations — the on-chain program is the
//! sole arbiter of ordering and atomicity.
//!
//! Failures are never retried here. A resubmitted purchase or withdrawal
//! could double-execute if the original landed but confirmed slowly, so
//! every failure surfaces with the operation name and the derived addresses
//! involved, and the caller decides.

use log::info;

use crate::error::ClientError;
use crate::ledger::{Commitment, Confirmation, LedgerClient, TransactionId};
use crate::resolver::resolve_token_account;
use crate::session::Session;
use sale_core::constants::SALE_MINT;
use sale_core::{
    compile_transaction, instruction, pda, sign_transaction, Instruction, Rate, SaleAddresses,
    SaleError, SaleState, Signer,
};

// Instruction builders re-check this, but resolution hits the network first,
// so a bad amount must be caught before any ledger call.
fn require_nonzero(amount: u64, what: &str) -> Result<(), ClientError> {
    if amount == 0 {
        return Err(SaleError::InvalidArgument(format!("{what} must be > 0")).into());
    }
    Ok(())
}

/// Client for one token-sale deployment: a session plus the administrative
/// signer, which co-signs every mutating operation (including purchases —
/// the deployed program's access-control model, preserved exactly) and pays
/// all transaction fees.
pub struct SaleClient<L, S> {
    session: Session<L>,
    admin: S,
}

impl<L: LedgerClient, S: Signer> SaleClient<L, S> {
    pub fn new(ledger: L, admin: S, commitment: Commitment) -> Self {
        SaleClient {
            session: Session::new(ledger, commitment),
            admin,
        }
    }

    pub fn session(&self) -> &Session<L> {
        &self.session
    }

    pub fn admin_pubkey(&self) -> sale_core::Pubkey {
        self.admin.pubkey()
    }

    /// Initialize the sale: create the sale-state PDA and program vault,
    /// set the rate, and move `initial_deposit` token base units from the
    /// admin's token account into the vault.
    pub async fn initialize(
        &self,
        rate: Rate,
        initial_deposit: u64,
    ) -> Result<TransactionId, ClientError> {
        require_nonzero(initial_deposit, "initial deposit")?;
        let addresses = SaleAddresses::derive()?;
        let admin_ata =
            resolve_token_account(&self.session, &self.admin.pubkey(), &SALE_MINT, &self.admin)
                .await?;
        let ix = instruction::initialize(
            &self.admin.pubkey(),
            &admin_ata.address,
            &addresses,
            rate,
            initial_deposit,
        )?;
        self.submit_signed("initialize", &addresses, ix, &[&self.admin])
            .await
    }

    /// Buy sale tokens with `lamports` of native currency. The buyer signs
    /// the purchase; the admin co-signs and funds the buyer's token account
    /// creation if needed.
    pub async fn buy(
        &self,
        buyer: &dyn Signer,
        lamports: u64,
    ) -> Result<TransactionId, ClientError> {
        require_nonzero(lamports, "purchase amount")?;
        let addresses = SaleAddresses::derive()?;
        let buyer_ata =
            resolve_token_account(&self.session, &buyer.pubkey(), &SALE_MINT, &self.admin).await?;
        let ix = instruction::buy(
            &self.admin.pubkey(),
            &buyer.pubkey(),
            &buyer_ata.address,
            &addresses,
            lamports,
        )?;
        self.submit_signed("buy", &addresses, ix, &[&self.admin, buyer])
            .await
    }

    /// Withdraw `amount` token base units from the program vault back to
    /// the admin's token account.
    pub async fn withdraw(&self, amount: u64) -> Result<TransactionId, ClientError> {
        require_nonzero(amount, "withdraw amount")?;
        let addresses = SaleAddresses::derive()?;
        let admin_ata =
            resolve_token_account(&self.session, &self.admin.pubkey(), &SALE_MINT, &self.admin)
                .await?;
        let ix = instruction::withdraw(&self.admin.pubkey(), &admin_ata.address, &addresses, amount)?;
        self.submit_signed("withdraw", &addresses, ix, &[&self.admin])
            .await
    }

    /// Deposit `amount` token base units from the admin's token account
    /// into the program vault.
    pub async fn deposit(&self, amount: u64) -> Result<TransactionId, ClientError> {
        require_nonzero(amount, "deposit amount")?;
        let addresses = SaleAddresses::derive()?;
        let admin_ata =
            resolve_token_account(&self.session, &self.admin.pubkey(), &SALE_MINT, &self.admin)
                .await?;
        let ix = instruction::deposit(&self.admin.pubkey(), &admin_ata.address, &addresses, amount)?;
        self.submit_signed("deposit", &addresses, ix, &[&self.admin])
            .await
    }

    /// Update the sale's exchange rate.
    pub async fn update_rate(&self, rate: Rate) -> Result<TransactionId, ClientError> {
        let addresses = SaleAddresses::derive()?;
        let ix = instruction::update_rate(&self.admin.pubkey(), &addresses, rate)?;
        self.submit_signed("update rate", &addresses, ix, &[&self.admin])
            .await
    }

    /// Fetch a fresh sale-state snapshot. Read-only: no instruction is
    /// built or submitted, and the result is never cached — it mutates with
    /// every sale-affecting transaction.
    pub async fn sale_state(&self) -> Result<SaleState, ClientError> {
        let (address, _) = pda::sale_state_address()?;
        let snapshot = self
            .session
            .ledger()
            .query(&address)
            .await
            .map_err(|e| ClientError::AccountUnavailable {
                address: address.to_base58(),
                detail: e.to_string(),
            })?
            .ok_or_else(|| ClientError::AccountUnavailable {
                address: address.to_base58(),
                detail: "sale not initialized".into(),
            })?;
        Ok(SaleState::decode(&snapshot.data)?)
    }

    /// The sale mint's decimal precision (cached after the first fetch).
    pub async fn mint_decimals(&self) -> Result<u8, ClientError> {
        self.session.mint_decimals().await
    }

    /// Sign with the given signers (admin pays the fee), submit, and wait
    /// for confirmation at the session's commitment level.
    async fn submit_signed(
        &self,
        operation: &'static str,
        addresses: &SaleAddresses,
        ix: Instruction,
        signers: &[&dyn Signer],
    ) -> Result<TransactionId, ClientError> {
        let submission_failed = |source| ClientError::SubmissionFailed {
            operation,
            sale_state: addresses.sale_state.to_base58(),
            program_vault: addresses.program_vault.to_base58(),
            source,
        };

        let blockhash = self
            .session
            .ledger()
            .latest_blockhash()
            .await
            .map_err(submission_failed)?;
        let tx = compile_transaction(&[ix], &self.admin.pubkey(), &blockhash)?;
        let wire = sign_transaction(&tx, signers)?;

        let id = self
            .session
            .ledger()
            .submit(wire)
            .await
            .map_err(submission_failed)?;
        info!("submitted {operation} transaction {id}");

        match self
            .session
            .ledger()
            .confirm(&id, self.session.commitment())
            .await
            .map_err(submission_failed)?
        {
            Confirmation::Confirmed => {
                info!("{operation} transaction {id} confirmed");
                Ok(id)
            }
            Confirmation::Rejected(reason) => Err(ClientError::Rejected {
                operation,
                transaction: id,
                reason,
            }),
            Confirmation::TimedOut => Err(ClientError::Unconfirmed {
                operation,
                transaction: id,
            }),
        }
    }
}
