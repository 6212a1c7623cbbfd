//! Associated token account resolution: find, else create, else fail.
//!
//! Creation races are expected: two independent callers resolving the same
//! (owner, mint) pair may both observe the account missing and both submit
//! a create. The associated-token program rejects the loser with an
//! already-in-use error, which is a non-fatal signal to re-query — never an
//! error to propagate.

use log::{debug, warn};

use crate::error::ClientError;
use crate::ledger::{Confirmation, LedgerClient, LedgerError};
use crate::session::Session;
use sale_core::{
    compile_transaction, instruction, pda, sign_transaction, Pubkey, Signer, TokenAccount,
};

/// Resolve the associated token account for `owner` + `mint`, creating it
/// funded by `payer` if it does not exist yet.
///
/// Idempotent: when the account already exists, no creation is submitted.
pub async fn resolve_token_account<L: LedgerClient>(
    session: &Session<L>,
    owner: &Pubkey,
    mint: &Pubkey,
    payer: &dyn Signer,
) -> Result<TokenAccount, ClientError> {
    let (ata, _) = pda::associated_token_address(owner, mint)?;

    if let Some(snapshot) = query_ata(session, &ata).await? {
        debug!("token account {ata} exists (owner {owner})");
        return Ok(snapshot);
    }

    debug!("token account {ata} missing; creating for owner {owner}, payer {}", payer.pubkey());
    create_token_account(session, owner, mint, payer, &ata).await?;

    // The account must be fetchable now, whether we created it or lost the
    // race to someone who did.
    match query_ata(session, &ata).await? {
        Some(snapshot) => Ok(snapshot),
        None => Err(ClientError::ResolutionFailed {
            token_account: ata.to_base58(),
            source: LedgerError::Transport("account still missing after create".into()),
        }),
    }
}

async fn query_ata<L: LedgerClient>(
    session: &Session<L>,
    ata: &Pubkey,
) -> Result<Option<TokenAccount>, ClientError> {
    let snapshot = session
        .ledger()
        .query(ata)
        .await
        .map_err(|source| ClientError::ResolutionFailed {
            token_account: ata.to_base58(),
            source,
        })?;

    match snapshot {
        Some(snap) => Ok(Some(TokenAccount::decode(*ata, &snap.data)?)),
        None => Ok(None),
    }
}

async fn create_token_account<L: LedgerClient>(
    session: &Session<L>,
    owner: &Pubkey,
    mint: &Pubkey,
    payer: &dyn Signer,
    ata: &Pubkey,
) -> Result<(), ClientError> {
    let resolution_failed = |source: LedgerError| ClientError::ResolutionFailed {
        token_account: ata.to_base58(),
        source,
    };

    let ix = instruction::create_associated_token_account(&payer.pubkey(), owner, mint)?;
    let blockhash = session
        .ledger()
        .latest_blockhash()
        .await
        .map_err(resolution_failed)?;
    let tx = compile_transaction(&[ix], &payer.pubkey(), &blockhash)?;
    let wire = sign_transaction(&tx, &[payer])?;

    let id = match session.ledger().submit(wire).await {
        Ok(id) => id,
        Err(LedgerError::AccountAlreadyExists) => {
            warn!("token account {ata} creation raced; account already exists");
            return Ok(());
        }
        Err(LedgerError::Rejected(reason)) if is_already_in_use(&reason) => {
            warn!("token account {ata} creation raced: {reason}");
            return Ok(());
        }
        Err(source) => return Err(resolution_failed(source)),
    };

    match session
        .ledger()
        .confirm(&id, session.commitment())
        .await
        .map_err(resolution_failed)?
    {
        Confirmation::Confirmed => Ok(()),
        Confirmation::Rejected(reason) if is_already_in_use(&reason) => {
            warn!("token account {ata} creation raced: {reason}");
            Ok(())
        }
        Confirmation::Rejected(reason) => Err(resolution_failed(LedgerError::Rejected(reason))),
        // Outcome unknown; the re-query decides whether the account exists.
        Confirmation::TimedOut => Ok(()),
    }
}

fn is_already_in_use(reason: &str) -> bool {
    let reason = reason.to_ascii_lowercase();
    reason.contains("already in use") || reason.contains("already exists")
}
