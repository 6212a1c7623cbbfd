//! Transaction compilation, wire format, and signing.
//!
//! Built by hand, no `solana-sdk`. The wire format:
//!
//! ```text
//! Transaction:
//!   num_signatures          compact-u16
//!   signatures              64 bytes * num_signatures
//!   message:
//!     num_required_sigs     u8
//!     num_readonly_signed   u8
//!     num_readonly_unsigned u8
//!     num_accounts          compact-u16
//!     account_keys          32 bytes * num_accounts
//!     recent_blockhash      32 bytes
//!     num_instructions      compact-u16
//!     instructions[]        (see below)
//!
//! Instruction:
//!   program_id_index        u8
//!   num_accounts            compact-u16
//!   account_indices         u8 * num_accounts
//!   data_len                compact-u16
//!   data                    u8 * data_len
//! ```
//!
//! Purchases carry two signatures (admin + buyer), so signing matches each
//! required-signer slot against the supplied signers by public key.

use ed25519_dalek::Signer as DalekSigner;
use zeroize::Zeroize;

use crate::address::Pubkey;
use crate::error::SaleError;
use crate::instruction::Instruction;

// ---------------------------------------------------------------------------
// Signer seam
// ---------------------------------------------------------------------------

/// A signing key, local or remote. `sign_message` must produce a 64-byte
/// Ed25519 signature over exactly the bytes given.
pub trait Signer {
    fn pubkey(&self) -> Pubkey;
    fn sign_message(&self, message: &[u8]) -> [u8; 64];
}

/// An in-process Ed25519 signer over a 32-byte seed.
pub struct LocalSigner {
    key: ed25519_dalek::SigningKey,
}

impl LocalSigner {
    /// The seed is consumed and scrubbed once the signing key is built.
    pub fn from_seed(mut seed: [u8; 32]) -> Self {
        let key = ed25519_dalek::SigningKey::from_bytes(&seed);
        seed.zeroize();
        LocalSigner { key }
    }
}

impl Signer for LocalSigner {
    fn pubkey(&self) -> Pubkey {
        Pubkey::new(self.key.verifying_key().to_bytes())
    }

    fn sign_message(&self, message: &[u8]) -> [u8; 64] {
        self.key.sign(message).to_bytes()
    }
}

// ---------------------------------------------------------------------------
// Compact-u16 encoding
// ---------------------------------------------------------------------------

/// Encode a `u16` value in Solana's compact-u16 format.
///
/// - Values 0..0x7f       -> 1 byte
/// - Values 0x80..0x3fff  -> 2 bytes
/// - Values 0x4000..      -> 3 bytes
pub fn encode_compact_u16(value: u16) -> Vec<u8> {
    let mut out = Vec::with_capacity(3);
    let mut val = value as u32;

    loop {
        let mut byte = (val & 0x7f) as u8;
        val >>= 7;
        if val > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if val == 0 {
            break;
        }
    }

    out
}

// ---------------------------------------------------------------------------
// Transaction structure and compilation
// ---------------------------------------------------------------------------

/// An unsigned transaction ready for serialization.
#[derive(Debug, Clone)]
pub struct Transaction {
    /// All account keys, in canonical order:
    ///   1. writable signers (fee payer first)
    ///   2. read-only signers
    ///   3. writable non-signers
    ///   4. read-only non-signers
    pub account_keys: Vec<Pubkey>,

    pub num_required_signatures: u8,
    pub num_readonly_signed: u8,
    pub num_readonly_unsigned: u8,

    pub recent_blockhash: [u8; 32],

    pub compiled_instructions: Vec<CompiledInstruction>,
}

/// An instruction with account references replaced by u8 indices into the
/// transaction's `account_keys`.
#[derive(Debug, Clone)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub account_indices: Vec<u8>,
    pub data: Vec<u8>,
}

/// Compile instructions into a transaction with a single fee payer.
///
/// The fee payer is always the first signer, at index 0 of the account keys.
pub fn compile_transaction(
    instructions: &[Instruction],
    fee_payer: &Pubkey,
    recent_blockhash: &[u8; 32],
) -> Result<Transaction, SaleError> {
    struct AccountEntry {
        pubkey: Pubkey,
        is_signer: bool,
        is_writable: bool,
    }

    // Collect unique account keys with their merged permission bits. A plain
    // Vec keeps insertion order and the account lists are tiny.
    let mut entries: Vec<AccountEntry> = Vec::new();

    let mut upsert = |pubkey: Pubkey, signer: bool, writable: bool| {
        if let Some(entry) = entries.iter_mut().find(|e| e.pubkey == pubkey) {
            entry.is_signer |= signer;
            entry.is_writable |= writable;
        } else {
            entries.push(AccountEntry {
                pubkey,
                is_signer: signer,
                is_writable: writable,
            });
        }
    };

    // Fee payer is always signer + writable.
    upsert(*fee_payer, true, true);

    for ix in instructions {
        for meta in &ix.accounts {
            upsert(meta.pubkey, meta.is_signer, meta.is_writable);
        }
        // Program IDs are non-signer, read-only accounts.
        upsert(ix.program_id, false, false);
    }

    // Sort into canonical order, stable within each category so the fee
    // payer stays first.
    entries.sort_by_key(|e| match (e.is_signer, e.is_writable) {
        (true, true) => 0u8,
        (true, false) => 1,
        (false, true) => 2,
        (false, false) => 3,
    });

    let num_signers = entries.iter().filter(|e| e.is_signer).count() as u8;
    let num_readonly_signed = entries
        .iter()
        .filter(|e| e.is_signer && !e.is_writable)
        .count() as u8;
    let num_readonly_unsigned = entries
        .iter()
        .filter(|e| !e.is_signer && !e.is_writable)
        .count() as u8;

    let account_keys: Vec<Pubkey> = entries.iter().map(|e| e.pubkey).collect();

    let index_of = |key: &Pubkey| -> Result<u8, SaleError> {
        account_keys
            .iter()
            .position(|k| k == key)
            .map(|i| i as u8)
            .ok_or_else(|| SaleError::TransactionBuildError(format!("{key} not in account keys")))
    };

    let mut compiled = Vec::with_capacity(instructions.len());
    for ix in instructions {
        let program_id_index = index_of(&ix.program_id)?;
        let mut account_indices = Vec::with_capacity(ix.accounts.len());
        for meta in &ix.accounts {
            account_indices.push(index_of(&meta.pubkey)?);
        }
        compiled.push(CompiledInstruction {
            program_id_index,
            account_indices,
            data: ix.data.clone(),
        });
    }

    Ok(Transaction {
        account_keys,
        num_required_signatures: num_signers,
        num_readonly_signed,
        num_readonly_unsigned,
        recent_blockhash: *recent_blockhash,
        compiled_instructions: compiled,
    })
}

/// Serialize the transaction message (the bytes that get signed).
pub fn serialize_message(tx: &Transaction) -> Vec<u8> {
    let mut buf = Vec::with_capacity(256);

    buf.push(tx.num_required_signatures);
    buf.push(tx.num_readonly_signed);
    buf.push(tx.num_readonly_unsigned);

    buf.extend_from_slice(&encode_compact_u16(tx.account_keys.len() as u16));
    for key in &tx.account_keys {
        buf.extend_from_slice(key.as_bytes());
    }

    buf.extend_from_slice(&tx.recent_blockhash);

    buf.extend_from_slice(&encode_compact_u16(tx.compiled_instructions.len() as u16));
    for ix in &tx.compiled_instructions {
        buf.push(ix.program_id_index);

        buf.extend_from_slice(&encode_compact_u16(ix.account_indices.len() as u16));
        buf.extend_from_slice(&ix.account_indices);

        buf.extend_from_slice(&encode_compact_u16(ix.data.len() as u16));
        buf.extend_from_slice(&ix.data);
    }

    buf
}

/// Sign a compiled transaction and serialize it into wire format.
///
/// The first `num_required_signatures` account keys each need a signature;
/// every slot is matched against `signers` by public key. A required signer
/// with no matching key is `SigningError` — signature order on the wire must
/// follow account-key order, not the order signers were supplied in.
pub fn sign_transaction(tx: &Transaction, signers: &[&dyn Signer]) -> Result<Vec<u8>, SaleError> {
    let message_bytes = serialize_message(tx);
    let num_sigs = tx.num_required_signatures as usize;

    let mut signatures: Vec<[u8; 64]> = Vec::with_capacity(num_sigs);
    for slot_key in tx.account_keys.iter().take(num_sigs) {
        let signer = signers
            .iter()
            .find(|s| s.pubkey() == *slot_key)
            .ok_or_else(|| SaleError::SigningError(format!("no signer for {slot_key}")))?;
        signatures.push(signer.sign_message(&message_bytes));
    }

    let mut wire = Vec::with_capacity(1 + 64 * num_sigs + message_bytes.len());
    wire.extend_from_slice(&encode_compact_u16(num_sigs as u16));
    for sig in &signatures {
        wire.extend_from_slice(sig);
    }
    wire.extend_from_slice(&message_bytes);

    Ok(wire)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::{self, SaleAddresses};
    use crate::price::Rate;
    use ed25519_dalek::Verifier;

    fn signer(seed: u8) -> LocalSigner {
        LocalSigner::from_seed([seed; 32])
    }

    // -- compact-u16 --------------------------------------------------------

    #[test]
    fn compact_u16_single_byte() {
        assert_eq!(encode_compact_u16(0), vec![0x00]);
        assert_eq!(encode_compact_u16(1), vec![0x01]);
        assert_eq!(encode_compact_u16(0x7f), vec![0x7f]);
    }

    #[test]
    fn compact_u16_two_bytes() {
        assert_eq!(encode_compact_u16(0x80), vec![0x80, 0x01]);
        assert_eq!(encode_compact_u16(0x3fff), vec![0xff, 0x7f]);
    }

    #[test]
    fn compact_u16_three_bytes() {
        assert_eq!(encode_compact_u16(0x4000), vec![0x80, 0x80, 0x01]);
        assert_eq!(encode_compact_u16(0xffff), vec![0xff, 0xff, 0x03]);
    }

    // -- compilation --------------------------------------------------------

    fn buy_transaction(admin: &LocalSigner, buyer: &LocalSigner) -> Transaction {
        let addrs = SaleAddresses::derive().unwrap();
        let buyer_ata = Pubkey::new([9u8; 32]);
        let ix = instruction::buy(
            &admin.pubkey(),
            &buyer.pubkey(),
            &buyer_ata,
            &addrs,
            500_000_000,
        )
        .unwrap();
        compile_transaction(&[ix], &admin.pubkey(), &[0x11; 32]).unwrap()
    }

    #[test]
    fn fee_payer_is_first_account_key() {
        let admin = signer(1);
        let buyer = signer(2);
        let tx = buy_transaction(&admin, &buyer);
        assert_eq!(tx.account_keys[0], admin.pubkey());
    }

    #[test]
    fn buy_requires_two_signatures() {
        let admin = signer(1);
        let buyer = signer(2);
        let tx = buy_transaction(&admin, &buyer);
        assert_eq!(tx.num_required_signatures, 2);
        assert_eq!(tx.num_readonly_signed, 0);
        // System program + token program are read-only non-signers, plus the
        // sale program itself.
        assert_eq!(tx.num_readonly_unsigned, 3);
    }

    #[test]
    fn duplicate_accounts_are_merged_with_strongest_permissions() {
        let admin = signer(1);
        let addrs = SaleAddresses::derive().unwrap();
        let ix = instruction::update_rate(&admin.pubkey(), &addrs, Rate::new(5).unwrap()).unwrap();

        // Admin appears both as fee payer and as instruction account.
        let tx = compile_transaction(&[ix], &admin.pubkey(), &[0u8; 32]).unwrap();
        let admin_count = tx
            .account_keys
            .iter()
            .filter(|k| **k == admin.pubkey())
            .count();
        assert_eq!(admin_count, 1);
        assert_eq!(tx.num_required_signatures, 1);
    }

    #[test]
    fn compiled_indices_point_at_the_right_keys() {
        let admin = signer(1);
        let buyer = signer(2);
        let tx = buy_transaction(&admin, &buyer);

        let ix = &tx.compiled_instructions[0];
        assert_eq!(ix.account_indices.len(), 7);
        // First instruction account is the admin, who is also the fee payer.
        assert_eq!(ix.account_indices[0], 0);
        // The program id index points at the sale program.
        let program_key = tx.account_keys[ix.program_id_index as usize];
        assert_eq!(program_key, crate::constants::SALE_PROGRAM_ID);
    }

    // -- serialization + signing --------------------------------------------

    #[test]
    fn message_header_matches_counts() {
        let admin = signer(1);
        let buyer = signer(2);
        let tx = buy_transaction(&admin, &buyer);
        let msg = serialize_message(&tx);

        assert_eq!(msg[0], tx.num_required_signatures);
        assert_eq!(msg[1], tx.num_readonly_signed);
        assert_eq!(msg[2], tx.num_readonly_unsigned);
        assert_eq!(msg[3] as usize, tx.account_keys.len());
    }

    #[test]
    fn signed_wire_carries_one_signature_per_required_signer() {
        let admin = signer(1);
        let buyer = signer(2);
        let tx = buy_transaction(&admin, &buyer);

        let wire = sign_transaction(&tx, &[&admin, &buyer]).unwrap();
        // compact-u16(2) = 1 byte, then 2 * 64 signature bytes, then message.
        assert_eq!(wire[0], 2);
        assert_eq!(wire.len(), 1 + 128 + serialize_message(&tx).len());
    }

    #[test]
    fn signatures_verify_against_the_message() {
        let admin = signer(1);
        let buyer = signer(2);
        let tx = buy_transaction(&admin, &buyer);
        let msg = serialize_message(&tx);
        let wire = sign_transaction(&tx, &[&buyer, &admin]).unwrap();

        // Slot order follows account keys, not the signer argument order.
        for (slot, key) in tx.account_keys.iter().take(2).enumerate() {
            let sig_bytes: [u8; 64] = wire[1 + slot * 64..1 + (slot + 1) * 64].try_into().unwrap();
            let verifying = ed25519_dalek::VerifyingKey::from_bytes(key.as_bytes()).unwrap();
            verifying
                .verify(&msg, &ed25519_dalek::Signature::from_bytes(&sig_bytes))
                .unwrap();
        }
    }

    #[test]
    fn missing_signer_is_an_error() {
        let admin = signer(1);
        let buyer = signer(2);
        let tx = buy_transaction(&admin, &buyer);

        match sign_transaction(&tx, &[&admin]) {
            Err(SaleError::SigningError(msg)) => {
                assert!(msg.contains(&buyer.pubkey().to_base58()))
            }
            other => panic!("expected SigningError, got {other:?}"),
        }
    }

    #[test]
    fn local_signer_pubkey_is_stable() {
        let a = signer(7);
        let b = signer(7);
        assert_eq!(a.pubkey(), b.pubkey());
        assert_ne!(signer(8).pubkey(), a.pubkey());
    }
}
