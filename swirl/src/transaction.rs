// Copyright (c) 2026 Swirl Foundation

//! The coordinator-assembled transaction and per-input witnesses.
//!
//! Swirl transactions are transparent: every input and output carries an
//! explicit amount, so conservation is checked by addition rather than by
//! commitment algebra. The signing hash covers all inputs and outputs and
//! excludes witnesses, and every witness additionally commits to its input
//! index so a witness cannot be moved to another slot.

use crate::{
    amount::{Amount, Weight},
    coin::{OutPoint, ScriptPubkey},
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use swl_crypto_keys::{Signature, SpendPublic};

/// Weight cost of one transaction input on the swirl chain.
pub const INPUT_WEIGHT: Weight = Weight::from_wu(272);

/// Weight cost of one transaction output on the swirl chain.
pub const OUTPUT_WEIGHT: Weight = Weight::from_wu(124);

/// Domain separator for the transaction signing hash.
const SIGNING_HASH_DOMAIN_TAG: &[u8] = b"swl_transaction_signing_hash";

/// Signature context for input witnesses.
const WITNESS_CONTEXT: &[u8] = b"swl_input_witness";

/// A transaction input: an outpoint plus the explicit amount it spends.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TxIn {
    /// The coin being spent.
    pub outpoint: OutPoint,

    /// The coin's value.
    pub amount: Amount,
}

/// A transaction output.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TxOut {
    /// The destination script.
    pub script_pubkey: ScriptPubkey,

    /// The value paid.
    pub amount: Amount,
}

/// The unsigned transaction a coordinator assembles from all registered
/// inputs and outputs.
///
/// Received read-only by the round client and validated before any witness
/// is produced.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct UnsignedTransaction {
    /// All registered inputs, across every participant.
    pub inputs: Vec<TxIn>,

    /// All registered outputs, across every participant.
    pub outputs: Vec<TxOut>,
}

impl UnsignedTransaction {
    /// The index of the input spending `outpoint`, if present exactly once.
    pub fn input_index(&self, outpoint: &OutPoint) -> Option<usize> {
        let mut indices = self
            .inputs
            .iter()
            .enumerate()
            .filter(|(_i, txin)| txin.outpoint == *outpoint)
            .map(|(i, _txin)| i);
        let index = indices.next()?;
        if indices.next().is_some() {
            return None;
        }
        Some(index)
    }

    /// Sum of input values.
    pub fn total_in(&self) -> Option<Amount> {
        Amount::checked_sum(self.inputs.iter().map(|i| i.amount))
    }

    /// Sum of output values.
    pub fn total_out(&self) -> Option<Amount> {
        Amount::checked_sum(self.outputs.iter().map(|o| o.amount))
    }

    /// The implicit fee, when inputs cover outputs.
    pub fn fee(&self) -> Option<Amount> {
        self.total_in()?.checked_sub(self.total_out()?)
    }

    /// Total weight of the transaction's inputs and outputs.
    pub fn weight(&self) -> Weight {
        let wu = self.inputs.len() as u64 * INPUT_WEIGHT.to_wu()
            + self.outputs.len() as u64 * OUTPUT_WEIGHT.to_wu();
        Weight::from_wu(wu)
    }

    /// The hash every witness signs. Excludes witnesses.
    pub fn signing_hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(SIGNING_HASH_DOMAIN_TAG);
        hasher.update((self.inputs.len() as u64).to_le_bytes());
        for input in &self.inputs {
            hasher.update(input.outpoint.txid);
            hasher.update(input.outpoint.index.to_le_bytes());
            hasher.update(input.amount.to_sats().to_le_bytes());
        }
        hasher.update((self.outputs.len() as u64).to_le_bytes());
        for output in &self.outputs {
            hasher.update(output.script_pubkey.as_bytes());
            hasher.update(output.amount.to_sats().to_le_bytes());
        }
        hasher.finalize().into()
    }

    /// The message signed by the witness for `input_index`.
    pub fn witness_message(&self, input_index: usize) -> Vec<u8> {
        let mut message = Vec::with_capacity(40);
        message.extend_from_slice(&self.signing_hash());
        message.extend_from_slice(&(input_index as u64).to_le_bytes());
        message
    }
}

/// The witness spending one input.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct InputWitness {
    /// The input this witness spends.
    pub input_index: usize,

    /// Schnorr signature over the transaction's witness message.
    pub signature: Signature,
}

impl InputWitness {
    /// Verify against the spend key the input's destination script pays to.
    pub fn verify(
        &self,
        transaction: &UnsignedTransaction,
        key: &SpendPublic,
    ) -> Result<(), swl_crypto_keys::Error> {
        self.signature.verify(
            key,
            WITNESS_CONTEXT,
            &transaction.witness_message(self.input_index),
        )
    }

    /// Sign input `input_index` of `transaction`.
    pub(crate) fn sign<R: rand_core::CryptoRngCore>(
        transaction: &UnsignedTransaction,
        input_index: usize,
        key: &swl_crypto_keys::SpendPrivate,
        rng: &mut R,
    ) -> Self {
        let signature = Signature::sign(
            key,
            WITNESS_CONTEXT,
            &transaction.witness_message(input_index),
            rng,
        );
        Self {
            input_index,
            signature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::OsRng;
    use swl_crypto_keys::SpendPrivate;

    fn sample_transaction() -> UnsignedTransaction {
        UnsignedTransaction {
            inputs: vec![
                TxIn {
                    outpoint: OutPoint::new([1u8; 32], 0),
                    amount: Amount::from_sats(100_000),
                },
                TxIn {
                    outpoint: OutPoint::new([2u8; 32], 3),
                    amount: Amount::from_sats(50_000),
                },
            ],
            outputs: vec![
                TxOut {
                    script_pubkey: ScriptPubkey::from([3u8; 32]),
                    amount: Amount::from_sats(90_000),
                },
                TxOut {
                    script_pubkey: ScriptPubkey::from([4u8; 32]),
                    amount: Amount::from_sats(59_000),
                },
            ],
        }
    }

    #[test]
    fn test_fee_and_weight() {
        let tx = sample_transaction();
        assert_eq!(tx.fee(), Some(Amount::from_sats(1000)));
        assert_eq!(tx.weight(), Weight::from_wu(2 * 272 + 2 * 124));
    }

    #[test]
    fn test_fee_none_when_outputs_exceed_inputs() {
        let mut tx = sample_transaction();
        tx.outputs[0].amount = Amount::from_sats(200_000);
        assert_eq!(tx.fee(), None);
    }

    #[test]
    fn test_input_index() {
        let tx = sample_transaction();
        assert_eq!(tx.input_index(&OutPoint::new([2u8; 32], 3)), Some(1));
        assert_eq!(tx.input_index(&OutPoint::new([9u8; 32], 0)), None);
    }

    #[test]
    fn test_input_index_rejects_duplicates() {
        let mut tx = sample_transaction();
        tx.inputs.push(tx.inputs[0]);
        assert_eq!(tx.input_index(&tx.inputs[0].outpoint), None);
    }

    #[test]
    fn test_signing_hash_covers_amounts() {
        let tx = sample_transaction();
        let mut tampered = tx.clone();
        tampered.outputs[0].amount = Amount::from_sats(90_001);

        assert_ne!(tx.signing_hash(), tampered.signing_hash());
    }

    #[test]
    fn test_witness_roundtrip() {
        let tx = sample_transaction();
        let key = SpendPrivate::from_random(&mut OsRng);

        let witness = InputWitness::sign(&tx, 0, &key, &mut OsRng);
        assert!(witness.verify(&tx, &key.public()).is_ok());
    }

    #[test]
    fn test_witness_bound_to_input_index() {
        let tx = sample_transaction();
        let key = SpendPrivate::from_random(&mut OsRng);

        let mut witness = InputWitness::sign(&tx, 0, &key, &mut OsRng);
        witness.input_index = 1;

        assert!(witness.verify(&tx, &key.public()).is_err());
    }

    #[test]
    fn test_witness_bound_to_transaction() {
        let tx = sample_transaction();
        let key = SpendPrivate::from_random(&mut OsRng);
        let witness = InputWitness::sign(&tx, 0, &key, &mut OsRng);

        let mut other = tx.clone();
        other.outputs.pop();

        assert!(witness.verify(&other, &key.public()).is_err());
    }
}
