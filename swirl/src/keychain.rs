// Copyright (c) 2026 Swirl Foundation

//! The wallet-facing key chain.
//!
//! [`KeyChain`] is a capability interface: the round client can ask for
//! round-bound ownership proofs and for final-transaction witnesses, and
//! nothing else. Key material never crosses the trait boundary, so backends
//! with external custody (a signing device, a remote signer) implement the
//! same contract as the in-process [`InMemoryKeyChain`].

use crate::{
    amount::FeeRate,
    coin::{Coin, ScriptPubkey},
    transaction::{InputWitness, UnsignedTransaction},
};
use rand_core::OsRng;
use std::collections::HashMap;
use swl_crypto_keys::SpendPrivate;
use swl_crypto_ownership::{OwnershipProof, RoundBinding};
use thiserror::Error;

/// An error from a key chain operation.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum KeyChainError {
    /// No key material for the destination script.
    #[error("no key material for script {0}")]
    KeyNotFound(ScriptPubkey),

    /// Ownership proof was produced for a different destination script than
    /// the coin's. Signing with it would spend the wrong coin.
    #[error("ownership proof script does not match the coin being signed")]
    ProofMismatch,

    /// The transaction does not spend the given coin exactly once.
    #[error("transaction does not spend coin {0} exactly once")]
    InputNotFound(crate::coin::OutPoint),

    /// The transaction lists the coin at a different amount than the wallet
    /// knows it holds.
    #[error("transaction claims {claimed} for a coin of {actual}")]
    AmountMismatch {
        /// The amount the transaction lists for the input.
        claimed: crate::amount::Amount,
        /// The coin's actual amount.
        actual: crate::amount::Amount,
    },

    /// The transaction's value balance is inconsistent with the known coin
    /// amounts plus an acceptable fee.
    #[error("value imbalance: fee {fee:?} exceeds ceiling {ceiling}")]
    ValueImbalance {
        /// The transaction's implicit fee, `None` when outputs exceed inputs.
        fee: Option<crate::amount::Amount>,
        /// The largest fee this key chain will co-sign for.
        ceiling: crate::amount::Amount,
    },
}

/// Capability interface for key custody backends.
pub trait KeyChain: Send + Sync {
    /// Whether this key chain holds key material for `script`.
    fn has_key_for(&self, script: &ScriptPubkey) -> bool;

    /// A fresh ownership proof for `script`, bound to `binding`.
    fn ownership_proof(
        &self,
        script: &ScriptPubkey,
        binding: &RoundBinding,
    ) -> Result<OwnershipProof, KeyChainError>;

    /// Sign the input of `transaction` that spends `coin`.
    ///
    /// Refuses to sign unless the proof was produced for this coin's script,
    /// the transaction spends the coin exactly once at its known amount, and
    /// the transaction's implicit fee is within this key chain's ceiling.
    fn sign(
        &self,
        transaction: &UnsignedTransaction,
        coin: &Coin,
        proof: &OwnershipProof,
    ) -> Result<InputWitness, KeyChainError>;
}

/// A key chain holding spend keys in process memory.
pub struct InMemoryKeyChain {
    keys: HashMap<ScriptPubkey, SpendPrivate>,
    max_fee_rate: FeeRate,
}

impl InMemoryKeyChain {
    /// Create an empty key chain that will co-sign fees up to
    /// `max_fee_rate` over the transaction's weight.
    pub fn new(max_fee_rate: FeeRate) -> Self {
        Self {
            keys: HashMap::new(),
            max_fee_rate,
        }
    }

    /// Add a spend key; returns the destination script it controls.
    pub fn add_key(&mut self, key: SpendPrivate) -> ScriptPubkey {
        let script = ScriptPubkey::from(&key.public());
        self.keys.insert(script, key);
        script
    }

    fn key_for(&self, script: &ScriptPubkey) -> Result<&SpendPrivate, KeyChainError> {
        self.keys
            .get(script)
            .ok_or(KeyChainError::KeyNotFound(*script))
    }
}

impl KeyChain for InMemoryKeyChain {
    fn has_key_for(&self, script: &ScriptPubkey) -> bool {
        self.keys.contains_key(script)
    }

    fn ownership_proof(
        &self,
        script: &ScriptPubkey,
        binding: &RoundBinding,
    ) -> Result<OwnershipProof, KeyChainError> {
        let key = self.key_for(script)?;
        Ok(OwnershipProof::prove(
            key,
            script.as_bytes(),
            binding,
            &mut OsRng,
        ))
    }

    fn sign(
        &self,
        transaction: &UnsignedTransaction,
        coin: &Coin,
        proof: &OwnershipProof,
    ) -> Result<InputWitness, KeyChainError> {
        if proof.script_pubkey != coin.script_pubkey.as_bytes() {
            return Err(KeyChainError::ProofMismatch);
        }

        let input_index = transaction
            .input_index(&coin.outpoint)
            .ok_or(KeyChainError::InputNotFound(coin.outpoint))?;

        // The transaction must spend the coin at the amount the wallet knows
        // it holds; an inflated claim can route the excess elsewhere while
        // the implicit fee still looks plausible.
        let claimed = transaction.inputs[input_index].amount;
        if claimed != coin.amount {
            return Err(KeyChainError::AmountMismatch {
                claimed,
                actual: coin.amount,
            });
        }

        // Local balance check before any witness exists: inputs must cover
        // outputs, and the implicit fee must be plausible for the weight.
        let ceiling = self.max_fee_rate.fee_for(transaction.weight());
        let fee = transaction.fee();
        match fee {
            Some(fee) if fee <= ceiling => {}
            _ => return Err(KeyChainError::ValueImbalance { fee, ceiling }),
        }

        let key = self.key_for(&coin.script_pubkey)?;
        Ok(InputWitness::sign(transaction, input_index, key, &mut OsRng))
    }
}
