// Copyright (c) 2026 Swirl Foundation

//! Shared test harness: an honest in-process coordinator with switches to
//! misbehave, plus wallet fixtures.

#![allow(dead_code)]

use async_trait::async_trait;
use rand_core::OsRng;
use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};
use swirl::{
    amount::{Amount, FeeRate, Weight},
    coin::{Coin, OutPoint, ScriptPubkey},
    coordinator::{
        ConnectionConfirmationResponse, Coordinator, CoordinatorError, InputRegistrationResponse,
        OutputRegistrationResponse, RejectionReason,
    },
    keychain::InMemoryKeyChain,
    round::{PhaseDeadlines, RoundParameters},
    transaction::{InputWitness, TxIn, TxOut, UnsignedTransaction, INPUT_WEIGHT, OUTPUT_WEIGHT},
    ClientConfig,
};
use swl_crypto_credentials::{CredentialRequest, Issuer};
use swl_crypto_keys::SpendPrivate;
use tokio::time::Instant;

/// Route client logs through the test harness.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// A client config with test-friendly timing.
pub fn test_config() -> ClientConfig {
    ClientConfig {
        keep_alive_interval: Duration::from_secs(25),
        backoff_base: Duration::from_millis(100),
        backoff_cap: Duration::from_secs(1),
        poll_interval: Duration::from_secs(1),
    }
}

/// A wallet holding one key per funded coin.
pub fn funded_wallet(amounts: &[u64]) -> (InMemoryKeyChain, Vec<Coin>) {
    let mut keychain = InMemoryKeyChain::new(FeeRate::from_sats_per_kwu(10_000));
    let coins = amounts
        .iter()
        .enumerate()
        .map(|(i, amount)| {
            let script = keychain.add_key(SpendPrivate::from_random(&mut OsRng));
            let mut txid = [0u8; 32];
            txid[0] = i as u8 + 1;
            Coin {
                outpoint: OutPoint::new(txid, i as u32),
                amount: Amount::from_sats(*amount),
                script_pubkey: script,
            }
        })
        .collect();
    (keychain, coins)
}

/// A fresh destination script the wallet controls.
pub fn fresh_script(keychain: &mut InMemoryKeyChain) -> ScriptPubkey {
    keychain.add_key(SpendPrivate::from_random(&mut OsRng))
}

struct RegisteredInput {
    alice_id: u64,
    outpoint: OutPoint,
}

struct State {
    amount_issuer: Issuer,
    weight_issuer: Issuer,
    inputs: Vec<RegisteredInput>,
    outputs: Vec<TxOut>,
    transaction: Option<UnsignedTransaction>,
    witnesses: Vec<InputWitness>,
    next_alice_id: u64,
}

/// An honest reference coordinator for one round, with misbehaviour
/// switches for the adversarial scenarios.
pub struct TestCoordinator {
    params: RoundParameters,
    utxos: HashMap<OutPoint, Coin>,
    banned: HashSet<OutPoint>,
    omit_registered_outputs: bool,
    skim: Option<Amount>,
    register_input_calls: AtomicUsize,
    state: Mutex<State>,
}

impl TestCoordinator {
    /// A coordinator that knows about `utxos` and runs round `round_id`.
    pub fn new(round_id: [u8; 32], utxos: &[Coin]) -> Self {
        let amount_issuer = Issuer::from_random(&mut OsRng);
        let weight_issuer = Issuer::from_random(&mut OsRng);
        let params = RoundParameters {
            round_id,
            coordinator_id: "test-coordinator".into(),
            amount_issuer: amount_issuer.params(),
            weight_issuer: weight_issuer.params(),
            fee_rate: FeeRate::from_sats_per_kwu(1000),
            fee_tolerance: Amount::from_sats(10),
            allowed_denominations: Vec::new(),
            min_input_count: 1,
            max_input_count: 10,
            per_alice_weight_budget: Weight::from_wu(4000),
            deadlines: PhaseDeadlines::staggered(Instant::now(), Duration::from_secs(60)),
        };
        Self {
            params,
            utxos: utxos
                .iter()
                .map(|coin| (coin.outpoint, coin.clone()))
                .collect(),
            banned: HashSet::new(),
            omit_registered_outputs: false,
            skim: None,
            register_input_calls: AtomicUsize::new(0),
            state: Mutex::new(State {
                amount_issuer,
                weight_issuer,
                inputs: Vec::new(),
                outputs: Vec::new(),
                transaction: None,
                witnesses: Vec::new(),
                next_alice_id: 0,
            }),
        }
    }

    /// Treat `outpoint` as banned.
    pub fn with_ban(mut self, outpoint: OutPoint) -> Self {
        self.banned.insert(outpoint);
        self
    }

    /// Assemble the transaction without any registered output.
    pub fn omitting_registered_outputs(mut self) -> Self {
        self.omit_registered_outputs = true;
        self
    }

    /// Skim `amount` out of the fee pool into an unregistered output.
    pub fn skimming(mut self, amount: Amount) -> Self {
        self.skim = Some(amount);
        self
    }

    /// The round parameters a client would fetch out of band.
    pub fn round_params(&self) -> RoundParameters {
        self.params.clone()
    }

    /// How many input registration attempts reached this coordinator.
    pub fn register_input_calls(&self) -> usize {
        self.register_input_calls.load(Ordering::SeqCst)
    }

    /// How many witnesses were accepted.
    pub fn witness_count(&self) -> usize {
        self.state.lock().expect("state").witnesses.len()
    }

    fn check_round(&self, round_id: [u8; 32]) -> Result<(), CoordinatorError> {
        if round_id != self.params.round_id {
            return Err(CoordinatorError::Rejected(RejectionReason::WrongPhase));
        }
        Ok(())
    }

    fn expect_delta(request: &CredentialRequest, expected: i64) -> Result<(), CoordinatorError> {
        if request.delta != expected {
            return Err(CoordinatorError::Rejected(
                RejectionReason::InvalidCredentialRequest,
            ));
        }
        Ok(())
    }
}

fn credential_rejection(_e: swl_crypto_credentials::Error) -> CoordinatorError {
    CoordinatorError::Rejected(RejectionReason::InvalidCredentialRequest)
}

#[async_trait]
impl Coordinator for TestCoordinator {
    async fn register_input(
        &self,
        round_id: [u8; 32],
        outpoint: OutPoint,
        ownership_proof: swl_crypto_ownership::OwnershipProof,
        amount_request: CredentialRequest,
        weight_request: CredentialRequest,
    ) -> Result<InputRegistrationResponse, CoordinatorError> {
        self.register_input_calls.fetch_add(1, Ordering::SeqCst);
        self.check_round(round_id)?;

        if self.banned.contains(&outpoint) {
            return Err(CoordinatorError::Rejected(RejectionReason::CoinBanned));
        }
        let coin = self
            .utxos
            .get(&outpoint)
            .ok_or(CoordinatorError::Rejected(RejectionReason::UnknownCoin))?;

        // The proof must cover exactly this coin's script, bound to this
        // round.
        let key = coin
            .script_pubkey
            .spend_public()
            .map_err(|_e| CoordinatorError::Rejected(RejectionReason::UnknownCoin))?;
        if ownership_proof.script_pubkey != coin.script_pubkey.as_bytes()
            || ownership_proof.verify(&key, &self.params.binding()).is_err()
        {
            return Err(CoordinatorError::Rejected(
                RejectionReason::InvalidOwnershipProof,
            ));
        }

        // Issued value is the coin minus its fee share; issued weight is the
        // per-alice budget minus the input's own weight.
        let expected_value = self
            .params
            .effective_value(coin.amount)
            .ok_or(CoordinatorError::Rejected(RejectionReason::UnknownCoin))?;
        Self::expect_delta(&amount_request, expected_value.to_sats() as i64)?;
        let expected_weight =
            self.params.per_alice_weight_budget.to_wu() - INPUT_WEIGHT.to_wu();
        Self::expect_delta(&weight_request, expected_weight as i64)?;

        let mut state = self.state.lock().expect("state");
        let amount_credentials = state
            .amount_issuer
            .process(&amount_request, &mut OsRng)
            .map_err(credential_rejection)?;
        let weight_credentials = state
            .weight_issuer
            .process(&weight_request, &mut OsRng)
            .map_err(credential_rejection)?;

        let alice_id = state.next_alice_id;
        state.next_alice_id += 1;
        state.inputs.push(RegisteredInput { alice_id, outpoint });

        Ok(InputRegistrationResponse {
            alice_id,
            amount_credentials,
            weight_credentials,
        })
    }

    async fn confirm_connection(
        &self,
        round_id: [u8; 32],
        alice_id: u64,
        amount_request: CredentialRequest,
        weight_request: CredentialRequest,
    ) -> Result<ConnectionConfirmationResponse, CoordinatorError> {
        self.check_round(round_id)?;
        Self::expect_delta(&amount_request, 0)?;
        Self::expect_delta(&weight_request, 0)?;

        let mut state = self.state.lock().expect("state");
        if !state.inputs.iter().any(|input| input.alice_id == alice_id) {
            return Err(CoordinatorError::Rejected(RejectionReason::UnknownAlice));
        }

        let amount_credentials = state
            .amount_issuer
            .process(&amount_request, &mut OsRng)
            .map_err(credential_rejection)?;
        let weight_credentials = state
            .weight_issuer
            .process(&weight_request, &mut OsRng)
            .map_err(credential_rejection)?;

        Ok(ConnectionConfirmationResponse {
            amount_credentials,
            weight_credentials,
        })
    }

    async fn register_output(
        &self,
        round_id: [u8; 32],
        script_pubkey: ScriptPubkey,
        amount: Amount,
        amount_presentation: CredentialRequest,
        weight_presentation: CredentialRequest,
    ) -> Result<OutputRegistrationResponse, CoordinatorError> {
        self.check_round(round_id)?;
        if !self.params.denomination_allowed(amount) {
            return Err(CoordinatorError::Rejected(
                RejectionReason::DisallowedDenomination,
            ));
        }

        // The presented value must cover the output plus its fee share; the
        // presented weight must cover the output's weight.
        let cost = amount
            .checked_add(self.params.output_fee())
            .ok_or(CoordinatorError::Rejected(
                RejectionReason::InvalidCredentialRequest,
            ))?;
        Self::expect_delta(&amount_presentation, -(cost.to_sats() as i64))?;
        Self::expect_delta(&weight_presentation, -(OUTPUT_WEIGHT.to_wu() as i64))?;

        let mut state = self.state.lock().expect("state");
        let amount_credentials = state
            .amount_issuer
            .process(&amount_presentation, &mut OsRng)
            .map_err(credential_rejection)?;
        let weight_credentials = state
            .weight_issuer
            .process(&weight_presentation, &mut OsRng)
            .map_err(credential_rejection)?;

        state.outputs.push(TxOut {
            script_pubkey,
            amount,
        });

        Ok(OutputRegistrationResponse {
            amount_credentials,
            weight_credentials,
        })
    }

    async fn get_unsigned_transaction(
        &self,
        round_id: [u8; 32],
    ) -> Result<Option<UnsignedTransaction>, CoordinatorError> {
        self.check_round(round_id)?;
        let mut state = self.state.lock().expect("state");

        if state.transaction.is_none() {
            let inputs: Vec<TxIn> = state
                .inputs
                .iter()
                .filter_map(|input| self.utxos.get(&input.outpoint))
                .map(|coin| TxIn {
                    outpoint: coin.outpoint,
                    amount: coin.amount,
                })
                .collect();
            let mut outputs = if self.omit_registered_outputs {
                Vec::new()
            } else {
                state.outputs.clone()
            };
            if let Some(skim) = self.skim {
                outputs.push(TxOut {
                    script_pubkey: ScriptPubkey::from([0x5au8; 32]),
                    amount: skim,
                });
            }
            state.transaction = Some(UnsignedTransaction { inputs, outputs });
        }

        Ok(state.transaction.clone())
    }

    async fn submit_signature(
        &self,
        round_id: [u8; 32],
        witness: InputWitness,
    ) -> Result<(), CoordinatorError> {
        self.check_round(round_id)?;
        let mut state = self.state.lock().expect("state");

        let transaction = state
            .transaction
            .as_ref()
            .ok_or(CoordinatorError::Rejected(RejectionReason::WrongPhase))?;
        let input = transaction
            .inputs
            .get(witness.input_index)
            .ok_or(CoordinatorError::Rejected(RejectionReason::InvalidWitness))?;
        let coin = self
            .utxos
            .get(&input.outpoint)
            .ok_or(CoordinatorError::Rejected(RejectionReason::InvalidWitness))?;
        let key = coin
            .script_pubkey
            .spend_public()
            .map_err(|_e| CoordinatorError::Rejected(RejectionReason::InvalidWitness))?;
        if witness.verify(transaction, &key).is_err() {
            return Err(CoordinatorError::Rejected(RejectionReason::InvalidWitness));
        }

        state.witnesses.push(witness);
        Ok(())
    }
}
