// Copyright (c) 2026 Swirl Foundation

//! The round state machine.
//!
//! One [`RoundClient`] drives one round for one set of coins: input
//! registration, connection confirmation, output registration, transaction
//! signing. All round-scoped secrets (ownership proofs, credential sessions)
//! live in the client's arena and drop with it, so nothing survives into the
//! next round. Suspension points are exactly the coordinator calls and the
//! keep-alive timer; cancellation is checked at every one of them except
//! during signing, which always runs to completion once validation passes.

use crate::{
    backoff::retry_until,
    ban::BanList,
    coin::{Coin, CoinSource},
    config::ClientConfig,
    coordinator::{Coordinator, RejectionReason},
    error::{RoundError, ValidationFailure},
    keychain::KeyChain,
    round::{
        alice::{Alice, Bob},
        params::RoundParameters,
        phase::{EndState, Phase},
        OutputRequest,
    },
    transaction::{InputWitness, UnsignedTransaction, OUTPUT_WEIGHT},
};
use futures::future;
use rand_core::OsRng;
use std::sync::Arc;
use swl_crypto_credentials::ClientSession;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// What a successful round produced.
#[derive(Clone, Debug)]
pub struct RoundOutcome {
    /// The transaction this client co-signed.
    pub transaction: UnsignedTransaction,

    /// The witnesses submitted for this client's inputs.
    pub witnesses: Vec<InputWitness>,
}

/// Drives one round against a coordinator.
pub struct RoundClient<C, K> {
    coordinator: Arc<C>,
    keychain: Arc<K>,
    params: RoundParameters,
    config: ClientConfig,
    ban_list: BanList,
    cancel: CancellationToken,
    phase: Phase,
    round_tag: String,
}

impl<C: Coordinator, K: KeyChain> RoundClient<C, K> {
    /// Create a client for one round.
    pub fn new(
        coordinator: Arc<C>,
        keychain: Arc<K>,
        params: RoundParameters,
        config: ClientConfig,
        ban_list: BanList,
        cancel: CancellationToken,
    ) -> Self {
        let round_tag = hex::encode(&params.round_id[..8]);
        Self {
            coordinator,
            keychain,
            params,
            config,
            ban_list,
            cancel,
            phase: Phase::InputRegistration,
            round_tag,
        }
    }

    /// The current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Run the round to completion.
    ///
    /// Consumes the client: every proof and credential created for this
    /// round drops here, succeed or abort.
    pub async fn run(
        mut self,
        coin_source: &dyn CoinSource,
        outputs: Vec<OutputRequest>,
    ) -> Result<RoundOutcome, RoundError> {
        let coins = coin_source.select_coins();
        info!(
            round = %self.round_tag,
            coins = coins.len(),
            outputs = outputs.len(),
            "starting round"
        );

        let result = self.drive(coins, outputs).await;
        match &result {
            Ok(_) => info!(round = %self.round_tag, "round succeeded"),
            Err(err) => {
                if !self.phase.is_ended() {
                    self.phase = self
                        .phase
                        .advance_to(Phase::Ended(EndState::Aborted))
                        .unwrap_or(Phase::Ended(EndState::Aborted));
                }
                if err.is_security_relevant() {
                    error!(round = %self.round_tag, %err, "round aborted on security failure");
                } else {
                    info!(round = %self.round_tag, %err, "round aborted");
                }
            }
        }
        result
    }

    async fn drive(
        &mut self,
        coins: Vec<Coin>,
        outputs: Vec<OutputRequest>,
    ) -> Result<RoundOutcome, RoundError> {
        let mut alices = self.register_inputs(coins).await?;
        self.advance(Phase::ConnectionConfirmation)?;
        self.confirm_connections(&mut alices).await?;
        self.advance(Phase::OutputRegistration)?;
        let bobs = self.register_outputs(&mut alices, outputs).await?;
        self.advance(Phase::TransactionSigning)?;
        let outcome = self.sign_and_submit(&alices, &bobs).await?;
        self.advance(Phase::Ended(EndState::Success))?;
        Ok(outcome)
    }

    fn advance(&mut self, next: Phase) -> Result<(), RoundError> {
        let from = self.phase;
        self.phase = from.advance_to(next)?;
        info!(round = %self.round_tag, %from, to = %next, "phase advance");
        Ok(())
    }

    /// Register every eligible coin, concurrently, before the input
    /// registration deadline.
    async fn register_inputs(&self, coins: Vec<Coin>) -> Result<Vec<Alice>, RoundError> {
        let mut eligible = Vec::with_capacity(coins.len());
        for coin in coins {
            if self.ban_list.is_banned(&coin.outpoint) {
                info!(round = %self.round_tag, outpoint = %coin.outpoint, "skipping banned coin");
                continue;
            }
            if self.params.effective_value(coin.amount).is_none() {
                warn!(
                    round = %self.round_tag,
                    outpoint = %coin.outpoint,
                    "coin too small to pay its input fee, skipping"
                );
                continue;
            }
            eligible.push(coin);
        }
        if eligible.len() > self.params.max_input_count {
            warn!(
                round = %self.round_tag,
                selected = eligible.len(),
                max = self.params.max_input_count,
                "truncating coin selection to round input limit"
            );
            eligible.truncate(self.params.max_input_count);
        }
        if eligible.is_empty() {
            return Err(RoundError::NoInputsRegistered);
        }

        let results = future::join_all(eligible.into_iter().map(|coin| {
            let outpoint = coin.outpoint;
            async move { (outpoint, self.register_one(coin).await) }
        }))
        .await;

        let mut alices = Vec::new();
        for (outpoint, result) in results {
            match result {
                Ok(alice) => alices.push(alice),
                Err(RoundError::Rejected { reason, .. }) => {
                    if reason == RejectionReason::CoinBanned {
                        self.ban_list.ban(outpoint);
                        warn!(
                            round = %self.round_tag,
                            %outpoint,
                            "coin banned by coordinator, permanently excluded"
                        );
                    } else {
                        info!(
                            round = %self.round_tag,
                            %outpoint,
                            %reason,
                            "input rejected, coin ineligible this round"
                        );
                    }
                }
                Err(fatal) => return Err(fatal),
            }
        }

        if alices.is_empty() {
            return Err(RoundError::NoInputsRegistered);
        }
        Ok(alices)
    }

    async fn register_one(&self, coin: Coin) -> Result<Alice, RoundError> {
        let binding = self.params.binding();
        let proof = self
            .keychain
            .ownership_proof(&coin.script_pubkey, &binding)?;

        // Eligibility was checked before spawning.
        let initial_value = self
            .params
            .effective_value(coin.amount)
            .ok_or(RoundError::NoInputsRegistered)?;
        let weight_allowance = self
            .params
            .per_alice_weight_budget
            .checked_sub(crate::transaction::INPUT_WEIGHT)
            .ok_or(RoundError::WeightBudgetExceeded {
                budget: self.params.per_alice_weight_budget,
                input: crate::transaction::INPUT_WEIGHT,
            })?;

        let mut amount = ClientSession::new(self.params.amount_issuer);
        let mut weight = ClientSession::new(self.params.weight_issuer);
        let amount_request = amount.request_initial(initial_value.to_sats(), &mut OsRng)?;
        let weight_request = weight.request_initial(weight_allowance.to_wu(), &mut OsRng)?;

        let response = retry_until(
            "register_input",
            self.params.deadlines.input_registration,
            &self.config,
            &self.cancel,
            || {
                self.coordinator.register_input(
                    self.params.round_id,
                    coin.outpoint,
                    proof.clone(),
                    amount_request.clone(),
                    weight_request.clone(),
                )
            },
        )
        .await?;

        amount.absorb(&response.amount_credentials)?;
        weight.absorb(&response.weight_credentials)?;
        info!(
            round = %self.round_tag,
            outpoint = %coin.outpoint,
            alice_id = response.alice_id,
            "input registered"
        );

        Ok(Alice {
            coin,
            alice_id: response.alice_id,
            ownership_proof: proof,
            amount,
            weight,
        })
    }

    /// Keep-alive reissuance for every alice until the confirmation phase
    /// window closes.
    async fn confirm_connections(&self, alices: &mut [Alice]) -> Result<(), RoundError> {
        let deadline = self.params.deadlines.connection_confirmation;
        loop {
            for alice in alices.iter_mut() {
                self.confirm_one(alice, deadline).await?;
            }

            let interval = self.config.keep_alive_interval;
            if Instant::now() + interval >= deadline {
                return Ok(());
            }
            tokio::select! {
                _ = self.cancel.cancelled() => return Err(RoundError::Cancelled),
                _ = sleep(interval) => {}
            }
        }
    }

    async fn confirm_one(&self, alice: &mut Alice, deadline: Instant) -> Result<(), RoundError> {
        // A zero-delta reissue of the full held value: proves liveness and
        // conserves totals by construction.
        let amount_request = alice
            .amount
            .request_reissue(&[alice.amount.total(), 0], &mut OsRng)?;
        let weight_request = alice
            .weight
            .request_reissue(&[alice.weight.total(), 0], &mut OsRng)?;

        let response = retry_until(
            "confirm_connection",
            deadline,
            &self.config,
            &self.cancel,
            || {
                self.coordinator.confirm_connection(
                    self.params.round_id,
                    alice.alice_id,
                    amount_request.clone(),
                    weight_request.clone(),
                )
            },
        )
        .await?;

        alice.amount.absorb(&response.amount_credentials)?;
        alice.weight.absorb(&response.weight_credentials)?;
        Ok(())
    }

    /// Register each desired output against one alice's credentials.
    async fn register_outputs(
        &self,
        alices: &mut [Alice],
        outputs: Vec<OutputRequest>,
    ) -> Result<Vec<Bob>, RoundError> {
        let deadline = self.params.deadlines.output_registration;
        let output_fee = self.params.output_fee();
        let mut bobs = Vec::with_capacity(outputs.len());

        for request in outputs {
            if !self.params.denomination_allowed(request.amount) {
                return Err(RoundError::DisallowedDenomination(request.amount));
            }
            let amount_cost = request
                .amount
                .checked_add(output_fee)
                .ok_or(swl_crypto_credentials::Error::ValueOverflow)?;
            let weight_cost = OUTPUT_WEIGHT.to_wu();

            // Greedy assignment: the first alice whose remaining credentials
            // cover this output funds it.
            let alice = alices
                .iter_mut()
                .find(|a| {
                    a.amount.total() >= amount_cost.to_sats() && a.weight.total() >= weight_cost
                })
                .ok_or(RoundError::CannotFundOutput(request.amount))?;

            let amount_presentation = alice
                .amount
                .request_presentation(amount_cost.to_sats(), &mut OsRng)?;
            let weight_presentation =
                alice.weight.request_presentation(weight_cost, &mut OsRng)?;

            let response = retry_until(
                "register_output",
                deadline,
                &self.config,
                &self.cancel,
                || {
                    self.coordinator.register_output(
                        self.params.round_id,
                        request.script_pubkey,
                        request.amount,
                        amount_presentation.clone(),
                        weight_presentation.clone(),
                    )
                },
            )
            .await?;

            alice.amount.absorb(&response.amount_credentials)?;
            alice.weight.absorb(&response.weight_credentials)?;
            info!(
                round = %self.round_tag,
                amount = %request.amount,
                "output registered"
            );
            bobs.push(Bob {
                script_pubkey: request.script_pubkey,
                amount: request.amount,
            });
        }

        Ok(bobs)
    }

    /// Fetch, validate, sign and submit.
    async fn sign_and_submit(
        &self,
        alices: &[Alice],
        bobs: &[Bob],
    ) -> Result<RoundOutcome, RoundError> {
        let deadline = self.params.deadlines.transaction_signing;

        let transaction = loop {
            let maybe = retry_until(
                "get_unsigned_transaction",
                deadline,
                &self.config,
                &self.cancel,
                || self.coordinator.get_unsigned_transaction(self.params.round_id),
            )
            .await?;
            match maybe {
                Some(transaction) => break transaction,
                None => {
                    let interval = self.config.poll_interval;
                    if Instant::now() + interval >= deadline {
                        return Err(RoundError::DeadlinePassed("get_unsigned_transaction"));
                    }
                    tokio::select! {
                        _ = self.cancel.cancelled() => return Err(RoundError::Cancelled),
                        _ = sleep(interval) => {}
                    }
                }
            }
        };

        let coins: Vec<Coin> = alices.iter().map(|a| a.coin.clone()).collect();
        validate_transaction(
            &self.params,
            self.keychain.as_ref(),
            &coins,
            bobs,
            &transaction,
        )?;

        // Signing is not cancellable: withholding produced witnesses only
        // wastes the round, it protects nothing.
        let mut witnesses = Vec::with_capacity(alices.len());
        for alice in alices {
            let witness = self
                .keychain
                .sign(&transaction, &alice.coin, &alice.ownership_proof)?;
            witnesses.push(witness);
        }

        let no_cancel = CancellationToken::new();
        let mut first_error = None;
        for witness in &witnesses {
            let result = retry_until(
                "submit_signature",
                deadline,
                &self.config,
                &no_cancel,
                || {
                    self.coordinator
                        .submit_signature(self.params.round_id, witness.clone())
                },
            )
            .await;
            if let Err(err) = result {
                warn!(round = %self.round_tag, input = witness.input_index, %err, "witness submission failed");
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
        if let Some(err) = first_error {
            return Err(err);
        }

        Ok(RoundOutcome {
            transaction,
            witnesses,
        })
    }
}

/// The pre-signing checks over a coordinator-assembled transaction.
pub(crate) fn validate_transaction(
    params: &RoundParameters,
    keychain: &dyn KeyChain,
    coins: &[Coin],
    bobs: &[Bob],
    transaction: &UnsignedTransaction,
) -> Result<(), ValidationFailure> {
    // The declared minimum input count is an anonymity floor; a smaller
    // transaction than agreed gets no signature.
    if transaction.inputs.len() < params.min_input_count {
        return Err(ValidationFailure::TooFewInputs {
            required: params.min_input_count,
            actual: transaction.inputs.len(),
        });
    }

    // (a) Every registered coin appears exactly once, with its amount.
    for coin in coins {
        let matching = transaction
            .inputs
            .iter()
            .filter(|input| input.outpoint == coin.outpoint)
            .count();
        let exact = transaction
            .inputs
            .iter()
            .filter(|input| input.outpoint == coin.outpoint && input.amount == coin.amount)
            .count();
        if matching != 1 || exact != 1 {
            return Err(ValidationFailure::InputMismatch(coin.outpoint));
        }
    }

    // (b) Every registered output appears exactly as often as registered.
    for bob in bobs {
        let registered = bobs.iter().filter(|b| *b == bob).count();
        let present = transaction
            .outputs
            .iter()
            .filter(|o| o.script_pubkey == bob.script_pubkey && o.amount == bob.amount)
            .count();
        if present != registered {
            return Err(ValidationFailure::OutputMismatch {
                script: bob.script_pubkey,
                amount: bob.amount,
            });
        }
    }

    // (c) The implicit fee matches the round's fee rate within tolerance.
    let fee = transaction.fee().ok_or(ValidationFailure::NegativeFee)?;
    let expected = params.fee_rate.fee_for(transaction.weight());
    if fee.abs_diff(expected) > params.fee_tolerance {
        return Err(ValidationFailure::FeeOutOfTolerance {
            expected,
            actual: fee,
            tolerance: params.fee_tolerance,
        });
    }

    // (d) No unregistered output pays back into this wallet.
    for output in &transaction.outputs {
        let registered = bobs
            .iter()
            .any(|b| b.script_pubkey == output.script_pubkey && b.amount == output.amount);
        if !registered && keychain.has_key_for(&output.script_pubkey) {
            return Err(ValidationFailure::UnexpectedOwnOutput);
        }
    }

    Ok(())
}
