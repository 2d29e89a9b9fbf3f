// Copyright (c) 2026 Swirl Foundation

//! Rounds against a misbehaving coordinator: signing must be withheld, bans
//! must stick.

mod common;

use common::{fresh_script, funded_wallet, init_logging, test_config, TestCoordinator};
use std::sync::Arc;
use swirl::{
    amount::Amount,
    error::{RoundError, ValidationFailure},
    round::{OutputRequest, RoundClient},
    BanList,
};
use tokio_util::sync::CancellationToken;

#[tokio::test(start_paused = true)]
async fn test_omitted_output_refuses_to_sign() {
    init_logging();
    let (mut keychain, coins) = funded_wallet(&[100_000]);
    let destination = fresh_script(&mut keychain);
    let coordinator = Arc::new(
        TestCoordinator::new([1u8; 32], &coins).omitting_registered_outputs(),
    );
    let params = coordinator.round_params();

    let outputs = vec![OutputRequest {
        script_pubkey: destination,
        amount: Amount::from_sats(99_604),
    }];
    let client = RoundClient::new(
        coordinator.clone(),
        Arc::new(keychain),
        params,
        test_config(),
        BanList::new(),
        CancellationToken::new(),
    );
    let result = client.run(&coins, outputs).await;

    assert!(matches!(
        result,
        Err(RoundError::TransactionValidation(
            ValidationFailure::OutputMismatch { .. }
        ))
    ));
    // No witness ever reached the coordinator.
    assert_eq!(coordinator.witness_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_fee_skim_refuses_to_sign() {
    init_logging();
    let (mut keychain, coins) = funded_wallet(&[100_000]);
    let destination = fresh_script(&mut keychain);
    // 300 of the 396 sat fee pool diverted to an unregistered output.
    let coordinator = Arc::new(
        TestCoordinator::new([2u8; 32], &coins).skimming(Amount::from_sats(300)),
    );
    let params = coordinator.round_params();

    let outputs = vec![OutputRequest {
        script_pubkey: destination,
        amount: Amount::from_sats(99_604),
    }];
    let client = RoundClient::new(
        coordinator.clone(),
        Arc::new(keychain),
        params,
        test_config(),
        BanList::new(),
        CancellationToken::new(),
    );
    let result = client.run(&coins, outputs).await;

    assert!(matches!(
        result,
        Err(RoundError::TransactionValidation(
            ValidationFailure::FeeOutOfTolerance { .. }
        ))
    ));
    assert_eq!(coordinator.witness_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_banned_coin_is_never_resubmitted() {
    init_logging();
    let (mut keychain, coins) = funded_wallet(&[100_000]);
    let destination = fresh_script(&mut keychain);
    let keychain = Arc::new(keychain);
    let ban_list = BanList::new();

    // Round 1: the coordinator bans the coin at registration.
    let first = Arc::new(TestCoordinator::new([3u8; 32], &coins).with_ban(coins[0].outpoint));
    let client = RoundClient::new(
        first.clone(),
        keychain.clone(),
        first.round_params(),
        test_config(),
        ban_list.clone(),
        CancellationToken::new(),
    );
    let outputs = vec![OutputRequest {
        script_pubkey: destination,
        amount: Amount::from_sats(99_604),
    }];
    let result = client.run(&coins, outputs.clone()).await;

    assert!(matches!(result, Err(RoundError::NoInputsRegistered)));
    assert_eq!(first.register_input_calls(), 1);
    assert!(ban_list.is_banned(&coins[0].outpoint));

    // Round 2: a fresh round, same ban list. The coin is filtered out
    // locally and never reaches the coordinator.
    let second = Arc::new(TestCoordinator::new([4u8; 32], &coins));
    let client = RoundClient::new(
        second.clone(),
        keychain,
        second.round_params(),
        test_config(),
        ban_list.clone(),
        CancellationToken::new(),
    );
    let result = client.run(&coins, outputs).await;

    assert!(matches!(result, Err(RoundError::NoInputsRegistered)));
    assert_eq!(second.register_input_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_round_proceeds_without_banned_coin() {
    init_logging();
    let (mut keychain, coins) = funded_wallet(&[100_000, 50_000]);
    let destination = fresh_script(&mut keychain);
    let coordinator =
        Arc::new(TestCoordinator::new([5u8; 32], &coins).with_ban(coins[0].outpoint));
    let params = coordinator.round_params();
    let ban_list = BanList::new();

    let outputs = vec![OutputRequest {
        script_pubkey: destination,
        amount: Amount::from_sats(49_604),
    }];
    let client = RoundClient::new(
        coordinator.clone(),
        Arc::new(keychain),
        params,
        test_config(),
        ban_list.clone(),
        CancellationToken::new(),
    );
    let outcome = client.run(&coins, outputs).await.expect("round succeeds");

    // The surviving coin completed the round; the banned one is recorded.
    assert_eq!(outcome.transaction.inputs.len(), 1);
    assert_eq!(outcome.transaction.inputs[0].outpoint, coins[1].outpoint);
    assert!(ban_list.is_banned(&coins[0].outpoint));
    assert_eq!(coordinator.witness_count(), 1);
}
