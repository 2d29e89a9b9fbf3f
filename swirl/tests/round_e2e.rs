// Copyright (c) 2026 Swirl Foundation

//! End-to-end rounds against the honest reference coordinator.

mod common;

use common::{fresh_script, funded_wallet, init_logging, test_config, TestCoordinator};
use std::sync::Arc;
use swirl::{
    amount::Amount,
    error::RoundError,
    round::{OutputRequest, RoundClient},
    BanList,
};
use tokio_util::sync::CancellationToken;

#[tokio::test(start_paused = true)]
async fn test_single_coin_round_succeeds() {
    init_logging();
    let (mut keychain, coins) = funded_wallet(&[100_000]);
    let destination = fresh_script(&mut keychain);
    let coordinator = Arc::new(TestCoordinator::new([1u8; 32], &coins));
    let params = coordinator.round_params();

    // 100_000 sats in, minus 272 sats input fee and 124 sats output fee.
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
    let outcome = client.run(&coins, outputs).await.expect("round succeeds");

    assert_eq!(outcome.witnesses.len(), 1);
    assert_eq!(coordinator.witness_count(), 1);
    assert_eq!(outcome.transaction.fee(), Some(Amount::from_sats(396)));

    // The produced witness is valid for the registered input.
    let key = coins[0].script_pubkey.spend_public().expect("script key");
    assert!(outcome.witnesses[0]
        .verify(&outcome.transaction, &key)
        .is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_two_coins_two_outputs_round_succeeds() {
    init_logging();
    let (mut keychain, coins) = funded_wallet(&[100_000, 50_000]);
    let first = fresh_script(&mut keychain);
    let second = fresh_script(&mut keychain);
    let coordinator = Arc::new(TestCoordinator::new([2u8; 32], &coins));
    let params = coordinator.round_params();

    let outputs = vec![
        OutputRequest {
            script_pubkey: first,
            amount: Amount::from_sats(99_604),
        },
        OutputRequest {
            script_pubkey: second,
            amount: Amount::from_sats(49_604),
        },
    ];

    let client = RoundClient::new(
        coordinator.clone(),
        Arc::new(keychain),
        params,
        test_config(),
        BanList::new(),
        CancellationToken::new(),
    );
    let outcome = client.run(&coins, outputs).await.expect("round succeeds");

    assert_eq!(outcome.witnesses.len(), 2);
    assert_eq!(coordinator.witness_count(), 2);
    assert_eq!(outcome.transaction.inputs.len(), 2);
    assert_eq!(outcome.transaction.outputs.len(), 2);
    // 2 * 272 + 2 * 124 wu at 1000 sats/kwu.
    assert_eq!(outcome.transaction.fee(), Some(Amount::from_sats(792)));
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_aborts_without_signing() {
    init_logging();
    let (mut keychain, coins) = funded_wallet(&[100_000]);
    let destination = fresh_script(&mut keychain);
    let coordinator = Arc::new(TestCoordinator::new([3u8; 32], &coins));
    let params = coordinator.round_params();

    let cancel = CancellationToken::new();
    cancel.cancel();

    let client = RoundClient::new(
        coordinator.clone(),
        Arc::new(keychain),
        params,
        test_config(),
        BanList::new(),
        cancel,
    );
    let outputs = vec![OutputRequest {
        script_pubkey: destination,
        amount: Amount::from_sats(99_604),
    }];
    let result = client.run(&coins, outputs).await;

    assert!(matches!(result, Err(RoundError::Cancelled)));
    assert_eq!(coordinator.witness_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_dust_coin_is_skipped() {
    init_logging();
    // 100 sats cannot pay its own 272 sat input fee share.
    let (mut keychain, coins) = funded_wallet(&[100, 50_000]);
    let destination = fresh_script(&mut keychain);
    let coordinator = Arc::new(TestCoordinator::new([4u8; 32], &coins));
    let params = coordinator.round_params();

    let outputs = vec![OutputRequest {
        script_pubkey: destination,
        amount: Amount::from_sats(49_604),
    }];
    let client = RoundClient::new(
        coordinator.clone(),
        Arc::new(keychain),
        params,
        test_config(),
        BanList::new(),
        CancellationToken::new(),
    );
    let outcome = client.run(&coins, outputs).await.expect("round succeeds");

    // Only the funded coin was registered.
    assert_eq!(outcome.transaction.inputs.len(), 1);
    assert_eq!(outcome.transaction.inputs[0].outpoint, coins[1].outpoint);
    assert_eq!(coordinator.witness_count(), 1);
}
