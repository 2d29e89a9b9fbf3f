// Copyright (c) 2026 Swirl Foundation

//! Bounded retry for coordinator calls.
//!
//! Transport failures retry with doubling delays until the phase deadline;
//! rejections and cancellation return immediately. This is the only place
//! retry policy lives.

use crate::{config::ClientConfig, coordinator::CoordinatorError, error::RoundError};
use std::future::Future;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Call `call` until it succeeds, is rejected, is cancelled, or the phase
/// deadline passes.
pub(crate) async fn retry_until<T, F, Fut>(
    operation: &'static str,
    deadline: Instant,
    config: &ClientConfig,
    cancel: &CancellationToken,
    mut call: F,
) -> Result<T, RoundError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CoordinatorError>>,
{
    let mut delay = config.backoff_base;
    loop {
        if cancel.is_cancelled() {
            return Err(RoundError::Cancelled);
        }
        if Instant::now() >= deadline {
            return Err(RoundError::DeadlinePassed(operation));
        }

        match call().await {
            Ok(value) => return Ok(value),
            Err(CoordinatorError::Rejected(reason)) => {
                return Err(RoundError::Rejected { operation, reason })
            }
            Err(CoordinatorError::Transport(message)) => {
                if Instant::now() + delay >= deadline {
                    return Err(RoundError::DeadlinePassed(operation));
                }
                warn!(operation, %message, ?delay, "transport failure, backing off");
                tokio::select! {
                    _ = cancel.cancelled() => return Err(RoundError::Cancelled),
                    _ = sleep(delay) => {}
                }
                delay = (delay * 2).min(config.backoff_cap);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::RejectionReason;
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    fn test_config() -> ClientConfig {
        ClientConfig {
            backoff_base: Duration::from_millis(10),
            backoff_cap: Duration::from_millis(40),
            ..ClientConfig::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failures_retry_until_success() {
        let attempts = AtomicUsize::new(0);
        let deadline = Instant::now() + Duration::from_secs(10);
        let cancel = CancellationToken::new();

        let result = retry_until("op", deadline, &test_config(), &cancel, || {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 3 {
                    Err(CoordinatorError::Transport("flaky".into()))
                } else {
                    Ok(42u32)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejection_is_never_retried() {
        let attempts = AtomicUsize::new(0);
        let deadline = Instant::now() + Duration::from_secs(10);
        let cancel = CancellationToken::new();

        let result: Result<u32, RoundError> =
            retry_until("op", deadline, &test_config(), &cancel, || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(CoordinatorError::Rejected(RejectionReason::RoundFull)) }
            })
            .await;

        assert!(matches!(
            result,
            Err(RoundError::Rejected {
                reason: RejectionReason::RoundFull,
                ..
            })
        ));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_stops_retrying() {
        let deadline = Instant::now() + Duration::from_millis(30);
        let cancel = CancellationToken::new();

        let result: Result<u32, RoundError> =
            retry_until("op", deadline, &test_config(), &cancel, || async {
                Err(CoordinatorError::Transport("down".into()))
            })
            .await;

        assert!(matches!(result, Err(RoundError::DeadlinePassed("op"))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_wins_over_retry() {
        let deadline = Instant::now() + Duration::from_secs(60);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result: Result<u32, RoundError> =
            retry_until("op", deadline, &test_config(), &cancel, || async {
                Ok(1u32)
            })
            .await;

        assert!(matches!(result, Err(RoundError::Cancelled)));
    }
}
