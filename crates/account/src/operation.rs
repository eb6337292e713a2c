//! Submission of payloads as user operations and confirmation polling

use crate::{account::SendOptions, error::PlaygroundError, session::AccountSession};
use ethers::types::H256;
use playground_primitives::{
    constants::polling, CallPayload, PendingUserOperation, UserOperationGasEstimation,
    UserOperationHash, UserOperationReceipt,
};
use serde::Serialize;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Options of a submission
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubmitOptions {
    /// Let the paymaster (if any) pay for the gas
    pub sponsor_gas: bool,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self { sponsor_gas: true }
    }
}

impl From<SubmitOptions> for SendOptions {
    fn from(options: SubmitOptions) -> Self {
        Self { disable_paymaster: !options.sponsor_gas }
    }
}

/// Handle of a submitted user operation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationHandle {
    pub user_operation_hash: UserOperationHash,
    pub chain_id: u64,
}

/// Outcome of a confirmed user operation
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationResult {
    pub transaction_hash: H256,
    pub receipt: UserOperationReceipt,
}

/// Result of a single receipt query
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReceiptStatus {
    /// Not included yet
    Pending,
    /// Included in a transaction
    Confirmed(ConfirmationResult),
    /// The query itself failed
    Failed(String),
}

/// Bounds of the confirmation polling
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PollPolicy {
    /// Wait after the first pending query
    pub interval: Duration,
    /// Factor applied to the wait after every pending query
    pub backoff: f64,
    /// Upper bound of the wait
    pub max_interval: Duration,
    /// Maximum number of queries
    pub max_attempts: u32,
    /// Overall time limit
    pub timeout: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(polling::INTERVAL_MS),
            backoff: polling::BACKOFF,
            max_interval: Duration::from_millis(polling::MAX_INTERVAL_MS),
            max_attempts: polling::MAX_ATTEMPTS,
            timeout: None,
        }
    }
}

impl PollPolicy {
    /// Fixed interval without backoff
    pub fn fixed(interval: Duration, max_attempts: u32) -> Self {
        Self { interval, backoff: 1.0, max_interval: interval, max_attempts, timeout: None }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn next_interval(&self, interval: Duration) -> Duration {
        let max = self.max_interval.as_secs_f64();
        let next = (interval.as_secs_f64() * self.backoff).max(0.0).min(max);
        Duration::from_secs_f64(next)
    }
}

/// Submits the payloads as one user operation of the session's account
pub async fn submit(
    session: &AccountSession,
    payloads: &[CallPayload],
    options: SubmitOptions,
) -> Result<OperationHandle, PlaygroundError> {
    debug!(
        "Submitting {} call(s) on chain {} (sponsored: {})",
        payloads.len(),
        session.chain_id(),
        options.sponsor_gas
    );
    let user_operation_hash = session.account().send_transaction(payloads, options.into()).await?;
    Ok(OperationHandle { user_operation_hash, chain_id: session.chain_id() })
}

/// Gas the payloads would need as a user operation
pub async fn estimate(
    session: &AccountSession,
    payloads: &[CallPayload],
    options: SubmitOptions,
) -> Result<UserOperationGasEstimation, PlaygroundError> {
    session.account().estimate_transaction(payloads, options.into()).await
}

/// Queries the bundler once for the receipt of the user operation
pub async fn query_receipt(session: &AccountSession, handle: &OperationHandle) -> ReceiptStatus {
    match session
        .bundler()
        .get_user_operation_receipt(&handle.user_operation_hash, handle.chain_id)
        .await
    {
        Ok(Some(receipt)) => match receipt.transaction_hash() {
            Some(transaction_hash) => {
                ReceiptStatus::Confirmed(ConfirmationResult { transaction_hash, receipt })
            }
            None => ReceiptStatus::Pending,
        },
        Ok(None) => ReceiptStatus::Pending,
        Err(err) => ReceiptStatus::Failed(err.to_string()),
    }
}

/// Polls the receipt of the user operation until it is included in a transaction
///
/// Queries are sequential. Only [ReceiptStatus::Pending] is retried, a failed query is
/// surfaced as [PlaygroundError::ReceiptQuery]. The token is checked before every query and
/// interrupts pending queries and waits.
pub async fn wait_for_confirmation(
    session: &AccountSession,
    handle: &OperationHandle,
    policy: &PollPolicy,
    cancel: &CancellationToken,
) -> Result<ConfirmationResult, PlaygroundError> {
    let mut attempts = 0;
    let res = match policy.timeout {
        Some(timeout) => {
            let polled =
                tokio::time::timeout(timeout, poll(session, handle, policy, cancel, &mut attempts))
                    .await;
            polled.unwrap_or(Err(PlaygroundError::PollingTimedOut { attempts }))
        }
        None => poll(session, handle, policy, cancel, &mut attempts).await,
    };

    match &res {
        Ok(confirmation) => {
            if !confirmation.receipt.success {
                warn!(
                    "User operation {} included in {:?} but reverted: {}",
                    handle.user_operation_hash,
                    confirmation.transaction_hash,
                    confirmation.receipt.reason
                );
            }
            info!(
                "User operation {} included in {:?} after {attempts} queries",
                handle.user_operation_hash, confirmation.transaction_hash
            );
        }
        Err(err) => debug!("Stopped waiting for {}: {err}", handle.user_operation_hash),
    }
    res
}

async fn poll(
    session: &AccountSession,
    handle: &OperationHandle,
    policy: &PollPolicy,
    cancel: &CancellationToken,
    attempts: &mut u32,
) -> Result<ConfirmationResult, PlaygroundError> {
    let mut interval = policy.interval;
    loop {
        if cancel.is_cancelled() {
            return Err(PlaygroundError::Cancelled);
        }
        if *attempts >= policy.max_attempts {
            return Err(PlaygroundError::PollingTimedOut { attempts: *attempts });
        }

        *attempts += 1;
        let status = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(PlaygroundError::Cancelled),
            status = query_receipt(session, handle) => status,
        };
        trace!("Receipt query {} for {}: {status:?}", *attempts, handle.user_operation_hash);

        match status {
            ReceiptStatus::Confirmed(confirmation) => return Ok(confirmation),
            ReceiptStatus::Failed(inner) => return Err(PlaygroundError::ReceiptQuery { inner }),
            ReceiptStatus::Pending => {}
        }

        if *attempts >= policy.max_attempts {
            return Err(PlaygroundError::PollingTimedOut { attempts: *attempts });
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(PlaygroundError::Cancelled),
            _ = tokio::time::sleep(interval) => {}
        }
        interval = policy.next_interval(interval);
    }
}

/// User operations of the account waiting at the paymaster
pub async fn pending_operations(
    session: &AccountSession,
) -> Result<Vec<PendingUserOperation>, PlaygroundError> {
    let paymaster = session.paymaster().ok_or(PlaygroundError::PaymasterUnavailable)?;
    Ok(paymaster.list_pending_user_operations(session.account_address()).await?)
}

/// Asks the paymaster to drop a pending user operation
pub async fn reject_operation(
    session: &AccountSession,
    handle: &OperationHandle,
) -> Result<(), PlaygroundError> {
    let paymaster = session.paymaster().ok_or(PlaygroundError::PaymasterUnavailable)?;
    paymaster.reject_user_operation(&handle.user_operation_hash).await?;
    info!("User operation {} rejected", handle.user_operation_hash);
    Ok(())
}
