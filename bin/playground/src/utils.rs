use ethers::types::{Address, U256};
use playground_primitives::{ChainGroup, UserOperationHash};
use std::{future::Future, str::FromStr, time::Duration};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Parses address from string
pub fn parse_address(s: &str) -> Result<Address, String> {
    Address::from_str(s).map_err(|_| format!("String {s} is not a valid address"))
}

/// Parses U256 from string
pub fn parse_u256(s: &str) -> Result<U256, String> {
    U256::from_str_radix(s, 10).map_err(|_| format!("String {s} is not a valid U256"))
}

/// Parses a duration given in milliseconds
pub fn parse_duration(duration: &str) -> Result<Duration, String> {
    let millis: u64 = duration.parse().map_err(|_| format!("{duration} must be unsigned int"))?;
    Ok(Duration::from_millis(millis))
}

/// Parses the polling backoff factor, which must not shrink the interval
pub fn parse_backoff(backoff: &str) -> Result<f64, String> {
    match backoff.parse::<f64>() {
        Ok(factor) if factor.is_finite() && factor >= 1.0 => Ok(factor),
        _ => Err(format!("{backoff} must be a number of at least 1")),
    }
}

/// Parses ChainGroup from string
pub fn parse_chain_group(s: &str) -> Result<ChainGroup, String> {
    ChainGroup::from_str(s).map_err(|_| format!("String {s} is not a valid chain group"))
}

/// Parses user operation hash from string
pub fn parse_user_operation_hash(s: &str) -> Result<UserOperationHash, String> {
    UserOperationHash::from_str(s)
        .map_err(|_| format!("String {s} is not a valid user operation hash"))
}

pub fn validate_private_key(hex_string: &str) -> Result<String, String> {
    let key = hex_string.trim_start_matches("0x");

    if key.chars().count() != 64 {
        return Err(format!("{hex_string} is not a valid private key"));
    }

    if !key.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("{hex_string} is not a valid hexadecimal string"));
    }

    Ok(String::from(key))
}

/// Runs the future to completion.
///
/// On `ctrl-c` (or `SIGTERM` on unix) the token is cancelled and the future is still awaited, so
/// it can stop at its next cancellation point and report how it ended.
pub async fn run_until_ctrl_c<F, E>(cancel: CancellationToken, fut: F) -> Result<(), E>
where
    F: Future<Output = Result<(), E>>,
    E: From<std::io::Error>,
{
    let ctrl_c = tokio::signal::ctrl_c();
    let sigterm = terminate()?;
    tokio::pin!(ctrl_c, sigterm, fut);

    tokio::select! {
        res = &mut fut => return res,
        _ = &mut ctrl_c => {
            info!("Received ctrl-c signal.");
        },
        _ = &mut sigterm => {
            info!("Received SIGTERM signal.");
        },
    }

    cancel.cancel();
    fut.await
}

#[cfg(unix)]
fn terminate() -> std::io::Result<impl Future<Output = ()>> {
    let mut stream = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    Ok(async move {
        stream.recv().await;
    })
}

#[cfg(not(unix))]
fn terminate() -> std::io::Result<impl Future<Output = ()>> {
    Ok(std::future::pending())
}
