//! Utils for creating ethers providers

use ethers::{
    providers::{Http, Provider},
    types::Chain,
};
use std::time::Duration;

/// Creates ethers provider with HTTP connection for the given chain
pub fn create_http_provider(addr: &str, chain_id: u64) -> eyre::Result<Provider<Http>> {
    let provider = Provider::<Http>::try_from(addr)?;

    Ok(provider.interval(if chain_id == u64::from(Chain::Dev) {
        Duration::from_millis(5u64)
    } else {
        Duration::from_millis(500u64)
    }))
}
