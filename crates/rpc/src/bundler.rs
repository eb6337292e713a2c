use crate::{bundler_api::BundlerApiClient, error::bundler_error};
use async_trait::async_trait;
use ethers::types::Address;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use playground_account::{BundlerClient, BundlerError};
use playground_primitives::{
    UserOperation, UserOperationGasEstimation, UserOperationHash, UserOperationReceipt,
};
use tracing::trace;

/// Bundler reached over HTTP JSON-RPC
#[derive(Clone, Debug)]
pub struct HttpBundlerClient {
    url: String,
    client: HttpClient,
}

impl HttpBundlerClient {
    pub fn new(url: impl Into<String>) -> Result<Self, BundlerError> {
        let url = url.into();
        let client = HttpClientBuilder::default()
            .build(&url)
            .map_err(|err| BundlerError::Transport { inner: err.to_string() })?;
        Ok(Self { url, client })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl BundlerClient for HttpBundlerClient {
    async fn send_user_operation(
        &self,
        uo: &UserOperation,
        entry_point: Address,
        chain_id: u64,
    ) -> Result<UserOperationHash, BundlerError> {
        trace!("Sending user operation {uo:?} to {}", self.url);
        BundlerApiClient::send_user_operation(&self.client, uo.clone(), entry_point, chain_id)
            .await
            .map_err(bundler_error)
    }

    async fn estimate_user_operation_gas(
        &self,
        uo: &UserOperation,
        entry_point: Address,
        chain_id: u64,
    ) -> Result<UserOperationGasEstimation, BundlerError> {
        BundlerApiClient::estimate_user_operation_gas(
            &self.client,
            uo.clone(),
            entry_point,
            chain_id,
        )
        .await
        .map_err(bundler_error)
    }

    async fn get_user_operation_receipt(
        &self,
        uo_hash: &UserOperationHash,
        chain_id: u64,
    ) -> Result<Option<UserOperationReceipt>, BundlerError> {
        BundlerApiClient::get_user_operation_receipt(&self.client, *uo_hash, chain_id)
            .await
            .map_err(bundler_error)
    }
}
