//! Collaborators of the smart account: bundler, paymaster and on-chain state reader

use crate::{
    error::{BundlerError, PaymasterError, PlaygroundError, ReaderError},
    session::SessionOptions,
};
use async_trait::async_trait;
use ethers::{
    providers::Middleware,
    types::{Address, U256},
};
use playground_contracts::SimpleAccountState;
use playground_primitives::{
    provider::create_http_provider, ChainSpec, PaymasterSponsorship, PendingUserOperation,
    UserCredit, UserOperation, UserOperationGasEstimation, UserOperationHash,
    UserOperationReceipt,
};
use std::{fmt, sync::Arc};
use tracing::debug;

/// Bundler accepting user operations
#[async_trait]
pub trait BundlerClient: Send + Sync + fmt::Debug {
    async fn send_user_operation(
        &self,
        uo: &UserOperation,
        entry_point: Address,
        chain_id: u64,
    ) -> Result<UserOperationHash, BundlerError>;

    async fn estimate_user_operation_gas(
        &self,
        uo: &UserOperation,
        entry_point: Address,
        chain_id: u64,
    ) -> Result<UserOperationGasEstimation, BundlerError>;

    /// `None` while the user operation is not included yet
    async fn get_user_operation_receipt(
        &self,
        uo_hash: &UserOperationHash,
        chain_id: u64,
    ) -> Result<Option<UserOperationReceipt>, BundlerError>;
}

/// Paymaster sponsoring gas of user operations
#[async_trait]
pub trait PaymasterClient: Send + Sync + fmt::Debug {
    async fn sponsor_user_operation(
        &self,
        uo: &UserOperation,
        entry_point: Address,
        chain_id: u64,
    ) -> Result<PaymasterSponsorship, PaymasterError>;

    /// `None` if the paymaster keeps no credit for the account
    async fn get_user_credit(
        &self,
        address: Address,
        chain_id: u64,
    ) -> Result<Option<UserCredit>, PaymasterError>;

    async fn list_pending_user_operations(
        &self,
        address: Address,
    ) -> Result<Vec<PendingUserOperation>, PaymasterError>;

    async fn reject_user_operation(&self, uo_hash: &UserOperationHash)
        -> Result<(), PaymasterError>;
}

/// On-chain state of the smart account
#[async_trait]
pub trait AccountReader: Send + Sync {
    /// Counterfactual address of the account owned by `owner`
    async fn account_address(&self, owner: Address, salt: U256) -> Result<Address, ReaderError>;

    async fn is_deployed(&self, account: Address) -> Result<bool, ReaderError>;

    async fn nonce(&self, account: Address) -> Result<U256, ReaderError>;

    /// `(max_fee_per_gas, max_priority_fee_per_gas)`
    async fn fees(&self) -> Result<(U256, U256), ReaderError>;
}

#[async_trait]
impl<M: Middleware + 'static> AccountReader for SimpleAccountState<M> {
    async fn account_address(&self, owner: Address, salt: U256) -> Result<Address, ReaderError> {
        Ok(SimpleAccountState::account_address(self, owner, salt).await?)
    }

    async fn is_deployed(&self, account: Address) -> Result<bool, ReaderError> {
        Ok(SimpleAccountState::is_deployed(self, account).await?)
    }

    async fn nonce(&self, account: Address) -> Result<U256, ReaderError> {
        Ok(SimpleAccountState::nonce(self, account).await?)
    }

    async fn fees(&self) -> Result<(U256, U256), ReaderError> {
        Ok(SimpleAccountState::fees(self).await?)
    }
}

/// Builds the state reader of a chain
pub type ReaderFactory =
    Arc<dyn Fn(&ChainSpec) -> Result<Arc<dyn AccountReader>, PlaygroundError> + Send + Sync>;

/// Readers talking to the chain's public RPC endpoint, or `rpc_url` when it is given
pub fn http_reader_factory(rpc_url: Option<String>, options: SessionOptions) -> ReaderFactory {
    Arc::new(move |chain: &ChainSpec| {
        let url = rpc_url.clone().unwrap_or_else(|| chain.rpc_url.clone());
        debug!("Connecting to {url} for chain {}", chain.id());
        let provider = create_http_provider(&url, chain.id())
            .map_err(|err| PlaygroundError::SessionBuild { inner: err.to_string() })?;
        Ok(Arc::new(SimpleAccountState::new(
            Arc::new(provider),
            options.entry_point,
            options.factory,
        )) as Arc<dyn AccountReader>)
    })
}
