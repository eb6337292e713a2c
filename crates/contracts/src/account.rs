//! On-chain state of a SimpleAccount (counterfactual address, deployment, nonce, fees)

use crate::{
    entry_point::EntryPoint, error::ContractCallError, gen::SimpleAccountFactoryAPI,
};
use ethers::{
    providers::Middleware,
    types::{Address, U256},
};
use std::sync::Arc;
use tracing::trace;

/// Reads the state a SimpleAccount user operation is built from
#[derive(Clone)]
pub struct SimpleAccountState<M: Middleware + 'static> {
    eth_client: Arc<M>,
    entry_point: EntryPoint<M>,
    factory: SimpleAccountFactoryAPI<M>,
}

impl<M: Middleware + 'static> SimpleAccountState<M> {
    pub fn new(eth_client: Arc<M>, entry_point: Address, factory: Address) -> Self {
        Self {
            entry_point: EntryPoint::new(eth_client.clone(), entry_point),
            factory: SimpleAccountFactoryAPI::new(factory, eth_client.clone()),
            eth_client,
        }
    }

    pub fn entry_point(&self) -> &EntryPoint<M> {
        &self.entry_point
    }

    pub fn factory_address(&self) -> Address {
        self.factory.address()
    }

    /// Counterfactual address of the account owned by `owner`
    pub async fn account_address(
        &self,
        owner: Address,
        salt: U256,
    ) -> Result<Address, ContractCallError> {
        self.factory
            .get_address(owner, salt)
            .call()
            .await
            .map_err(ContractCallError::from_contract_error)
    }

    /// Whether code is deployed at the account address
    pub async fn is_deployed(&self, account: Address) -> Result<bool, ContractCallError> {
        let code = self
            .eth_client
            .get_code(account, None)
            .await
            .map_err(ContractCallError::from_middleware_error::<M>)?;
        trace!("Code size at {account:?}: {}", code.len());
        Ok(!code.is_empty())
    }

    pub async fn nonce(&self, account: Address) -> Result<U256, ContractCallError> {
        self.entry_point.get_nonce(&account, U256::zero()).await
    }

    /// Current EIP-1559 fees `(max_fee_per_gas, max_priority_fee_per_gas)`
    pub async fn fees(&self) -> Result<(U256, U256), ContractCallError> {
        self.eth_client
            .estimate_eip1559_fees(None)
            .await
            .map_err(ContractCallError::from_middleware_error::<M>)
    }
}
