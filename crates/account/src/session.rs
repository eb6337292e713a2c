//! Account session: the smart account of the connected owner on one chain
//!
//! A session is derived from its inputs (chain, signer, bundler, paymaster) and never mutated.
//! When one of the inputs changes the session is derived again and the old one is dropped.

use crate::{
    account::SimpleAccount,
    client::{AccountReader, BundlerClient, PaymasterClient},
    error::PlaygroundError,
    signer::SignerAdapter,
};
use ethers::types::{Address, U256};
use playground_primitives::{
    constants::{account, entry_point},
    ChainSpec,
};
use std::{fmt, sync::Arc};
use tracing::info;

/// Contracts the smart account is resolved against
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionOptions {
    pub entry_point: Address,
    pub factory: Address,
    pub salt: U256,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            entry_point: entry_point::ADDRESS.parse().unwrap_or_default(),
            factory: account::FACTORY_ADDRESS.parse().unwrap_or_default(),
            salt: account::DEFAULT_SALT.into(),
        }
    }
}

#[derive(Clone)]
pub struct AccountSession {
    chain: &'static ChainSpec,
    bundler: Arc<dyn BundlerClient>,
    paymaster: Option<Arc<dyn PaymasterClient>>,
    account: SimpleAccount,
}

impl fmt::Debug for AccountSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountSession")
            .field("chain", &self.chain.id())
            .field("account", &self.account)
            .finish()
    }
}

impl AccountSession {
    pub fn chain(&self) -> &'static ChainSpec {
        self.chain
    }

    pub fn chain_id(&self) -> u64 {
        self.chain.id()
    }

    pub fn owner(&self) -> Address {
        self.account.owner
    }

    pub fn account_address(&self) -> Address {
        self.account.address
    }

    pub fn account(&self) -> &SimpleAccount {
        &self.account
    }

    pub fn bundler(&self) -> &Arc<dyn BundlerClient> {
        &self.bundler
    }

    pub fn paymaster(&self) -> Option<&Arc<dyn PaymasterClient>> {
        self.paymaster.as_ref()
    }
}

/// Builds the session of the signer's smart account on `chain`
///
/// Fails with [PlaygroundError::SessionBuild] when the owner address or the counterfactual
/// account address can not be retrieved.
pub async fn derive_session(
    chain: &'static ChainSpec,
    signer: &SignerAdapter,
    bundler: Arc<dyn BundlerClient>,
    paymaster: Option<Arc<dyn PaymasterClient>>,
    reader: Arc<dyn AccountReader>,
    options: &SessionOptions,
) -> Result<AccountSession, PlaygroundError> {
    let owner = signer
        .get_address()
        .await
        .map_err(|err| PlaygroundError::SessionBuild { inner: err.to_string() })?;
    let address = reader
        .account_address(owner, options.salt)
        .await
        .map_err(|err| PlaygroundError::SessionBuild { inner: err.to_string() })?;

    info!("Account {address:?} (owner {owner:?}) on chain {}", chain.id());

    let account = SimpleAccount::new(
        chain.id(),
        options.entry_point,
        options.factory,
        options.salt,
        owner,
        address,
        signer.clone(),
        bundler.clone(),
        paymaster.clone(),
        reader,
    );

    Ok(AccountSession { chain, bundler, paymaster, account })
}

/// Identity of the inputs a session was derived from
#[derive(Clone, Default)]
pub struct SessionInputs {
    pub chain_id: Option<u64>,
    pub bundler: Option<Arc<dyn BundlerClient>>,
    pub paymaster: Option<Arc<dyn PaymasterClient>>,
}

impl SessionInputs {
    /// Whether `other` refers to the same chain and the same collaborator instances
    pub fn same_as(&self, other: &SessionInputs) -> bool {
        fn same<T: ?Sized>(a: &Option<Arc<T>>, b: &Option<Arc<T>>) -> bool {
            match (a, b) {
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            }
        }

        self.chain_id == other.chain_id
            && same(&self.bundler, &other.bundler)
            && same(&self.paymaster, &other.paymaster)
    }
}

impl fmt::Debug for SessionInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionInputs")
            .field("chain_id", &self.chain_id)
            .field("bundler", &self.bundler.is_some())
            .field("paymaster", &self.paymaster.is_some())
            .finish()
    }
}
