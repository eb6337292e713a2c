//! SimpleAccount (ERC-4337, entry point 0.6.0) client
//!
//! Turns call payloads into a user operation: the account is deployed through its init code on
//! the first operation, gas is estimated by the bundler with a dummy signature, the paymaster
//! optionally sponsors the operation and finally the owner signs the user operation hash.

use crate::{
    client::{AccountReader, BundlerClient, PaymasterClient},
    error::PlaygroundError,
    signer::SignerAdapter,
};
use ethers::types::{Address, Bytes, U256};
use playground_contracts::{account_call_data, account_init_code};
use playground_primitives::{
    constants::account::DUMMY_SIGNATURE, get_address, CallPayload, UserOperation,
    UserOperationGasEstimation, UserOperationHash,
};
use std::{fmt, str::FromStr, sync::Arc};
use tracing::{debug, info, trace, warn};

/// Options of a single send
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SendOptions {
    /// Skip the paymaster even when one is configured
    pub disable_paymaster: bool,
}

#[derive(Clone)]
pub struct SimpleAccount {
    pub chain_id: u64,
    pub entry_point: Address,
    pub factory: Address,
    pub salt: U256,
    pub owner: Address,
    pub address: Address,
    signer: SignerAdapter,
    bundler: Arc<dyn BundlerClient>,
    paymaster: Option<Arc<dyn PaymasterClient>>,
    reader: Arc<dyn AccountReader>,
}

impl fmt::Debug for SimpleAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleAccount")
            .field("chain_id", &self.chain_id)
            .field("entry_point", &self.entry_point)
            .field("owner", &self.owner)
            .field("address", &self.address)
            .field("paymaster", &self.paymaster.is_some())
            .finish()
    }
}

impl SimpleAccount {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        chain_id: u64,
        entry_point: Address,
        factory: Address,
        salt: U256,
        owner: Address,
        address: Address,
        signer: SignerAdapter,
        bundler: Arc<dyn BundlerClient>,
        paymaster: Option<Arc<dyn PaymasterClient>>,
        reader: Arc<dyn AccountReader>,
    ) -> Self {
        Self {
            chain_id,
            entry_point,
            factory,
            salt,
            owner,
            address,
            signer,
            bundler,
            paymaster,
            reader,
        }
    }

    pub fn has_paymaster(&self) -> bool {
        self.paymaster.is_some()
    }

    fn paymaster_for(&self, options: SendOptions) -> Option<&Arc<dyn PaymasterClient>> {
        if options.disable_paymaster {
            None
        } else {
            self.paymaster.as_ref()
        }
    }

    fn rejected(err: impl ToString) -> PlaygroundError {
        PlaygroundError::SubmissionRejected { inner: err.to_string() }
    }

    /// Unsigned user operation executing the calls (gas filled in, sponsored when allowed)
    pub async fn build_user_operation(
        &self,
        calls: &[CallPayload],
        options: SendOptions,
    ) -> Result<UserOperation, PlaygroundError> {
        if calls.is_empty() {
            return Err(Self::rejected("no calls to execute"));
        }

        let deployed = self.reader.is_deployed(self.address).await.map_err(Self::rejected)?;
        let init_code = if deployed {
            Bytes::default()
        } else {
            debug!("Account {:?} is not deployed yet, attaching init code", self.address);
            account_init_code(self.factory, self.owner, self.salt)
        };
        let nonce = self.reader.nonce(self.address).await.map_err(Self::rejected)?;
        let (max_fee_per_gas, max_priority_fee_per_gas) =
            self.reader.fees().await.map_err(Self::rejected)?;

        let uo = UserOperation::default()
            .sender(self.address)
            .nonce(nonce)
            .init_code(init_code)
            .call_data(account_call_data(calls)?)
            .fees(max_fee_per_gas, max_priority_fee_per_gas)
            .signature(Bytes::from_str(DUMMY_SIGNATURE).map_err(Self::rejected)?);

        let estimation = self
            .bundler
            .estimate_user_operation_gas(&uo, self.entry_point, self.chain_id)
            .await
            .map_err(Self::rejected)?;
        trace!("Gas estimation {estimation:?}");
        let uo = uo.gas(&estimation);

        match self.paymaster_for(options) {
            Some(paymaster) => {
                let sponsorship = paymaster
                    .sponsor_user_operation(&uo, self.entry_point, self.chain_id)
                    .await
                    .map_err(Self::rejected)?;
                debug!(
                    "User operation sponsored by {:?}",
                    get_address(&sponsorship.paymaster_and_data)
                );
                Ok(sponsorship.apply(uo))
            }
            None => Ok(uo),
        }
    }

    /// Gas the calls would need, without signing or sending anything
    pub async fn estimate_transaction(
        &self,
        calls: &[CallPayload],
        options: SendOptions,
    ) -> Result<UserOperationGasEstimation, PlaygroundError> {
        let uo = self.build_user_operation(calls, options).await?;
        Ok(UserOperationGasEstimation {
            pre_verification_gas: uo.pre_verification_gas,
            verification_gas_limit: uo.verification_gas_limit,
            call_gas_limit: uo.call_gas_limit,
        })
    }

    /// Builds, signs and sends the user operation executing the calls
    pub async fn send_transaction(
        &self,
        calls: &[CallPayload],
        options: SendOptions,
    ) -> Result<UserOperationHash, PlaygroundError> {
        let uo = self.build_user_operation(calls, options).await?;
        let uo_hash = uo.hash(&self.entry_point, self.chain_id);
        let signature = self.signer.sign(uo_hash.0.as_bytes()).await?;
        let uo = uo.signature(signature);

        let returned = self
            .bundler
            .send_user_operation(&uo, self.entry_point, self.chain_id)
            .await
            .map_err(Self::rejected)?;
        if returned != uo_hash {
            warn!("Bundler returned hash {returned} for user operation {uo_hash}");
        }
        info!("User operation {returned} sent from {:?}", self.address);
        Ok(returned)
    }
}
