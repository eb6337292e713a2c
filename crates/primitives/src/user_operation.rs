//! User operation (ERC-4337, entry point 0.6.0) and the bundler's responses about it

use crate::utils::{as_checksum_addr, as_checksum_addr_opt, get_address};
use ethers::{
    abi::AbiEncode,
    contract::{EthAbiCodec, EthAbiType},
    types::{Address, Bytes, H256, U256, U64},
    utils::keccak256,
};
use rustc_hex::FromHexError;
use serde::{Deserialize, Serialize};
use std::{fmt, ops::Deref, str::FromStr};

/// Hash of a user operation, the handle used to follow it after submission
#[derive(
    Eq, Hash, PartialEq, Debug, Serialize, Deserialize, Clone, Copy, Default, PartialOrd, Ord,
)]
pub struct UserOperationHash(pub H256);

impl From<H256> for UserOperationHash {
    fn from(value: H256) -> Self {
        Self(value)
    }
}

impl From<UserOperationHash> for H256 {
    fn from(value: UserOperationHash) -> Self {
        value.0
    }
}

impl FromStr for UserOperationHash {
    type Err = FromHexError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        H256::from_str(s).map(|h| h.into())
    }
}

impl fmt::Display for UserOperationHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// User operation
#[derive(
    Default, Clone, Debug, PartialEq, Eq, EthAbiCodec, EthAbiType, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct UserOperation {
    /// Sender of the user operation (the smart account)
    #[serde(serialize_with = "as_checksum_addr")]
    pub sender: Address,

    /// Nonce (anti replay protection)
    pub nonce: U256,

    /// Init code for the account (needed if account not yet deployed and needs to be created)
    pub init_code: Bytes,

    /// The data that is passed to the sender during the main execution call
    pub call_data: Bytes,

    /// The amount of gas to allocate for the main execution call
    pub call_gas_limit: U256,

    /// The amount of gas to allocate for the verification step
    pub verification_gas_limit: U256,

    /// The amount of gas to pay bundler to compensate for the pre-verification execution and
    /// calldata
    pub pre_verification_gas: U256,

    /// Maximum fee per gas (similar to EIP-1559)
    pub max_fee_per_gas: U256,

    /// Maximum priority fee per gas (similar to EIP-1559)
    pub max_priority_fee_per_gas: U256,

    /// Address of paymaster sponsoring the user operation, followed by extra data to send to the
    /// paymaster (can be empty)
    pub paymaster_and_data: Bytes,

    /// Data passed to the account along with the nonce during the verification step
    pub signature: Bytes,
}

/// User operation without signature (helper for packing user operation)
#[derive(EthAbiCodec, EthAbiType)]
struct UserOperationNoSignature {
    pub sender: Address,
    pub nonce: U256,
    pub init_code: H256,
    pub call_data: H256,
    pub call_gas_limit: U256,
    pub verification_gas_limit: U256,
    pub pre_verification_gas: U256,
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
    pub paymaster_and_data: H256,
}

impl From<UserOperation> for UserOperationNoSignature {
    fn from(value: UserOperation) -> Self {
        Self {
            sender: value.sender,
            nonce: value.nonce,
            init_code: keccak256(value.init_code.deref()).into(),
            call_data: keccak256(value.call_data.deref()).into(),
            call_gas_limit: value.call_gas_limit,
            verification_gas_limit: value.verification_gas_limit,
            pre_verification_gas: value.pre_verification_gas,
            max_fee_per_gas: value.max_fee_per_gas,
            max_priority_fee_per_gas: value.max_priority_fee_per_gas,
            paymaster_and_data: keccak256(value.paymaster_and_data.deref()).into(),
        }
    }
}

impl UserOperation {
    /// Packs the user operation without signature to bytes (used for calculating the hash)
    pub fn pack_without_signature(&self) -> Bytes {
        let user_operation_packed = UserOperationNoSignature::from(self.clone());
        user_operation_packed.encode().into()
    }

    /// Calculates the hash of the user operation
    pub fn hash(&self, entry_point: &Address, chain_id: u64) -> UserOperationHash {
        H256::from_slice(
            keccak256(
                [
                    keccak256(self.pack_without_signature().deref()).to_vec(),
                    entry_point.encode(),
                    U256::from(chain_id).encode(),
                ]
                .concat(),
            )
            .as_slice(),
        )
        .into()
    }

    /// Paymaster sponsoring the user operation (if any)
    pub fn paymaster(&self) -> Option<Address> {
        get_address(&self.paymaster_and_data)
    }

    // Builder pattern helpers

    /// Sets the sender of the user operation
    pub fn sender(mut self, sender: Address) -> Self {
        self.sender = sender;
        self
    }

    /// Sets the nonce of the user operation
    pub fn nonce(mut self, nonce: U256) -> Self {
        self.nonce = nonce;
        self
    }

    /// Sets the init code of the user operation
    pub fn init_code(mut self, init_code: Bytes) -> Self {
        self.init_code = init_code;
        self
    }

    /// Sets the call data of the user operation
    pub fn call_data(mut self, call_data: Bytes) -> Self {
        self.call_data = call_data;
        self
    }

    /// Sets the gas limits and pre-verification gas from an estimation
    pub fn gas(mut self, estimation: &UserOperationGasEstimation) -> Self {
        self.call_gas_limit = estimation.call_gas_limit;
        self.verification_gas_limit = estimation.verification_gas_limit;
        self.pre_verification_gas = estimation.pre_verification_gas;
        self
    }

    /// Sets the max fee per gas and max priority fee per gas of the user operation
    pub fn fees(mut self, max_fee_per_gas: U256, max_priority_fee_per_gas: U256) -> Self {
        self.max_fee_per_gas = max_fee_per_gas;
        self.max_priority_fee_per_gas = max_priority_fee_per_gas;
        self
    }

    /// Sets the paymaster and data of the user operation
    pub fn paymaster_and_data(mut self, paymaster_and_data: Bytes) -> Self {
        self.paymaster_and_data = paymaster_and_data;
        self
    }

    /// Sets the signature of the user operation
    pub fn signature(mut self, signature: Bytes) -> Self {
        self.signature = signature;
        self
    }
}

/// Gas estimation of the user operation (returned from the RPC endpoint
/// eth_estimateUserOperationGas)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationGasEstimation {
    pub pre_verification_gas: U256,
    pub verification_gas_limit: U256,
    pub call_gas_limit: U256,
}

/// Transaction that included the user operation
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInclusion {
    #[serde(default)]
    pub transaction_hash: Option<H256>,
    #[serde(default)]
    pub block_hash: Option<H256>,
    #[serde(default)]
    pub block_number: Option<U64>,
    #[serde(default)]
    pub status: Option<U64>,
}

/// Receipt of the user operation (returned from the RPC endpoint eth_getUserOperationReceipt)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationReceipt {
    #[serde(rename = "userOpHash", default)]
    pub user_operation_hash: UserOperationHash,
    #[serde(default, serialize_with = "as_checksum_addr")]
    pub sender: Address,
    #[serde(default)]
    pub nonce: U256,
    #[serde(default, serialize_with = "as_checksum_addr_opt", skip_serializing_if = "Option::is_none")]
    pub paymaster: Option<Address>,
    #[serde(default)]
    pub actual_gas_cost: U256,
    #[serde(default)]
    pub actual_gas_used: U256,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub receipt: Option<TransactionInclusion>,
}

impl UserOperationReceipt {
    /// Hash of the including transaction, if the receipt carries a non-empty one
    pub fn transaction_hash(&self) -> Option<H256> {
        self.receipt
            .as_ref()
            .and_then(|receipt| receipt.transaction_hash)
            .filter(|hash| !hash.is_zero())
    }
}

/// User operation waiting for the paymaster (returned from the RPC endpoint
/// cc_listPendingUserOperations)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingUserOperation {
    #[serde(rename = "userOpHash")]
    pub user_operation_hash: UserOperationHash,
    #[serde(default)]
    pub chain_id: u64,
    #[serde(default, serialize_with = "as_checksum_addr_opt")]
    pub sender: Option<Address>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Prepaid gas credit (returned from the RPC endpoint cc_getUserCredit)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCredit {
    /// Hex encoded balance
    pub balance: String,
}

/// Sponsorship granted by the paymaster (returned from the RPC endpoint cc_sponsorUserOperation)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymasterSponsorship {
    pub paymaster_and_data: Bytes,
    #[serde(default)]
    pub pre_verification_gas: Option<U256>,
    #[serde(default)]
    pub verification_gas_limit: Option<U256>,
    #[serde(default)]
    pub call_gas_limit: Option<U256>,
}

impl PaymasterSponsorship {
    /// Applies the sponsorship (and the gas values the paymaster requires) to the user operation
    pub fn apply(&self, uo: UserOperation) -> UserOperation {
        UserOperation {
            paymaster_and_data: self.paymaster_and_data.clone(),
            pre_verification_gas: self.pre_verification_gas.unwrap_or(uo.pre_verification_gas),
            verification_gas_limit: self
                .verification_gas_limit
                .unwrap_or(uo.verification_gas_limit),
            call_gas_limit: self.call_gas_limit.unwrap_or(uo.call_gas_limit),
            ..uo
        }
    }
}
