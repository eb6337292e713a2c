//! Transfer requests entered by the operator and the call payloads derived from them

use crate::utils::as_checksum_addr;
use ethers::types::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// Transfer entered by the operator
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    /// Receiver of the funds
    pub recipient: Address,
    /// Token to transfer, the zero address selects the native currency
    pub token: Address,
    /// Decimal amount, e.g. `"1.5"`
    pub amount: String,
    /// Whether the paymaster should sponsor the gas
    pub sponsor_gas: bool,
    /// Whether the payload should be submitted as a batch
    pub batch: bool,
}

impl TransferRequest {
    /// Whether the native currency (not an ERC-20 token) is transferred
    pub fn is_native(&self) -> bool {
        self.token.is_zero()
    }
}

/// Call executed by the smart account
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallPayload {
    /// Call target
    #[serde(serialize_with = "as_checksum_addr")]
    pub to: Address,
    /// Value in the smallest unit of the native currency
    pub value: U256,
    /// Call data (empty for plain value transfers)
    pub data: Bytes,
}

impl CallPayload {
    pub fn new(to: Address, value: U256, data: Bytes) -> Self {
        Self { to, value, data }
    }

    /// Plain transfer of the native currency
    pub fn native(to: Address, value: U256) -> Self {
        Self { to, value, data: Bytes::default() }
    }

    /// Contract call without value
    pub fn call(to: Address, data: Bytes) -> Self {
        Self { to, value: U256::zero(), data }
    }
}
