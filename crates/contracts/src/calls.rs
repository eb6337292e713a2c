//! Call data for the contracts a smart account talks to

use crate::gen::{CreateAccountCall, ExecuteBatchCall, ExecuteCall, TransferCall};
use ethers::{
    abi::{AbiDecode, AbiEncode},
    types::{Address, Bytes, U256},
};
use playground_primitives::CallPayload;
use thiserror::Error;

/// ERC-20 `transfer(recipient, amount)` call data
pub fn erc20_transfer(recipient: Address, amount: U256) -> Bytes {
    TransferCall { to: recipient, amount }.encode().into()
}

/// Decodes ERC-20 `transfer` call data back into `(recipient, amount)`
pub fn decode_erc20_transfer(data: &[u8]) -> Option<(Address, U256)> {
    TransferCall::decode(data).ok().map(|call| (call.to, call.amount))
}

/// Errors of building smart account call data
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CallDataError {
    /// `executeBatch` of the 0.6.0 SimpleAccount carries no value per call
    #[error("call {index} of the batch transfers {value} wei, batched calls can not carry value")]
    ValueInBatch { index: usize, value: U256 },
}

/// Call data the entry point passes to the smart account: `execute` for a single call,
/// `executeBatch(dest, func)` for several calls (in order)
pub fn account_call_data(calls: &[CallPayload]) -> Result<Bytes, CallDataError> {
    match calls {
        [call] => Ok(ExecuteCall { dest: call.to, value: call.value, func: call.data.clone() }
            .encode()
            .into()),
        calls => {
            if let Some((index, call)) =
                calls.iter().enumerate().find(|(_, call)| !call.value.is_zero())
            {
                return Err(CallDataError::ValueInBatch { index, value: call.value });
            }
            Ok(ExecuteBatchCall {
                dest: calls.iter().map(|call| call.to).collect(),
                func: calls.iter().map(|call| call.data.clone()).collect(),
            }
            .encode()
            .into())
        }
    }
}

/// Decodes the calls out of smart account call data produced by [account_call_data]
pub fn decode_account_call_data(data: &[u8]) -> Option<Vec<CallPayload>> {
    if let Ok(call) = ExecuteCall::decode(data) {
        return Some(vec![CallPayload::new(call.dest, call.value, call.func)]);
    }
    let batch = ExecuteBatchCall::decode(data).ok()?;
    if batch.dest.len() != batch.func.len() {
        return None;
    }
    Some(
        batch
            .dest
            .into_iter()
            .zip(batch.func)
            .map(|(to, data)| CallPayload::call(to, data))
            .collect(),
    )
}

/// Init code deploying the account through the factory: factory address followed by
/// `createAccount(owner, salt)` call data
pub fn account_init_code(factory: Address, owner: Address, salt: U256) -> Bytes {
    [factory.as_bytes().to_vec(), CreateAccountCall { owner, salt }.encode()].concat().into()
}
