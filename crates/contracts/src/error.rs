use crate::gen::{EntryPointAPIErrors, FailedOp};
use ethers::{
    abi::AbiDecode,
    prelude::ContractError,
    providers::{JsonRpcError, Middleware, MiddlewareError, ProviderError},
    types::Bytes,
};
use regex::Regex;
use std::str::FromStr;
use thiserror::Error;

/// Errors of on-chain reads against the account contracts
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContractCallError {
    /// The entry point rejected the user operation
    #[error("{0}")]
    FailedOp(FailedOp),

    /// Execution reverted
    #[error("execution reverted: {0}")]
    ExecutionReverted(String),

    /// Provider error
    #[error("provider error: {inner}")]
    Provider {
        /// The inner error message
        inner: String,
    },

    /// Data decoding error
    #[error("decode error: {inner}")]
    Decode {
        /// The inner error message
        inner: String,
    },

    /// Any other error
    #[error("other error: {inner}")]
    Other {
        /// The inner error message
        inner: String,
    },
}

impl ContractCallError {
    /// Maps an error of a generated contract call
    pub fn from_contract_error<M: Middleware>(err: ContractError<M>) -> Self {
        match err {
            ContractError::DecodingError(e) => Self::Decode { inner: e.to_string() },
            ContractError::AbiError(e) => Self::Decode { inner: e.to_string() },
            ContractError::MiddlewareError { e } => Self::from_middleware_error::<M>(e),
            ContractError::ProviderError { e } => Self::from_provider_error(&e),
            ContractError::Revert(data) => Self::from_revert_data(data),
            _ => Self::Other { inner: err.to_string() },
        }
    }

    pub fn from_middleware_error<M: Middleware>(err: M::Error) -> Self {
        if let Some(err) = err.as_error_response() {
            return Self::from_json_rpc_error(err);
        }

        if let Some(err) = err.as_provider_error() {
            return Self::from_provider_error(err);
        }

        Self::Provider { inner: format!("middleware error: {err:?}") }
    }

    pub fn from_provider_error(err: &ProviderError) -> Self {
        match err {
            ProviderError::JsonRpcClientError(err) => err
                .as_error_response()
                .map(Self::from_json_rpc_error)
                .unwrap_or(Self::Provider { inner: format!("json-rpc client error: {err:?}") }),
            ProviderError::HTTPError(err) => Self::Provider { inner: format!("HTTP error: {err:?}") },
            _ => Self::Provider { inner: format!("provider error: {err:?}") },
        }
    }

    /// Revert data is carried in the `data` field of the json-rpc error, either bare or
    /// embedded in a message
    pub fn from_json_rpc_error(err: &JsonRpcError) -> Self {
        match err.data {
            Some(serde_json::Value::String(ref data)) => {
                let re = match Regex::new(r"0x[0-9a-fA-F]+") {
                    Ok(re) => re,
                    Err(e) => return Self::Other { inner: e.to_string() },
                };
                let Some(hex) = re.find(data) else {
                    return Self::Provider { inner: err.message.clone() };
                };
                match Bytes::from_str(hex.as_str()) {
                    Ok(bytes) => Self::from_revert_data(bytes),
                    Err(e) => Self::Decode {
                        inner: format!("string {data:?} could not be converted to bytes: {e:?}"),
                    },
                }
            }
            Some(ref other) => {
                Self::Decode { inner: format!("json-rpc return data is not a string: {other:?}") }
            }
            None => Self::Provider { inner: err.message.clone() },
        }
    }

    pub fn from_revert_data(data: Bytes) -> Self {
        match decode_revert_error(data) {
            Ok(EntryPointAPIErrors::FailedOp(op)) => Self::FailedOp(op),
            Ok(EntryPointAPIErrors::RevertString(reason)) => Self::ExecutionReverted(reason),
            #[allow(unreachable_patterns)]
            Ok(other) => Self::Other { inner: format!("{other:?}") },
            Err(err) => err,
        }
    }
}

// ethers-rs could not handle `require (true, "reason")` or `revert("test failed")` well, a
// revert with `require` ends up with the error signature `0x08c379a0`
pub fn decode_revert_string(data: Bytes) -> Option<String> {
    if data.len() < 4 {
        return None;
    }
    let (error_sig, reason) = data.split_at(4);
    if error_sig == [0x08, 0xc3, 0x79, 0xa0] {
        <String as AbiDecode>::decode(reason).ok()
    } else {
        None
    }
}

pub fn decode_revert_error(data: Bytes) -> Result<EntryPointAPIErrors, ContractCallError> {
    match EntryPointAPIErrors::decode(data.as_ref()) {
        Ok(res) => Ok(res),
        Err(e) => {
            if let Some(error_str) = decode_revert_string(data) {
                return Ok(EntryPointAPIErrors::RevertString(error_str));
            };

            Err(ContractCallError::Decode {
                inner: format!("revert data can't be decoded: {e:?}"),
            })
        }
    }
}
