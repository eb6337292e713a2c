use ethers::types::Address;
use playground_contracts::{CallDataError, ContractCallError};
use playground_primitives::AmountError;
use thiserror::Error;

/// Errors of the wallet provider behind the signer adapter
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// The wallet exposes no account
    #[error("wallet has no accounts")]
    NoAccounts,

    /// The owner declined the request
    #[error("request rejected: {inner}")]
    Rejected {
        /// The inner error message
        inner: String,
    },

    /// The wallet could not be reached or failed
    #[error("wallet provider error: {inner}")]
    Provider {
        /// The inner error message
        inner: String,
    },
}

/// Errors returned by a bundler
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BundlerError {
    /// The bundler answered with a json-rpc error
    #[error("bundler error {code}: {message}")]
    Rpc { code: i32, message: String },

    /// The bundler could not be reached or answered with garbage
    #[error("bundler transport error: {inner}")]
    Transport {
        /// The inner error message
        inner: String,
    },
}

/// Errors returned by a paymaster
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaymasterError {
    /// The paymaster answered with a json-rpc error
    #[error("paymaster error {code}: {message}")]
    Rpc { code: i32, message: String },

    /// The paymaster could not be reached or answered with garbage
    #[error("paymaster transport error: {inner}")]
    Transport {
        /// The inner error message
        inner: String,
    },

    /// No bearer token could be produced for the request
    #[error("paymaster credentials unavailable: {inner}")]
    Credentials {
        /// The inner error message
        inner: String,
    },
}

/// Errors of on-chain account state reads
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReaderError {
    #[error("contract call failed: {0}")]
    Contract(#[from] ContractCallError),

    #[error("{inner}")]
    Other {
        /// The inner error message
        inner: String,
    },
}

/// Errors surfaced by the playground flows
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlaygroundError {
    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    #[error("chain {chain_id} is not supported")]
    UnknownChain { chain_id: u64 },

    #[error("token {token:?} is not listed on chain {chain_id}")]
    UnknownToken { token: Address, chain_id: u64 },

    #[error("calls can not be executed by the account: {0}")]
    CallData(#[from] CallDataError),

    #[error("invalid address {address:?}")]
    InvalidAddress { address: String },

    #[error("no wallet connected: {inner}")]
    NoWalletConnected {
        /// The inner error message
        inner: String,
    },

    #[error("signature rejected: {inner}")]
    SignatureRejected {
        /// The inner error message
        inner: String,
    },

    #[error("account session could not be built: {inner}")]
    SessionBuild {
        /// The inner error message
        inner: String,
    },

    #[error("no account session (chain or bundler missing)")]
    SessionUnavailable,

    #[error("user operation rejected: {inner}")]
    SubmissionRejected {
        /// The inner error message
        inner: String,
    },

    #[error("a submission is already in progress")]
    SubmissionInProgress,

    #[error("receipt query failed: {inner}")]
    ReceiptQuery {
        /// The inner error message
        inner: String,
    },

    #[error("no transaction hash after {attempts} receipt queries")]
    PollingTimedOut { attempts: u32 },

    #[error("cancelled")]
    Cancelled,

    #[error("no paymaster configured")]
    PaymasterUnavailable,

    #[error("paymaster request failed: {0}")]
    Paymaster(#[from] PaymasterError),
}
