//! Smart account playground
//!
//! Builds transfers (native currency or ERC-20) for the smart account of a connected wallet,
//! submits them as user operations through a bundler (optionally sponsored by a paymaster) and
//! waits until the bundler reports the including transaction.

pub mod account;
pub mod client;
pub mod credit;
mod error;
pub mod operation;
pub mod playground;
pub mod session;
pub mod signer;
pub mod transaction;

pub use account::{SendOptions, SimpleAccount};
pub use client::{
    http_reader_factory, AccountReader, BundlerClient, PaymasterClient, ReaderFactory,
};
pub use credit::read_gas_credit;
pub use error::{BundlerError, PaymasterError, PlaygroundError, ReaderError, WalletError};
pub use operation::{
    estimate, pending_operations, query_receipt, reject_operation, submit, wait_for_confirmation,
    ConfirmationResult, OperationHandle, PollPolicy, ReceiptStatus, SubmitOptions,
};
pub use playground::{Playground, SubmissionStatus, TransferForm};
pub use session::{derive_session, AccountSession, SessionInputs, SessionOptions};
pub use signer::{LocalWalletProvider, NodeWalletProvider, SignerAdapter, WalletProvider};
