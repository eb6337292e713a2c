//! Playground primitive types
//!
//! This crate contains the supported chain registry, transfer and call payload types, amount
//! conversions and the account abstraction (ERC-4337) user operation types exchanged with
//! bundlers and paymasters.

pub mod chain;
pub mod constants;
pub mod provider;
mod transfer;
pub mod units;
mod user_operation;
mod utils;

pub use chain::{
    chains_in, find_chain, mainnet_chains, supported_chains, testnet_chains, ChainGroup,
    ChainSpec, Erc20Token, NativeCurrency, TokenOption,
};
pub use transfer::{CallPayload, TransferRequest};
pub use units::{to_decimal_string, to_smallest_unit, AmountError, GasCredit};
pub use user_operation::{
    PaymasterSponsorship, PendingUserOperation, TransactionInclusion, UserCredit, UserOperation,
    UserOperationGasEstimation, UserOperationHash, UserOperationReceipt,
};
pub use utils::{as_checksum_addr, get_address, parse_hex_quantity};
