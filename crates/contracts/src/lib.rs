//! Contract interfaces used by the playground: the ERC-4337 entry point, SimpleAccount with
//! its factory and ERC-20 tokens

pub mod account;
pub mod calls;
pub mod entry_point;
mod error;
mod gen;

pub use account::SimpleAccountState;
pub use calls::{
    account_call_data, account_init_code, decode_account_call_data, decode_erc20_transfer,
    erc20_transfer, CallDataError,
};
pub use entry_point::EntryPoint;
pub use error::{decode_revert_error, decode_revert_string, ContractCallError};
pub use gen::{FailedOp, SimpleAccountFactoryAPI};
