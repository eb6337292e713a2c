use jsonrpsee::core::ClientError;
use playground_account::{BundlerError, PaymasterError};

/// Error objects returned by the service keep their code, anything else is a transport failure
pub(crate) fn bundler_error(err: ClientError) -> BundlerError {
    match err {
        ClientError::Call(err) => {
            BundlerError::Rpc { code: err.code(), message: err.message().to_string() }
        }
        err => BundlerError::Transport { inner: err.to_string() },
    }
}

pub(crate) fn paymaster_error(err: ClientError) -> PaymasterError {
    match err {
        ClientError::Call(err) => {
            PaymasterError::Rpc { code: err.code(), message: err.message().to_string() }
        }
        err => PaymasterError::Transport { inner: err.to_string() },
    }
}
