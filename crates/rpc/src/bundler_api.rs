use ethers::types::Address;
use jsonrpsee::{core::RpcResult, proc_macros::rpc};
use playground_primitives::{
    UserOperation, UserOperationGasEstimation, UserOperationHash, UserOperationReceipt,
};

/// The ERC-4337 `eth` namespace methods of the bundler service
#[rpc(client, server, namespace = "eth")]
pub trait BundlerApi {
    /// Send a [UserOperation](UserOperation) signed by the account's owner.
    ///
    /// # Returns
    /// * `RpcResult<UserOperationHash>` - The hash of the accepted user operation.
    #[method(name = "sendUserOperation")]
    async fn send_user_operation(
        &self,
        user_operation: UserOperation,
        entry_point: Address,
        chain_id: u64,
    ) -> RpcResult<UserOperationHash>;

    /// Estimate the gas limits of a user operation carrying a dummy signature.
    #[method(name = "estimateUserOperationGas")]
    async fn estimate_user_operation_gas(
        &self,
        user_operation: UserOperation,
        entry_point: Address,
        chain_id: u64,
    ) -> RpcResult<UserOperationGasEstimation>;

    /// Retrieve the receipt of a user operation.
    ///
    /// # Returns
    /// * `RpcResult<Option<UserOperationReceipt>>` - The receipt, or None while the user
    ///   operation is not included.
    #[method(name = "getUserOperationReceipt")]
    async fn get_user_operation_receipt(
        &self,
        user_operation_hash: UserOperationHash,
        chain_id: u64,
    ) -> RpcResult<Option<UserOperationReceipt>>;
}
