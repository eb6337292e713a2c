use ethers::types::Address;
use jsonrpsee::{core::RpcResult, proc_macros::rpc};
use playground_primitives::{
    PaymasterSponsorship, PendingUserOperation, UserCredit, UserOperation, UserOperationHash,
};

/// The `cc` namespace methods of the paymaster service
#[rpc(client, server, namespace = "cc")]
pub trait PaymasterApi {
    /// Request sponsorship of a user operation; the result carries `paymasterAndData`.
    #[method(name = "sponsorUserOperation")]
    async fn sponsor_user_operation(
        &self,
        user_operation: UserOperation,
        entry_point: Address,
        chain_id: u64,
    ) -> RpcResult<PaymasterSponsorship>;

    /// Prepaid gas credit of the account, or None if the paymaster keeps none.
    #[method(name = "getUserCredit")]
    async fn get_user_credit(&self, address: Address, chain_id: u64)
        -> RpcResult<Option<UserCredit>>;

    #[method(name = "listPendingUserOperations")]
    async fn list_pending_user_operations(
        &self,
        address: Address,
    ) -> RpcResult<Vec<PendingUserOperation>>;

    /// Drop a pending user operation; false if the paymaster does not know it.
    #[method(name = "rejectUserOperation")]
    async fn reject_user_operation(&self, user_operation_hash: UserOperationHash)
        -> RpcResult<bool>;
}
