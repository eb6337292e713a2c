//! Playground constants

/// Entry point smart contract
pub mod entry_point {
    /// Address of the entry point smart contract
    pub const ADDRESS: &str = "0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789";
}

/// Smart account (SimpleAccount) deployment
pub mod account {
    /// Default SimpleAccount factory (entry point 0.6.0)
    pub const FACTORY_ADDRESS: &str = "0x9406Cc6185a346906296840746125a0E44976454";
    /// Default salt used to derive the counterfactual account address
    pub const DEFAULT_SALT: u64 = 0;
    /// Signature placed into a user operation while its gas is being estimated. It has the shape
    /// of a real ECDSA signature so that signature recovery in the account does not revert.
    pub const DUMMY_SIGNATURE: &str = "0xfffffffffffffffffffffffffffffff0000000000000000000000000000000007aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1c";
}

/// Transfers
pub mod transfer {
    /// Decimals of the native currency on every supported chain
    pub const NATIVE_DECIMALS: u32 = 18;
    /// Number of copies of the payload submitted when batching is enabled
    pub const BATCH_COPIES: usize = 3;
}

/// Paymaster
pub mod paymaster {
    /// Decimals of the prepaid gas credit balance
    pub const CREDIT_DECIMALS: u32 = 6;
    /// Header carrying the application id
    pub const APP_ID_HEADER: &str = "X-App-Id";
}

/// Confirmation polling
pub mod polling {
    /// Default interval between two receipt queries (in milliseconds)
    pub const INTERVAL_MS: u64 = 1000;
    /// Default upper bound of the interval between two receipt queries (in milliseconds)
    pub const MAX_INTERVAL_MS: u64 = 10_000;
    /// Default multiplier applied to the interval after every pending query
    pub const BACKOFF: f64 = 1.5;
    /// Default maximum number of receipt queries
    pub const MAX_ATTEMPTS: u32 = 120;
}

/// RPC error codes returned by bundlers (ERC-4337)
pub mod rpc_error_codes {
    pub const VALIDATION: i32 = -32500;
    pub const PAYMASTER: i32 = -32501;
    pub const OPCODE: i32 = -32502;
    pub const EXPIRATION: i32 = -32503;
    pub const ENTITY_BANNED_OR_THROTTLED: i32 = -32504;
    pub const STAKE_TOO_LOW: i32 = -32505;
    pub const SIGNATURE_AGGREGATOR: i32 = -32506;
    pub const SIGNATURE: i32 = -32507;
    pub const EXECUTION: i32 = -32521;
    pub const USER_OPERATION_HASH: i32 = -32601;
}
