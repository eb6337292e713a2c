use ethers::contract::abigen;

abigen!(
    EntryPointAPI,
    r#"[
        function getNonce(address sender, uint192 key) external view returns (uint256 nonce)
        error FailedOp(uint256 opIndex, string reason)
    ]"#
);

abigen!(
    SimpleAccountAPI,
    r#"[
        function execute(address dest, uint256 value, bytes calldata func) external
        function executeBatch(address[] calldata dest, bytes[] calldata func) external
    ]"#
);

abigen!(
    SimpleAccountFactoryAPI,
    r#"[
        function createAccount(address owner, uint256 salt) external returns (address ret)
        function getAddress(address owner, uint256 salt) external view returns (address)
    ]"#
);

abigen!(
    ERC20API,
    r#"[
        function transfer(address to, uint256 amount) external returns (bool)
    ]"#
);
