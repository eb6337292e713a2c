//! Registry of supported chains and their tokens

use crate::constants::transfer::NATIVE_DECIMALS;
use alloy_chains::Chain;
use ethers::{
    types::{Address, H256},
    utils::to_checksum,
};
use lazy_static::lazy_static;
use serde::Serialize;
use strum_macros::{Display, EnumString, EnumVariantNames};

/// Native currency of a chain
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
}

impl NativeCurrency {
    fn new(name: &str, symbol: &str) -> Self {
        Self { name: name.into(), symbol: symbol.into(), decimals: NATIVE_DECIMALS }
    }
}

/// ERC-20 token listed for a chain
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Erc20Token {
    pub address: Address,
    pub symbol: String,
    pub decimals: u32,
}

/// Token choice offered to the operator (the native currency comes first)
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TokenOption {
    /// Token address, zero address for the native currency
    pub address: Address,
    pub symbol: String,
    pub decimals: u32,
}

/// Supported chain with the metadata needed to build and display transfers
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainSpec {
    #[serde(skip)]
    pub chain: Chain,
    pub name: String,
    pub native_currency: NativeCurrency,
    /// Default (public) RPC endpoint
    pub rpc_url: String,
    pub block_explorer_url: String,
    pub testnet: bool,
    pub erc20_list: Vec<Erc20Token>,
}

impl ChainSpec {
    /// Numeric chain id
    pub fn id(&self) -> u64 {
        self.chain.id()
    }

    /// Finds a listed ERC-20 token by its address
    pub fn find_token(&self, address: &Address) -> Option<&Erc20Token> {
        self.erc20_list.iter().find(|token| token.address == *address)
    }

    /// Decimals of the token at the given address; the zero address selects the native currency
    pub fn token_decimals(&self, address: &Address) -> Option<u32> {
        if address.is_zero() {
            Some(self.native_currency.decimals)
        } else {
            self.find_token(address).map(|token| token.decimals)
        }
    }

    /// All tokens that can be transferred on this chain, native currency first
    pub fn token_options(&self) -> Vec<TokenOption> {
        let native = TokenOption {
            address: Address::zero(),
            symbol: self.native_currency.symbol.clone(),
            decimals: self.native_currency.decimals,
        };
        std::iter::once(native)
            .chain(self.erc20_list.iter().map(|token| TokenOption {
                address: token.address,
                symbol: token.symbol.clone(),
                decimals: token.decimals,
            }))
            .collect()
    }

    /// Block explorer link of an address
    pub fn address_url(&self, address: &Address) -> String {
        format!("{}/address/{}", self.block_explorer_url, to_checksum(address, None))
    }

    /// Block explorer link of a transaction
    pub fn tx_url(&self, hash: &H256) -> String {
        format!("{}/tx/{hash:?}", self.block_explorer_url)
    }
}

/// Group of chains (used for listing)
#[derive(Clone, Copy, Debug, Display, EnumString, EnumVariantNames, PartialEq, Eq)]
#[strum(serialize_all = "kebab_case")]
pub enum ChainGroup {
    All,
    Testnet,
    Mainnet,
}

impl ChainGroup {
    fn contains(&self, chain: &ChainSpec) -> bool {
        match self {
            ChainGroup::All => true,
            ChainGroup::Testnet => chain.testnet,
            ChainGroup::Mainnet => !chain.testnet,
        }
    }
}

fn erc20(address: &str, symbol: &str, decimals: u32) -> Erc20Token {
    Erc20Token {
        address: address.parse().expect("token address literal is valid"),
        symbol: symbol.into(),
        decimals,
    }
}

#[allow(clippy::too_many_arguments)]
fn chain_spec(
    id: u64,
    name: &str,
    native_currency: NativeCurrency,
    rpc_url: &str,
    block_explorer_url: &str,
    testnet: bool,
    erc20_list: Vec<Erc20Token>,
) -> ChainSpec {
    ChainSpec {
        chain: Chain::from_id(id),
        name: name.into(),
        native_currency,
        rpc_url: rpc_url.into(),
        block_explorer_url: block_explorer_url.into(),
        testnet,
        erc20_list,
    }
}

lazy_static! {
    static ref SUPPORTED_CHAINS: Vec<ChainSpec> = {
        let eth = || NativeCurrency::new("Ether", "ETH");
        vec![
            // testnets
            chain_spec(
                420,
                "Optimism Goerli",
                eth(),
                "https://goerli.optimism.io",
                "https://goerli-optimism.etherscan.io",
                true,
                vec![
                    erc20("0x32307adfFE088e383AFAa721b06436aDaBA47DBE", "OUT-1", 18),
                    erc20("0xb378ed8647d67b5db6fd41817fd7a0949627d87a", "OUT-2", 18),
                    erc20("0x4e6597062c7dc988fbcfe77293d833bad770c19b", "OUT-3", 18),
                ],
            ),
            chain_spec(
                80001,
                "Polygon Mumbai",
                NativeCurrency::new("MATIC", "MATIC"),
                "https://rpc-mumbai.maticvigil.com",
                "https://mumbai.polygonscan.com",
                true,
                vec![],
            ),
            chain_spec(
                84531,
                "Base Goerli",
                eth(),
                "https://goerli.base.org",
                "https://goerli.basescan.org",
                true,
                vec![],
            ),
            chain_spec(
                59140,
                "Linea Goerli Testnet",
                eth(),
                "https://rpc.goerli.linea.build",
                "https://goerli.lineascan.build",
                true,
                vec![],
            ),
            chain_spec(
                421613,
                "Arbitrum Goerli",
                eth(),
                "https://goerli-rollup.arbitrum.io/rpc",
                "https://goerli.arbiscan.io",
                true,
                vec![],
            ),
            chain_spec(
                5611,
                "opBNB Testnet",
                NativeCurrency::new("BNB", "tBNB"),
                "https://opbnb-testnet-rpc.bnbchain.org",
                "https://testnet.opbnbscan.com",
                true,
                vec![],
            ),
            chain_spec(
                534351,
                "Scroll Sepolia",
                eth(),
                "https://sepolia-rpc.scroll.io",
                "https://sepolia-blockscout.scroll.io",
                true,
                vec![],
            ),
            // mainnets
            chain_spec(
                10,
                "OP Mainnet",
                eth(),
                "https://mainnet.optimism.io",
                "https://optimistic.etherscan.io",
                false,
                vec![],
            ),
            chain_spec(
                137,
                "Polygon",
                NativeCurrency::new("MATIC", "MATIC"),
                "https://polygon-rpc.com",
                "https://polygonscan.com",
                false,
                vec![],
            ),
            chain_spec(8453, "Base", eth(), "https://mainnet.base.org", "https://basescan.org", false, vec![]),
            chain_spec(
                59144,
                "Linea Mainnet",
                eth(),
                "https://rpc.linea.build",
                "https://lineascan.build",
                false,
                vec![],
            ),
            chain_spec(
                42161,
                "Arbitrum One",
                eth(),
                "https://arb1.arbitrum.io/rpc",
                "https://arbiscan.io",
                false,
                vec![],
            ),
            chain_spec(
                204,
                "opBNB",
                NativeCurrency::new("BNB", "BNB"),
                "https://opbnb-mainnet-rpc.bnbchain.org",
                "https://opbnbscan.com",
                false,
                vec![],
            ),
        ]
    };
}

/// All supported chains (testnets first)
pub fn supported_chains() -> &'static [ChainSpec] {
    SUPPORTED_CHAINS.as_slice()
}

/// Supported chains belonging to the given group
pub fn chains_in(group: ChainGroup) -> impl Iterator<Item = &'static ChainSpec> {
    supported_chains().iter().filter(move |chain| group.contains(chain))
}

pub fn testnet_chains() -> impl Iterator<Item = &'static ChainSpec> {
    chains_in(ChainGroup::Testnet)
}

pub fn mainnet_chains() -> impl Iterator<Item = &'static ChainSpec> {
    chains_in(ChainGroup::Mainnet)
}

/// Looks up a supported chain by its numeric id
pub fn find_chain(id: u64) -> Option<&'static ChainSpec> {
    supported_chains().iter().find(|chain| chain.id() == id)
}
