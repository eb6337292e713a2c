//! Signer adapter over an injected wallet provider
//!
//! The owner of a smart account is an externally owned account held by a wallet. The wallet is
//! passed into [SignerAdapter::new] as a [WalletProvider]; the adapter only needs the owner
//! address and EIP-191 signatures over raw bytes (the user operation hash).

use crate::error::{PlaygroundError, WalletError};
use async_trait::async_trait;
use ethers::{
    providers::{JsonRpcClient, Provider},
    signers::{coins_bip39::English, LocalWallet, MnemonicBuilder, Signer},
    types::{Address, Bytes, Signature},
};
use expanded_pathbuf::ExpandedPathBuf;
use std::{fmt, sync::Arc};
use tracing::{debug, trace};

/// Derivation path of the owner key when a mnemonic is used
const DERIVATION_PATH: &str = "m/44'/60'/0'/0/0";

/// Wallet holding the owner key
#[async_trait]
pub trait WalletProvider: Send + Sync + fmt::Debug {
    /// Accounts exposed by the wallet (the first one is the owner)
    async fn request_addresses(&self) -> Result<Vec<Address>, WalletError>;

    /// Signs the raw bytes as an EIP-191 personal message
    async fn sign_message(&self, message: &[u8]) -> Result<Signature, WalletError>;
}

/// Owner signer handed to the smart account
#[derive(Clone, Debug, Default)]
pub struct SignerAdapter {
    provider: Option<Arc<dyn WalletProvider>>,
}

impl SignerAdapter {
    pub fn new(provider: Arc<dyn WalletProvider>) -> Self {
        Self { provider: Some(provider) }
    }

    /// Signer without a wallet, every request fails with [PlaygroundError::NoWalletConnected]
    pub fn disconnected() -> Self {
        Self { provider: None }
    }

    pub fn is_connected(&self) -> bool {
        self.provider.is_some()
    }

    fn provider(&self) -> Result<&Arc<dyn WalletProvider>, PlaygroundError> {
        self.provider
            .as_ref()
            .ok_or(PlaygroundError::NoWalletConnected { inner: "no wallet provider".into() })
    }

    /// Address of the owner (first account of the wallet)
    pub async fn get_address(&self) -> Result<Address, PlaygroundError> {
        let addresses = self
            .provider()?
            .request_addresses()
            .await
            .map_err(|err| PlaygroundError::NoWalletConnected { inner: err.to_string() })?;
        addresses.first().copied().ok_or(PlaygroundError::NoWalletConnected {
            inner: WalletError::NoAccounts.to_string(),
        })
    }

    /// Signs the raw message bytes with the owner key
    pub async fn sign(&self, message: &[u8]) -> Result<Bytes, PlaygroundError> {
        let signature = self
            .provider()?
            .sign_message(message)
            .await
            .map_err(|err| PlaygroundError::SignatureRejected { inner: err.to_string() })?;
        trace!("Signed {} bytes", message.len());
        Ok(signature.to_vec().into())
    }
}

/// Wallet backed by a local private key
#[derive(Clone)]
pub struct LocalWalletProvider {
    wallet: LocalWallet,
}

impl fmt::Debug for LocalWalletProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalWalletProvider").field("address", &self.wallet.address()).finish()
    }
}

impl LocalWalletProvider {
    pub fn new(wallet: LocalWallet) -> Self {
        Self { wallet }
    }

    /// Loads the owner key from a file containing the mnemonic phrase
    pub fn from_file(path: ExpandedPathBuf) -> Result<Self, WalletError> {
        Self::from_mnemonic(MnemonicBuilder::<English>::default().phrase(path.to_path_buf()))
    }

    /// Derives the owner key from a mnemonic phrase
    pub fn from_phrase(phrase: &str) -> Result<Self, WalletError> {
        Self::from_mnemonic(MnemonicBuilder::<English>::default().phrase(phrase))
    }

    /// Uses a hex encoded private key (with or without `0x`)
    pub fn from_private_key(key: &str) -> Result<Self, WalletError> {
        let key = key.trim().trim_start_matches("0x");
        let wallet = key
            .parse::<LocalWallet>()
            .map_err(|err| WalletError::Provider { inner: err.to_string() })?;
        Ok(Self::new(wallet))
    }

    fn from_mnemonic(builder: MnemonicBuilder<English>) -> Result<Self, WalletError> {
        let wallet = builder
            .derivation_path(DERIVATION_PATH)
            .and_then(|builder| builder.build())
            .map_err(|err| WalletError::Provider { inner: err.to_string() })?;
        debug!("Loaded local wallet {:?}", wallet.address());
        Ok(Self::new(wallet))
    }

    pub fn address(&self) -> Address {
        self.wallet.address()
    }
}

#[async_trait]
impl WalletProvider for LocalWalletProvider {
    async fn request_addresses(&self) -> Result<Vec<Address>, WalletError> {
        Ok(vec![self.wallet.address()])
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Signature, WalletError> {
        self.wallet
            .sign_message(message)
            .await
            .map_err(|err| WalletError::Rejected { inner: err.to_string() })
    }
}

/// Wallet managed by an Ethereum node (`eth_requestAccounts` and `personal_sign`)
#[derive(Debug)]
pub struct NodeWalletProvider<P> {
    provider: Provider<P>,
}

impl<P: JsonRpcClient> NodeWalletProvider<P> {
    pub fn new(provider: Provider<P>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P: JsonRpcClient + fmt::Debug + 'static> WalletProvider for NodeWalletProvider<P> {
    async fn request_addresses(&self) -> Result<Vec<Address>, WalletError> {
        self.provider
            .request("eth_requestAccounts", ())
            .await
            .map_err(|err| WalletError::Provider { inner: err.to_string() })
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Signature, WalletError> {
        let owner =
            self.request_addresses().await?.first().copied().ok_or(WalletError::NoAccounts)?;
        let signature: Bytes = self
            .provider
            .request("personal_sign", (Bytes::from(message.to_vec()), owner))
            .await
            .map_err(|err| WalletError::Rejected { inner: err.to_string() })?;
        Signature::try_from(signature.as_ref())
            .map_err(|err| WalletError::Provider { inner: err.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::utils::hash_message;

    const PHRASE: &str = "test test test test test test test test test test test junk";

    #[tokio::test]
    async fn local_wallet_from_phrase() {
        let provider = LocalWalletProvider::from_phrase(PHRASE).unwrap();
        assert_eq!(
            provider.address(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse::<Address>().unwrap()
        );

        let signer = SignerAdapter::new(Arc::new(provider.clone()));
        assert_eq!(signer.get_address().await.unwrap(), provider.address());
    }

    #[tokio::test]
    async fn signs_raw_bytes() {
        let provider = LocalWalletProvider::from_private_key(
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        )
        .unwrap();
        let signer = SignerAdapter::new(Arc::new(provider.clone()));

        let message = [0xab_u8; 32];
        let signature = signer.sign(&message).await.unwrap();
        assert_eq!(signature.len(), 65);

        let signature = Signature::try_from(signature.as_ref()).unwrap();
        assert_eq!(signature.recover(hash_message(message)).unwrap(), provider.address());
    }

    #[tokio::test]
    async fn disconnected_signer() {
        let signer = SignerAdapter::disconnected();
        assert!(!signer.is_connected());
        assert!(matches!(signer.get_address().await, Err(PlaygroundError::NoWalletConnected { .. })));
        assert!(matches!(signer.sign(&[1, 2, 3]).await, Err(PlaygroundError::NoWalletConnected { .. })));
    }
}
