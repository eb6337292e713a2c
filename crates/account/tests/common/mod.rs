#![allow(dead_code)]

use async_trait::async_trait;
use ethers::{
    signers::{LocalWallet, Signer},
    types::{Address, Bytes, Signature, H256, U256},
};
use playground_account::{
    derive_session, AccountReader, AccountSession, BundlerClient, BundlerError, PaymasterClient,
    PaymasterError, ReaderError, SessionOptions, SignerAdapter, WalletError, WalletProvider,
};
use playground_primitives::{
    find_chain, PaymasterSponsorship, PendingUserOperation, TransactionInclusion, UserCredit,
    UserOperation, UserOperationGasEstimation, UserOperationHash, UserOperationReceipt,
};
use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

pub const OWNER_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

pub fn owner_wallet() -> LocalWallet {
    OWNER_KEY.parse().unwrap()
}

pub fn account_address() -> Address {
    Address::repeat_byte(0xaa)
}

pub fn recipient() -> Address {
    "0x52908400098527886E0F7030069857D2E4169EE7".parse().unwrap()
}

pub fn estimation() -> UserOperationGasEstimation {
    UserOperationGasEstimation {
        pre_verification_gas: 50_000.into(),
        verification_gas_limit: 150_000.into(),
        call_gas_limit: 80_000.into(),
    }
}

pub fn receipt(transaction_hash: H256) -> UserOperationReceipt {
    UserOperationReceipt {
        success: true,
        receipt: Some(TransactionInclusion {
            transaction_hash: Some(transaction_hash),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn paymaster_and_data() -> Bytes {
    [Address::repeat_byte(0x99).as_bytes(), &[1, 2, 3, 4]].concat().into()
}

type ReceiptResponse = Result<Option<UserOperationReceipt>, BundlerError>;

#[derive(Debug, Default)]
pub struct MockBundler {
    receipts: Mutex<VecDeque<ReceiptResponse>>,
    receipt_queries: AtomicUsize,
    pub sent: Mutex<Vec<UserOperation>>,
    pub estimated: Mutex<Vec<UserOperation>>,
    pub reject_with: Option<BundlerError>,
}

impl MockBundler {
    /// Answers receipt queries with the given responses, then with `null` forever
    pub fn with_receipts(receipts: Vec<ReceiptResponse>) -> Self {
        Self { receipts: Mutex::new(receipts.into()), ..Default::default() }
    }

    pub fn rejecting(err: BundlerError) -> Self {
        Self { reject_with: Some(err), ..Default::default() }
    }

    pub fn receipt_queries(&self) -> usize {
        self.receipt_queries.load(Ordering::SeqCst)
    }

    pub fn last_sent(&self) -> UserOperation {
        self.sent.lock().unwrap().last().cloned().expect("a user operation was sent")
    }
}

#[async_trait]
impl BundlerClient for MockBundler {
    async fn send_user_operation(
        &self,
        uo: &UserOperation,
        entry_point: Address,
        chain_id: u64,
    ) -> Result<UserOperationHash, BundlerError> {
        self.sent.lock().unwrap().push(uo.clone());
        match &self.reject_with {
            Some(err) => Err(err.clone()),
            None => Ok(uo.hash(&entry_point, chain_id)),
        }
    }

    async fn estimate_user_operation_gas(
        &self,
        uo: &UserOperation,
        _entry_point: Address,
        _chain_id: u64,
    ) -> Result<UserOperationGasEstimation, BundlerError> {
        self.estimated.lock().unwrap().push(uo.clone());
        Ok(estimation())
    }

    async fn get_user_operation_receipt(
        &self,
        _uo_hash: &UserOperationHash,
        _chain_id: u64,
    ) -> Result<Option<UserOperationReceipt>, BundlerError> {
        self.receipt_queries.fetch_add(1, Ordering::SeqCst);
        self.receipts.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }
}

#[derive(Debug, Default)]
pub struct MockPaymaster {
    pub sponsored: AtomicUsize,
    pub credit: Option<UserCredit>,
    pub fail_credit: bool,
    pub refuse_sponsorship: Option<PaymasterError>,
    pub pending: Vec<PendingUserOperation>,
    pub rejected: Mutex<Vec<UserOperationHash>>,
}

impl MockPaymaster {
    pub fn with_credit(balance: &str) -> Self {
        Self { credit: Some(UserCredit { balance: balance.into() }), ..Default::default() }
    }

    pub fn sponsored(&self) -> usize {
        self.sponsored.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymasterClient for MockPaymaster {
    async fn sponsor_user_operation(
        &self,
        _uo: &UserOperation,
        _entry_point: Address,
        _chain_id: u64,
    ) -> Result<PaymasterSponsorship, PaymasterError> {
        self.sponsored.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.refuse_sponsorship {
            return Err(err.clone());
        }
        Ok(PaymasterSponsorship {
            paymaster_and_data: paymaster_and_data(),
            call_gas_limit: Some(90_000.into()),
            ..Default::default()
        })
    }

    async fn get_user_credit(
        &self,
        _address: Address,
        _chain_id: u64,
    ) -> Result<Option<UserCredit>, PaymasterError> {
        if self.fail_credit {
            return Err(PaymasterError::Transport { inner: "connection refused".into() });
        }
        Ok(self.credit.clone())
    }

    async fn list_pending_user_operations(
        &self,
        _address: Address,
    ) -> Result<Vec<PendingUserOperation>, PaymasterError> {
        Ok(self.pending.clone())
    }

    async fn reject_user_operation(
        &self,
        uo_hash: &UserOperationHash,
    ) -> Result<(), PaymasterError> {
        self.rejected.lock().unwrap().push(*uo_hash);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MockReader {
    pub deployed: bool,
    pub fail: bool,
}

#[async_trait]
impl AccountReader for MockReader {
    async fn account_address(&self, _owner: Address, _salt: U256) -> Result<Address, ReaderError> {
        if self.fail {
            return Err(ReaderError::Other { inner: "node unreachable".into() });
        }
        Ok(account_address())
    }

    async fn is_deployed(&self, _account: Address) -> Result<bool, ReaderError> {
        Ok(self.deployed)
    }

    async fn nonce(&self, _account: Address) -> Result<U256, ReaderError> {
        Ok(if self.deployed { 5.into() } else { U256::zero() })
    }

    async fn fees(&self) -> Result<(U256, U256), ReaderError> {
        Ok((2_000_000_000u64.into(), 1_000_000_000u64.into()))
    }
}

/// Wallet answering with a fixed set of accounts
#[derive(Debug, Default)]
pub struct MockWallet {
    pub wallet: Option<LocalWallet>,
    pub reject_signing: bool,
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn request_addresses(&self) -> Result<Vec<Address>, WalletError> {
        Ok(self.wallet.iter().map(|wallet| wallet.address()).collect())
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Signature, WalletError> {
        match &self.wallet {
            Some(wallet) if !self.reject_signing => wallet
                .sign_message(message)
                .await
                .map_err(|err| WalletError::Provider { inner: err.to_string() }),
            _ => Err(WalletError::Rejected { inner: "user denied message signature".into() }),
        }
    }
}

pub fn signer() -> SignerAdapter {
    SignerAdapter::new(Arc::new(MockWallet { wallet: Some(owner_wallet()), reject_signing: false }))
}

pub async fn session(
    bundler: Arc<MockBundler>,
    paymaster: Option<Arc<MockPaymaster>>,
    deployed: bool,
) -> AccountSession {
    derive_session(
        find_chain(420).unwrap(),
        &signer(),
        bundler,
        paymaster.map(|paymaster| paymaster as Arc<dyn PaymasterClient>),
        Arc::new(MockReader { deployed, fail: false }),
        &SessionOptions::default(),
    )
    .await
    .unwrap()
}
