//! Playground controller
//!
//! Holds the operator's selections (chain, bundler, paymaster, transfer form) and the account
//! session derived from them. The session is derived again whenever the chain or one of the
//! collaborators is replaced by a different instance, and reused otherwise. At most one
//! submission runs at a time; its progress is published on a watch channel.

use crate::{
    client::{BundlerClient, PaymasterClient, ReaderFactory},
    credit::read_gas_credit,
    error::PlaygroundError,
    operation::{self, ConfirmationResult, OperationHandle, PollPolicy, SubmitOptions},
    session::{derive_session, AccountSession, SessionInputs, SessionOptions},
    signer::SignerAdapter,
    transaction,
};
use ethers::types::{Address, H256};
use playground_primitives::{find_chain, CallPayload, ChainSpec, GasCredit, TransferRequest};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

/// Transfer form filled in by the operator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferForm {
    pub recipient: String,
    /// Zero address selects the native currency
    pub token: Address,
    pub amount: String,
    pub sponsor_gas: bool,
    pub batch: bool,
}

impl Default for TransferForm {
    fn default() -> Self {
        Self {
            recipient: String::new(),
            token: Address::zero(),
            amount: String::new(),
            sponsor_gas: true,
            batch: false,
        }
    }
}

impl TransferForm {
    pub fn to_request(&self) -> Result<TransferRequest, PlaygroundError> {
        let recipient = self
            .recipient
            .trim()
            .parse::<Address>()
            .map_err(|_| PlaygroundError::InvalidAddress { address: self.recipient.clone() })?;
        Ok(TransferRequest {
            recipient,
            token: self.token,
            amount: self.amount.clone(),
            sponsor_gas: self.sponsor_gas,
            batch: self.batch,
        })
    }

    /// Clears recipient, amount and token; the switches are kept
    pub fn reset(&mut self) {
        self.recipient.clear();
        self.amount.clear();
        self.token = Address::zero();
    }
}

/// Progress of the current submission
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    /// Payloads built from the form
    Built(Vec<CallPayload>),
    /// Submitted, waiting for the transaction hash
    Waiting(OperationHandle),
    Confirmed(H256),
    Failed(String),
}

#[derive(Default)]
struct Selection {
    chain: Option<&'static ChainSpec>,
    bundler: Option<Arc<dyn BundlerClient>>,
    paymaster: Option<Arc<dyn PaymasterClient>>,
    session: Option<(SessionInputs, Arc<AccountSession>)>,
}

impl Selection {
    fn inputs(&self) -> SessionInputs {
        SessionInputs {
            chain_id: self.chain.map(|chain| chain.id()),
            bundler: self.bundler.clone(),
            paymaster: self.paymaster.clone(),
        }
    }
}

struct WaitingGuard<'a>(&'a AtomicBool);

impl Drop for WaitingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct Playground {
    signer: SignerAdapter,
    reader_factory: ReaderFactory,
    session_options: SessionOptions,
    poll_policy: PollPolicy,
    selection: Mutex<Selection>,
    form: Mutex<TransferForm>,
    waiting: AtomicBool,
    status: watch::Sender<SubmissionStatus>,
    gas_credit: watch::Sender<Option<GasCredit>>,
}

impl Playground {
    pub fn new(signer: SignerAdapter, reader_factory: ReaderFactory) -> Self {
        Self {
            signer,
            reader_factory,
            session_options: SessionOptions::default(),
            poll_policy: PollPolicy::default(),
            selection: Mutex::new(Selection::default()),
            form: Mutex::new(TransferForm::default()),
            waiting: AtomicBool::new(false),
            status: watch::channel(SubmissionStatus::Idle).0,
            gas_credit: watch::channel(None).0,
        }
    }

    pub fn with_session_options(mut self, session_options: SessionOptions) -> Self {
        self.session_options = session_options;
        self
    }

    pub fn with_poll_policy(mut self, poll_policy: PollPolicy) -> Self {
        self.poll_policy = poll_policy;
        self
    }

    /// Selects the chain and derives the session for it (when a bundler is set)
    pub async fn select_chain(
        &self,
        chain_id: u64,
    ) -> Result<Option<Arc<AccountSession>>, PlaygroundError> {
        let chain = find_chain(chain_id).ok_or(PlaygroundError::UnknownChain { chain_id })?;
        {
            let mut form = self.form.lock().await;
            if chain.token_decimals(&form.token).is_none() {
                form.token = Address::zero();
            }
        }

        let mut selection = self.selection.lock().await;
        selection.chain = Some(chain);
        self.refresh_session(&mut selection).await
    }

    /// Replaces the bundler and paymaster; without a bundler there is no session
    pub async fn set_collaborators(
        &self,
        bundler: Option<Arc<dyn BundlerClient>>,
        paymaster: Option<Arc<dyn PaymasterClient>>,
    ) -> Result<Option<Arc<AccountSession>>, PlaygroundError> {
        let mut selection = self.selection.lock().await;
        selection.bundler = bundler;
        selection.paymaster = paymaster;
        self.refresh_session(&mut selection).await
    }

    async fn refresh_session(
        &self,
        selection: &mut Selection,
    ) -> Result<Option<Arc<AccountSession>>, PlaygroundError> {
        let inputs = selection.inputs();
        if let Some((built_from, session)) = &selection.session {
            if built_from.same_as(&inputs) {
                trace!("Inputs unchanged, reusing session: {inputs:?}");
                return Ok(Some(session.clone()));
            }
        }

        selection.session = None;
        self.gas_credit.send_replace(None);

        let (Some(chain), Some(bundler)) = (selection.chain, selection.bundler.clone()) else {
            debug!("No session without chain and bundler: {inputs:?}");
            return Ok(None);
        };

        let reader = (self.reader_factory)(chain)?;
        let session = Arc::new(
            derive_session(
                chain,
                &self.signer,
                bundler,
                selection.paymaster.clone(),
                reader,
                &self.session_options,
            )
            .await?,
        );
        selection.session = Some((inputs, session.clone()));

        self.gas_credit.send_replace(read_gas_credit(&session).await);
        Ok(Some(session))
    }

    /// Current session, if one could be derived
    pub async fn session(&self) -> Option<Arc<AccountSession>> {
        self.selection.lock().await.session.as_ref().map(|(_, session)| session.clone())
    }

    pub async fn selected_chain(&self) -> Option<&'static ChainSpec> {
        self.selection.lock().await.chain
    }

    pub fn status(&self) -> watch::Receiver<SubmissionStatus> {
        self.status.subscribe()
    }

    pub fn gas_credit(&self) -> watch::Receiver<Option<GasCredit>> {
        self.gas_credit.subscribe()
    }

    /// Reads the gas credit of the current session again
    pub async fn refresh_gas_credit(&self) -> Option<GasCredit> {
        let credit = match self.session().await {
            Some(session) => read_gas_credit(&session).await,
            None => None,
        };
        self.gas_credit.send_replace(credit);
        credit
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting.load(Ordering::SeqCst)
    }

    pub async fn form(&self) -> TransferForm {
        self.form.lock().await.clone()
    }

    pub async fn update_form(&self, update: impl FnOnce(&mut TransferForm)) {
        update(&mut *self.form.lock().await);
    }

    pub async fn reset_form(&self) {
        self.form.lock().await.reset();
        self.status.send_replace(SubmissionStatus::Idle);
    }

    /// Submits the form and waits for the transaction hash
    ///
    /// Fails with [PlaygroundError::SubmissionInProgress] while another submission runs.
    pub async fn submit(
        &self,
        cancel: &CancellationToken,
    ) -> Result<ConfirmationResult, PlaygroundError> {
        if self.waiting.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst).is_err() {
            return Err(PlaygroundError::SubmissionInProgress);
        }
        let _guard = WaitingGuard(&self.waiting);

        let res = self.run_submission(cancel).await;
        match &res {
            Ok(confirmation) => {
                self.status
                    .send_replace(SubmissionStatus::Confirmed(confirmation.transaction_hash));
                self.refresh_gas_credit().await;
            }
            Err(err) => {
                self.status.send_replace(SubmissionStatus::Failed(err.to_string()));
            }
        }
        res
    }

    async fn run_submission(
        &self,
        cancel: &CancellationToken,
    ) -> Result<ConfirmationResult, PlaygroundError> {
        let session = self.session().await.ok_or(PlaygroundError::SessionUnavailable)?;
        let request = self.form().await.to_request()?;
        let payloads = transaction::build(&request, session.chain())?;
        self.status.send_replace(SubmissionStatus::Built(payloads.clone()));

        let handle = operation::submit(
            &session,
            &payloads,
            SubmitOptions { sponsor_gas: request.sponsor_gas },
        )
        .await?;
        info!("Waiting for {} on chain {}", handle.user_operation_hash, handle.chain_id);
        self.status.send_replace(SubmissionStatus::Waiting(handle));

        operation::wait_for_confirmation(&session, &handle, &self.poll_policy, cancel).await
    }
}
