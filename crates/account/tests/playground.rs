mod common;

use common::{receipt, recipient, signer, MockBundler, MockPaymaster, MockReader};
use ethers::types::{Address, H256};
use playground_account::{
    AccountReader, BundlerClient, PaymasterClient, PlaygroundError, Playground, PollPolicy,
    ReaderFactory, SubmissionStatus,
};
use playground_primitives::{find_chain, ChainSpec, GasCredit};
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio_util::sync::CancellationToken;

/// Reader factory counting how many sessions were derived
fn counting_factory() -> (ReaderFactory, Arc<AtomicUsize>) {
    let derived = Arc::new(AtomicUsize::new(0));
    let counter = derived.clone();
    let factory: ReaderFactory = Arc::new(move |_chain: &ChainSpec| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MockReader { deployed: true, fail: false }) as Arc<dyn AccountReader>)
    });
    (factory, derived)
}

fn playground() -> (Playground, Arc<AtomicUsize>) {
    let (factory, derived) = counting_factory();
    let playground = Playground::new(signer(), factory)
        .with_poll_policy(PollPolicy::fixed(Duration::from_millis(1), 50));
    (playground, derived)
}

#[tokio::test]
async fn session_follows_inputs() {
    let (playground, derived) = playground();
    let bundler: Arc<dyn BundlerClient> = Arc::new(MockBundler::default());
    let paymaster: Arc<dyn PaymasterClient> = Arc::new(MockPaymaster::with_credit("0x0F4240"));

    // no bundler yet
    assert!(playground.select_chain(420).await.unwrap().is_none());
    assert_eq!(derived.load(Ordering::SeqCst), 0);

    let first = playground
        .set_collaborators(Some(bundler.clone()), Some(paymaster.clone()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(derived.load(Ordering::SeqCst), 1);
    assert_eq!(*playground.gas_credit().borrow(), Some(GasCredit::new(1_000_000.into())));

    // same chain and same instances
    let again = playground.select_chain(420).await.unwrap().unwrap();
    assert!(Arc::ptr_eq(&first, &again));
    playground.set_collaborators(Some(bundler.clone()), Some(paymaster.clone())).await.unwrap();
    assert_eq!(derived.load(Ordering::SeqCst), 1);

    // new chain
    let other = playground.select_chain(80001).await.unwrap().unwrap();
    assert_eq!(other.chain_id(), 80001);
    assert_eq!(derived.load(Ordering::SeqCst), 2);

    // new paymaster instance, even if equal in content
    let replaced = playground
        .set_collaborators(Some(bundler), Some(Arc::new(MockPaymaster::default())))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(derived.load(Ordering::SeqCst), 3);
    assert!(!Arc::ptr_eq(&other, &replaced));
    assert_eq!(*playground.gas_credit().borrow(), None);

    // dropping the bundler drops the session
    assert!(playground.set_collaborators(None, None).await.unwrap().is_none());
    assert!(playground.session().await.is_none());
}

#[tokio::test]
async fn unknown_chain() {
    let (playground, _) = playground();
    assert_eq!(
        playground.select_chain(1).await.unwrap_err(),
        PlaygroundError::UnknownChain { chain_id: 1 }
    );
}

#[tokio::test]
async fn submit_without_session() {
    let (playground, _) = playground();
    playground
        .update_form(|form| {
            form.recipient = format!("{:?}", recipient());
            form.amount = "1".into();
        })
        .await;
    assert_eq!(
        playground.submit(&CancellationToken::new()).await.unwrap_err(),
        PlaygroundError::SessionUnavailable
    );
    assert!(!playground.is_waiting());
}

#[tokio::test]
async fn submits_form_until_confirmed() {
    let (playground, _) = playground();
    let tx_hash = H256::repeat_byte(0x42);
    let bundler = Arc::new(MockBundler::with_receipts(vec![Ok(None), Ok(Some(receipt(tx_hash)))]));
    playground.select_chain(420).await.unwrap();
    playground.set_collaborators(Some(bundler.clone()), None).await.unwrap();
    let token = find_chain(420).unwrap().erc20_list[0].address;

    playground
        .update_form(|form| {
            form.recipient = format!("{:?}", recipient());
            form.token = token;
            form.amount = "0.5".into();
            form.batch = true;
        })
        .await;
    let status = playground.status();

    let confirmation = playground.submit(&CancellationToken::new()).await.unwrap();
    assert_eq!(confirmation.transaction_hash, tx_hash);
    assert_eq!(*status.borrow(), SubmissionStatus::Confirmed(tx_hash));
    assert_eq!(bundler.receipt_queries(), 2);
    assert!(!playground.is_waiting());

    playground.reset_form().await;
    let form = playground.form().await;
    assert!(form.recipient.is_empty());
    assert!(form.amount.is_empty());
    assert_eq!(form.token, Address::zero());
    assert!(form.batch);
    assert_eq!(*status.borrow(), SubmissionStatus::Idle);
}

#[tokio::test]
async fn invalid_recipient() {
    let (playground, _) = playground();
    playground.select_chain(420).await.unwrap();
    playground.set_collaborators(Some(Arc::new(MockBundler::default())), None).await.unwrap();
    playground.update_form(|form| form.amount = "1".into()).await;

    assert_eq!(
        playground.submit(&CancellationToken::new()).await.unwrap_err(),
        PlaygroundError::InvalidAddress { address: String::new() }
    );
    assert!(matches!(*playground.status().borrow(), SubmissionStatus::Failed(_)));
}

#[tokio::test]
async fn rejects_concurrent_submission() {
    let (factory, _) = counting_factory();
    let playground = Arc::new(
        Playground::new(signer(), factory)
            .with_poll_policy(PollPolicy::fixed(Duration::from_secs(60), 10)),
    );
    let bundler = Arc::new(MockBundler::default());
    playground.select_chain(420).await.unwrap();
    playground.set_collaborators(Some(bundler), None).await.unwrap();
    playground
        .update_form(|form| {
            form.recipient = format!("{:?}", recipient());
            form.amount = "1".into();
        })
        .await;

    let cancel = CancellationToken::new();
    let mut status = playground.status();
    let first = {
        let playground = playground.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { playground.submit(&cancel).await })
    };

    // wait until the first submission polls for its receipt
    status.wait_for(|status| matches!(status, SubmissionStatus::Waiting(_))).await.unwrap();
    assert!(playground.is_waiting());
    assert_eq!(
        playground.submit(&CancellationToken::new()).await.unwrap_err(),
        PlaygroundError::SubmissionInProgress
    );

    cancel.cancel();
    assert_eq!(first.await.unwrap().unwrap_err(), PlaygroundError::Cancelled);
    assert!(!playground.is_waiting());
}

#[tokio::test]
async fn chain_switch_keeps_listed_token_only() {
    let (playground, _) = playground();
    let token = find_chain(420).unwrap().erc20_list[0].address;
    playground.select_chain(420).await.unwrap();
    playground.update_form(|form| form.token = token).await;

    playground.select_chain(420).await.unwrap();
    assert_eq!(playground.form().await.token, token);

    playground.select_chain(80001).await.unwrap();
    assert_eq!(playground.form().await.token, Address::zero());
}
