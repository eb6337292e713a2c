use super::args::{PollArgs, SessionArgs, TransferArgs};
use crate::utils::{parse_chain_group, parse_user_operation_hash};
use clap::Parser;
use ethers::utils::to_checksum;
use playground_account::{
    estimate, pending_operations, read_gas_credit, reject_operation, transaction, OperationHandle,
    PollPolicy, SubmissionStatus, SubmitOptions,
};
use playground_primitives::{chains_in, ChainGroup, UserOperationHash};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// List the supported chains and their tokens
#[derive(Debug, Parser)]
pub struct ChainsCommand {
    /// Which chains to list (all, testnet, mainnet)
    #[clap(long, default_value = "all", value_parser = parse_chain_group)]
    group: ChainGroup,
}

impl ChainsCommand {
    /// Execute the command
    pub fn execute(self) -> eyre::Result<()> {
        for chain in chains_in(self.group) {
            let tokens: Vec<_> =
                chain.token_options().into_iter().map(|token| token.symbol).collect();
            println!(
                "{:>8}  {:<24} {:<8} {}",
                chain.id(),
                chain.name,
                if chain.testnet { "testnet" } else { "mainnet" },
                tokens.join(", ")
            );
        }
        Ok(())
    }
}

/// Show the smart account of the owner on the selected chain
#[derive(Debug, Parser)]
pub struct AccountCommand {
    #[clap(flatten)]
    session: SessionArgs,
}

impl AccountCommand {
    /// Execute the command
    pub async fn execute(self) -> eyre::Result<()> {
        let playground = self.session.playground(PollPolicy::default()).await?;
        let Some(session) = playground.session().await else {
            eyre::bail!("no account session for chain {}", self.session.chain.chain);
        };

        println!("chain:   {} ({})", session.chain().name, session.chain_id());
        println!("owner:   {}", to_checksum(&session.owner(), None));
        println!("account: {}", to_checksum(&session.account_address(), None));
        println!("         {}", session.chain().address_url(&session.account_address()));
        if let Some(credit) = *playground.gas_credit().borrow() {
            println!("credit:  {credit}");
        }
        Ok(())
    }
}

/// Transfer native currency or an ERC-20 token from the smart account and wait for inclusion
#[derive(Debug, Parser)]
pub struct TransferCommand {
    #[clap(flatten)]
    session: SessionArgs,

    #[clap(flatten)]
    transfer: TransferArgs,

    #[clap(flatten)]
    poll: PollArgs,
}

impl TransferCommand {
    /// Execute the command
    pub async fn execute(self, cancel: CancellationToken) -> eyre::Result<()> {
        let playground = self.session.playground(self.poll.policy()).await?;
        playground.update_form(|form| self.transfer.fill(form)).await;

        let mut status = playground.status();
        let progress = tokio::spawn(async move {
            while status.changed().await.is_ok() {
                let current = status.borrow_and_update().clone();
                match current {
                    SubmissionStatus::Built(payloads) => {
                        info!("Built {} call(s) from the transfer", payloads.len())
                    }
                    SubmissionStatus::Waiting(handle) => {
                        info!("User operation {} submitted", handle.user_operation_hash)
                    }
                    _ => {}
                }
            }
        });

        let res = playground.submit(&cancel).await;
        progress.abort();
        let confirmation = res?;

        let chain = playground.session().await.map(|session| session.chain());
        println!("{:?}", confirmation.transaction_hash);
        if let Some(chain) = chain {
            println!("{}", chain.tx_url(&confirmation.transaction_hash));
        }
        if !confirmation.receipt.success {
            warn!("The user operation reverted: {}", confirmation.receipt.reason);
        }
        if let Some(credit) = *playground.gas_credit().borrow() {
            info!("Remaining gas credit: {credit}");
        }
        Ok(())
    }
}

/// Estimate the gas of a transfer without submitting it
#[derive(Debug, Parser)]
pub struct EstimateCommand {
    #[clap(flatten)]
    session: SessionArgs,

    #[clap(flatten)]
    transfer: TransferArgs,
}

impl EstimateCommand {
    /// Execute the command
    pub async fn execute(self) -> eyre::Result<()> {
        let session = self.session.session().await?;
        let request = self.transfer.form().to_request()?;
        let payloads = transaction::build(&request, session.chain())?;

        let estimation =
            estimate(&session, &payloads, SubmitOptions { sponsor_gas: request.sponsor_gas })
                .await?;
        println!("{}", serde_json::to_string_pretty(&estimation)?);
        Ok(())
    }
}

/// Show the prepaid gas credit of the smart account
#[derive(Debug, Parser)]
pub struct CreditCommand {
    #[clap(flatten)]
    session: SessionArgs,
}

impl CreditCommand {
    /// Execute the command
    pub async fn execute(self) -> eyre::Result<()> {
        let session = self.session.session().await?;
        match read_gas_credit(&session).await {
            Some(credit) => println!("{credit}"),
            None => println!("no gas credit"),
        }
        Ok(())
    }
}

/// List the user operations of the smart account waiting at the paymaster
#[derive(Debug, Parser)]
pub struct PendingCommand {
    #[clap(flatten)]
    session: SessionArgs,
}

impl PendingCommand {
    /// Execute the command
    pub async fn execute(self) -> eyre::Result<()> {
        let session = self.session.session().await?;
        let pending = pending_operations(&session).await?;
        println!("{}", serde_json::to_string_pretty(&pending)?);
        Ok(())
    }
}

/// Ask the paymaster to drop a pending user operation
#[derive(Debug, Parser)]
pub struct RejectCommand {
    #[clap(flatten)]
    session: SessionArgs,

    /// Hash of the pending user operation
    #[clap(long, value_parser = parse_user_operation_hash)]
    hash: UserOperationHash,
}

impl RejectCommand {
    /// Execute the command
    pub async fn execute(self) -> eyre::Result<()> {
        let session = self.session.session().await?;
        let handle =
            OperationHandle { user_operation_hash: self.hash, chain_id: session.chain_id() };
        reject_operation(&session, &handle).await?;
        Ok(())
    }
}
