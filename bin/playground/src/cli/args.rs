use crate::utils::{
    parse_address, parse_backoff, parse_duration, parse_u256, validate_private_key,
};
use clap::Parser;
use ethers::types::{Address, U256};
use expanded_pathbuf::ExpandedPathBuf;
use eyre::eyre;
use playground_account::{
    http_reader_factory, AccountSession, BundlerClient, LocalWalletProvider, PaymasterClient,
    Playground, PlaygroundError, PollPolicy, SessionOptions, SignerAdapter, TransferForm,
};
use playground_primitives::constants::{account, entry_point, polling};
use playground_rpc::{HttpBundlerClient, HttpPaymasterClient, StaticToken};
use std::{sync::Arc, time::Duration};

/// Owner wallet CLI args
#[derive(Debug, Clone, Parser)]
pub struct WalletArgs {
    /// Path to the file containing the owner's mnemonic phrase.
    #[clap(long, conflicts_with_all = ["mnemonic", "private_key"])]
    pub mnemonic_file: Option<ExpandedPathBuf>,

    /// The owner's mnemonic phrase.
    #[clap(
        long,
        env = "PLAYGROUND_MNEMONIC",
        hide_env_values = true,
        conflicts_with = "private_key"
    )]
    pub mnemonic: Option<String>,

    /// The owner's private key (hex encoded).
    #[clap(
        long,
        env = "PLAYGROUND_PRIVATE_KEY",
        hide_env_values = true,
        value_parser = validate_private_key
    )]
    pub private_key: Option<String>,
}

impl WalletArgs {
    /// Signer of the configured wallet (disconnected when no wallet is configured)
    pub fn signer(&self) -> eyre::Result<SignerAdapter> {
        let provider = if let Some(path) = &self.mnemonic_file {
            LocalWalletProvider::from_file(path.clone())?
        } else if let Some(phrase) = &self.mnemonic {
            LocalWalletProvider::from_phrase(phrase)?
        } else if let Some(key) = &self.private_key {
            LocalWalletProvider::from_private_key(key)?
        } else {
            return Ok(SignerAdapter::disconnected());
        };
        Ok(SignerAdapter::new(Arc::new(provider)))
    }
}

/// Chain and smart account CLI args
#[derive(Debug, Clone, Parser, PartialEq)]
pub struct ChainArgs {
    /// Chain id of the selected chain.
    ///
    /// By default, this option is set to `420` (Optimism Goerli).
    #[clap(long, default_value_t = 420)]
    pub chain: u64,

    /// Ethereum execution client RPC endpoint.
    ///
    /// By default, the public endpoint of the selected chain is used.
    #[clap(long, env = "PLAYGROUND_RPC_URL")]
    pub rpc_url: Option<String>,

    /// Entry point address.
    #[clap(long, default_value = entry_point::ADDRESS, value_parser = parse_address)]
    pub entry_point: Address,

    /// Address of the SimpleAccount factory.
    #[clap(long, default_value = account::FACTORY_ADDRESS, value_parser = parse_address)]
    pub account_factory: Address,

    /// Salt of the counterfactual account address.
    #[clap(long, default_value = "0", value_parser = parse_u256)]
    pub salt: U256,
}

impl ChainArgs {
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            entry_point: self.entry_point,
            factory: self.account_factory,
            salt: self.salt,
        }
    }
}

/// Bundler and paymaster CLI args
#[derive(Debug, Clone, Parser, PartialEq)]
pub struct ServiceArgs {
    /// Bundler JSON-RPC endpoint.
    #[clap(long, env = "PLAYGROUND_BUNDLER_URL")]
    pub bundler_url: String,

    /// Paymaster JSON-RPC endpoint. Without it, gas is paid by the account.
    #[clap(long, env = "PLAYGROUND_PAYMASTER_URL")]
    pub paymaster_url: Option<String>,

    /// Application id presented to the paymaster.
    #[clap(long, env = "PLAYGROUND_APP_ID")]
    pub app_id: Option<String>,

    /// Bearer token presented to the paymaster.
    #[clap(long, env = "PLAYGROUND_PAYMASTER_TOKEN", hide_env_values = true)]
    pub paymaster_token: Option<String>,
}

impl ServiceArgs {
    pub fn bundler(&self) -> eyre::Result<Arc<dyn BundlerClient>> {
        Ok(Arc::new(HttpBundlerClient::new(self.bundler_url.clone())?))
    }

    /// The paymaster needs an application id and a token
    pub fn paymaster(&self) -> eyre::Result<Option<Arc<dyn PaymasterClient>>> {
        let Some(url) = &self.paymaster_url else {
            return Ok(None);
        };
        let app_id =
            self.app_id.clone().ok_or_else(|| eyre!("--app-id is required with a paymaster"))?;
        let token = self
            .paymaster_token
            .clone()
            .ok_or_else(|| eyre!("--paymaster-token is required with a paymaster"))?;
        Ok(Some(Arc::new(HttpPaymasterClient::new(
            url.clone(),
            app_id,
            Arc::new(StaticToken::new(token)),
        ))))
    }
}

/// Common CLI args of the commands working with the smart account
#[derive(Debug, Clone, Parser)]
pub struct SessionArgs {
    #[clap(flatten)]
    pub wallet: WalletArgs,

    #[clap(flatten)]
    pub chain: ChainArgs,

    #[clap(flatten)]
    pub service: ServiceArgs,
}

impl SessionArgs {
    /// Playground with the configured chain and collaborators selected
    pub async fn playground(&self, poll_policy: PollPolicy) -> eyre::Result<Playground> {
        let options = self.chain.session_options();
        let playground = Playground::new(
            self.wallet.signer()?,
            http_reader_factory(self.chain.rpc_url.clone(), options),
        )
        .with_session_options(options)
        .with_poll_policy(poll_policy);

        playground.select_chain(self.chain.chain).await?;
        playground
            .set_collaborators(Some(self.service.bundler()?), self.service.paymaster()?)
            .await?;
        Ok(playground)
    }

    pub async fn session(&self) -> eyre::Result<Arc<AccountSession>> {
        let playground = self.playground(PollPolicy::default()).await?;
        Ok(playground.session().await.ok_or(PlaygroundError::SessionUnavailable)?)
    }
}

/// Transfer CLI args
#[derive(Debug, Clone, Parser, PartialEq)]
pub struct TransferArgs {
    /// Recipient of the transfer.
    #[clap(long)]
    pub to: String,

    /// Amount in units of the token (e.g. `1.5`).
    #[clap(long)]
    pub amount: String,

    /// ERC-20 token to transfer. The native currency is transferred when not set.
    #[clap(long, value_parser = parse_address)]
    pub token: Option<Address>,

    /// Repeats the transfer three times within one user operation (ERC-20 tokens only, the
    /// account can not batch native currency transfers).
    #[clap(long)]
    pub batch: bool,

    /// Pays the gas from the account even if a paymaster is configured.
    #[clap(long)]
    pub no_sponsor: bool,
}

impl TransferArgs {
    pub fn fill(&self, form: &mut TransferForm) {
        form.recipient = self.to.clone();
        form.amount = self.amount.clone();
        form.token = self.token.unwrap_or_default();
        form.batch = self.batch;
        form.sponsor_gas = !self.no_sponsor;
    }

    pub fn form(&self) -> TransferForm {
        let mut form = TransferForm::default();
        self.fill(&mut form);
        form
    }
}

/// Confirmation polling CLI args
#[derive(Debug, Clone, Parser, PartialEq)]
pub struct PollArgs {
    /// Wait after the first pending receipt query in milliseconds.
    #[clap(long, default_value_t = polling::INTERVAL_MS)]
    pub poll_interval: u64,

    /// Factor applied to the wait after every pending receipt query.
    #[clap(long, default_value_t = polling::BACKOFF, value_parser = parse_backoff)]
    pub poll_backoff: f64,

    /// Upper bound of the wait between two receipt queries in milliseconds.
    #[clap(long, default_value_t = polling::MAX_INTERVAL_MS)]
    pub max_poll_interval: u64,

    /// Maximum number of receipt queries.
    #[clap(long, default_value_t = polling::MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// Stops waiting for the receipt after this many milliseconds.
    #[clap(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,
}

impl PollArgs {
    pub fn policy(&self) -> PollPolicy {
        let interval = Duration::from_millis(self.poll_interval);
        let policy = PollPolicy {
            interval,
            backoff: self.poll_backoff,
            max_interval: Duration::from_millis(self.max_poll_interval).max(interval),
            max_attempts: self.max_attempts,
            timeout: None,
        };
        match self.timeout {
            Some(timeout) => policy.with_timeout(timeout),
            None => policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn chain_args_defaults() {
        let args = vec!["chainargs"];
        assert_eq!(
            ChainArgs {
                chain: 420,
                rpc_url: None,
                entry_point: Address::from_str(entry_point::ADDRESS).unwrap(),
                account_factory: Address::from_str(account::FACTORY_ADDRESS).unwrap(),
                salt: U256::zero(),
            },
            ChainArgs::try_parse_from(args).unwrap()
        );
    }

    #[test]
    fn chain_args() {
        let args = vec![
            "chainargs",
            "--chain",
            "80001",
            "--rpc-url",
            "http://127.0.0.1:8545",
            "--account-factory",
            "0x52908400098527886E0F7030069857D2E4169EE7",
            "--salt",
            "7",
        ];
        let args = ChainArgs::try_parse_from(args).unwrap();
        assert_eq!(args.chain, 80001);
        assert_eq!(args.rpc_url.as_deref(), Some("http://127.0.0.1:8545"));
        assert_eq!(
            args.session_options(),
            SessionOptions {
                entry_point: Address::from_str(entry_point::ADDRESS).unwrap(),
                factory: Address::from_str("0x52908400098527886E0F7030069857D2E4169EE7").unwrap(),
                salt: U256::from(7),
            }
        );
    }

    #[test]
    fn paymaster_needs_credentials() {
        let args = vec![
            "serviceargs",
            "--bundler-url",
            "http://127.0.0.1:3000",
            "--paymaster-url",
            "http://127.0.0.1:3001",
            "--app-id",
            "playground",
        ];
        let args = ServiceArgs::try_parse_from(args).unwrap();
        assert!(args.bundler().is_ok());
        assert!(args.paymaster().is_err());

        let args = ServiceArgs { paymaster_token: Some("secret".into()), ..args };
        assert!(args.paymaster().unwrap().is_some());
        let args = ServiceArgs { paymaster_url: None, ..args };
        assert!(args.paymaster().unwrap().is_none());
    }

    #[test]
    fn transfer_args() {
        let args = vec![
            "transferargs",
            "--to",
            "0x52908400098527886E0F7030069857D2E4169EE7",
            "--amount",
            "1.5",
            "--batch",
            "--no-sponsor",
        ];
        let form = TransferArgs::try_parse_from(args).unwrap().form();
        assert_eq!(
            form,
            TransferForm {
                recipient: "0x52908400098527886E0F7030069857D2E4169EE7".into(),
                token: Address::zero(),
                amount: "1.5".into(),
                sponsor_gas: false,
                batch: true,
            }
        );
    }

    #[test]
    fn poll_args() {
        let args =
            vec!["pollargs", "--poll-interval", "200", "--max-attempts", "5", "--timeout", "3000"];
        let policy = PollArgs::try_parse_from(args).unwrap().policy();
        assert_eq!(policy.interval, Duration::from_millis(200));
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.timeout, Some(Duration::from_secs(3)));

        let policy = PollArgs::try_parse_from(vec!["pollargs"]).unwrap().policy();
        assert_eq!(policy, PollPolicy::default());

        let args = vec![
            "pollargs",
            "--poll-interval",
            "500",
            "--poll-backoff",
            "2",
            "--max-poll-interval",
            "4000",
        ];
        let policy = PollArgs::try_parse_from(args).unwrap().policy();
        assert_eq!(policy.interval, Duration::from_millis(500));
        assert_eq!(policy.backoff, 2.0);
        assert_eq!(policy.max_interval, Duration::from_secs(4));

        let args = vec!["pollargs", "--poll-interval", "20000"];
        let policy = PollArgs::try_parse_from(args).unwrap().policy();
        assert_eq!(policy.max_interval, Duration::from_secs(20));

        for backoff in ["0.5", "-1", "NaN", "inf", "fast"] {
            assert!(PollArgs::try_parse_from(vec!["pollargs", "--poll-backoff", backoff]).is_err());
        }
    }

    #[test]
    fn wallet_args() {
        let key = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
        let args = WalletArgs::try_parse_from(vec!["walletargs", "--private-key", key]).unwrap();
        assert!(args.signer().unwrap().is_connected());
        assert!(WalletArgs::try_parse_from(vec!["walletargs", "--private-key", "0x12"]).is_err());
    }
}
