use crate::utils::run_until_ctrl_c;
use clap::{value_parser, Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

pub mod args;
pub mod commands;

/// Crates whose log level follows the verbosity flag
const LOG_TARGETS: [&str; 5] = [
    "playground",
    "playground_account",
    "playground_contracts",
    "playground_primitives",
    "playground_rpc",
];

/// The main Playground CLI interface
#[derive(Debug, Parser)]
#[command(author, version, about = "Playground", long_about = None)]
pub struct Cli {
    /// The command to execute
    #[clap(subcommand)]
    command: Commands,

    /// The verbosity level
    #[clap(long, short, global = true, default_value_t = 2, value_parser = value_parser!(u8).range(..=4))]
    verbosity: u8,
}

impl Cli {
    /// Get the log level based on the verbosity level
    pub fn get_log_level(&self) -> String {
        match self.verbosity {
            0 => "error",
            1 => "warn",
            2 => "info",
            3 => "debug",
            _ => "trace",
        }
        .into()
    }

    /// `RUST_LOG` directives extended with the verbosity of the playground crates
    pub fn log_directives(&self, rust_log: Option<String>) -> String {
        let level = self.get_log_level();
        let targets: Vec<_> =
            LOG_TARGETS.iter().map(|target| format!("{target}={level}")).collect();
        match rust_log {
            Some(val) if !val.is_empty() => format!("{val},{}", targets.join(",")),
            _ => targets.join(","),
        }
    }
}

/// Commands to be executed
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the supported chains
    #[command(name = "chains")]
    Chains(commands::ChainsCommand),

    /// Show the smart account of the owner
    #[command(name = "account")]
    Account(commands::AccountCommand),

    /// Transfer from the smart account and wait until the transfer is included
    #[command(name = "transfer")]
    Transfer(Box<commands::TransferCommand>),

    /// Estimate the gas of a transfer
    #[command(name = "estimate")]
    Estimate(Box<commands::EstimateCommand>),

    /// Show the prepaid gas credit
    #[command(name = "credit")]
    Credit(commands::CreditCommand),

    /// List user operations waiting at the paymaster
    #[command(name = "pending")]
    Pending(commands::PendingCommand),

    /// Reject a user operation waiting at the paymaster
    #[command(name = "reject")]
    Reject(commands::RejectCommand),
}

pub fn run() -> eyre::Result<()> {
    let cli = Cli::parse();

    let directives = cli.log_directives(std::env::var("RUST_LOG").ok());
    tracing_subscriber::fmt().with_env_filter(EnvFilter::new(directives)).init();

    let rt = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    let cancel = CancellationToken::new();

    let task = {
        let cancel = cancel.clone();
        async move {
            match cli.command {
                Commands::Chains(command) => command.execute(),
                Commands::Account(command) => command.execute().await,
                Commands::Transfer(command) => command.execute(cancel).await,
                Commands::Estimate(command) => command.execute().await,
                Commands::Credit(command) => command.execute().await,
                Commands::Pending(command) => command.execute().await,
                Commands::Reject(command) => command.execute().await,
            }
        }
    };

    rt.block_on(run_until_ctrl_c(cancel, task))
}
