use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

use azpoll::config::{ClientConfig, DEFAULT_ENDPOINT};
use azpoll::{AzpollError, PollOptions};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse an ARM resource id and print its segments
    ParseId(ParseIdArgs),
    /// Wait for a long-running operation to reach a terminal state
    Wait {
        #[command(subcommand)]
        target: WaitTarget,
    },
}

#[derive(Subcommand, Debug)]
pub enum WaitTarget {
    /// Wait for a Chaos Studio experiment's provisioning state
    Experiment(WaitArgs),
    /// Wait for a Cloud HSM cluster's status message
    CloudHsm(CloudHsmArgs),
    /// Wait for a purged App Configuration store to disappear
    Purge(WaitArgs),
    /// Poll an Azure-AsyncOperation or Location URL
    Operation(OperationArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    ResourceGroup,
    Vault,
    Experiment,
    CloudHsmCluster,
    DeletedConfigurationStore,
}

#[derive(clap::Args, Debug)]
pub struct ParseIdArgs {
    pub id: String,

    /// Validate against a specific resource type instead of any ARM path
    #[arg(long, value_enum)]
    pub kind: Option<IdKind>,

    /// Match segment keys case-insensitively (only with --kind)
    #[arg(long)]
    pub insensitive: bool,
}

#[derive(clap::Args, Debug)]
pub struct ConnectionArgs {
    #[arg(long, env = "AZURE_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[arg(long, env = "AZURE_RESOURCE_MANAGER_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

impl ConnectionArgs {
    pub fn client_config(&self) -> Result<ClientConfig, AzpollError> {
        let token = self.token.clone().ok_or_else(|| {
            AzpollError::Auth(
                "No access token provided. Set AZURE_ACCESS_TOKEN or use --token flag".to_string(),
            )
        })?;

        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(AzpollError::Config(format!(
                "endpoint {:?} must be an http(s) URL",
                self.endpoint
            )));
        }

        Ok(ClientConfig::new(token).with_endpoint(self.endpoint.clone()))
    }
}

#[derive(clap::Args, Debug)]
pub struct PollingArgs {
    /// Seconds to wait between polls when the service doesn't say
    #[arg(long, default_value_t = 10)]
    pub interval: u64,

    /// Lower bound in seconds for every wait between polls
    #[arg(long)]
    pub min_interval: Option<u64>,

    /// Give up after this many seconds
    #[arg(long, env = "AZPOLL_TIMEOUT")]
    pub timeout: Option<u64>,
}

impl PollingArgs {
    pub fn options(&self) -> PollOptions {
        let mut options =
            PollOptions::default().with_default_interval(Duration::from_secs(self.interval));
        if let Some(min) = self.min_interval {
            options = options.with_minimum_interval(Duration::from_secs(min));
        }
        if let Some(timeout) = self.timeout {
            options = options.with_timeout(Duration::from_secs(timeout));
        }
        options
    }
}

#[derive(clap::Args, Debug)]
pub struct WaitArgs {
    /// Resource id of the operation's target
    pub id: String,

    /// Override the API version used for status reads
    #[arg(long)]
    pub api_version: Option<String>,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub polling: PollingArgs,
}

#[derive(clap::Args, Debug)]
pub struct CloudHsmArgs {
    #[command(flatten)]
    pub wait: WaitArgs,

    /// Treat an empty status message as success
    #[arg(long)]
    pub empty_status_is_success: bool,
}

#[derive(clap::Args, Debug)]
pub struct OperationArgs {
    /// Absolute polling URL returned by the service
    pub url: String,

    /// The URL came from a Location header rather than Azure-AsyncOperation
    #[arg(long)]
    pub location: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub polling: PollingArgs,
}
