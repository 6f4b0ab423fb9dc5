mod args;

pub use args::{Cli, CloudHsmArgs, Command, IdKind, ParseIdArgs, WaitTarget};

use tokio::sync::watch;

use azpoll::arm::{
    ArmClient, CloudHsmClustersClient, DeletedConfigurationStoresClient, ExperimentsClient,
};
use azpoll::output::{poll_summary, segment_table};
use azpoll::pollers::{
    AsyncOperationPoller, ChaosExperimentPoller, CloudHsmClusterStatePoller, EmptyStatusMessage,
    KeywordClassifier, PollingUrl, PurgeDeletedPoller,
};
use azpoll::resourceids::{
    AzureResourceId, CloudHsmClusterId, DeletedConfigurationStoreId, ExperimentId,
    ResourceGroupId, VaultId,
};
use azpoll::{AzpollError, LongRunningPoller, ParseError, PollResult, Poller, ResourceId};

/// Parses `args.id` and renders its segments as a table.
pub fn parse_id(args: &ParseIdArgs) -> Result<String, AzpollError> {
    let segments = match args.kind {
        None => AzureResourceId::parse(&args.id)?.segments(),
        Some(kind) => typed_segments(kind, &args.id, args.insensitive)?,
    };
    Ok(segment_table(segments))
}

fn typed_segments(
    kind: IdKind,
    input: &str,
    insensitive: bool,
) -> Result<Vec<(String, String)>, ParseError> {
    fn parse<T: ResourceId>(input: &str, insensitive: bool) -> Result<Vec<(String, String)>, ParseError> {
        let id = if insensitive {
            T::parse_insensitively(input)?
        } else {
            T::parse(input)?
        };
        Ok(id
            .segments()
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect())
    }

    match kind {
        IdKind::ResourceGroup => parse::<ResourceGroupId>(input, insensitive),
        IdKind::Vault => parse::<VaultId>(input, insensitive),
        IdKind::Experiment => parse::<ExperimentId>(input, insensitive),
        IdKind::CloudHsmCluster => parse::<CloudHsmClusterId>(input, insensitive),
        IdKind::DeletedConfigurationStore => {
            parse::<DeletedConfigurationStoreId>(input, insensitive)
        }
    }
}

/// Builds the poller for `target` and drives it to completion.
pub async fn wait(
    target: WaitTarget,
    cancel: watch::Receiver<bool>,
) -> Result<String, AzpollError> {
    let (poller, options) = match target {
        WaitTarget::Experiment(args) => {
            let id = ExperimentId::parse_insensitively(&args.id)?;
            let client = ArmClient::new(&args.connection.client_config()?)?;
            let api_version = args
                .api_version
                .unwrap_or_else(|| ExperimentsClient::DEFAULT_API_VERSION.to_string());
            let poller = ChaosExperimentPoller::new(ExperimentsClient::new(client, api_version), id);
            (Box::new(poller) as Box<dyn Poller>, args.polling.options())
        }
        WaitTarget::CloudHsm(CloudHsmArgs {
            wait: args,
            empty_status_is_success,
        }) => {
            let id = CloudHsmClusterId::parse_insensitively(&args.id)?;
            let client = ArmClient::new(&args.connection.client_config()?)?;
            let api_version = args
                .api_version
                .unwrap_or_else(|| CloudHsmClustersClient::DEFAULT_API_VERSION.to_string());
            let classifier = KeywordClassifier {
                empty: if empty_status_is_success {
                    EmptyStatusMessage::Succeeded
                } else {
                    EmptyStatusMessage::InProgress
                },
            };
            let poller = CloudHsmClusterStatePoller::with_classifier(
                CloudHsmClustersClient::new(client, api_version),
                id,
                classifier,
            );
            (Box::new(poller) as Box<dyn Poller>, args.polling.options())
        }
        WaitTarget::Purge(args) => {
            let id = DeletedConfigurationStoreId::parse_insensitively(&args.id)?;
            let client = ArmClient::new(&args.connection.client_config()?)?;
            let api_version = args.api_version.unwrap_or_else(|| {
                DeletedConfigurationStoresClient::DEFAULT_API_VERSION.to_string()
            });
            let poller = PurgeDeletedPoller::new(
                DeletedConfigurationStoresClient::new(client, api_version),
                id,
            );
            (Box::new(poller) as Box<dyn Poller>, args.polling.options())
        }
        WaitTarget::Operation(args) => {
            let client = ArmClient::new(&args.connection.client_config()?)?;
            let url = if args.location {
                PollingUrl::Location(args.url)
            } else {
                PollingUrl::AsyncOperation(args.url)
            };
            let poller = AsyncOperationPoller::new(client, url);
            (Box::new(poller) as Box<dyn Poller>, args.polling.options())
        }
    };

    let mut driver = LongRunningPoller::new(poller, options);
    let result: PollResult = driver.poll_until_done(cancel).await?;
    Ok(poll_summary(&result, driver.attempts()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_generic() {
        let args = ParseIdArgs {
            id: "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.KeyVault/vaults/v1"
                .to_string(),
            kind: None,
            insensitive: false,
        };
        let table = parse_id(&args).unwrap();
        assert!(table.contains("Microsoft.KeyVault"));
        assert!(table.contains("vaults"));
    }

    #[test]
    fn test_parse_id_typed_strict_and_insensitive() {
        let mut args = ParseIdArgs {
            id: "/subscriptions/sub/resourcegroups/rg/providers/Microsoft.KeyVault/vaults/v1"
                .to_string(),
            kind: Some(IdKind::Vault),
            insensitive: false,
        };
        assert!(matches!(parse_id(&args), Err(AzpollError::Parse(_))));

        args.insensitive = true;
        let table = parse_id(&args).unwrap();
        assert!(table.contains("resourceGroups"));
    }

    #[tokio::test]
    async fn test_wait_rejects_malformed_id_before_polling() {
        let cli = <Cli as clap::Parser>::parse_from([
            "azpoll",
            "wait",
            "experiment",
            "/subscriptions/sub",
            "--token=t",
        ]);
        let Command::Wait { target } = cli.command else {
            panic!("Expected Wait command");
        };

        let err = wait(target, watch::channel(false).1).await.unwrap_err();
        assert!(matches!(err, AzpollError::Parse(_)));
    }
}
