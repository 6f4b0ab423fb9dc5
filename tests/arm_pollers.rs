use std::time::Duration;

use azpoll::arm::{
    CloudHsmClustersClient, DeletedConfigurationStoresClient, ExperimentsClient,
};
use azpoll::pollers::{
    AsyncOperationPoller, ChaosExperimentPoller, CloudHsmClusterStatePoller, PollingUrl,
    PurgeDeletedPoller, poller_from_response,
};
use azpoll::resourceids::{CloudHsmClusterId, DeletedConfigurationStoreId, ExperimentId};
use azpoll::{
    ArmClient, ArmError, LongRunningPoller, PollError, PollOptions, Poller, PollingStatus,
    poll_until_done,
};
use tokio::sync::watch;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EXPERIMENT_PATH: &str =
    "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Chaos/experiments/exp";
const HSM_PATH: &str = "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.HardwareSecurityModules/cloudHsmClusters/hsm1";
const DELETED_STORE_PATH: &str = "/subscriptions/sub/providers/Microsoft.AppConfiguration/locations/westeurope/deletedConfigurationStores/store1";

fn client(mock_server: &MockServer) -> ArmClient {
    ArmClient::with_base_url("test_token".to_string(), mock_server.uri()).unwrap()
}

fn experiment_poller(mock_server: &MockServer) -> ChaosExperimentPoller {
    let experiments = ExperimentsClient::new(
        client(mock_server),
        ExperimentsClient::DEFAULT_API_VERSION,
    );
    ChaosExperimentPoller::new(experiments, ExperimentId::new("sub", "rg", "exp"))
}

fn purge_poller(mock_server: &MockServer) -> PurgeDeletedPoller {
    let stores = DeletedConfigurationStoresClient::new(
        client(mock_server),
        DeletedConfigurationStoresClient::DEFAULT_API_VERSION,
    );
    PurgeDeletedPoller::new(
        stores,
        DeletedConfigurationStoreId::new("sub", "westeurope", "store1"),
    )
}

fn hsm_poller(mock_server: &MockServer) -> CloudHsmClusterStatePoller {
    let clusters = CloudHsmClustersClient::new(
        client(mock_server),
        CloudHsmClustersClient::DEFAULT_API_VERSION,
    );
    CloudHsmClusterStatePoller::new(clusters, CloudHsmClusterId::new("sub", "rg", "hsm1"))
}

fn no_cancel() -> watch::Receiver<bool> {
    watch::channel(false).1
}

fn fast() -> PollOptions {
    PollOptions::default().with_default_interval(Duration::from_millis(10))
}

#[tokio::test]
async fn test_experiment_succeeded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(EXPERIMENT_PATH))
        .and(query_param("api-version", "2024-01-01"))
        .and(header("authorization", "Bearer test_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": EXPERIMENT_PATH,
            "name": "exp",
            "properties": { "provisioningState": "Succeeded" }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = experiment_poller(&mock_server).poll().await.unwrap();

    assert_eq!(result.status, PollingStatus::Succeeded);
    assert_eq!(result.response.unwrap().status.as_u16(), 200);
}

#[tokio::test]
async fn test_experiment_in_progress_uses_default_interval() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(EXPERIMENT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "provisioningState": "Running"
        })))
        .mount(&mock_server)
        .await;

    let result = experiment_poller(&mock_server).poll().await.unwrap();

    assert_eq!(result.status, PollingStatus::InProgress);
    assert_eq!(result.poll_interval, Some(Duration::from_secs(10)));
}

#[tokio::test]
async fn test_experiment_retry_after_overrides_interval() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(EXPERIMENT_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Retry-After", "2")
                .set_body_json(serde_json::json!({
                    "properties": { "provisioningState": "Creating" }
                })),
        )
        .mount(&mock_server)
        .await;

    let result = experiment_poller(&mock_server).poll().await.unwrap();

    assert_eq!(result.status, PollingStatus::InProgress);
    assert_eq!(result.poll_interval, Some(Duration::from_secs(2)));
}

#[tokio::test]
async fn test_experiment_failed_state() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(EXPERIMENT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "properties": { "provisioningState": "Failed" }
        })))
        .mount(&mock_server)
        .await;

    let err = poll_until_done(
        experiment_poller(&mock_server),
        fast(),
        no_cancel(),
    )
    .await
    .unwrap_err();

    match err {
        PollError::Failed(failed) => {
            assert_eq!(failed.status, PollingStatus::Failed);
            assert!(failed.message.contains("Failed"));
            assert!(failed.message.contains("exp"));
            assert_eq!(failed.response.unwrap().status.as_u16(), 200);
        }
        other => panic!("Expected PollError::Failed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_experiment_missing_state_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(EXPERIMENT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "exp",
            "properties": {}
        })))
        .mount(&mock_server)
        .await;

    let err = experiment_poller(&mock_server).poll().await.unwrap_err();

    assert!(matches!(err, PollError::Decode { .. }));
    assert!(err.to_string().contains("provisioningState"));
}

#[tokio::test]
async fn test_experiment_server_error_is_retrieval_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(EXPERIMENT_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": { "code": "InternalServerError", "message": "try again later" }
        })))
        .mount(&mock_server)
        .await;

    let err = experiment_poller(&mock_server).poll().await.unwrap_err();

    match &err {
        PollError::Retrieval {
            operation,
            id,
            source: ArmError::Api { status, message },
        } => {
            assert_eq!(*operation, "provisioning state");
            assert!(id.contains("exp"));
            assert_eq!(*status, 500);
            assert_eq!(message, "InternalServerError: try again later");
        }
        other => panic!("Expected Retrieval(Api), got {:?}", other),
    }
    assert!(!err.to_string().contains("test_token"));
}

#[tokio::test]
async fn test_experiment_unauthorized_is_auth_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(EXPERIMENT_PATH))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let err = experiment_poller(&mock_server).poll().await.unwrap_err();

    assert!(matches!(
        err,
        PollError::Retrieval {
            source: ArmError::Auth { .. },
            ..
        }
    ));
    assert!(!err.to_string().contains("test_token"));
}

#[tokio::test]
async fn test_experiment_driven_to_completion() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(EXPERIMENT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "properties": { "provisioningState": "Updating" }
        })))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(EXPERIMENT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "properties": { "provisioningState": "Succeeded" }
        })))
        .mount(&mock_server)
        .await;

    let poller = experiment_poller(&mock_server).with_interval(Duration::from_millis(10));
    let mut driver = LongRunningPoller::new(poller, PollOptions::default());
    let result = driver
        .poll_until_done(no_cancel())
        .await
        .unwrap();

    assert_eq!(result.status, PollingStatus::Succeeded);
    assert_eq!(driver.attempts(), 3);
}

#[tokio::test]
async fn test_experiment_wait_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(EXPERIMENT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "properties": { "provisioningState": "Running" }
        })))
        .mount(&mock_server)
        .await;

    let poller = experiment_poller(&mock_server).with_interval(Duration::from_millis(20));
    let options = PollOptions::default().with_timeout(Duration::from_millis(100));
    let err = poll_until_done(poller, options, no_cancel())
        .await
        .unwrap_err();

    assert!(matches!(err, PollError::DeadlineExceeded(_)));
}

#[tokio::test]
async fn test_cloud_hsm_status_messages() {
    let cases = [
        ("Provisioning Succeeded: success", PollingStatus::Succeeded),
        ("Deployment FAILED: quota exceeded", PollingStatus::Failed),
        ("Allocating HSM partitions", PollingStatus::InProgress),
        ("", PollingStatus::InProgress),
    ];

    for (message, expected) in cases {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(HSM_PATH))
            .and(query_param("api-version", "2024-06-30-preview"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "properties": { "statusMessage": message }
            })))
            .mount(&mock_server)
            .await;

        let result = hsm_poller(&mock_server).poll().await.unwrap();
        assert_eq!(result.status, expected, "status message {:?}", message);
    }
}

#[tokio::test]
async fn test_cloud_hsm_failure_carries_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(HSM_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "statusMessage": "Activation error: HSM unreachable"
        })))
        .mount(&mock_server)
        .await;

    let err = poll_until_done(hsm_poller(&mock_server), fast(), no_cancel())
        .await
        .unwrap_err();

    match err {
        PollError::Failed(failed) => {
            assert!(failed.message.contains("HSM unreachable"));
        }
        other => panic!("Expected PollError::Failed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_purge_not_found_means_done() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DELETED_STORE_PATH))
        .and(query_param("api-version", "2023-03-01"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": { "code": "ResourceNotFound", "message": "not found" }
        })))
        .mount(&mock_server)
        .await;

    let result = purge_poller(&mock_server).poll().await.unwrap();

    assert_eq!(result.status, PollingStatus::Succeeded);
    assert_eq!(result.response.unwrap().status.as_u16(), 404);
}

#[tokio::test]
async fn test_purge_still_present_is_in_progress() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DELETED_STORE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "store1",
            "properties": { "location": "westeurope" }
        })))
        .mount(&mock_server)
        .await;

    let result = purge_poller(&mock_server).poll().await.unwrap();

    assert_eq!(result.status, PollingStatus::InProgress);
    assert_eq!(result.poll_interval, Some(Duration::from_secs(10)));
}

#[tokio::test]
async fn test_purge_unexpected_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DELETED_STORE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&mock_server)
        .await;

    let err = purge_poller(&mock_server).poll().await.unwrap_err();

    match err {
        PollError::UnexpectedStatus {
            status, message, ..
        } => {
            assert_eq!(status, 500);
            assert_eq!(message, "upstream exploded");
        }
        other => panic!("Expected UnexpectedStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn test_purge_driven_until_gone() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DELETED_STORE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(DELETED_STORE_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let poller = purge_poller(&mock_server).with_interval(Duration::from_millis(10));
    let mut driver = LongRunningPoller::new(poller, PollOptions::default());
    let result = driver
        .poll_until_done(no_cancel())
        .await
        .unwrap();

    assert_eq!(result.status, PollingStatus::Succeeded);
    assert_eq!(driver.attempts(), 2);
}

#[tokio::test]
async fn test_async_operation_from_accepted_response() {
    let mock_server = MockServer::start().await;
    let status_url = format!("{}/operations/op1", mock_server.uri());

    Mock::given(method("GET"))
        .and(path(EXPERIMENT_PATH))
        .respond_with(
            ResponseTemplate::new(202)
                .insert_header("Azure-AsyncOperation", status_url.as_str())
                .insert_header("Location", format!("{}/results/op1", mock_server.uri()))
                .insert_header("Retry-After", "1"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/operations/op1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "InProgress",
            "percentComplete": 40.0
        })))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/operations/op1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "Succeeded"
        })))
        .mount(&mock_server)
        .await;

    let arm = client(&mock_server);
    let accepted = arm.get(EXPERIMENT_PATH, "2024-01-01").await.unwrap();
    let poller = poller_from_response(&arm, &accepted).unwrap();
    assert_eq!(poller.url(), &PollingUrl::AsyncOperation(status_url));

    let first = poller.poll().await.unwrap();
    assert_eq!(first.status, PollingStatus::InProgress);
    assert_eq!(first.poll_interval, Some(Duration::from_secs(1)));

    let second = poller.poll().await.unwrap();
    assert_eq!(second.status, PollingStatus::Succeeded);
}

#[tokio::test]
async fn test_async_operation_failure_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/operations/op2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "Failed",
            "error": { "code": "QuotaExceeded", "message": "Not enough cores" }
        })))
        .mount(&mock_server)
        .await;

    let poller = AsyncOperationPoller::new(
        client(&mock_server),
        PollingUrl::AsyncOperation(format!("{}/operations/op2", mock_server.uri())),
    );
    let err = poll_until_done(poller, fast(), no_cancel())
        .await
        .unwrap_err();

    match err {
        PollError::Failed(failed) => {
            assert_eq!(failed.status, PollingStatus::Failed);
            assert_eq!(failed.message, "QuotaExceeded: Not enough cores");
        }
        other => panic!("Expected PollError::Failed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_async_operation_canceled() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/operations/op3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "Canceled"
        })))
        .mount(&mock_server)
        .await;

    let poller = AsyncOperationPoller::new(
        client(&mock_server),
        PollingUrl::AsyncOperation(format!("{}/operations/op3", mock_server.uri())),
    );
    let result = poller.poll().await.unwrap();

    assert_eq!(result.status, PollingStatus::Canceled);
    assert_eq!(result.message.as_deref(), Some("operation status was Canceled"));
}

#[tokio::test]
async fn test_location_polling() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/results/op4"))
        .respond_with(ResponseTemplate::new(202))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/results/op4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": EXPERIMENT_PATH
        })))
        .mount(&mock_server)
        .await;

    let poller = AsyncOperationPoller::new(
        client(&mock_server),
        PollingUrl::Location(format!("{}/results/op4", mock_server.uri())),
    )
    .with_interval(Duration::from_millis(10));
    let mut driver = LongRunningPoller::new(poller, PollOptions::default());
    let result = driver
        .poll_until_done(no_cancel())
        .await
        .unwrap();

    assert_eq!(result.status, PollingStatus::Succeeded);
    assert_eq!(driver.attempts(), 2);
    let body = result.response.unwrap().text();
    assert!(body.contains("experiments/exp"));
}

#[tokio::test]
async fn test_location_error_status_is_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/results/op5"))
        .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
            "error": { "code": "Conflict", "message": "another operation is in progress" }
        })))
        .mount(&mock_server)
        .await;

    let poller = AsyncOperationPoller::new(
        client(&mock_server),
        PollingUrl::Location(format!("{}/results/op5", mock_server.uri())),
    );
    let result = poller.poll().await.unwrap();

    assert_eq!(result.status, PollingStatus::Failed);
    assert_eq!(
        result.message.as_deref(),
        Some("Conflict: another operation is in progress")
    );
}

#[tokio::test]
async fn test_cancel_stops_waiting() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(EXPERIMENT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "properties": { "provisioningState": "Running" }
        })))
        .mount(&mock_server)
        .await;

    let (trigger, cancel) = watch::channel(false);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        let _ = trigger.send(true);
    });

    let err = poll_until_done(experiment_poller(&mock_server), PollOptions::default(), cancel)
        .await
        .unwrap_err();

    assert!(err.is_cancellation());
}
