mod client;
mod error;
mod operations;
mod types;

pub use client::ArmClient;
pub use error::ArmError;
pub use operations::{CloudHsmClustersClient, DeletedConfigurationStoresClient, ExperimentsClient};
pub use types::{
    AZURE_ASYNC_OPERATION, ArmErrorDetail, ArmErrorResponse, CloudHsmCluster,
    CloudHsmClusterProperties, Experiment, ExperimentProperties, ModelResponse, OperationStatus,
    RequestOptions, Response,
};
