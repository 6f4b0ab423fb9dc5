//! Typed operation clients.
//!
//! Each wraps an [`ArmClient`] and exposes the handful of operations the
//! pollers need, addressed by typed ids. The API version is chosen by the
//! caller at construction time.

use super::types::{CloudHsmCluster, Experiment, ModelResponse, Response};
use super::{ArmClient, ArmError};
use crate::resourceids::{
    CloudHsmClusterId, DeletedConfigurationStoreId, ExperimentId, ResourceId,
};

/// Request path for `id`. Ids built with `new` have not been through `parse`,
/// so every value is checked to be non-empty and free of `/`.
fn resource_path<T: ResourceId>(id: &T) -> Result<String, ArmError> {
    let path = id.id();
    id.validate().map_err(|e| ArmError::InvalidUrl {
        url: path.clone(),
        message: e.reason().to_string(),
    })?;
    Ok(path)
}

#[derive(Debug, Clone)]
pub struct ExperimentsClient {
    client: ArmClient,
    api_version: String,
}

impl ExperimentsClient {
    pub const DEFAULT_API_VERSION: &'static str = "2024-01-01";

    pub fn new(client: ArmClient, api_version: impl Into<String>) -> Self {
        Self {
            client,
            api_version: api_version.into(),
        }
    }

    pub async fn get(&self, id: &ExperimentId) -> Result<ModelResponse<Experiment>, ArmError> {
        let response = self.client.get(&resource_path(id)?, &self.api_version).await?;
        response.ensure_status(&[200])?;
        let model = response.unmarshal()?;
        Ok(ModelResponse { response, model })
    }
}

#[derive(Debug, Clone)]
pub struct CloudHsmClustersClient {
    client: ArmClient,
    api_version: String,
}

impl CloudHsmClustersClient {
    pub const DEFAULT_API_VERSION: &'static str = "2024-06-30-preview";

    pub fn new(client: ArmClient, api_version: impl Into<String>) -> Self {
        Self {
            client,
            api_version: api_version.into(),
        }
    }

    pub async fn get(
        &self,
        id: &CloudHsmClusterId,
    ) -> Result<ModelResponse<CloudHsmCluster>, ArmError> {
        let response = self.client.get(&resource_path(id)?, &self.api_version).await?;
        response.ensure_status(&[200])?;
        let model = response.unmarshal()?;
        Ok(ModelResponse { response, model })
    }
}

#[derive(Debug, Clone)]
pub struct DeletedConfigurationStoresClient {
    client: ArmClient,
    api_version: String,
}

impl DeletedConfigurationStoresClient {
    pub const DEFAULT_API_VERSION: &'static str = "2023-03-01";

    pub fn new(client: ArmClient, api_version: impl Into<String>) -> Self {
        Self {
            client,
            api_version: api_version.into(),
        }
    }

    /// Returns the raw response whatever its status: a 404 here is the
    /// expected end state once a purge has gone through.
    pub async fn get_deleted(&self, id: &DeletedConfigurationStoreId) -> Result<Response, ArmError> {
        self.client.get(&resource_path(id)?, &self.api_version).await
    }
}
