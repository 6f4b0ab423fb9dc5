use std::fmt;

use super::{RESOURCE_GROUP, ResourceId, SUBSCRIPTION, Schema, Segment};

fn take(values: &mut std::vec::IntoIter<String>) -> String {
    values.next().unwrap_or_default()
}

static RESOURCE_GROUP_SCHEMA: Schema = Schema {
    description: "Resource Group",
    segments: &[SUBSCRIPTION, RESOURCE_GROUP],
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceGroupId {
    pub subscription_id: String,
    pub resource_group_name: String,
}

impl ResourceGroupId {
    pub fn new(subscription_id: impl Into<String>, resource_group_name: impl Into<String>) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group_name: resource_group_name.into(),
        }
    }
}

impl ResourceId for ResourceGroupId {
    fn schema() -> &'static Schema {
        &RESOURCE_GROUP_SCHEMA
    }

    fn from_values(values: Vec<String>) -> Self {
        let mut values = values.into_iter();
        Self {
            subscription_id: take(&mut values),
            resource_group_name: take(&mut values),
        }
    }

    fn values(&self) -> Vec<&str> {
        vec![self.subscription_id.as_str(), self.resource_group_name.as_str()]
    }
}

impl fmt::Display for ResourceGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Resource Group (Subscription {:?} / Resource Group Name {:?})",
            self.subscription_id, self.resource_group_name
        )
    }
}

static VAULT_SCHEMA: Schema = Schema {
    description: "Key Vault",
    segments: &[
        SUBSCRIPTION,
        RESOURCE_GROUP,
        Segment::provider("Microsoft.KeyVault"),
        Segment::user("vaults", "vaultName"),
    ],
};

/// `/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.KeyVault/vaults/{vaultName}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VaultId {
    pub subscription_id: String,
    pub resource_group_name: String,
    pub vault_name: String,
}

impl VaultId {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group_name: impl Into<String>,
        vault_name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group_name: resource_group_name.into(),
            vault_name: vault_name.into(),
        }
    }

    pub fn resource_group_id(&self) -> ResourceGroupId {
        ResourceGroupId::new(&self.subscription_id, &self.resource_group_name)
    }
}

impl ResourceId for VaultId {
    fn schema() -> &'static Schema {
        &VAULT_SCHEMA
    }

    fn from_values(values: Vec<String>) -> Self {
        let mut values = values.into_iter();
        Self {
            subscription_id: take(&mut values),
            resource_group_name: take(&mut values),
            vault_name: take(&mut values),
        }
    }

    fn values(&self) -> Vec<&str> {
        vec![
            self.subscription_id.as_str(),
            self.resource_group_name.as_str(),
            self.vault_name.as_str(),
        ]
    }
}

impl fmt::Display for VaultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Key Vault (Subscription {:?} / Resource Group {:?} / Vault Name {:?})",
            self.subscription_id, self.resource_group_name, self.vault_name
        )
    }
}

static EXPERIMENT_SCHEMA: Schema = Schema {
    description: "Chaos Studio Experiment",
    segments: &[
        SUBSCRIPTION,
        RESOURCE_GROUP,
        Segment::provider("Microsoft.Chaos"),
        Segment::user("experiments", "experimentName"),
    ],
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExperimentId {
    pub subscription_id: String,
    pub resource_group_name: String,
    pub experiment_name: String,
}

impl ExperimentId {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group_name: impl Into<String>,
        experiment_name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group_name: resource_group_name.into(),
            experiment_name: experiment_name.into(),
        }
    }
}

impl ResourceId for ExperimentId {
    fn schema() -> &'static Schema {
        &EXPERIMENT_SCHEMA
    }

    fn from_values(values: Vec<String>) -> Self {
        let mut values = values.into_iter();
        Self {
            subscription_id: take(&mut values),
            resource_group_name: take(&mut values),
            experiment_name: take(&mut values),
        }
    }

    fn values(&self) -> Vec<&str> {
        vec![
            self.subscription_id.as_str(),
            self.resource_group_name.as_str(),
            self.experiment_name.as_str(),
        ]
    }
}

impl fmt::Display for ExperimentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Experiment (Subscription {:?} / Resource Group {:?} / Experiment Name {:?})",
            self.subscription_id, self.resource_group_name, self.experiment_name
        )
    }
}

static CLOUD_HSM_CLUSTER_SCHEMA: Schema = Schema {
    description: "Cloud HSM Cluster",
    segments: &[
        SUBSCRIPTION,
        RESOURCE_GROUP,
        Segment::provider("Microsoft.HardwareSecurityModules"),
        Segment::user("cloudHsmClusters", "cloudHsmClusterName"),
    ],
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CloudHsmClusterId {
    pub subscription_id: String,
    pub resource_group_name: String,
    pub cloud_hsm_cluster_name: String,
}

impl CloudHsmClusterId {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group_name: impl Into<String>,
        cloud_hsm_cluster_name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group_name: resource_group_name.into(),
            cloud_hsm_cluster_name: cloud_hsm_cluster_name.into(),
        }
    }
}

impl ResourceId for CloudHsmClusterId {
    fn schema() -> &'static Schema {
        &CLOUD_HSM_CLUSTER_SCHEMA
    }

    fn from_values(values: Vec<String>) -> Self {
        let mut values = values.into_iter();
        Self {
            subscription_id: take(&mut values),
            resource_group_name: take(&mut values),
            cloud_hsm_cluster_name: take(&mut values),
        }
    }

    fn values(&self) -> Vec<&str> {
        vec![
            self.subscription_id.as_str(),
            self.resource_group_name.as_str(),
            self.cloud_hsm_cluster_name.as_str(),
        ]
    }
}

impl fmt::Display for CloudHsmClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cloud HSM Cluster (Subscription {:?} / Resource Group {:?} / Cloud HSM Cluster Name {:?})",
            self.subscription_id, self.resource_group_name, self.cloud_hsm_cluster_name
        )
    }
}

static DELETED_CONFIGURATION_STORE_SCHEMA: Schema = Schema {
    description: "Deleted Configuration Store",
    segments: &[
        SUBSCRIPTION,
        Segment::provider("Microsoft.AppConfiguration"),
        Segment::user("locations", "location"),
        Segment::user("deletedConfigurationStores", "configurationStoreName"),
    ],
};

/// A soft-deleted App Configuration store. Scoped to a location rather than
/// a resource group, since the store's resource group may already be gone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeletedConfigurationStoreId {
    pub subscription_id: String,
    pub location: String,
    pub configuration_store_name: String,
}

impl DeletedConfigurationStoreId {
    pub fn new(
        subscription_id: impl Into<String>,
        location: impl Into<String>,
        configuration_store_name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            location: location.into(),
            configuration_store_name: configuration_store_name.into(),
        }
    }
}

impl ResourceId for DeletedConfigurationStoreId {
    fn schema() -> &'static Schema {
        &DELETED_CONFIGURATION_STORE_SCHEMA
    }

    fn from_values(values: Vec<String>) -> Self {
        let mut values = values.into_iter();
        Self {
            subscription_id: take(&mut values),
            location: take(&mut values),
            configuration_store_name: take(&mut values),
        }
    }

    fn values(&self) -> Vec<&str> {
        vec![
            self.subscription_id.as_str(),
            self.location.as_str(),
            self.configuration_store_name.as_str(),
        ]
    }
}

impl fmt::Display for DeletedConfigurationStoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Deleted Configuration Store (Subscription {:?} / Location {:?} / Configuration Store Name {:?})",
            self.subscription_id, self.location, self.configuration_store_name
        )
    }
}
