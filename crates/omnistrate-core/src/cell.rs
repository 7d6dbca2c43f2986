use crate::amenity::{create_deployment_cell_template, Amenity, DeploymentCellTemplate};
use crate::types::CloudProvider;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// DeploymentCell
// ---------------------------------------------------------------------------

/// A managed Kubernetes cluster (host cluster) hosting tenant workloads.
///
/// Fields the CLI does not interpret are kept in `extra` so a JSON dump shows
/// the backend object as returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentCell {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub amenities: Vec<Amenity>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DeploymentCell {
    pub fn template(&self) -> DeploymentCellTemplate {
        create_deployment_cell_template(self.amenities.iter().cloned())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentCellList {
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub host_clusters: Vec<DeploymentCell>,
}

// ---------------------------------------------------------------------------
// Organization
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentCellConfiguration {
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub amenities: Vec<Amenity>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentCellConfigurations {
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub deployment_cell_configuration_per_cloud_provider: BTreeMap<String, DeploymentCellConfiguration>,
}

/// Service-provider organization, reduced to the parts the amenities workflow reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Keyed by environment type.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub deployment_cell_configurations: BTreeMap<String, EnvironmentCellConfigurations>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Organization {
    /// The default template for `environment` on `cloud`, if one is configured.
    ///
    /// Environment keys are matched case-insensitively since the platform
    /// stores them upper-case (`PROD`) while operators often type `prod`.
    pub fn template_for(
        &self,
        environment: &str,
        cloud: CloudProvider,
    ) -> Option<DeploymentCellTemplate> {
        let env = self
            .deployment_cell_configurations
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(environment))
            .map(|(_, v)| v)?;
        let config = env
            .deployment_cell_configuration_per_cloud_provider
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(cloud.as_str()))
            .map(|(_, v)| v)?;
        Some(create_deployment_cell_template(config.amenities.iter().cloned()))
    }
}

/// Body of the organization update that replaces one environment/cloud template.
pub fn organization_template_patch(
    template: &DeploymentCellTemplate,
    environment: &str,
    cloud: CloudProvider,
) -> Value {
    serde_json::json!({
        "deploymentCellConfigurations": {
            environment: {
                "deploymentCellConfigurationPerCloudProvider": {
                    cloud.as_str(): {
                        "amenities": template.amenities(),
                    }
                }
            }
        }
    })
}
