//! The platform operations the CLI consumes.
//!
//! Every method is one blocking request. The trait is the seam between the
//! workflow logic (resolver, drift, sync, apply) and the transport, so the
//! workflow can run against an in-memory platform in tests.

use crate::amenity::{Amenity, DeploymentCellTemplate};
use crate::cell::{DeploymentCell, Organization};
use crate::error::Result;
use crate::status::{AmenitiesStatus, DriftStatus};
use crate::types::CloudProvider;

pub trait PlatformApi {
    /// Exchange credentials for a bearer token.
    fn sign_in(&self, email: &str, password: &str) -> Result<String>;

    fn get_service_provider_organization(&self, token: &str) -> Result<Organization>;

    fn update_service_provider_organization(
        &self,
        token: &str,
        template: &DeploymentCellTemplate,
        environment: &str,
        cloud: CloudProvider,
    ) -> Result<()>;

    fn get_organization_deployment_cell_template(
        &self,
        token: &str,
        environment: &str,
        cloud: CloudProvider,
    ) -> Result<DeploymentCellTemplate>;

    fn list_host_clusters(&self, token: &str) -> Result<Vec<DeploymentCell>>;

    fn describe_host_cluster(&self, token: &str, cell_id: &str) -> Result<DeploymentCell>;

    /// Stage `amenities` as the cell's pending configuration.
    fn update_host_cluster(&self, token: &str, cell_id: &str, amenities: &[Amenity])
        -> Result<()>;

    /// Stage the organization template as the cell's pending configuration.
    fn update_host_cluster_with_template(&self, token: &str, cell_id: &str) -> Result<()>;

    fn check_deployment_cell_configuration_drift(
        &self,
        token: &str,
        cell_id: &str,
        organization_id: &str,
        environment: &str,
    ) -> Result<DriftStatus>;

    fn sync_deployment_cell_with_template(
        &self,
        token: &str,
        cell_id: &str,
        organization_id: &str,
        environment: &str,
    ) -> Result<AmenitiesStatus>;

    fn apply_pending_changes_to_deployment_cell(
        &self,
        token: &str,
        service_id: &str,
        cell_id: &str,
    ) -> Result<()>;

    fn get_deployment_cell_amenities_status(
        &self,
        token: &str,
        cell_id: &str,
    ) -> Result<AmenitiesStatus>;
}

// ---------------------------------------------------------------------------
// In-memory platform for tests
// ---------------------------------------------------------------------------
