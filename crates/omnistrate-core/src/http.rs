//! Blocking REST client for the platform API.

use crate::amenity::{Amenity, DeploymentCellTemplate};
use crate::api::PlatformApi;
use crate::cell::{organization_template_patch, DeploymentCell, DeploymentCellList, Organization};
use crate::error::{CtlError, Result};
use crate::status::{AmenitiesStatus, DriftStatus};
use crate::types::CloudProvider;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{header, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const API_VERSION: &str = "2022-09-01-00";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpPlatform {
    client: Client,
    base_url: Url,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    jwt_token: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    name: Option<String>,
    message: String,
}

impl HttpPlatform {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| CtlError::invalid(format!("invalid API URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(CtlError::invalid(format!("invalid API URL '{base_url}'")));
        }
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("omnistrate-ctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CtlError::remote("build HTTP client", base_url.as_str(), e))?;
        Ok(Self { client, base_url })
    }

    /// `{base}/{API_VERSION}/{segments...}` with each segment percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push(API_VERSION).extend(segments);
        }
        url
    }

    fn authorized(&self, builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder.header(header::AUTHORIZATION, format!("Bearer {token}"))
    }

    fn execute(
        &self,
        operation: &'static str,
        target: &str,
        request: RequestBuilder,
    ) -> Result<reqwest::blocking::Response> {
        let response = request
            .send()
            .map_err(|e| CtlError::remote(operation, target, e))?;
        let status = response.status();
        debug!(op = operation, resource = target, status = status.as_u16(), "platform response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        let message = match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(ApiErrorBody {
                name: Some(name),
                message,
            }) => format!("{status}: {name}: {message}"),
            Ok(ApiErrorBody { message, .. }) => format!("{status}: {message}"),
            Err(_) if body.trim().is_empty() => status.to_string(),
            Err(_) => format!("{status}: {}", body.trim()),
        };
        debug!(op = operation, resource = target, "{message}");

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                CtlError::Authentication(format!("{operation} for {target}: {message}"))
            }
            StatusCode::NOT_FOUND => CtlError::NotFound(format!("{target} ({operation})")),
            _ => CtlError::remote(operation, target, message),
        })
    }

    fn fetch<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        target: &str,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = self.execute(operation, target, request)?;
        response
            .json()
            .map_err(|e| CtlError::remote(operation, target, format!("invalid response body: {e}")))
    }
}

impl PlatformApi for HttpPlatform {
    fn sign_in(&self, email: &str, password: &str) -> Result<String> {
        let url = self.url(&["signin"]);
        debug!("POST {url}");
        let body = serde_json::json!({ "email": email, "password": password });
        let request = self.client.post(url).json(&body);
        let response: SignInResponse = match self.fetch("sign in", email, request) {
            Err(CtlError::NotFound(_)) => {
                return Err(CtlError::Authentication(format!("unknown user '{email}'")))
            }
            other => other?,
        };
        if response.jwt_token.is_empty() {
            return Err(CtlError::Authentication(
                "sign-in response carried an empty token".into(),
            ));
        }
        Ok(response.jwt_token)
    }

    fn get_service_provider_organization(&self, token: &str) -> Result<Organization> {
        let url = self.url(&["service-provider-organization"]);
        debug!("GET {url}");
        let request = self.authorized(self.client.get(url), token);
        self.fetch("get organization", "service provider organization", request)
    }

    fn update_service_provider_organization(
        &self,
        token: &str,
        template: &DeploymentCellTemplate,
        environment: &str,
        cloud: CloudProvider,
    ) -> Result<()> {
        let url = self.url(&["service-provider-organization"]);
        debug!("PATCH {url}");
        let body = organization_template_patch(template, environment, cloud);
        let request = self.authorized(self.client.patch(url), token).json(&body);
        let target = format!("{environment}/{cloud} template");
        self.execute("update organization template", &target, request)?;
        Ok(())
    }

    fn get_organization_deployment_cell_template(
        &self,
        token: &str,
        environment: &str,
        cloud: CloudProvider,
    ) -> Result<DeploymentCellTemplate> {
        let mut url = self.url(&["service-provider-organization", "deployment-cell-template"]);
        url.query_pairs_mut()
            .append_pair("environmentType", environment)
            .append_pair("cloudProvider", cloud.as_str());
        debug!("GET {url}");
        let request = self.authorized(self.client.get(url), token);
        let target = format!("environment '{environment}' on {cloud}");
        let mut template: DeploymentCellTemplate =
            self.fetch("get organization template", &target, request)?;
        template.normalize();
        Ok(template)
    }

    fn list_host_clusters(&self, token: &str) -> Result<Vec<DeploymentCell>> {
        let url = self.url(&["fleet", "host-clusters"]);
        debug!("GET {url}");
        let request = self.authorized(self.client.get(url), token);
        let list: DeploymentCellList = self.fetch("list deployment cells", "organization", request)?;
        Ok(list.host_clusters)
    }

    fn describe_host_cluster(&self, token: &str, cell_id: &str) -> Result<DeploymentCell> {
        let url = self.url(&["fleet", "host-cluster", cell_id]);
        debug!("GET {url}");
        let request = self.authorized(self.client.get(url), token);
        self.fetch(
            "describe deployment cell",
            &format!("deployment cell '{cell_id}'"),
            request,
        )
    }

    fn update_host_cluster(
        &self,
        token: &str,
        cell_id: &str,
        amenities: &[Amenity],
    ) -> Result<()> {
        let url = self.url(&["fleet", "host-cluster", cell_id]);
        debug!("PATCH {url}");
        let body = serde_json::json!({ "pendingAmenities": amenities });
        let request = self.authorized(self.client.patch(url), token).json(&body);
        self.execute(
            "update deployment cell",
            &format!("deployment cell '{cell_id}'"),
            request,
        )?;
        Ok(())
    }

    fn update_host_cluster_with_template(&self, token: &str, cell_id: &str) -> Result<()> {
        let url = self.url(&["fleet", "host-cluster", cell_id, "sync-with-org-template"]);
        debug!("POST {url}");
        let request = self.authorized(self.client.post(url), token);
        self.execute(
            "update deployment cell with template",
            &format!("deployment cell '{cell_id}'"),
            request,
        )?;
        Ok(())
    }

    fn check_deployment_cell_configuration_drift(
        &self,
        token: &str,
        cell_id: &str,
        organization_id: &str,
        environment: &str,
    ) -> Result<DriftStatus> {
        let url = self.url(&["fleet", "host-cluster", cell_id, "amenities", "check-drift"]);
        debug!("POST {url}");
        let body = serde_json::json!({
            "organizationId": organization_id,
            "environment": environment,
        });
        let request = self.authorized(self.client.post(url), token).json(&body);
        self.fetch(
            "check drift",
            &format!("deployment cell '{cell_id}'"),
            request,
        )
    }

    fn sync_deployment_cell_with_template(
        &self,
        token: &str,
        cell_id: &str,
        organization_id: &str,
        environment: &str,
    ) -> Result<AmenitiesStatus> {
        let url = self.url(&["fleet", "host-cluster", cell_id, "amenities", "sync"]);
        debug!("POST {url}");
        let body = serde_json::json!({
            "organizationId": organization_id,
            "environment": environment,
        });
        let request = self.authorized(self.client.post(url), token).json(&body);
        self.fetch("sync", &format!("deployment cell '{cell_id}'"), request)
    }

    fn apply_pending_changes_to_deployment_cell(
        &self,
        token: &str,
        service_id: &str,
        cell_id: &str,
    ) -> Result<()> {
        let url = self.url(&[
            "fleet",
            "service",
            service_id,
            "host-cluster",
            cell_id,
            "apply-pending-changes",
        ]);
        debug!("POST {url}");
        let request = self.authorized(self.client.post(url), token);
        self.execute(
            "apply pending changes",
            &format!("deployment cell '{cell_id}'"),
            request,
        )?;
        Ok(())
    }

    fn get_deployment_cell_amenities_status(
        &self,
        token: &str,
        cell_id: &str,
    ) -> Result<AmenitiesStatus> {
        let url = self.url(&["fleet", "host-cluster", cell_id, "amenities", "status"]);
        debug!("GET {url}");
        let request = self.authorized(self.client.get(url), token);
        self.fetch(
            "get amenities status",
            &format!("deployment cell '{cell_id}'"),
            request,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
