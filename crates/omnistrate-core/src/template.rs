use crate::amenity::DeploymentCellTemplate;
use crate::api::PlatformApi;
use crate::error::{CtlError, Result};
use crate::types::CloudProvider;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Which template a command addresses: an organization default or a live cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateTarget {
    Organization {
        environment: String,
        cloud: CloudProvider,
    },
    Cell {
        id: String,
    },
}

impl TemplateTarget {
    /// Build a target from the raw flags.
    ///
    /// Exactly one of `id` or the `(environment, cloud)` pair must be given,
    /// and the pair must be complete. Runs before any request is made.
    pub fn from_args(
        id: Option<&str>,
        environment: Option<&str>,
        cloud: Option<CloudProvider>,
    ) -> Result<Self> {
        let id = id.map(str::trim).filter(|s| !s.is_empty());
        let environment = environment.map(str::trim).filter(|s| !s.is_empty());

        match (id, environment, cloud) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(CtlError::invalid(
                "--id cannot be combined with --environment/--cloud",
            )),
            (Some(id), None, None) => Ok(TemplateTarget::Cell { id: id.to_string() }),
            (None, Some(env), Some(cloud)) => Ok(TemplateTarget::Organization {
                environment: env.to_string(),
                cloud,
            }),
            (None, Some(_), None) => Err(CtlError::invalid(
                "--cloud is required together with --environment",
            )),
            (None, None, Some(_)) => Err(CtlError::invalid(
                "--environment is required together with --cloud",
            )),
            (None, None, None) => Err(CtlError::invalid(
                "either --id or both --environment and --cloud must be provided",
            )),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            TemplateTarget::Organization { environment, cloud } => {
                format!("organization template for {environment} on {cloud}")
            }
            TemplateTarget::Cell { id } => format!("deployment cell '{id}'"),
        }
    }
}

/// Fetch the template addressed by `target`.
pub fn resolve_template(
    api: &dyn PlatformApi,
    token: &str,
    target: &TemplateTarget,
) -> Result<DeploymentCellTemplate> {
    debug!(template = %target.describe(), "resolving template");
    match target {
        TemplateTarget::Organization { environment, cloud } => {
            let org = api.get_service_provider_organization(token)?;
            org.template_for(environment, *cloud).ok_or_else(|| {
                CtlError::NotFound(format!(
                    "no deployment cell configuration for environment '{environment}' and cloud provider '{cloud}'"
                ))
            })
        }
        TemplateTarget::Cell { id } => Ok(api.describe_host_cluster(token, id)?.template()),
    }
}

/// Where the new configuration of an update comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateSource {
    File(PathBuf),
    /// Stage the organization template on a cell.
    OrganizationTemplate,
}

/// Validate the flags of `update-config-template` before any request.
///
/// An organization target needs a file. A cell target needs exactly one of
/// a file or `--sync-with-template`.
pub fn plan_update(
    id: Option<&str>,
    environment: Option<&str>,
    cloud: Option<CloudProvider>,
    file: Option<&Path>,
    sync_with_template: bool,
) -> Result<(TemplateTarget, UpdateSource)> {
    let target = TemplateTarget::from_args(id, environment, cloud)?;
    let source = match (&target, file, sync_with_template) {
        (TemplateTarget::Organization { .. }, _, true) => {
            return Err(CtlError::invalid(
                "--sync-with-template only applies to a deployment cell (--id)",
            ))
        }
        (TemplateTarget::Organization { .. }, None, false) => {
            return Err(CtlError::invalid(
                "--file is required when updating an organization template",
            ))
        }
        (TemplateTarget::Cell { .. }, Some(_), true) => {
            return Err(CtlError::invalid(
                "--file cannot be combined with --sync-with-template",
            ))
        }
        (TemplateTarget::Cell { .. }, None, false) => {
            return Err(CtlError::invalid(
                "either --file or --sync-with-template must be provided with --id",
            ))
        }
        (_, Some(path), false) => UpdateSource::File(path.to_path_buf()),
        (TemplateTarget::Cell { .. }, None, true) => UpdateSource::OrganizationTemplate,
    };
    Ok((target, source))
}

/// Upload `template` to the addressed location.
///
/// For an organization target the default template is replaced. For a cell
/// target the amenities are staged as pending changes on the cell.
pub fn update_template(
    api: &dyn PlatformApi,
    token: &str,
    target: &TemplateTarget,
    template: &DeploymentCellTemplate,
) -> Result<()> {
    template.validate()?;
    match target {
        TemplateTarget::Organization { environment, cloud } => {
            api.update_service_provider_organization(token, template, environment, *cloud)
        }
        TemplateTarget::Cell { id } => api.update_host_cluster(token, id, &template.amenities()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amenity::Amenity;
    use crate::api::fake::{testing, FakePlatform};
    use crate::cell::Organization;
    use serde_json::json;

    fn org_platform() -> FakePlatform {
        let organization: Organization = serde_json::from_value(json!({
            "id": "org-1",
            "deploymentCellConfigurations": {
                "PROD": {"deploymentCellConfigurationPerCloudProvider": {
                    "aws": {"amenities": [
                        {"name": "cert-manager", "isManaged": true},
                        {"name": "datadog"}
                    ]}
                }}
            }
        }))
        .unwrap();
        FakePlatform {
            organization: Some(organization),
            ..Default::default()
        }
    }

    #[test]
    fn id_and_env_are_mutually_exclusive() {
        let err =
            TemplateTarget::from_args(Some("x"), Some("PROD"), Some(CloudProvider::Aws)).unwrap_err();
        assert!(matches!(err, CtlError::InvalidArgument(_)));
        assert!(TemplateTarget::from_args(Some("x"), None, Some(CloudProvider::Aws)).is_err());
        assert!(TemplateTarget::from_args(Some("x"), Some("PROD"), None).is_err());
    }

    #[test]
    fn incomplete_pair_is_rejected() {
        assert!(TemplateTarget::from_args(None, Some("PROD"), None).is_err());
        assert!(TemplateTarget::from_args(None, None, Some(CloudProvider::Gcp)).is_err());
        assert!(TemplateTarget::from_args(None, None, None).is_err());
        assert!(TemplateTarget::from_args(Some(" "), None, None).is_err());
    }

    #[test]
    fn valid_targets() {
        assert_eq!(
            TemplateTarget::from_args(Some("hc-1"), None, None).unwrap(),
            TemplateTarget::Cell { id: "hc-1".into() }
        );
        assert_eq!(
            TemplateTarget::from_args(None, Some("PROD"), Some(CloudProvider::Aws)).unwrap(),
            TemplateTarget::Organization {
                environment: "PROD".into(),
                cloud: CloudProvider::Aws
            }
        );
    }

    #[test]
    fn resolve_org_template() {
        let api = org_platform();
        let target = TemplateTarget::from_args(None, Some("prod"), Some(CloudProvider::Aws)).unwrap();
        let t = resolve_template(&api, "tok", &target).unwrap();
        assert_eq!(t.managed_amenities.len(), 1);
        assert_eq!(t.custom_amenities.len(), 1);
        assert_eq!(api.count("get_org"), 1);
    }

    #[test]
    fn resolve_missing_combination_is_not_found() {
        let api = org_platform();
        let target = TemplateTarget::from_args(None, Some("DEV"), Some(CloudProvider::Aws)).unwrap();
        let err = resolve_template(&api, "tok", &target).unwrap_err();
        match err {
            CtlError::NotFound(msg) => {
                assert!(msg.contains("DEV"));
                assert!(msg.contains("aws"));
            }
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[test]
    fn resolve_cell_template() {
        let mut cell = testing::cell("hc-1");
        cell.amenities = vec![Amenity::new("istio").managed(), Amenity::new("custom")];
        let api = FakePlatform {
            cells: vec![cell],
            ..Default::default()
        };
        let t = resolve_template(&api, "tok", &TemplateTarget::Cell { id: "hc-1".into() }).unwrap();
        assert_eq!(t.managed_amenities[0].name, "istio");
        assert_eq!(t.custom_amenities[0].name, "custom");
        assert_eq!(api.count("describe_cell"), 1);
    }

    #[test]
    fn plan_update_combinations() {
        let file = Path::new("t.yaml");
        let aws = Some(CloudProvider::Aws);

        let (t, s) = plan_update(None, Some("PROD"), aws, Some(file), false).unwrap();
        assert!(matches!(t, TemplateTarget::Organization { .. }));
        assert_eq!(s, UpdateSource::File(file.to_path_buf()));

        let (t, s) = plan_update(Some("hc-1"), None, None, None, true).unwrap();
        assert_eq!(t, TemplateTarget::Cell { id: "hc-1".into() });
        assert_eq!(s, UpdateSource::OrganizationTemplate);

        let (_, s) = plan_update(Some("hc-1"), None, None, Some(file), false).unwrap();
        assert_eq!(s, UpdateSource::File(file.to_path_buf()));

        assert!(plan_update(None, Some("PROD"), aws, None, false).is_err());
        assert!(plan_update(None, Some("PROD"), aws, Some(file), true).is_err());
        assert!(plan_update(Some("hc-1"), None, None, Some(file), true).is_err());
        assert!(plan_update(Some("hc-1"), None, None, None, false).is_err());
        assert!(plan_update(Some("hc-1"), Some("PROD"), aws, Some(file), false).is_err());
    }

    #[test]
    fn update_validates_before_upload() {
        let api = FakePlatform::default();
        let bad = DeploymentCellTemplate {
            managed_amenities: vec![Amenity::new("dup").managed()],
            custom_amenities: vec![Amenity::new("dup")],
        };
        let target = TemplateTarget::Cell { id: "hc-1".into() };
        assert!(update_template(&api, "tok", &target, &bad).is_err());
        assert_eq!(api.total_calls(), 0);
    }

    #[test]
    fn update_routes_by_target() {
        let api = FakePlatform::default();
        let t = DeploymentCellTemplate {
            managed_amenities: vec![Amenity::new("cert-manager").managed()],
            custom_amenities: vec![],
        };
        update_template(&api, "tok", &TemplateTarget::Cell { id: "hc-1".into() }, &t).unwrap();
        let org = TemplateTarget::Organization {
            environment: "PROD".into(),
            cloud: CloudProvider::Aws,
        };
        update_template(&api, "tok", &org, &t).unwrap();
        assert_eq!(api.count("update_cell"), 1);
        assert_eq!(api.count("update_org"), 1);
    }
}
