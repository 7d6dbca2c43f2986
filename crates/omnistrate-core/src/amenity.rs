use crate::error::{CtlError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;

/// Free-form amenity settings (Helm chart coordinates, values, ...).
pub type Properties = Map<String, Value>;

// ---------------------------------------------------------------------------
// Amenity
// ---------------------------------------------------------------------------

/// A named configuration unit (typically a Helm chart and its values)
/// attached to a deployment cell or an organization template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Amenity {
    pub name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub amenity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::de::null_as_default",
        skip_serializing_if = "Map::is_empty"
    )]
    pub properties: Properties,
    #[serde(
        default,
        deserialize_with = "crate::de::null_as_default",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub is_managed: bool,
}

impl Amenity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amenity_type: None,
            description: None,
            properties: Map::new(),
            is_managed: false,
        }
    }

    pub fn managed(mut self) -> Self {
        self.is_managed = true;
        self
    }

    pub fn with_type(mut self, amenity_type: impl Into<String>) -> Self {
        self.amenity_type = Some(amenity_type.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }
}

// ---------------------------------------------------------------------------
// DeploymentCellTemplate
// ---------------------------------------------------------------------------

/// Amenities split into platform-managed and organization-defined lists.
///
/// Used both for the organization default (keyed by environment and cloud
/// provider) and for rendering a live deployment cell in the same shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentCellTemplate {
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub managed_amenities: Vec<Amenity>,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub custom_amenities: Vec<Amenity>,
}

/// Partition a flat amenity list by `is_managed`, preserving order.
pub fn create_deployment_cell_template(
    amenities: impl IntoIterator<Item = Amenity>,
) -> DeploymentCellTemplate {
    let (managed_amenities, custom_amenities): (Vec<Amenity>, Vec<Amenity>) =
        amenities.into_iter().partition(|a| a.is_managed);
    DeploymentCellTemplate {
        managed_amenities,
        custom_amenities,
    }
}

impl DeploymentCellTemplate {
    /// Flatten back to the wire representation, managed first.
    pub fn amenities(&self) -> Vec<Amenity> {
        self.managed_amenities
            .iter()
            .cloned()
            .chain(self.custom_amenities.iter().cloned())
            .collect()
    }

    /// Make `is_managed` agree with list membership.
    pub fn normalize(&mut self) {
        for a in &mut self.managed_amenities {
            a.is_managed = true;
        }
        for a in &mut self.custom_amenities {
            a.is_managed = false;
        }
    }

    /// Reject empty names and names used more than once across both lists.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for (list, amenities) in [
            ("managedAmenities", &self.managed_amenities),
            ("customAmenities", &self.custom_amenities),
        ] {
            for a in amenities {
                if a.name.trim().is_empty() {
                    return Err(CtlError::invalid(format!(
                        "amenity in {list} has an empty name"
                    )));
                }
                if !seen.insert(a.name.as_str()) {
                    return Err(CtlError::invalid(format!(
                        "amenity '{}' is defined more than once",
                        a.name
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn from_yaml(data: &str) -> Result<Self> {
        let mut template: DeploymentCellTemplate = serde_yaml::from_str(data)?;
        template.normalize();
        template.validate()?;
        Ok(template)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CtlError::NotFound(format!("template file '{}'", path.display()))
            } else {
                CtlError::Io(e)
            }
        })?;
        Self::from_yaml(&data)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = self.to_yaml()?;
        crate::io::atomic_write(path, data.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample() -> Vec<Amenity> {
        vec![
            Amenity::new("cert-manager").managed().with_type("helm"),
            Amenity::new("datadog")
                .with_type("helm")
                .with_description("APM agent")
                .with_property("chartVersion", json!("3.1.0")),
            Amenity::new("external-dns").managed(),
        ]
    }

    #[test]
    fn partition_by_is_managed() {
        let t = create_deployment_cell_template(sample());
        let managed: Vec<_> = t.managed_amenities.iter().map(|a| a.name.as_str()).collect();
        let custom: Vec<_> = t.custom_amenities.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(managed, ["cert-manager", "external-dns"]);
        assert_eq!(custom, ["datadog"]);
        assert!(t.managed_amenities.iter().all(|a| a.is_managed));
        assert!(t.custom_amenities.iter().all(|a| !a.is_managed));
        assert_eq!(t.amenities().len(), 3);
    }

    #[test]
    fn each_amenity_lands_in_exactly_one_list() {
        let t = create_deployment_cell_template(sample());
        for a in sample() {
            let in_managed = t.managed_amenities.iter().any(|m| m.name == a.name);
            let in_custom = t.custom_amenities.iter().any(|c| c.name == a.name);
            assert!(in_managed ^ in_custom, "{} must be in exactly one list", a.name);
        }
    }

    #[test]
    fn empty_input_gives_empty_template() {
        let t = create_deployment_cell_template(Vec::new());
        assert!(t.amenities().is_empty());
        assert!(t.validate().is_ok());
    }

    #[test]
    fn validate_rejects_duplicates_across_lists() {
        let t = DeploymentCellTemplate {
            managed_amenities: vec![Amenity::new("istio").managed()],
            custom_amenities: vec![Amenity::new("istio")],
        };
        assert!(matches!(t.validate(), Err(CtlError::InvalidArgument(_))));
    }

    #[test]
    fn validate_rejects_blank_names() {
        let t = DeploymentCellTemplate {
            managed_amenities: vec![],
            custom_amenities: vec![Amenity::new("  ")],
        };
        assert!(matches!(t.validate(), Err(CtlError::InvalidArgument(_))));
    }

    #[test]
    fn yaml_file_format_uses_camel_case_lists() {
        let yaml = r#"
managedAmenities:
  - name: cert-manager
    type: helm
    description: TLS certificates
    properties:
      chartVersion: 1.14.0
      replicas: 2
customAmenities:
  - name: datadog
    type: helm
"#;
        let t = DeploymentCellTemplate::from_yaml(yaml).unwrap();
        assert_eq!(t.managed_amenities.len(), 1);
        assert_eq!(t.custom_amenities.len(), 1);
        let cm = &t.managed_amenities[0];
        assert!(cm.is_managed, "managed list membership sets is_managed");
        assert_eq!(cm.amenity_type.as_deref(), Some("helm"));
        assert_eq!(cm.properties["replicas"], json!(2));
        assert_eq!(cm.properties["chartVersion"], json!("1.14.0"));
    }

    #[test]
    fn save_and_load_preserve_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.yaml");
        let t = create_deployment_cell_template(sample());
        t.save(&path).unwrap();

        let loaded = DeploymentCellTemplate::load(&path).unwrap();
        assert_eq!(loaded, t);
        let dd = &loaded.custom_amenities[0];
        assert_eq!(dd.name, "datadog");
        assert_eq!(dd.description.as_deref(), Some("APM agent"));
        assert_eq!(dd.properties["chartVersion"], json!("3.1.0"));
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = DeploymentCellTemplate::load(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, CtlError::NotFound(_)));
    }

    #[test]
    fn flatten_puts_managed_first() {
        let t = create_deployment_cell_template(sample());
        let names: Vec<_> = t.amenities().into_iter().map(|a| a.name).collect();
        assert_eq!(names, ["cert-manager", "external-dns", "datadog"]);
    }
}
