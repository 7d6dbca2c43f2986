use crate::types::{ChangeOperation, DriftType, StatusKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Drift
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftDetail {
    /// Dotted location inside the amenity configuration.
    pub path: String,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub current_value: Value,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub target_value: Value,
    pub drift_type: DriftType,
}

/// Result of a drift check. The backend guarantees `has_configuration_drift`
/// is true iff `drift_details` is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftStatus {
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub has_configuration_drift: bool,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub drift_details: Vec<DriftDetail>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DriftCounts {
    pub missing: usize,
    pub different: usize,
    pub extra: usize,
}

impl DriftStatus {
    pub fn counts(&self) -> DriftCounts {
        let mut c = DriftCounts::default();
        for d in &self.drift_details {
            match d.drift_type {
                DriftType::Missing => c.missing += 1,
                DriftType::Different => c.different += 1,
                DriftType::Extra => c.extra += 1,
            }
        }
        c
    }
}

// ---------------------------------------------------------------------------
// PendingChange
// ---------------------------------------------------------------------------

/// A staged modification produced by a sync and awaiting apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingChange {
    pub path: String,
    pub operation: ChangeOperation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
}

// ---------------------------------------------------------------------------
// AmenitiesStatus
// ---------------------------------------------------------------------------

/// Point-in-time snapshot of a deployment cell's amenities convergence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmenitiesStatus {
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_check: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub has_configuration_drift: bool,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub drift_details: Vec<DriftDetail>,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub has_pending_changes: bool,
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub pending_changes: Vec<PendingChange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_configuration: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_configuration: Option<Value>,
}

impl AmenitiesStatus {
    pub fn kind(&self) -> StatusKind {
        StatusKind::parse(&self.status)
    }

}
