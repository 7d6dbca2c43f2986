use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// CloudProvider
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudProvider {
    Aws,
    Gcp,
    Azure,
}

impl CloudProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            CloudProvider::Aws => "aws",
            CloudProvider::Gcp => "gcp",
            CloudProvider::Azure => "azure",
        }
    }
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for CloudProvider {
    type Err = crate::error::CtlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aws" => Ok(CloudProvider::Aws),
            "gcp" => Ok(CloudProvider::Gcp),
            "azure" => Ok(CloudProvider::Azure),
            _ => Err(crate::error::CtlError::invalid(format!(
                "unsupported cloud provider '{s}' (expected aws, gcp or azure)"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// DriftType
// ---------------------------------------------------------------------------

/// How a configuration path differs between a cell and its template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftType {
    /// Present in the template, absent in the cell.
    Missing,
    /// Present in both with differing values.
    Different,
    /// Present in the cell, absent in the template.
    Extra,
}

impl DriftType {
    pub fn as_str(self) -> &'static str {
        match self {
            DriftType::Missing => "missing",
            DriftType::Different => "different",
            DriftType::Extra => "extra",
        }
    }
}

impl fmt::Display for DriftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ChangeOperation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeOperation {
    Add,
    Update,
    Delete,
}

impl ChangeOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeOperation::Add => "add",
            ChangeOperation::Update => "update",
            ChangeOperation::Delete => "delete",
        }
    }
}

impl fmt::Display for ChangeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// StatusKind
// ---------------------------------------------------------------------------

/// Interpretation of the free-form `status` string of an amenities snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Synchronized,
    DriftDetected,
    PendingChanges,
    Error,
    Unknown,
}

impl StatusKind {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "synchronized" | "synced" | "in_sync" => StatusKind::Synchronized,
            "drift_detected" | "drifted" => StatusKind::DriftDetected,
            "pending_changes" | "pending" => StatusKind::PendingChanges,
            "error" | "failed" => StatusKind::Error,
            _ => StatusKind::Unknown,
        }
    }
}
