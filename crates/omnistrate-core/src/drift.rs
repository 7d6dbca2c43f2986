use crate::api::PlatformApi;
use crate::error::{CtlError, Result};
use crate::status::DriftStatus;
use serde::Serialize;
use tracing::{debug, warn};

/// Organization and environment a drift check compares against.
#[derive(Debug, Clone, Copy)]
pub struct DriftScope<'a> {
    pub organization_id: &'a str,
    pub environment: &'a str,
}

/// One cell by id, or every cell of the organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellSelection {
    One(String),
    All,
}

impl CellSelection {
    /// Exactly one of `id` or `all` must be given.
    pub fn from_args(id: Option<&str>, all: bool) -> Result<Self> {
        match (id.map(str::trim).filter(|s| !s.is_empty()), all) {
            (Some(_), true) => Err(CtlError::invalid("--id cannot be combined with --all")),
            (Some(id), false) => Ok(CellSelection::One(id.to_string())),
            (None, true) => Ok(CellSelection::All),
            (None, false) => Err(CtlError::invalid("either --id or --all must be provided")),
        }
    }
}

/// Ask the platform to compare one cell against its template.
pub fn check_drift(
    api: &dyn PlatformApi,
    token: &str,
    cell_id: &str,
    scope: DriftScope<'_>,
) -> Result<DriftStatus> {
    debug!(cell = cell_id, org = scope.organization_id, env = scope.environment, "checking drift");
    api.check_deployment_cell_configuration_drift(
        token,
        cell_id,
        scope.organization_id,
        scope.environment,
    )
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellDrift {
    pub deployment_cell_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drift: Option<DriftStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CellDrift {
    pub fn has_drift(&self) -> bool {
        self.drift
            .as_ref()
            .is_some_and(|d| d.has_configuration_drift)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftReport {
    pub total: usize,
    pub drifted: usize,
    pub synchronized: usize,
    pub failed: usize,
    pub cells: Vec<CellDrift>,
}

impl DriftReport {
    fn push(&mut self, cell: CellDrift) {
        self.total += 1;
        match &cell.drift {
            Some(d) if d.has_configuration_drift => self.drifted += 1,
            Some(_) => self.synchronized += 1,
            None => self.failed += 1,
        }
        self.cells.push(cell);
    }
}

/// Check every deployment cell the organization owns.
///
/// Cells are checked one after another. A failing cell is logged, recorded in
/// the report, and does not stop the batch. Failing to enumerate cells does.
pub fn check_drift_all(
    api: &dyn PlatformApi,
    token: &str,
    scope: DriftScope<'_>,
) -> Result<DriftReport> {
    let cells = api.list_host_clusters(token)?;
    let mut report = DriftReport::default();
    for cell in cells {
        let entry = match check_drift(api, token, &cell.id, scope) {
            Ok(drift) => CellDrift {
                deployment_cell_id: cell.id,
                drift: Some(drift),
                error: None,
            },
            Err(e) => {
                warn!(cell = %cell.id, "drift check failed: {e}");
                CellDrift {
                    deployment_cell_id: cell.id,
                    drift: None,
                    error: Some(e.to_string()),
                }
            }
        };
        report.push(entry);
    }
    Ok(report)
}
