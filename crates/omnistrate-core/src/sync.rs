//! Staging pending changes that converge a cell to its template.
//!
//! The platform computes the changes; this module decides whether to ask for
//! them. Each cell goes through: drift check, then no-op / preview /
//! confirmation, then the staging request.

use crate::api::PlatformApi;
use crate::confirm::Confirm;
use crate::drift::{check_drift, DriftScope};
use crate::error::Result;
use crate::status::{AmenitiesStatus, DriftStatus};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Show what would be staged without staging it.
    pub dry_run: bool,
    /// Ask before staging.
    pub confirm: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// No drift; nothing was requested.
    AlreadySynchronized { drift: DriftStatus },
    /// Dry run; nothing was requested.
    Preview { drift: DriftStatus },
    /// The operator declined; nothing was requested.
    Declined { drift: DriftStatus },
    /// Pending changes were staged.
    Staged {
        drift: DriftStatus,
        status: AmenitiesStatus,
    },
}

impl SyncOutcome {
    pub fn drift(&self) -> &DriftStatus {
        match self {
            SyncOutcome::AlreadySynchronized { drift }
            | SyncOutcome::Preview { drift }
            | SyncOutcome::Declined { drift }
            | SyncOutcome::Staged { drift, .. } => drift,
        }
    }
}

/// Stage the changes that bring `cell_id` back to its template.
pub fn sync_cell(
    api: &dyn PlatformApi,
    token: &str,
    cell_id: &str,
    scope: DriftScope<'_>,
    options: SyncOptions,
    confirm: &mut dyn Confirm,
) -> Result<SyncOutcome> {
    let drift = check_drift(api, token, cell_id, scope)?;

    if !drift.has_configuration_drift {
        return Ok(SyncOutcome::AlreadySynchronized { drift });
    }
    if options.dry_run {
        return Ok(SyncOutcome::Preview { drift });
    }
    if options.confirm {
        let prompt = format!(
            "Stage {} change(s) on deployment cell '{cell_id}'?",
            drift.drift_details.len()
        );
        if !confirm.confirm(&prompt) {
            return Ok(SyncOutcome::Declined { drift });
        }
    }

    let status = api.sync_deployment_cell_with_template(
        token,
        cell_id,
        scope.organization_id,
        scope.environment,
    )?;
    info!(cell = cell_id, pending = status.pending_changes.len(), "pending changes staged");
    Ok(SyncOutcome::Staged { drift, status })
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellSync {
    pub deployment_cell_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<SyncOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub total: usize,
    pub staged: usize,
    pub skipped: usize,
    pub declined: usize,
    pub previewed: usize,
    pub failed: usize,
    pub cells: Vec<CellSync>,
}

impl SyncReport {
    /// Count `cell`, and list it unless it is a converged cell and `drift_only` is set.
    fn push(&mut self, cell: CellSync, drift_only: bool) {
        self.total += 1;
        match &cell.outcome {
            Some(SyncOutcome::Staged { .. }) => self.staged += 1,
            Some(SyncOutcome::AlreadySynchronized { .. }) => {
                self.skipped += 1;
                if drift_only {
                    return;
                }
            }
            Some(SyncOutcome::Declined { .. }) => self.declined += 1,
            Some(SyncOutcome::Preview { .. }) => self.previewed += 1,
            None => self.failed += 1,
        }
        self.cells.push(cell);
    }
}

/// Sync every deployment cell of the organization, one at a time.
///
/// Cells without drift are never staged and count as skipped. With
/// `drift_only` they are also left out of the per-cell entries. A failing
/// cell is reported and the batch moves on.
pub fn sync_all(
    api: &dyn PlatformApi,
    token: &str,
    scope: DriftScope<'_>,
    options: SyncOptions,
    drift_only: bool,
    confirm: &mut dyn Confirm,
) -> Result<SyncReport> {
    let cells = api.list_host_clusters(token)?;
    let mut report = SyncReport::default();
    for cell in cells {
        let entry = match sync_cell(api, token, &cell.id, scope, options, confirm) {
            Ok(outcome) => CellSync {
                deployment_cell_id: cell.id,
                outcome: Some(outcome),
                error: None,
            },
            Err(e) => {
                warn!(cell = %cell.id, "sync failed: {e}");
                CellSync {
                    deployment_cell_id: cell.id,
                    outcome: None,
                    error: Some(e.to_string()),
                }
            }
        };
        report.push(entry, drift_only);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{testing, FakePlatform};
    use crate::confirm::AlwaysYes;

    const SCOPE: DriftScope<'static> = DriftScope {
        organization_id: "org-1",
        environment: "production",
    };

    fn single() -> SyncOptions {
        SyncOptions::default()
    }

    fn drifted_platform() -> FakePlatform {
        let mut api = FakePlatform::default();
        api.drift.insert("hc-1".into(), testing::drifted(2));
        api
    }

    #[test]
    fn no_drift_is_noop() {
        let api = FakePlatform::default();
        let out = sync_cell(&api, "tok", "hc-1", SCOPE, single(), &mut AlwaysYes).unwrap();
        assert!(matches!(out, SyncOutcome::AlreadySynchronized { .. }));
        assert_eq!(api.count("sync"), 0);
    }

    #[test]
    fn dry_run_never_stages() {
        let api = drifted_platform();
        let opts = SyncOptions {
            dry_run: true,
            ..single()
        };
        let out = sync_cell(&api, "tok", "hc-1", SCOPE, opts, &mut AlwaysYes).unwrap();
        match out {
            SyncOutcome::Preview { drift } => assert_eq!(drift.drift_details.len(), 2),
            other => panic!("expected preview, got {other:?}"),
        }
        assert_eq!(api.count("sync"), 0);
    }

    #[test]
    fn declined_confirmation_has_no_side_effect() {
        let api = drifted_platform();
        let opts = SyncOptions {
            confirm: true,
            ..single()
        };
        let mut asked = Vec::new();
        let mut no = |p: &str| {
            asked.push(p.to_string());
            false
        };
        let out = sync_cell(&api, "tok", "hc-1", SCOPE, opts, &mut no).unwrap();
        assert!(matches!(out, SyncOutcome::Declined { .. }));
        assert_eq!(api.count("sync"), 0);
        assert_eq!(asked.len(), 1);
        assert!(asked[0].contains("hc-1"));
    }

    #[test]
    fn confirmed_sync_stages() {
        let api = drifted_platform();
        let opts = SyncOptions {
            confirm: true,
            ..single()
        };
        let mut yes = |_: &str| true;
        let out = sync_cell(&api, "tok", "hc-1", SCOPE, opts, &mut yes).unwrap();
        match out {
            SyncOutcome::Staged { status, .. } => assert!(status.has_pending_changes),
            other => panic!("expected staged, got {other:?}"),
        }
        assert_eq!(api.count("check_drift"), 1);
        assert_eq!(api.count("sync"), 1);
    }

    #[test]
    fn prompt_is_skipped_without_confirm_flag() {
        let api = drifted_platform();
        let mut never = |_: &str| -> bool { panic!("must not prompt") };
        let out = sync_cell(&api, "tok", "hc-1", SCOPE, single(), &mut never).unwrap();
        assert!(matches!(out, SyncOutcome::Staged { .. }));
    }

    #[test]
    fn drift_check_failure_aborts_single_sync() {
        let mut api = FakePlatform::default();
        api.failing_cells.insert("hc-1".into());
        assert!(sync_cell(&api, "tok", "hc-1", SCOPE, single(), &mut AlwaysYes).is_err());
        assert_eq!(api.count("sync"), 0);
    }

    #[test]
    fn batch_drift_only_skips_converged_cells() {
        let mut api = FakePlatform {
            cells: vec![
                testing::cell("hc-1"),
                testing::cell("hc-2"),
                testing::cell("hc-3"),
            ],
            ..Default::default()
        };
        api.drift.insert("hc-1".into(), testing::drifted(1));
        api.failing_cells.insert("hc-3".into());

        let report =
            sync_all(&api, "tok", SCOPE, SyncOptions::default(), true, &mut AlwaysYes).unwrap();
        assert_eq!(report.total, 3);
        assert_eq!(report.staged, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(api.count("sync"), 1);
    }

    #[test]
    fn batch_never_stages_converged_cells() {
        let api = FakePlatform {
            cells: vec![testing::cell("hc-1"), testing::cell("hc-2")],
            ..Default::default()
        };
        let report =
            sync_all(&api, "tok", SCOPE, SyncOptions::default(), false, &mut AlwaysYes).unwrap();
        assert_eq!(report.staged, 0);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.cells.len(), 2);
        assert_eq!(api.count("check_drift"), 2);
        assert_eq!(api.count("sync"), 0);
    }

    #[test]
    fn batch_drift_only_lists_only_drifted_cells() {
        let mut api = FakePlatform {
            cells: vec![testing::cell("hc-1"), testing::cell("hc-2")],
            ..Default::default()
        };
        api.drift.insert("hc-2".into(), testing::drifted(1));
        let report =
            sync_all(&api, "tok", SCOPE, SyncOptions::default(), true, &mut AlwaysYes).unwrap();
        assert_eq!(report.total, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.cells.len(), 1);
        assert_eq!(report.cells[0].deployment_cell_id, "hc-2");
        assert_eq!(api.count("sync"), 1);
    }

    #[test]
    fn batch_prompts_per_cell() {
        let mut api = FakePlatform {
            cells: vec![testing::cell("hc-1"), testing::cell("hc-2")],
            ..Default::default()
        };
        api.drift.insert("hc-1".into(), testing::drifted(1));
        api.drift.insert("hc-2".into(), testing::drifted(1));
        let opts = SyncOptions {
            confirm: true,
            ..Default::default()
        };
        let mut answers = vec![true, false].into_iter();
        let mut scripted = |_: &str| answers.next().unwrap_or(false);
        let report = sync_all(&api, "tok", SCOPE, opts, true, &mut scripted).unwrap();
        assert_eq!(report.staged, 1);
        assert_eq!(report.declined, 1);
    }
}
