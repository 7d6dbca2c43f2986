use crate::api::PlatformApi;
use crate::confirm::Confirm;
use crate::error::Result;
use crate::status::AmenitiesStatus;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ApplyOutcome {
    /// Nothing staged; no apply request was sent.
    NothingPending { status: AmenitiesStatus },
    /// The operator declined; changes remain staged.
    Declined { status: AmenitiesStatus },
    /// Changes were promoted. `status` is re-fetched after the apply.
    Applied {
        applied: usize,
        status: AmenitiesStatus,
    },
}

impl ApplyOutcome {
    /// The last amenities status fetched from the platform.
    pub fn status(&self) -> &AmenitiesStatus {
        match self {
            ApplyOutcome::NothingPending { status }
            | ApplyOutcome::Declined { status }
            | ApplyOutcome::Applied { status, .. } => status,
        }
    }
}

/// Promote the staged changes of `cell_id` into its live configuration.
///
/// Unless `force` is set, `confirm` is asked first. Any request error aborts;
/// the staged changes stay on the platform and can be inspected with `status`.
pub fn apply_pending_changes(
    api: &dyn PlatformApi,
    token: &str,
    service_id: &str,
    cell_id: &str,
    force: bool,
    confirm: &mut dyn Confirm,
) -> Result<ApplyOutcome> {
    let before = api.get_deployment_cell_amenities_status(token, cell_id)?;
    if !before.has_pending_changes {
        return Ok(ApplyOutcome::NothingPending { status: before });
    }

    let applied = before.pending_changes.len();
    if !force {
        let prompt = format!(
            "Apply {applied} pending change(s) to deployment cell '{cell_id}'? This updates the live configuration."
        );
        if !confirm.confirm(&prompt) {
            return Ok(ApplyOutcome::Declined { status: before });
        }
    }

    api.apply_pending_changes_to_deployment_cell(token, service_id, cell_id)?;
    info!(cell = cell_id, service = service_id, applied, "pending changes applied");

    let status = api.get_deployment_cell_amenities_status(token, cell_id)?;
    Ok(ApplyOutcome::Applied { applied, status })
}
