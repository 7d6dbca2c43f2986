//! Human-readable projections of platform objects.
//!
//! Nothing here changes what the platform returned; JSON and YAML output
//! bypass this module entirely.

use crate::output::{display_value, print_rows};
use colored::Colorize;
use omnistrate_core::amenity::{Amenity, DeploymentCellTemplate};
use omnistrate_core::apply::ApplyOutcome;
use omnistrate_core::drift::{DriftReport, DriftScope};
use omnistrate_core::status::{AmenitiesStatus, DriftDetail, DriftStatus, PendingChange};
use omnistrate_core::sync::{SyncOutcome, SyncReport};
use omnistrate_core::types::{ChangeOperation, DriftType, StatusKind};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Table rows
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmenityRow<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    amenity_type: &'a str,
    managed: bool,
    description: &'a str,
    properties: usize,
}

impl<'a> From<&'a Amenity> for AmenityRow<'a> {
    fn from(a: &'a Amenity) -> Self {
        Self {
            name: &a.name,
            amenity_type: a.amenity_type.as_deref().unwrap_or("-"),
            managed: a.is_managed,
            description: a.description.as_deref().unwrap_or("-"),
            properties: a.properties.len(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRow<'a> {
    deployment_cell_id: &'a str,
    status: &'a str,
    last_check: String,
    drift_items: usize,
    pending_changes: usize,
}

impl<'a> StatusRow<'a> {
    pub fn new(cell_id: &'a str, s: &'a AmenitiesStatus) -> Self {
        Self {
            deployment_cell_id: cell_id,
            status: &s.status,
            last_check: s
                .last_check
                .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_else(|| "-".into()),
            drift_items: s.drift_details.len(),
            pending_changes: s.pending_changes.len(),
        }
    }
}

pub fn template_table(template: &DeploymentCellTemplate) -> anyhow::Result<()> {
    let rows: Vec<AmenityRow> = template
        .managed_amenities
        .iter()
        .chain(template.custom_amenities.iter())
        .map(AmenityRow::from)
        .collect();
    if rows.is_empty() {
        println!("No amenities.");
        return Ok(());
    }
    print_rows(&rows)
}

pub fn drift_table(drift: &DriftStatus) -> anyhow::Result<()> {
    if drift.drift_details.is_empty() {
        println!("No drift.");
        return Ok(());
    }
    print_rows(&drift.drift_details)
}

pub fn pending_table(changes: &[PendingChange]) -> anyhow::Result<()> {
    if changes.is_empty() {
        println!("No pending changes.");
        return Ok(());
    }
    print_rows(changes)
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

pub fn template_text(title: &str, template: &DeploymentCellTemplate) {
    println!("{}", title.bold());
    for (label, list) in [
        ("Managed amenities", &template.managed_amenities),
        ("Custom amenities", &template.custom_amenities),
    ] {
        println!("  {label} ({}):", list.len());
        if list.is_empty() {
            println!("    (none)");
        }
        for a in list {
            let kind = a.amenity_type.as_deref().unwrap_or("unknown type");
            println!("    • {} [{kind}]", a.name);
            if let Some(d) = &a.description {
                println!("        {d}");
            }
            for (k, v) in &a.properties {
                println!("        {k}: {}", display_value(v));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Drift
// ---------------------------------------------------------------------------

fn drift_icon(t: DriftType) -> &'static str {
    match t {
        DriftType::Missing => "❌",
        DriftType::Different => "⚠️ ",
        DriftType::Extra => "➕",
    }
}

fn drift_item(d: &DriftDetail) {
    println!("  {} {:<9} {}", drift_icon(d.drift_type), d.drift_type, d.path);
    match d.drift_type {
        DriftType::Missing => println!("       target:  {}", display_value(&d.target_value)),
        DriftType::Extra => println!("       current: {}", display_value(&d.current_value)),
        DriftType::Different => {
            println!("       current: {}", display_value(&d.current_value));
            println!("       target:  {}", display_value(&d.target_value));
        }
    }
}

pub fn drift_text(cell_id: &str, drift: &DriftStatus, summary: bool) {
    if !drift.has_configuration_drift {
        println!(
            "✅ {}",
            format!("Deployment cell '{cell_id}' is synchronized with its template").green()
        );
        return;
    }

    let c = drift.counts();
    println!(
        "⚠️  {}",
        format!(
            "Configuration drift detected on '{cell_id}': {} item(s) ({} missing, {} different, {} extra)",
            drift.drift_details.len(),
            c.missing,
            c.different,
            c.extra
        )
        .yellow()
    );
    if !summary {
        for d in &drift.drift_details {
            drift_item(d);
        }
    }
}

pub fn sync_hint(cell_id: &str, scope: DriftScope<'_>) {
    println!(
        "💡 Run 'omnistrate-ctl deployment-cell amenities sync -i {cell_id} -z {} -e {}' to stage the changes",
        scope.organization_id, scope.environment
    );
}

pub fn drift_report_text(report: &DriftReport, summary: bool) {
    for cell in &report.cells {
        match (&cell.drift, &cell.error) {
            (Some(d), _) => drift_text(&cell.deployment_cell_id, d, summary),
            (None, Some(e)) => println!(
                "❌ {}",
                format!("Drift check failed for '{}': {e}", cell.deployment_cell_id).red()
            ),
            (None, None) => {}
        }
    }
    println!();
    println!(
        "Checked {} deployment cell(s): {} drifted, {} synchronized, {} failed",
        report.total, report.drifted, report.synchronized, report.failed
    );
}

// ---------------------------------------------------------------------------
// Pending changes / status
// ---------------------------------------------------------------------------

fn operation_icon(op: ChangeOperation) -> &'static str {
    match op {
        ChangeOperation::Add => "➕",
        ChangeOperation::Update => "✏️ ",
        ChangeOperation::Delete => "➖",
    }
}

pub fn pending_text(changes: &[PendingChange]) {
    for ch in changes {
        println!("  {} {:<6} {}", operation_icon(ch.operation), ch.operation, ch.path);
        if let Some(old) = &ch.old_value {
            println!("       old: {}", display_value(old));
        }
        if let Some(new) = &ch.new_value {
            println!("       new: {}", display_value(new));
        }
    }
}

fn status_headline(s: &AmenitiesStatus) -> String {
    match s.kind() {
        StatusKind::Synchronized => format!("✅ {}", s.status.green()),
        StatusKind::DriftDetected => format!("⚠️  {}", s.status.yellow()),
        StatusKind::PendingChanges => format!("⏳ {}", s.status.cyan()),
        StatusKind::Error => format!("❌ {}", s.status.red()),
        StatusKind::Unknown => format!("•  {}", s.status),
    }
}

pub fn status_text(cell_id: &str, s: &AmenitiesStatus, detailed: bool, show_config: bool) {
    println!("{}", format!("Deployment cell {cell_id}").bold());
    println!("  Status:          {}", status_headline(s));
    if let Some(t) = s.last_check {
        println!("  Last check:      {}", t.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    println!(
        "  Drift:           {}",
        if s.has_configuration_drift {
            format!("{} item(s)", s.drift_details.len())
        } else {
            "none".into()
        }
    );
    println!(
        "  Pending changes: {}",
        if s.has_pending_changes {
            format!("{}", s.pending_changes.len())
        } else {
            "none".into()
        }
    );

    if detailed {
        if !s.drift_details.is_empty() {
            println!("  Drift details:");
            for d in &s.drift_details {
                drift_item(d);
            }
        }
        if !s.pending_changes.is_empty() {
            println!("  Pending changes:");
            pending_text(&s.pending_changes);
        }
    }

    if show_config {
        for (label, cfg) in [
            ("Current configuration", &s.current_configuration),
            ("Target configuration", &s.target_configuration),
        ] {
            println!("  {label}:");
            match cfg {
                Some(v) => match serde_json::to_string_pretty(v) {
                    Ok(pretty) => {
                        for line in pretty.lines() {
                            println!("    {line}");
                        }
                    }
                    Err(_) => println!("    {}", display_value(v)),
                },
                None => println!("    (not reported)"),
            }
        }
    }

    if s.has_pending_changes {
        println!(
            "💡 Run 'omnistrate-ctl deployment-cell apply-pending-changes -i {cell_id} -s <service-id>' to apply"
        );
    } else if s.has_configuration_drift {
        println!("💡 Run 'omnistrate-ctl deployment-cell amenities sync -i {cell_id} -z <org-id> -e <environment>' to stage changes");
    }
}

// ---------------------------------------------------------------------------
// Sync
// ---------------------------------------------------------------------------

pub fn sync_outcome_text(cell_id: &str, outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::AlreadySynchronized { .. } => println!(
            "✅ {}",
            format!("Deployment cell '{cell_id}' is already synchronized; nothing to stage").green()
        ),
        SyncOutcome::Preview { drift } => {
            println!(
                "🔍 Dry run: {} change(s) would be staged on '{cell_id}'",
                drift.drift_details.len()
            );
            for d in &drift.drift_details {
                drift_item(d);
            }
        }
        SyncOutcome::Declined { .. } => println!("Sync of '{cell_id}' cancelled; nothing was staged."),
        SyncOutcome::Staged { status, .. } => {
            println!(
                "✅ {}",
                format!(
                    "Staged {} pending change(s) on '{cell_id}'",
                    status.pending_changes.len()
                )
                .green()
            );
            pending_text(&status.pending_changes);
            println!(
                "💡 Run 'omnistrate-ctl deployment-cell apply-pending-changes -i {cell_id} -s <service-id>' to apply"
            );
        }
    }
}

pub fn sync_report_text(report: &SyncReport) {
    for cell in &report.cells {
        match (&cell.outcome, &cell.error) {
            (Some(o), _) => sync_outcome_text(&cell.deployment_cell_id, o),
            (None, Some(e)) => println!(
                "❌ {}",
                format!("Sync failed for '{}': {e}", cell.deployment_cell_id).red()
            ),
            (None, None) => {}
        }
    }
    println!();
    println!(
        "Processed {} deployment cell(s): {} staged, {} skipped, {} declined, {} previewed, {} failed",
        report.total, report.staged, report.skipped, report.declined, report.previewed, report.failed
    );
}

// ---------------------------------------------------------------------------
// Apply
// ---------------------------------------------------------------------------

pub fn apply_outcome_text(cell_id: &str, outcome: &ApplyOutcome) {
    match outcome {
        ApplyOutcome::NothingPending { .. } => {
            println!("✅ No pending changes on '{cell_id}'; nothing to apply.")
        }
        ApplyOutcome::Declined { status } => println!(
            "Apply cancelled; {} change(s) remain staged on '{cell_id}'.",
            status.pending_changes.len()
        ),
        ApplyOutcome::Applied { applied, status } => {
            println!(
                "✅ {}",
                format!("Applied {applied} pending change(s) to '{cell_id}'").green()
            );
            status_text(cell_id, status, false, false);
        }
    }
}
