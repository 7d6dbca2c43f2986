use super::Context;
use crate::output::{print_json, print_rows, print_structured, print_yaml, OutputFormat};
use crate::prompt::TerminalPrompt;
use crate::render::{self, StatusRow};
use anyhow::Context as _;
use clap::{Args, Subcommand};
use omnistrate_core::api::PlatformApi;
use omnistrate_core::drift::{check_drift, check_drift_all, CellSelection, DriftScope};
use omnistrate_core::sync::{sync_all, sync_cell, SyncOptions, SyncOutcome};
use serde::Serialize;
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum AmenitiesSubcommand {
    /// Compare deployment cells with their organization template
    CheckDrift {
        #[command(flatten)]
        target: CellTarget,

        /// Print counts only, without the per-item breakdown
        #[arg(long)]
        summary: bool,

        #[arg(long, short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Stage pending changes that bring deployment cells back to their template
    Sync {
        #[command(flatten)]
        target: CellTarget,

        /// With --all, list only cells that show drift
        #[arg(long, requires = "all")]
        drift_only: bool,

        /// Ask before staging each cell
        #[arg(long)]
        confirm: bool,

        /// Show what would be staged without staging it
        #[arg(long)]
        dry_run: bool,

        #[arg(long, short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Show the amenities status of one or more deployment cells
    Status {
        /// Deployment cell id(s), comma separated
        #[arg(long, short = 'i', required = true, value_delimiter = ',')]
        id: Vec<String>,

        /// Include drift items and pending changes
        #[arg(long)]
        detailed: bool,

        /// Include the current and target configuration
        #[arg(long)]
        show_config: bool,

        #[arg(long, short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },
}

/// Cell selection and drift scope shared by `check-drift` and `sync`.
#[derive(Args)]
pub struct CellTarget {
    /// Deployment cell id
    #[arg(long, short = 'i')]
    id: Option<String>,

    /// Every deployment cell of the organization
    #[arg(long)]
    all: bool,

    /// Organization id
    #[arg(long, short = 'z')]
    organization_id: String,

    /// Environment whose template the cells are compared with
    #[arg(long, short = 'e')]
    environment: String,
}

impl CellTarget {
    fn selection(&self) -> anyhow::Result<CellSelection> {
        Ok(CellSelection::from_args(self.id.as_deref(), self.all)?)
    }

    fn scope(&self) -> DriftScope<'_> {
        DriftScope {
            organization_id: &self.organization_id,
            environment: &self.environment,
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(ctx: &Context, subcmd: AmenitiesSubcommand) -> anyhow::Result<()> {
    match subcmd {
        AmenitiesSubcommand::CheckDrift {
            target,
            summary,
            output,
        } => run_check_drift(ctx, &target, summary, output),
        AmenitiesSubcommand::Sync {
            target,
            drift_only,
            confirm,
            dry_run,
            output,
        } => {
            let options = SyncOptions { dry_run, confirm };
            run_sync(ctx, &target, options, drift_only, output)
        }
        AmenitiesSubcommand::Status {
            id,
            detailed,
            show_config,
            output,
        } => run_status(ctx, &id, detailed, show_config, output),
    }
}

// ---------------------------------------------------------------------------
// check-drift
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DriftSummaryRow<'a> {
    deployment_cell_id: &'a str,
    drift: &'static str,
    missing: usize,
    different: usize,
    extra: usize,
    error: &'a str,
}

fn run_check_drift(
    ctx: &Context,
    target: &CellTarget,
    summary: bool,
    output: OutputFormat,
) -> anyhow::Result<()> {
    let selection = target.selection()?;
    let scope = target.scope();
    let token = ctx.token()?;
    let api = ctx.platform()?;

    match selection {
        CellSelection::One(id) => {
            let drift = check_drift(&api, &token, &id, scope)
                .with_context(|| format!("failed to check drift for deployment cell '{id}'"))?;
            match output {
                OutputFormat::Json => print_json(&drift)?,
                OutputFormat::Yaml => print_yaml(&drift)?,
                OutputFormat::Table => render::drift_table(&drift)?,
                OutputFormat::Text => {
                    render::drift_text(&id, &drift, summary);
                    if drift.has_configuration_drift {
                        render::sync_hint(&id, scope);
                    }
                }
            }
            Ok(())
        }
        CellSelection::All => {
            let report = check_drift_all(&api, &token, scope)
                .context("failed to check drift across deployment cells")?;
            match output {
                OutputFormat::Json => print_json(&report)?,
                OutputFormat::Yaml => print_yaml(&report)?,
                OutputFormat::Table => {
                    let rows: Vec<DriftSummaryRow> = report
                        .cells
                        .iter()
                        .map(|c| {
                            let counts = c.drift.as_ref().map(|d| d.counts()).unwrap_or_default();
                            DriftSummaryRow {
                                deployment_cell_id: &c.deployment_cell_id,
                                drift: match (&c.drift, c.has_drift()) {
                                    (None, _) => "error",
                                    (Some(_), true) => "detected",
                                    (Some(_), false) => "none",
                                },
                                missing: counts.missing,
                                different: counts.different,
                                extra: counts.extra,
                                error: c.error.as_deref().unwrap_or("-"),
                            }
                        })
                        .collect();
                    if rows.is_empty() {
                        println!("No deployment cells.");
                    } else {
                        print_rows(&rows)?;
                    }
                }
                OutputFormat::Text => {
                    render::drift_report_text(&report, summary);
                    if report.drifted > 0 {
                        println!(
                            "💡 Run 'omnistrate-ctl deployment-cell amenities sync --all --drift-only -z {} -e {}' to stage the changes",
                            scope.organization_id, scope.environment
                        );
                    }
                }
            }
            if report.total > 0 && report.failed == report.total {
                anyhow::bail!("drift check failed for all {} deployment cell(s)", report.total);
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// sync
// ---------------------------------------------------------------------------

fn run_sync(
    ctx: &Context,
    target: &CellTarget,
    options: SyncOptions,
    drift_only: bool,
    output: OutputFormat,
) -> anyhow::Result<()> {
    let selection = target.selection()?;
    let scope = target.scope();
    let token = ctx.token()?;
    let api = ctx.platform()?;
    let mut prompt = TerminalPrompt::stdin();

    match selection {
        CellSelection::One(id) => {
            let outcome = sync_cell(&api, &token, &id, scope, options, &mut prompt)
                .with_context(|| format!("failed to sync deployment cell '{id}'"))?;
            match output {
                OutputFormat::Json | OutputFormat::Yaml => match &outcome {
                    SyncOutcome::Staged { status, .. } => print_structured(output, status)?,
                    other => print_structured(output, other.drift())?,
                },
                OutputFormat::Table => render::drift_table(outcome.drift())?,
                OutputFormat::Text => render::sync_outcome_text(&id, &outcome),
            }
            Ok(())
        }
        CellSelection::All => {
            let report = sync_all(&api, &token, scope, options, drift_only, &mut prompt)
                .context("failed to sync deployment cells")?;
            match output {
                OutputFormat::Json => print_json(&report)?,
                OutputFormat::Yaml => print_yaml(&report)?,
                OutputFormat::Table | OutputFormat::Text => render::sync_report_text(&report),
            }
            if report.total > 0 && report.failed == report.total {
                anyhow::bail!("sync failed for all {} deployment cell(s)", report.total);
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// status
// ---------------------------------------------------------------------------

fn run_status(
    ctx: &Context,
    ids: &[String],
    detailed: bool,
    show_config: bool,
    output: OutputFormat,
) -> anyhow::Result<()> {
    let ids: Vec<&str> = ids.iter().map(|s| s.trim()).filter(|s| !s.is_empty()).collect();
    if ids.is_empty() {
        anyhow::bail!("at least one deployment cell id is required");
    }
    let token = ctx.token()?;
    let api = ctx.platform()?;

    let mut statuses = Vec::with_capacity(ids.len());
    for id in &ids {
        let status = api
            .get_deployment_cell_amenities_status(&token, id)
            .with_context(|| format!("failed to get amenities status for deployment cell '{id}'"))?;
        statuses.push((*id, status));
    }

    match output {
        OutputFormat::Json | OutputFormat::Yaml => {
            let value = match statuses.as_slice() {
                [(_, only)] => serde_json::to_value(only)?,
                _ => {
                    let mut map = Map::new();
                    for (id, s) in &statuses {
                        map.insert((*id).to_string(), serde_json::to_value(s)?);
                    }
                    Value::Object(map)
                }
            };
            print_structured(output, &value)
        }
        OutputFormat::Table => {
            let rows: Vec<StatusRow> = statuses.iter().map(|(id, s)| StatusRow::new(id, s)).collect();
            print_rows(&rows)?;
            if detailed {
                for (id, s) in &statuses {
                    if !s.pending_changes.is_empty() {
                        println!();
                        println!("Pending changes on {id}:");
                        render::pending_table(&s.pending_changes)?;
                    }
                }
            }
            Ok(())
        }
        OutputFormat::Text => {
            for (i, (id, s)) in statuses.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                render::status_text(id, s, detailed, show_config);
            }
            Ok(())
        }
    }
}
