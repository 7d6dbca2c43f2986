use super::amenities::AmenitiesSubcommand;
use super::apply::ApplyArgs;
use super::template::{DescribeTemplateArgs, GenerateTemplateArgs, UpdateTemplateArgs};
use super::Context;
use crate::output::{print_json, print_rows, print_yaml, OutputFormat};
use crate::render;
use anyhow::Context as _;
use clap::Subcommand;
use colored::Colorize;
use omnistrate_core::api::PlatformApi;
use omnistrate_core::cell::DeploymentCell;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum DeploymentCellSubcommand {
    /// List the deployment cells of the organization
    List {
        #[arg(long, short = 'o', value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Show one deployment cell
    Describe {
        id: String,
        #[arg(long, short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Detect, stage and inspect amenity configuration drift
    Amenities {
        #[command(subcommand)]
        subcommand: AmenitiesSubcommand,
    },

    /// Promote staged amenity changes into the live configuration
    ApplyPendingChanges(ApplyArgs),

    /// Show an organization or deployment cell amenities template
    DescribeConfigTemplate(DescribeTemplateArgs),

    /// Write the organization template for a cloud provider as YAML
    GenerateConfigTemplate(GenerateTemplateArgs),

    /// Replace an organization template or stage a new template on a cell
    UpdateConfigTemplate(UpdateTemplateArgs),
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(ctx: &Context, subcmd: DeploymentCellSubcommand) -> anyhow::Result<()> {
    match subcmd {
        DeploymentCellSubcommand::List { output } => list(ctx, output),
        DeploymentCellSubcommand::Describe { id, output } => describe(ctx, &id, output),
        DeploymentCellSubcommand::Amenities { subcommand } => {
            super::amenities::run(ctx, subcommand)
        }
        DeploymentCellSubcommand::ApplyPendingChanges(args) => super::apply::run(ctx, args),
        DeploymentCellSubcommand::DescribeConfigTemplate(args) => {
            super::template::describe(ctx, args)
        }
        DeploymentCellSubcommand::GenerateConfigTemplate(args) => {
            super::template::generate(ctx, args)
        }
        DeploymentCellSubcommand::UpdateConfigTemplate(args) => super::template::update(ctx, args),
    }
}

// ---------------------------------------------------------------------------
// list / describe
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CellRow<'a> {
    id: &'a str,
    cloud_provider: &'a str,
    region: &'a str,
    status: &'a str,
    amenities: usize,
}

impl<'a> From<&'a DeploymentCell> for CellRow<'a> {
    fn from(c: &'a DeploymentCell) -> Self {
        Self {
            id: &c.id,
            cloud_provider: c.cloud_provider.as_deref().unwrap_or("-"),
            region: c.region.as_deref().unwrap_or("-"),
            status: c.status.as_deref().unwrap_or("-"),
            amenities: c.amenities.len(),
        }
    }
}

fn list(ctx: &Context, output: OutputFormat) -> anyhow::Result<()> {
    let token = ctx.token()?;
    let api = ctx.platform()?;
    let cells = api
        .list_host_clusters(&token)
        .context("failed to list deployment cells")?;

    match output {
        OutputFormat::Json => print_json(&cells),
        OutputFormat::Yaml => print_yaml(&cells),
        OutputFormat::Table | OutputFormat::Text => {
            if cells.is_empty() {
                println!("No deployment cells.");
                return Ok(());
            }
            let rows: Vec<CellRow> = cells.iter().map(CellRow::from).collect();
            print_rows(&rows)
        }
    }
}

fn describe(ctx: &Context, id: &str, output: OutputFormat) -> anyhow::Result<()> {
    let token = ctx.token()?;
    let api = ctx.platform()?;
    let cell = api
        .describe_host_cluster(&token, id)
        .with_context(|| format!("failed to describe deployment cell '{id}'"))?;

    match output {
        OutputFormat::Json => print_json(&cell),
        OutputFormat::Yaml => print_yaml(&cell),
        OutputFormat::Table => print_rows(&[CellRow::from(&cell)]),
        OutputFormat::Text => {
            println!("{}", format!("Deployment cell {}", cell.id).bold());
            for (label, value) in [
                ("Cloud provider", &cell.cloud_provider),
                ("Region", &cell.region),
                ("Status", &cell.status),
            ] {
                println!("  {label:<15} {}", value.as_deref().unwrap_or("-"));
            }
            render::template_text("Amenities", &cell.template());
            Ok(())
        }
    }
}
