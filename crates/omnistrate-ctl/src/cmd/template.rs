use super::Context;
use crate::output::{print_json, print_yaml, OutputFormat};
use crate::render;
use anyhow::Context as _;
use clap::Args;
use colored::Colorize;
use omnistrate_core::amenity::DeploymentCellTemplate;
use omnistrate_core::api::PlatformApi;
use omnistrate_core::template::{
    plan_update, resolve_template, update_template, TemplateTarget, UpdateSource,
};
use omnistrate_core::types::CloudProvider;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Argument types
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct DescribeTemplateArgs {
    /// Environment type of the organization template (e.g. PROD)
    #[arg(long, short = 'e')]
    environment: Option<String>,

    /// Cloud provider of the organization template: aws, gcp or azure
    #[arg(long)]
    cloud: Option<CloudProvider>,

    /// Deployment cell id, instead of an organization template
    #[arg(long)]
    id: Option<String>,

    #[arg(long, short = 'o', value_enum, default_value = "yaml")]
    output: OutputFormat,
}

#[derive(Args)]
pub struct GenerateTemplateArgs {
    /// Cloud provider: aws, gcp or azure
    #[arg(long)]
    cloud: CloudProvider,

    /// Environment type
    #[arg(long, short = 'e', default_value = "PROD")]
    environment: String,

    /// Write to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
pub struct UpdateTemplateArgs {
    /// Environment type of the organization template
    #[arg(long, short = 'e')]
    environment: Option<String>,

    /// Cloud provider of the organization template
    #[arg(long)]
    cloud: Option<CloudProvider>,

    /// Template YAML file to upload
    #[arg(long, short = 'f')]
    file: Option<PathBuf>,

    /// Deployment cell id, instead of an organization template
    #[arg(long)]
    id: Option<String>,

    /// Stage the organization template on the deployment cell
    #[arg(long)]
    sync_with_template: bool,
}

// ---------------------------------------------------------------------------
// describe-config-template
// ---------------------------------------------------------------------------

pub fn describe(ctx: &Context, args: DescribeTemplateArgs) -> anyhow::Result<()> {
    let target =
        TemplateTarget::from_args(args.id.as_deref(), args.environment.as_deref(), args.cloud)?;
    let token = ctx.token()?;
    let api = ctx.platform()?;
    let template = resolve_template(&api, &token, &target)
        .with_context(|| format!("failed to resolve {}", target.describe()))?;

    match args.output {
        OutputFormat::Yaml => print!("{}", template.to_yaml()?),
        OutputFormat::Json => print_json(&template)?,
        OutputFormat::Table => render::template_table(&template)?,
        OutputFormat::Text => {
            let title = capitalize(&target.describe());
            render::template_text(&title, &template);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// generate-config-template
// ---------------------------------------------------------------------------

pub fn generate(ctx: &Context, args: GenerateTemplateArgs) -> anyhow::Result<()> {
    let token = ctx.token()?;
    let api = ctx.platform()?;
    let template = api
        .get_organization_deployment_cell_template(&token, &args.environment, args.cloud)
        .with_context(|| {
            format!(
                "failed to fetch the {} template for {}",
                args.cloud, args.environment
            )
        })?;

    match &args.output {
        Some(path) => {
            template
                .save(path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!(
                "✅ {}",
                format!(
                    "Wrote {} managed and {} custom amenities to {}",
                    template.managed_amenities.len(),
                    template.custom_amenities.len(),
                    path.display()
                )
                .green()
            );
            println!(
                "💡 Edit the file, then run 'omnistrate-ctl deployment-cell update-config-template -e {} --cloud {} -f {}'",
                args.environment,
                args.cloud,
                path.display()
            );
            Ok(())
        }
        None => print_yaml(&template),
    }
}

// ---------------------------------------------------------------------------
// update-config-template
// ---------------------------------------------------------------------------

pub fn update(ctx: &Context, args: UpdateTemplateArgs) -> anyhow::Result<()> {
    let (target, source) = plan_update(
        args.id.as_deref(),
        args.environment.as_deref(),
        args.cloud,
        args.file.as_deref(),
        args.sync_with_template,
    )?;

    let template = match &source {
        UpdateSource::File(path) => Some(
            DeploymentCellTemplate::load(path)
                .with_context(|| format!("failed to read template {}", path.display()))?,
        ),
        UpdateSource::OrganizationTemplate => None,
    };

    let token = ctx.token()?;
    let api = ctx.platform()?;

    match (&target, template) {
        (_, Some(template)) => {
            update_template(&api, &token, &target, &template)
                .with_context(|| format!("failed to update {}", target.describe()))?;
            println!(
                "✅ {}",
                format!(
                    "Updated {} ({} managed, {} custom amenities)",
                    target.describe(),
                    template.managed_amenities.len(),
                    template.custom_amenities.len()
                )
                .green()
            );
        }
        (TemplateTarget::Cell { id }, None) => {
            api.update_host_cluster_with_template(&token, id)
                .with_context(|| format!("failed to stage the organization template on '{id}'"))?;
            println!(
                "✅ {}",
                format!("Staged the organization template on deployment cell '{id}'").green()
            );
        }
        (TemplateTarget::Organization { .. }, None) => {
            anyhow::bail!("no template file given for {}", target.describe())
        }
    }

    if let TemplateTarget::Cell { id } = &target {
        println!(
            "💡 Run 'omnistrate-ctl deployment-cell amenities status -i {id} --detailed' to review the pending changes"
        );
    }
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
