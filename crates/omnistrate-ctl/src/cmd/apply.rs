use super::Context;
use crate::output::{print_rows, print_structured, OutputFormat};
use crate::prompt::TerminalPrompt;
use crate::render::{self, StatusRow};
use anyhow::Context as _;
use clap::Args;
use omnistrate_core::apply::apply_pending_changes;

#[derive(Args)]
pub struct ApplyArgs {
    /// Deployment cell id
    #[arg(long, short = 'i')]
    id: String,

    /// Service the deployment cell belongs to
    #[arg(long, short = 's')]
    service_id: String,

    /// Apply without asking for confirmation
    #[arg(long)]
    force: bool,

    #[arg(long, short = 'o', value_enum, default_value = "text")]
    output: OutputFormat,
}

pub fn run(ctx: &Context, args: ApplyArgs) -> anyhow::Result<()> {
    let token = ctx.token()?;
    let api = ctx.platform()?;
    let mut prompt = TerminalPrompt::stdin();

    let outcome = apply_pending_changes(
        &api,
        &token,
        &args.service_id,
        &args.id,
        args.force,
        &mut prompt,
    )
    .with_context(|| format!("failed to apply pending changes to deployment cell '{}'", args.id))?;

    match args.output {
        OutputFormat::Json | OutputFormat::Yaml => print_structured(args.output, outcome.status()),
        OutputFormat::Table => print_rows(&[StatusRow::new(&args.id, outcome.status())]),
        OutputFormat::Text => {
            render::apply_outcome_text(&args.id, &outcome);
            Ok(())
        }
    }
}
