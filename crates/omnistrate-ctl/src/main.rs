mod cmd;
mod output;
mod prompt;
mod render;

use clap::{Parser, Subcommand};
use cmd::deployment_cell::DeploymentCellSubcommand;
use colored::Colorize;

#[derive(Parser)]
#[command(
    name = "omnistrate-ctl",
    about = "Omnistrate CLI: inspect and converge deployment cell amenities",
    version,
    propagate_version = true
)]
struct Cli {
    /// Platform API base URL (default: the value in the config file)
    #[arg(long, global = true, env = "OMNISTRATE_API_URL")]
    api_url: Option<String>,

    /// Log state-changing calls
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and cache the access token
    Login {
        #[arg(long)]
        email: String,

        /// Password (prompted if neither this nor --password-stdin is given)
        #[arg(long, conflicts_with = "password_stdin")]
        password: Option<String>,

        /// Read the password from stdin
        #[arg(long)]
        password_stdin: bool,
    },

    /// Remove the cached access token
    Logout,

    /// Manage deployment cells and their amenities
    #[command(name = "deployment-cell", visible_alias = "dc")]
    DeploymentCell {
        #[command(subcommand)]
        subcommand: DeploymentCellSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = cmd::Context::load(cli.api_url.as_deref()).and_then(|ctx| match cli.command {
        Commands::Login {
            email,
            password,
            password_stdin,
        } => cmd::auth::login(ctx, &email, password, password_stdin),
        Commands::Logout => cmd::auth::logout(ctx),
        Commands::DeploymentCell { subcommand } => cmd::deployment_cell::run(&ctx, subcommand),
    });

    if let Err(e) = result {
        eprintln!("{} {e:#}", "Error:".red().bold());
        std::process::exit(1);
    }
}
