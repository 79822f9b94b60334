mod cmd;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cmd::{lab::LabSubcommand, orgs::OrgsSubcommand, repo::RepoSubcommand, GlobalArgs};
use tokio_util::sync::CancellationToken;
use tracing::warn;

#[derive(Parser)]
#[command(
    name = "ghas-lab-builder",
    about = "Provisions and tears down GitHub Advanced Security lab environments",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision or tear down a whole lab
    Lab {
        #[command(subcommand)]
        subcommand: LabSubcommand,
    },

    /// Manage repositories inside one organization
    Repo {
        #[command(subcommand)]
        subcommand: RepoSubcommand,
    },

    /// Manage the organization of a single participant
    Orgs {
        #[command(subcommand)]
        subcommand: OrgsSubcommand,
    },
}

impl Commands {
    /// Name used for the per-run log file.
    fn log_name(&self) -> &'static str {
        match self {
            Commands::Lab { subcommand: LabSubcommand::Create { .. } } => "lab-create",
            Commands::Lab { subcommand: LabSubcommand::Delete { .. } } => "lab-delete",
            Commands::Repo { subcommand: RepoSubcommand::Create { .. } } => "repo-create",
            Commands::Repo { subcommand: RepoSubcommand::Delete { .. } } => "repo-delete",
            Commands::Orgs { subcommand: OrgsSubcommand::Create { .. } } => "orgs-create",
            Commands::Orgs { subcommand: OrgsSubcommand::Delete { .. } } => "orgs-delete",
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let log_file = logging::init(
        cli.global.log_format,
        cli.global.log_dir.as_deref(),
        cli.command.log_name(),
    )?;
    if let Some(path) = log_file {
        tracing::info!(path = %path.display(), "writing log file");
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(dispatch(cli))
}

async fn dispatch(cli: Cli) -> Result<()> {
    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling run");
            interrupt.cancel();
        }
    });

    let global = cli.global;
    match cli.command {
        Commands::Lab { subcommand } => cmd::lab::run(&global, subcommand, cancel).await,
        Commands::Repo { subcommand } => tokio::select! {
            result = cmd::repo::run(&global, subcommand) => result,
            _ = cancel.cancelled() => {
                anyhow::bail!("interrupted before the repository batch finished")
            }
        },
        Commands::Orgs { subcommand } => cmd::orgs::run(&global, subcommand, cancel).await,
    }
}
