use anyhow::{Context, Result};
use clap::Subcommand;
use ghas_lab_core::{config::split_list, participants, templates, LabSpec};
use ghas_lab_engine::{create_lab_environment, destroy_lab_environment, LabContext};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{report_run, GlobalArgs};

#[derive(Subcommand, Debug)]
pub enum LabSubcommand {
    /// Create one organization per participant, populated from template repositories
    Create {
        /// Date identifying the lab (e.g. 2024-06-15)
        #[arg(long)]
        lab_date: String,
        /// Participant list (.txt, .yaml, .yml or .json)
        #[arg(long)]
        users_file: PathBuf,
        /// Template repositories file (JSON)
        #[arg(long)]
        template_repos: PathBuf,
        /// Facilitator usernames, comma-separated; added as admins of every org
        #[arg(long, default_value = "")]
        facilitators: String,
    },
    /// Delete the organization of every participant
    Delete {
        /// Date identifying the lab
        #[arg(long)]
        lab_date: String,
        /// Participant list (.txt, .yaml, .yml or .json)
        #[arg(long)]
        users_file: PathBuf,
    },
}

pub async fn run(
    global: &GlobalArgs,
    subcommand: LabSubcommand,
    cancel: CancellationToken,
) -> Result<()> {
    match subcommand {
        LabSubcommand::Create {
            lab_date,
            users_file,
            template_repos,
            facilitators,
        } => {
            let lab = LabSpec::new(lab_date, split_list(&facilitators))?;
            let users = participants::load(&users_file).with_context(|| {
                format!("failed to load participants from {}", users_file.display())
            })?;
            let templates = templates::load(&template_repos).with_context(|| {
                format!("failed to load template repositories from {}", template_repos.display())
            })?;
            let slug = global.enterprise_slug()?.to_owned();
            let (api, rotator) = global.rotating_client()?;

            info!(
                participants = users.len(),
                templates = templates.len(),
                tokens = rotator.len(),
                "lab create requested"
            );
            let ctx = LabContext::new(api, slug, lab).with_options(global.run_options(cancel));
            report_run(
                create_lab_environment(&ctx, rotator, users, templates).await,
                global.json,
            )
        }
        LabSubcommand::Delete {
            lab_date,
            users_file,
        } => {
            let lab = LabSpec::new(lab_date, Vec::new())?;
            let users = participants::load(&users_file).with_context(|| {
                format!("failed to load participants from {}", users_file.display())
            })?;
            let api = global.static_client()?;
            let slug = global.enterprise_slug()?.to_owned();

            info!(participants = users.len(), "lab delete requested");
            let ctx = LabContext::new(api, slug, lab).with_options(global.run_options(cancel));
            report_run(destroy_lab_environment(&ctx, users).await, global.json)
        }
    }
}
