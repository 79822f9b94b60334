use anyhow::{Context, Result};
use clap::Subcommand;
use ghas_lab_core::{config::split_list, templates, LabSpec};
use ghas_lab_engine::{create_lab_environment, destroy_lab_environment, LabContext};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use super::{report_run, GlobalArgs};

#[derive(Subcommand, Debug)]
pub enum OrgsSubcommand {
    /// Create the lab organization for a single participant
    Create {
        /// Date identifying the lab
        #[arg(long)]
        lab_date: String,
        /// Participant login
        #[arg(long)]
        user: String,
        /// Facilitator usernames, comma-separated
        #[arg(long, default_value = "")]
        facilitators: String,
        /// Template repositories file (JSON) to populate the organization
        #[arg(long)]
        template_repos: Option<PathBuf>,
    },
    /// Delete the lab organization of a single participant
    Delete {
        /// Date identifying the lab
        #[arg(long)]
        lab_date: String,
        /// Participant login
        #[arg(long)]
        user: String,
    },
}

pub async fn run(
    global: &GlobalArgs,
    subcommand: OrgsSubcommand,
    cancel: CancellationToken,
) -> Result<()> {
    match subcommand {
        OrgsSubcommand::Create {
            lab_date,
            user,
            facilitators,
            template_repos,
        } => {
            let lab = LabSpec::new(lab_date, split_list(&facilitators))?;
            let user = participant(&user)?;
            let templates = match template_repos {
                Some(path) => templates::load(&path).with_context(|| {
                    format!("failed to load template repositories from {}", path.display())
                })?,
                None => Vec::new(),
            };
            let slug = global.enterprise_slug()?.to_owned();
            let (api, rotator) = global.rotating_client()?;

            let ctx = LabContext::new(api, slug, lab).with_options(global.run_options(cancel));
            report_run(
                create_lab_environment(&ctx, rotator, vec![user], templates).await,
                global.json,
            )
        }
        OrgsSubcommand::Delete { lab_date, user } => {
            let lab = LabSpec::new(lab_date, Vec::new())?;
            let user = participant(&user)?;
            let api = global.static_client()?;
            let slug = global.enterprise_slug()?.to_owned();

            let ctx = LabContext::new(api, slug, lab).with_options(global.run_options(cancel));
            report_run(destroy_lab_environment(&ctx, vec![user]).await, global.json)
        }
    }
}

fn participant(raw: &str) -> Result<String> {
    let user = raw.trim();
    anyhow::ensure!(!user.is_empty(), "--user must not be empty");
    Ok(user.to_owned())
}
