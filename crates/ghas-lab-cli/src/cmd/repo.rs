use anyhow::{Context, Result};
use clap::Subcommand;
use ghas_lab_core::templates;
use ghas_lab_engine::{create_repos_in_org, delete_repos_in_org};
use std::path::PathBuf;

use super::GlobalArgs;
use crate::output;

#[derive(Subcommand, Debug)]
pub enum RepoSubcommand {
    /// Generate repositories from templates inside an existing organization
    Create {
        /// Target organization
        #[arg(long)]
        org: String,
        /// Template repositories file (JSON)
        #[arg(long)]
        repos: PathBuf,
    },
    /// Delete repositories from an organization
    Delete {
        /// Target organization
        #[arg(long)]
        org: String,
        /// Template-format file naming the repositories to delete; omit to delete all
        #[arg(long)]
        repos: Option<PathBuf>,
    },
}

pub async fn run(global: &GlobalArgs, subcommand: RepoSubcommand) -> Result<()> {
    match subcommand {
        RepoSubcommand::Create { org, repos } => {
            let templates = templates::load(&repos).with_context(|| {
                format!("failed to load template repositories from {}", repos.display())
            })?;
            let api = global.static_client()?;

            let summary = create_repos_in_org(api.as_ref(), &org, &templates).await?;
            output::print_repo_summary(&summary, global.json)
        }
        RepoSubcommand::Delete { org, repos } => {
            let names = match repos {
                Some(path) => templates::load_repo_names(&path).with_context(|| {
                    format!("failed to load repository names from {}", path.display())
                })?,
                None => Vec::new(),
            };
            let api = global.static_client()?;

            let summary = delete_repos_in_org(api.as_ref(), &org, names).await?;
            output::print_repo_summary(&summary, global.json)
        }
    }
}
