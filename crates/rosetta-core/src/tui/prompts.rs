//! Session flow: load the catalog, run the wizard, report the clone

use super::app::{run_wizard, WizardOutcome};
use super::theme::Theme;
use crate::catalog::{Catalog, CatalogSource};
use crate::repo::{Cloner, GithubHost, Interrupt, RepositoryHost};
use crate::USER_AGENT;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

/// Run an interactive session against the configured catalog and GitHub
///
/// `interrupt` is the flag the process's Ctrl+C handler requests; it is
/// armed for the duration of the clone.
pub async fn run(config_path: Option<&Path>, interrupt: Arc<Interrupt>) -> Result<()> {
    cliclack::intro("sls-rosetta")?;

    let source = CatalogSource::resolve(config_path)?;
    cliclack::log::info(format!("Using catalog from {}", source))?;

    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("failed to build HTTP client")?;

    let spinner = cliclack::spinner();
    spinner.start("Loading catalog...");
    let catalog = match source.load(&client).await {
        Ok(catalog) => catalog,
        Err(e) => {
            spinner.error("Failed to load catalog");
            return Err(e.into());
        }
    };
    spinner.stop(format!(
        "Catalog loaded: {} languages from {}",
        catalog.languages.len(),
        catalog.repo
    ));

    let host = GithubHost::from_env(USER_AGENT)?;
    run_with(&catalog, &host, Theme::detect(), interrupt).await
}

/// Run the wizard over an already loaded catalog, then clone through `host`
pub async fn run_with<H: RepositoryHost>(
    catalog: &Catalog,
    host: &H,
    theme: Theme,
    interrupt: Arc<Interrupt>,
) -> Result<()> {
    let (request, banner) = match run_wizard(catalog, theme)? {
        WizardOutcome::Cancelled => {
            cliclack::outro_cancel("Cancelled")?;
            return Ok(());
        }
        WizardOutcome::Clone { request, banner } => (request, banner),
    };

    for line in &banner {
        // The wizard's check mark is replaced by cliclack's own
        let line = line.split_once(' ').map_or(line.as_str(), |(_, rest)| rest);
        cliclack::log::success(line)?;
    }
    if !request.exclusions.is_empty() {
        cliclack::log::info(format!(
            "Skipping {}",
            request.exclusions.patterns().join(", ")
        ))?;
    }

    let spinner = cliclack::spinner();
    spinner.start(format!("Cloning {} from {}...", request.root, request.repo));

    let destination = request.destination.clone();
    match Cloner::new(host, request)
        .with_interrupt(interrupt)
        .run()
        .await
    {
        Ok(report) => {
            spinner.stop(format!(
                "Downloaded {} files into {}",
                report.files.len(),
                destination.display()
            ));
            cliclack::outro("Happy coding!")?;
            Ok(())
        }
        Err(e) => {
            spinner.error("Clone failed");
            Err(e).with_context(|| format!("failed to clone into {}", destination.display()))
        }
    }
}
