//! sls-rosetta - scaffold serverless function examples

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rosetta_core::catalog::provision_catalog;
use rosetta_core::{CatalogSource, Interrupt, USER_AGENT};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "sls-rosetta")]
#[command(about = "Clone a serverless function example with the deploy tooling you choose")]
#[command(version)]
pub struct Args {
    /// Catalog file to use instead of the published one
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a local copy of the catalog for editing
    #[command(visible_aliases = ["i", "initialize"])]
    Init(InitArgs),
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Where to write the catalog
    #[arg(short, long, default_value = "sls-rosetta.yaml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

async fn init(config: Option<&Path>, args: InitArgs) -> Result<()> {
    let source = CatalogSource::resolve(config)?;
    let client = reqwest_client()?;

    println!(
        "{}",
        format!("Writing catalog from {}...", source).cyan().bold()
    );

    let catalog = provision_catalog(&source, &client, &args.output, args.force)
        .await
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    let examples: usize = catalog.examples.values().map(Vec::len).sum();
    println!(
        "  {} {} ({} languages, {} examples)",
        "done".green(),
        args.output.display(),
        catalog.languages.len(),
        examples
    );
    println!();
    println!(
        "Run {} to use it",
        format!("sls-rosetta --config {}", args.output.display()).bold()
    );

    Ok(())
}

fn reqwest_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("failed to build HTTP client")
}

#[tokio::main]
async fn main() {
    // Ensure the terminal is usable again before the panic message prints
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        rosetta_core::tui::restore_terminal();
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // A running clone stops at its next entry and removes what it wrote;
    // anywhere else Ctrl+C is a user cancel
    let interrupt = Arc::new(Interrupt::default());
    let handler_interrupt = Arc::clone(&interrupt);
    ctrlc::set_handler(move || {
        if handler_interrupt.request() {
            return;
        }
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(0);
    })
    .ok();

    let args = Args::parse();

    let result = match args.command {
        Some(Command::Init(init_args)) => init(args.config.as_deref(), init_args).await,
        None => {
            let result = rosetta_core::run(args.config.as_deref(), interrupt).await;

            // Ensure cursor is visible on normal exit
            let _ = console::Term::stderr().show_cursor();

            result
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
