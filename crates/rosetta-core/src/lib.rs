//! Rosetta Core - catalog, repository cloning and the selection wizard
//!
//! The crate backs the `sls-rosetta` CLI, which walks a user through picking a
//! language, an example and a deploy method, then mirrors the matching example
//! directory from a hosted repository into a fresh local directory.
//!
//! # Architecture
//!
//! - **Catalog** - the parsed document listing languages, examples and deploy options
//! - **Repo** - directory listing, exclusion filtering and the recursive cloner
//! - **Wizard** - the headless selection state machine and its list/text widgets
//! - **TUI** - the ratatui front end and cliclack reporting (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the terminal wizard
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use rosetta_core::{Catalog, CloneRequest, Cloner, ExclusionSet, GithubHost};
//!
//! let catalog = Catalog::from_yaml(&std::fs::read_to_string("examples.yaml")?)?;
//! let host = GithubHost::from_env(rosetta_core::USER_AGENT)?;
//! let request = CloneRequest {
//!     repo: catalog.repo.clone(),
//!     root: Catalog::example_root("go", "hello"),
//!     destination: "hello".into(),
//!     exclusions: ExclusionSet::new(["tf/*"])?,
//! };
//! let report = Cloner::new(&host, request).run().await?;
//! ```

pub mod catalog;
pub mod error;
pub mod repo;
pub mod wizard;

#[cfg(feature = "tui")]
pub mod tui;

#[cfg(test)]
mod test_support;

// Re-export main types for convenience
pub use catalog::{Catalog, CatalogSource, DeployOption, DeployType, Example, Language};
pub use error::RosettaError;
pub use repo::{
    CloneReport, CloneRequest, Cloner, ExclusionSet, GithubHost, Interrupt, RemoteFile,
    RepositoryHost,
};
pub use wizard::{Stage, Transition, Wizard, WizardEvent};

#[cfg(feature = "tui")]
pub use tui::run;

/// User agent sent with every request; the hosting API rejects anonymous agents
pub const USER_AGENT: &str = concat!("sls-rosetta/", env!("CARGO_PKG_VERSION"));
