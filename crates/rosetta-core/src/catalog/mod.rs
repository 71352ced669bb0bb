//! Catalog of languages, examples and deploy options
//!
//! This module provides:
//! - Catalog document types (Catalog, Language, Example, DeployOption)
//! - Loading the catalog from a local file or the published URL
//! - Writing a local copy of the catalog for editing

pub mod model;
pub mod provision;
pub mod source;

pub use model::{Catalog, DeployOption, DeployType, Example, Language};
pub use provision::provision_catalog;
pub use source::{CatalogSource, DEFAULT_CATALOG_URL};
