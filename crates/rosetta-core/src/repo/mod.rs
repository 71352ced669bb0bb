//! Remote repository access
//!
//! This module provides:
//! - The hosting API seam (`RepositoryHost`) and its GitHub client
//! - Directory listing relative to an example root
//! - Exclusion glob filtering
//! - The recursive cloner

pub mod cloner;
pub mod host;
pub mod listing;

pub use cloner::{CloneReport, CloneRequest, Cloner, Interrupt};
pub use host::{EntryType, GithubHost, RemoteFile, RepositoryHost};
pub use listing::{filter_files, join_path, list_directory, ExclusionSet};
