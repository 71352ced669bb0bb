//! Recursive download of an example directory into a fresh local directory

use super::host::{EntryType, RemoteFile, RepositoryHost};
use super::listing::{filter_files, join_path, list_directory, ExclusionSet};
use crate::error::RosettaError;
use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::fs;

/// Everything the cloner needs, fixed before the first request is made
#[derive(Debug, Clone, PartialEq)]
pub struct CloneRequest {
    /// Repository coordinate, `owner/name`
    pub repo: String,

    /// Example directory inside the repository, e.g. `examples/go/hello`
    pub root: String,

    /// Local directory to create; must not exist yet
    pub destination: PathBuf,

    pub exclusions: ExclusionSet,
}

/// What a finished clone produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloneReport {
    /// Relative paths of the files written, in download order
    pub files: Vec<String>,

    /// Relative paths dropped by the exclusion globs (directories are not descended)
    pub excluded: Vec<String>,
}

/// Ctrl+C request shared between a signal handler and a running clone
///
/// Only armed while `Cloner::run` is in progress; outside of it a request is
/// refused so the handler can fall back to exiting.
#[derive(Debug, Default)]
pub struct Interrupt {
    armed: AtomicBool,
    requested: AtomicBool,
}

impl Interrupt {
    /// Ask the running clone to stop; false when no clone is running
    pub fn request(&self) -> bool {
        if !self.armed.load(Ordering::SeqCst) {
            return false;
        }
        self.requested.store(true, Ordering::SeqCst);
        true
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    fn arm(&self) {
        self.requested.store(false, Ordering::SeqCst);
        self.armed.store(true, Ordering::SeqCst);
    }

    fn disarm(&self) {
        self.armed.store(false, Ordering::SeqCst);
    }
}

/// Mirrors a filtered remote directory tree into the destination
pub struct Cloner<'a, H> {
    host: &'a H,
    request: CloneRequest,
    interrupt: Option<Arc<Interrupt>>,
}

type CloneFuture<'s> = Pin<Box<dyn Future<Output = Result<(), RosettaError>> + 's>>;

impl<'a, H: RepositoryHost> Cloner<'a, H> {
    pub fn new(host: &'a H, request: CloneRequest) -> Self {
        Self {
            host,
            request,
            interrupt: None,
        }
    }

    /// Stop between entries once `interrupt` is requested
    pub fn with_interrupt(mut self, interrupt: Arc<Interrupt>) -> Self {
        self.interrupt = Some(interrupt);
        self
    }

    pub fn request(&self) -> &CloneRequest {
        &self.request
    }

    /// Clone the whole tree
    ///
    /// The first listing or download failure, or an interrupt, aborts the
    /// clone. Every directory the clone created, including missing parents of
    /// the destination, is removed again on failure.
    pub async fn run(&self) -> Result<CloneReport, RosettaError> {
        let destination = &self.request.destination;
        if fs::symlink_metadata(destination).await.is_ok() {
            return Err(RosettaError::Validation(format!(
                "path {} already exists",
                destination.display()
            )));
        }

        let created_root = outermost_missing(destination).await;
        fs::create_dir_all(destination)
            .await
            .map_err(|e| RosettaError::io(destination, e))?;

        if let Some(interrupt) = &self.interrupt {
            interrupt.arm();
        }
        let mut report = CloneReport::default();
        let result = self.clone_dir(String::new(), &mut report).await;
        if let Some(interrupt) = &self.interrupt {
            interrupt.disarm();
        }

        match result {
            Ok(()) => Ok(report),
            Err(e) => {
                let _ = fs::remove_dir_all(&created_root).await;
                Err(e)
            }
        }
    }

    fn check_interrupt(&self) -> Result<(), RosettaError> {
        match &self.interrupt {
            Some(interrupt) if interrupt.is_requested() => Err(RosettaError::Interrupted),
            _ => Ok(()),
        }
    }

    /// List, filter, then recurse into directories and download files
    fn clone_dir<'s>(
        &'s self,
        sub_path: String,
        report: &'s mut CloneReport,
    ) -> CloneFuture<'s> {
        Box::pin(async move {
            self.check_interrupt()?;
            let entries = list_directory(
                self.host,
                &self.request.repo,
                &self.request.root,
                &sub_path,
            )
            .await?;

            let exclusions = &self.request.exclusions;
            report.excluded.extend(
                entries
                    .iter()
                    .filter(|entry| exclusions.excludes(entry))
                    .map(|entry| entry.rel_path.clone()),
            );
            let kept = filter_files(entries, exclusions);

            for entry in kept {
                self.check_interrupt()?;
                match entry.entry_type {
                    EntryType::Dir => {
                        self.clone_dir(join_path(&sub_path, &entry.name), report)
                            .await?;
                    }
                    EntryType::File => {
                        self.download_file(&entry).await?;
                        report.files.push(entry.rel_path);
                    }
                    // Links and submodules have no content to mirror
                    EntryType::Symlink | EntryType::Submodule => {}
                }
            }

            Ok(())
        })
    }

    async fn download_file(&self, entry: &RemoteFile) -> Result<(), RosettaError> {
        let url = entry.download_url.as_deref().ok_or_else(|| {
            RosettaError::remote(&entry.path, "listing has no download_url for file")
        })?;

        let target_path = self.local_path(&entry.rel_path)?;
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| RosettaError::io(parent, e))?;
        }

        let content = self.host.download(url).await?;
        fs::write(&target_path, &content)
            .await
            .map_err(|e| RosettaError::io(&target_path, e))
    }

    /// Destination root joined with the relative path, one component at a time
    fn local_path(&self, rel_path: &str) -> Result<PathBuf, RosettaError> {
        let mut path = self.request.destination.clone();
        for part in rel_path.split('/').filter(|p| !p.is_empty()) {
            let mut components = Path::new(part).components();
            match (components.next(), components.next()) {
                (Some(Component::Normal(_)), None) => path.push(part),
                _ => {
                    return Err(RosettaError::remote(
                        &self.request.root,
                        format!("refusing to write entry outside destination: {}", rel_path),
                    ))
                }
            }
        }
        Ok(path)
    }
}

/// The outermost ancestor of `path` (or `path` itself) that does not exist yet
async fn outermost_missing(path: &Path) -> PathBuf {
    let mut missing = path.to_path_buf();
    for ancestor in path.ancestors().skip(1) {
        if ancestor.as_os_str().is_empty() || fs::symlink_metadata(ancestor).await.is_ok() {
            break;
        }
        missing = ancestor.to_path_buf();
    }
    missing
}
