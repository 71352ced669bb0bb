//! Writing a local copy of the catalog (`sls-rosetta init`)

use super::model::Catalog;
use super::source::CatalogSource;
use crate::error::RosettaError;
use std::path::Path;
use tokio::fs;

/// Copy the catalog document from `source` into `output`
///
/// The document is validated before anything is written and is stored
/// verbatim so comments and ordering survive for hand editing.
pub async fn provision_catalog(
    source: &CatalogSource,
    client: &reqwest::Client,
    output: &Path,
    force: bool,
) -> Result<Catalog, RosettaError> {
    if !force && fs::symlink_metadata(output).await.is_ok() {
        return Err(RosettaError::Validation(format!(
            "{} already exists (use --force to overwrite)",
            output.display()
        )));
    }

    let content = source.read(client).await?;
    let catalog = Catalog::from_yaml(&content)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| RosettaError::io(parent, e))?;
    }
    fs::write(output, content.as_bytes())
        .await
        .map_err(|e| RosettaError::io(output, e))?;

    Ok(catalog)
}
