//! Catalog loading from a local file or a remote URL

use super::model::Catalog;
use crate::error::RosettaError;
use std::path::{Path, PathBuf};
use tokio::fs;
use url::Url;

/// Published catalog on the main branch
pub const DEFAULT_CATALOG_URL: &str =
    "https://raw.githubusercontent.com/nikolaymatrosov/sls-rosetta/main/examples/examples.yaml";

/// Where the catalog document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Remote(Url),
    Local(PathBuf),
}

impl CatalogSource {
    /// Environment variable consulted when `--config` is not given
    pub const CONFIG_PATH_ENV: &'static str = "ROSETTA_CONFIG";

    /// Environment variable overriding the default catalog URL
    pub const CONFIG_URL_ENV: &'static str = "ROSETTA_CONFIG_URL";

    /// Pick the source: explicit path, then `ROSETTA_CONFIG`, then the remote default
    ///
    /// An empty path counts as unset, matching the flag's empty default.
    pub fn resolve(config_path: Option<&Path>) -> Result<Self, RosettaError> {
        let from_env = std::env::var(Self::CONFIG_PATH_ENV).ok().map(PathBuf::from);
        let path = config_path
            .map(Path::to_path_buf)
            .or(from_env)
            .filter(|p| !p.as_os_str().is_empty());

        match path {
            Some(path) => Ok(Self::Local(path)),
            None => Self::default_remote(),
        }
    }

    /// Remote source from `ROSETTA_CONFIG_URL` or the published default
    pub fn default_remote() -> Result<Self, RosettaError> {
        let url_str = std::env::var(Self::CONFIG_URL_ENV)
            .unwrap_or_else(|_| DEFAULT_CATALOG_URL.to_string());
        let url = Url::parse(&url_str).map_err(|e| {
            RosettaError::Configuration(format!("invalid catalog URL '{}': {}", url_str, e))
        })?;
        Ok(Self::Remote(url))
    }

    /// Fetch the raw document
    pub async fn read(&self, client: &reqwest::Client) -> Result<String, RosettaError> {
        match self {
            CatalogSource::Remote(url) => {
                let response = client
                    .get(url.clone())
                    .send()
                    .await
                    .map_err(|e| RosettaError::remote(url.as_str(), e))?;

                if !response.status().is_success() {
                    return Err(RosettaError::remote(
                        url.as_str(),
                        format!("HTTP {}", response.status()),
                    ));
                }

                response
                    .text()
                    .await
                    .map_err(|e| RosettaError::remote(url.as_str(), e))
            }
            CatalogSource::Local(path) => fs::read_to_string(path)
                .await
                .map_err(|e| RosettaError::io(path, e)),
        }
    }

    /// Fetch, parse and validate the catalog
    pub async fn load(&self, client: &reqwest::Client) -> Result<Catalog, RosettaError> {
        let content = self.read(client).await?;
        Catalog::from_yaml(&content)
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::Remote(url) => write!(f, "{}", url),
            CatalogSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{self, Route, TestServer};

    #[test]
    fn test_explicit_path_wins() {
        let source = CatalogSource::resolve(Some(Path::new("catalog.yaml"))).unwrap();
        assert_eq!(source, CatalogSource::Local(PathBuf::from("catalog.yaml")));
    }

    #[test]
    fn test_default_url_parses() {
        let url = Url::parse(DEFAULT_CATALOG_URL).unwrap();
        assert_eq!(url.host_str(), Some("raw.githubusercontent.com"));
        assert!(url.path().ends_with("examples.yaml"));
    }

    #[tokio::test]
    async fn test_load_local_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("examples.yaml");
        std::fs::write(
            &path,
            "repo: owner/repo\nlanguages:\n  - name: go\n    title: Go\nexamples:\n  go: []\n",
        )
        .unwrap();

        let catalog = CatalogSource::Local(path)
            .load(&reqwest::Client::new())
            .await
            .unwrap();
        assert_eq!(catalog.repo, "owner/repo");
        assert_eq!(catalog.languages[0].name, "go");
    }

    #[tokio::test]
    async fn test_missing_local_catalog_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CatalogSource::Local(dir.path().join("absent.yaml"))
            .load(&reqwest::Client::new())
            .await
            .unwrap_err();
        assert!(matches!(err, RosettaError::Io { .. }));
    }

    #[tokio::test]
    async fn test_load_remote_catalog() {
        let server = TestServer::start(vec![Route {
            path: "/main/examples/examples.yaml",
            status: 200,
            body: "repo: owner/repo\nlanguages:\n  - name: go\n    title: Go\n",
        }])
        .await;

        let catalog = CatalogSource::Remote(server.url("/main/examples/examples.yaml"))
            .load(&test_support::client())
            .await
            .unwrap();
        assert_eq!(catalog.repo, "owner/repo");
    }

    #[tokio::test]
    async fn test_remote_catalog_not_found_is_remote_fetch() {
        let server = TestServer::start(Vec::new()).await;

        let err = CatalogSource::Remote(server.url("/missing.yaml"))
            .read(&test_support::client())
            .await
            .unwrap_err();
        match err {
            RosettaError::RemoteFetch { url, reason } => {
                assert!(url.ends_with("/missing.yaml"));
                assert!(reason.contains("404"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
