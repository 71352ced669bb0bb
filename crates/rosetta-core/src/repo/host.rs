//! Hosting API client (GitHub contents endpoint)

use crate::error::RosettaError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use url::Url;

/// Type of entry in a repository directory listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    File,
    Dir,
    Symlink,
    Submodule,
}

/// A single entry returned by the contents endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFile {
    pub name: String,

    /// Path from the repository root
    pub path: String,

    #[serde(rename = "type")]
    pub entry_type: EntryType,

    #[serde(default)]
    pub sha: String,

    #[serde(default)]
    pub size: u64,

    /// Raw content URL (None for directories)
    #[serde(default)]
    pub download_url: Option<String>,

    /// Path relative to the example root, filled in by the lister
    #[serde(skip)]
    pub rel_path: String,
}

impl RemoteFile {
    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Dir
    }

    /// Derive `rel_path` from `path` relative to `root`
    pub fn set_rel_path(&mut self, root: &str) -> Result<(), RosettaError> {
        let root = root.trim_matches('/');
        let rel = if root.is_empty() {
            Some(self.path.as_str())
        } else {
            self.path
                .strip_prefix(root)
                .and_then(|rest| rest.strip_prefix('/'))
        };

        match rel {
            Some(rel) if !rel.is_empty() => {
                self.rel_path = rel.to_string();
                Ok(())
            }
            _ => Err(RosettaError::Configuration(format!(
                "entry '{}' is not inside '{}'",
                self.path, root
            ))),
        }
    }
}

/// The two calls the cloner needs from a hosting service
pub trait RepositoryHost {
    /// List the entries of `path` in `repo`
    fn list_directory(
        &self,
        repo: &str,
        path: &str,
    ) -> impl Future<Output = Result<Vec<RemoteFile>, RosettaError>>;

    /// Fetch raw file content
    fn download(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, RosettaError>>;
}

/// GitHub REST API client
pub struct GithubHost {
    api_base: Url,
    client: reqwest::Client,
    /// Optional token, raises the anonymous rate limit
    github_token: Option<String>,
}

impl GithubHost {
    pub const DEFAULT_API_URL: &'static str = "https://api.github.com";

    /// Environment variable overriding the API base URL
    pub const API_URL_ENV: &'static str = "ROSETTA_API_URL";

    /// Environment variable name for GitHub token
    pub const GITHUB_TOKEN_ENV: &'static str = "GITHUB_TOKEN";

    pub fn new(
        api_base: Url,
        user_agent: &str,
        github_token: Option<String>,
    ) -> Result<Self, RosettaError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                RosettaError::Configuration(format!("failed to build HTTP client: {}", e))
            })?;
        Ok(Self::with_client(api_base, client, github_token))
    }

    /// Use a preconfigured client; it must already send a `User-Agent`
    pub fn with_client(api_base: Url, client: reqwest::Client, github_token: Option<String>) -> Self {
        Self {
            api_base,
            client,
            github_token,
        }
    }

    /// Create a client from `ROSETTA_API_URL` and `GITHUB_TOKEN`
    pub fn from_env(user_agent: &str) -> Result<Self, RosettaError> {
        let url_str = std::env::var(Self::API_URL_ENV)
            .unwrap_or_else(|_| Self::DEFAULT_API_URL.to_string());
        let api_base = Url::parse(&url_str).map_err(|e| {
            RosettaError::Configuration(format!("invalid API URL '{}': {}", url_str, e))
        })?;
        let github_token = std::env::var(Self::GITHUB_TOKEN_ENV)
            .ok()
            .filter(|t| !t.is_empty());
        Self::new(api_base, user_agent, github_token)
    }

    /// `{base}/repos/{repo}/contents/{path}`
    pub fn contents_url(&self, repo: &str, path: &str) -> Result<Url, RosettaError> {
        let mut url = self.api_base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                RosettaError::Configuration(format!(
                    "URL cannot have path segments: {}",
                    self.api_base
                ))
            })?;
            segments.pop_if_empty().push("repos");
            segments.extend(repo.split('/').filter(|s| !s.is_empty()));
            segments.push("contents");
            segments.extend(path.split('/').filter(|s| !s.is_empty()));
        }
        Ok(url)
    }

    /// Build a request with optional auth header
    fn build_request(&self, url: Url) -> reqwest::RequestBuilder {
        let mut request = self.client.get(url);

        if let Some(token) = &self.github_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        request
    }

    async fn get_success(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<reqwest::Response, RosettaError> {
        let response = request
            .send()
            .await
            .map_err(|e| RosettaError::remote(url, e))?;

        if !response.status().is_success() {
            return Err(RosettaError::remote(
                url,
                format!("HTTP {}", response.status()),
            ));
        }

        Ok(response)
    }
}

impl RepositoryHost for GithubHost {
    async fn list_directory(
        &self,
        repo: &str,
        path: &str,
    ) -> Result<Vec<RemoteFile>, RosettaError> {
        let url = self.contents_url(repo, path)?;
        let request = self
            .build_request(url.clone())
            .header("Accept", "application/vnd.github.v3+json");
        let response = self.get_success(request, url.as_str()).await?;

        let body = response
            .text()
            .await
            .map_err(|e| RosettaError::remote(url.as_str(), e))?;
        serde_json::from_str(&body).map_err(|e| {
            RosettaError::remote(url.as_str(), format!("unexpected listing: {}", e))
        })
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, RosettaError> {
        let parsed = Url::parse(url).map_err(|e| RosettaError::remote(url, e))?;
        let response = self.get_success(self.build_request(parsed), url).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RosettaError::remote(url, e))?;
        Ok(bytes.to_vec())
    }
}
