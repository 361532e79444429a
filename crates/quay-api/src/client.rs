//! HTTP client for a forge node's httpd.

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::base_url::BaseUrl;
use crate::error::{ApiError, ApiResult};
use crate::types::{
    CommitInfo, Issue, NodeIdentity, NodeInfo, NodeStats, Patch, RepoInfo, Tree, WeeklyActivity,
};

/// Typed client for one node's httpd API.
///
/// The client is cheaply cloneable and can be shared freely; every method
/// issues a single request against the node identified by the [`BaseUrl`]
/// it was constructed with.
#[derive(Clone)]
pub struct HttpdClient {
    base_url: BaseUrl,
    http: Client,
}

impl HttpdClient {
    /// Creates a client for the given node.
    #[must_use]
    pub fn new(base_url: &BaseUrl) -> Self {
        Self {
            base_url: base_url.clone(),
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("failed to create HTTP client"),
        }
    }

    /// The node this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Issues a GET request and decodes the JSON response.
    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> ApiResult<T> {
        let url = format!("{}/{}", self.base_url.api_root(), path);
        tracing::debug!(%url, "httpd request");

        let mut request = self.http.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }
        let res = request.send().await?;

        if !res.status().is_success() {
            return Err(ApiError::Response {
                status: res.status().as_u16(),
                message: res.text().await.unwrap_or_default(),
            });
        }

        res.json().await.map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Fetches information about the node itself.
    pub async fn get_node(&self) -> ApiResult<NodeInfo> {
        self.get("node", &[]).await
    }

    /// Fetches aggregate counters for the node.
    pub async fn get_stats(&self) -> ApiResult<NodeStats> {
        self.get("stats", &[]).await
    }

    /// Resolves a node identity by its public key.
    pub async fn get_node_identity(&self, pubkey: &str) -> ApiResult<NodeIdentity> {
        self.get(&format!("nodes/{pubkey}"), &[]).await
    }

    /// Lists the repositories seeded by the node.
    pub async fn get_repos(&self) -> ApiResult<Vec<RepoInfo>> {
        self.get("repos", &[]).await
    }

    /// Fetches a single repository by id.
    pub async fn get_repo(&self, rid: &str) -> ApiResult<RepoInfo> {
        self.get(&format!("repos/{rid}"), &[]).await
    }

    /// Fetches a source tree listing.
    ///
    /// `locator` is the raw `revision[/path]` suffix from the address; the
    /// node resolves it against the repository's refs. `None` addresses the
    /// root of the default branch.
    pub async fn get_tree(&self, rid: &str, locator: Option<&str>) -> ApiResult<Tree> {
        match locator {
            Some(locator) => self.get(&format!("repos/{rid}/tree/{locator}"), &[]).await,
            None => self.get(&format!("repos/{rid}/tree"), &[]).await,
        }
    }

    /// Fetches the commit log, optionally starting from a revision.
    pub async fn get_commits(&self, rid: &str, revision: Option<&str>) -> ApiResult<Vec<CommitInfo>> {
        let query = match revision {
            Some(revision) => vec![("parent", revision)],
            None => vec![],
        };
        self.get(&format!("repos/{rid}/commits"), &query).await
    }

    /// Fetches a single commit.
    pub async fn get_commit(&self, rid: &str, sha: &str) -> ApiResult<CommitInfo> {
        self.get(&format!("repos/{rid}/commits/{sha}"), &[]).await
    }

    /// Lists the issues on a repository.
    pub async fn get_issues(&self, rid: &str) -> ApiResult<Vec<Issue>> {
        self.get(&format!("repos/{rid}/issues"), &[]).await
    }

    /// Fetches a single issue.
    pub async fn get_issue(&self, rid: &str, id: &str) -> ApiResult<Issue> {
        self.get(&format!("repos/{rid}/issues/{id}"), &[]).await
    }

    /// Lists the patches on a repository.
    pub async fn get_patches(&self, rid: &str) -> ApiResult<Vec<Patch>> {
        self.get(&format!("repos/{rid}/patches"), &[]).await
    }

    /// Fetches a single patch.
    pub async fn get_patch(&self, rid: &str, id: &str) -> ApiResult<Patch> {
        self.get(&format!("repos/{rid}/patches/{id}"), &[]).await
    }

    /// Fetches weekly commit activity for a repository.
    pub async fn get_commit_activity(&self, rid: &str) -> ApiResult<Vec<WeeklyActivity>> {
        self.get(&format!("repos/{rid}/activity"), &[]).await
    }
}
