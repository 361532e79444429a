//! Resolving routes into loaded routes.
//!
//! Every failure becomes a [`LoadedRoute`] value; the navigator never sees
//! an error propagate out of a loader.

use async_trait::async_trait;
use futures::future;

use quay_api::{ApiError, BaseUrl, Did, HttpdClient};

use crate::config::Config;
use crate::hosts::extract_base_url;
use crate::route::{
    LoadedRepo, LoadedRepoView, LoadedRoute, PinnedRepoInfo, RepoRoute, RepoView, Route,
};

/// Resolves one route against the remote state.
///
/// Implementations must be pure functions of the route plus the remote
/// state; nothing may leak over from a previous navigation.
#[async_trait]
pub trait RouteLoader: Send + Sync {
    async fn load(&self, route: Route) -> LoadedRoute;
}

/// Production loader: fetches from each route's node over its httpd API.
pub struct HttpdLoader {
    config: Config,
}

impl HttpdLoader {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    async fn load_home(&self) -> LoadedRoute {
        let fetches = self.config.pinned_repos.iter().map(|pin| async move {
            let base_url = extract_base_url(&pin.host, &self.config)
                .ok_or_else(|| ApiError::Parse(format!("invalid pinned host: {}", pin.host)))?;
            let client = HttpdClient::new(&base_url);
            let repo = client.get_repo(&pin.rid).await?;
            let activity = client.get_commit_activity(&pin.rid).await?;
            Ok::<_, ApiError>(PinnedRepoInfo {
                base_url,
                repo,
                activity,
            })
        });

        match future::try_join_all(fetches).await {
            Ok(repos) => LoadedRoute::Home { repos },
            Err(err) => {
                tracing::error!(error = %err, "failed to load pinned repositories");
                LoadedRoute::LoadError {
                    message: "Could not load pinned repositories.".to_string(),
                }
            }
        }
    }

    async fn load_nodes(&self, base_url: BaseUrl) -> LoadedRoute {
        let client = HttpdClient::new(&base_url);
        match tokio::try_join!(client.get_node(), client.get_stats(), client.get_repos()) {
            Ok((node, stats, repos)) => LoadedRoute::Nodes {
                base_url,
                node,
                stats,
                repos,
            },
            Err(err) => classify(err, base_url.to_string()),
        }
    }

    async fn load_users(&self, base_url: BaseUrl, did: String) -> LoadedRoute {
        let Some(parsed) = Did::parse(&did) else {
            return LoadedRoute::Error {
                title: "Invalid user DID provided".to_string(),
                description: "The provided DID is invalid. Please review the identifier \
                              for any errors and try again."
                    .to_string(),
                cause: Some(format!("invalid user DID provided: {did}")),
            };
        };

        let client = HttpdClient::new(&base_url);
        match tokio::try_join!(
            client.get_stats(),
            client.get_node(),
            client.get_node_identity(&parsed.pubkey),
        ) {
            Ok((stats, node, user)) => LoadedRoute::Users {
                base_url,
                did: parsed,
                node: user,
                node_avatar_url: node.avatar_url,
                stats,
            },
            Err(err) => classify(err, base_url.to_string()),
        }
    }

    async fn load_repo(&self, route: RepoRoute) -> LoadedRoute {
        let client = HttpdClient::new(&route.base_url);
        let rid = route.rid.as_str();

        let result = match &route.view {
            RepoView::Source { locator } => {
                tokio::try_join!(client.get_repo(rid), client.get_tree(rid, locator.as_deref()))
                    .map(|(repo, tree)| (repo, LoadedRepoView::Source { tree }))
            }
            RepoView::History { revision } => {
                tokio::try_join!(client.get_repo(rid), client.get_commits(rid, revision.as_deref()))
                    .map(|(repo, commits)| (repo, LoadedRepoView::History { commits }))
            }
            RepoView::Commit { commit } => {
                tokio::try_join!(client.get_repo(rid), client.get_commit(rid, commit))
                    .map(|(repo, commit)| (repo, LoadedRepoView::Commit { commit }))
            }
            RepoView::Issues => tokio::try_join!(client.get_repo(rid), client.get_issues(rid))
                .map(|(repo, issues)| (repo, LoadedRepoView::Issues { issues })),
            RepoView::Issue { id } => {
                tokio::try_join!(client.get_repo(rid), client.get_issue(rid, id))
                    .map(|(repo, issue)| (repo, LoadedRepoView::Issue { issue }))
            }
            RepoView::Patches => tokio::try_join!(client.get_repo(rid), client.get_patches(rid))
                .map(|(repo, patches)| (repo, LoadedRepoView::Patches { patches })),
            RepoView::Patch { patch, .. } => {
                tokio::try_join!(client.get_repo(rid), client.get_patch(rid, patch))
                    .map(|(repo, patch)| (repo, LoadedRepoView::Patch { patch }))
            }
        };

        match result {
            Ok((repo, view)) => LoadedRoute::Repo(LoadedRepo { route, repo, view }),
            Err(err) => classify(err, format!("{}/{rid}", route.base_url)),
        }
    }
}

#[async_trait]
impl RouteLoader for HttpdLoader {
    async fn load(&self, route: Route) -> LoadedRoute {
        match route {
            Route::Home => self.load_home().await,
            Route::Session {
                id,
                signature,
                public_key,
            } => load_session(id, signature, public_key),
            Route::Nodes { base_url } => self.load_nodes(base_url).await,
            Route::Users { base_url, did } => self.load_users(base_url, did).await,
            Route::Repo(repo) => self.load_repo(repo).await,
            Route::NotFound { url } => LoadedRoute::NotFound { url },
        }
    }
}

/// Session hand-off needs no network; it only checks its parameters.
fn load_session(id: String, signature: String, public_key: String) -> LoadedRoute {
    if id.is_empty() || signature.is_empty() || public_key.is_empty() {
        return LoadedRoute::Error {
            title: "Incomplete session address".to_string(),
            description: "A session address needs an id, a signature and a public key."
                .to_string(),
            cause: None,
        };
    }
    LoadedRoute::Session {
        id,
        signature,
        public_key,
    }
}

/// Shared policy for turning an API failure into a terminal route.
///
/// A 404 means the addressed resource is genuinely absent; everything else
/// is surfaced as an error the user can read.
fn classify(err: ApiError, url: String) -> LoadedRoute {
    tracing::error!(%url, error = %err, "route load failed");
    if err.is_not_found() {
        LoadedRoute::NotFound { url }
    } else {
        LoadedRoute::Error {
            title: "Could not load this view".to_string(),
            description: format!("Make sure the node at {url} is reachable and seeding."),
            cause: Some(err.to_string()),
        }
    }
}
