//! The route model: what page the interface is on, independent of how the
//! address bar spells it.

use std::fmt;

use quay_api::{
    BaseUrl, CommitInfo, Did, Issue, NodeIdentity, NodeInfo, NodeStats, Patch, RepoInfo, Tree,
    WeeklyActivity,
};

/// A page address. The single source of truth for the current location;
/// the URL is always derived from it, never the other way around.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Home,
    /// Session hand-off; signature and public key arrive as query params.
    Session {
        id: String,
        signature: String,
        public_key: String,
    },
    /// A node's landing page.
    Nodes { base_url: BaseUrl },
    /// A node identity, addressed by DID. The DID is kept as the raw
    /// address segment; it is validated by the loader, not the codec.
    Users { base_url: BaseUrl, did: String },
    /// The repository family of views.
    Repo(RepoRoute),
    /// An address that matched no known pattern.
    NotFound { url: String },
}

/// Identifying parameters shared by all repository views.
#[derive(Debug, Clone, PartialEq)]
pub struct RepoRoute {
    pub base_url: BaseUrl,
    /// Repository id, e.g. `rad:zKtT7DmF9H34KkvcKj9PHW19WzjT`.
    pub rid: String,
    /// A specific remote's view of the repository.
    pub peer: Option<String>,
    pub view: RepoView,
    /// Free-text filter, carried as a `search` query parameter.
    pub search: Option<String>,
    pub fragment: Option<Fragment>,
}

impl RepoRoute {
    /// A route to the root source tree of a repository.
    #[must_use]
    pub fn source(base_url: BaseUrl, rid: impl Into<String>) -> Self {
        Self {
            base_url,
            rid: rid.into(),
            peer: None,
            view: RepoView::Source { locator: None },
            search: None,
            fragment: None,
        }
    }
}

/// Which repository sub-view is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoView {
    /// Source browser. `locator` is the raw `revision[/path]` suffix from
    /// the URL; splitting it needs the repository's refs, so the route
    /// keeps the two joined. `None` addresses the default branch root.
    Source { locator: Option<String> },
    History { revision: Option<String> },
    Commit { commit: String },
    Issues,
    Issue { id: String },
    Patches,
    Patch {
        patch: String,
        revision: Option<String>,
    },
}

/// An in-page fragment. A route carries at most one of these, which makes
/// the line/anchor mutual exclusion structural.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// A source line selector, written `L<digits>`.
    Line(u32),
    /// Any other anchor.
    Anchor(String),
}

impl Fragment {
    /// Interprets a raw fragment string. Empty fragments are no fragment.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        if let Some(digits) = raw.strip_prefix('L') {
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                if let Ok(line) = digits.parse() {
                    return Some(Self::Line(line));
                }
            }
        }
        Some(Self::Anchor(raw.to_string()))
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line(line) => write!(f, "L{line}"),
            Self::Anchor(anchor) => write!(f, "{anchor}"),
        }
    }
}

/// A route resolved against the remote node: either the data a view needs
/// to render, or a terminal failure. Published once, never mutated; a new
/// navigation supersedes it with a fresh value.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedRoute {
    /// Initial state before the first load completes.
    Booting,
    Home {
        repos: Vec<PinnedRepoInfo>,
    },
    Session {
        id: String,
        signature: String,
        public_key: String,
    },
    Nodes {
        base_url: BaseUrl,
        node: NodeInfo,
        stats: NodeStats,
        repos: Vec<RepoInfo>,
    },
    Users {
        base_url: BaseUrl,
        did: Did,
        node: NodeIdentity,
        node_avatar_url: Option<String>,
        stats: NodeStats,
    },
    Repo(LoadedRepo),
    /// The address matched no known pattern, or the resource is absent.
    NotFound { url: String },
    /// The home view could not assemble its data.
    LoadError { message: String },
    /// A load failed in a way the user should see described.
    Error {
        title: String,
        description: String,
        cause: Option<String>,
    },
}

/// A pinned repository with the data the home view renders.
#[derive(Debug, Clone, PartialEq)]
pub struct PinnedRepoInfo {
    pub base_url: BaseUrl,
    pub repo: RepoInfo,
    pub activity: Vec<WeeklyActivity>,
}

/// A loaded repository view.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedRepo {
    /// The identifying params the view was addressed with.
    pub route: RepoRoute,
    pub repo: RepoInfo,
    pub view: LoadedRepoView,
}

/// The fetched payload for each repository sub-view.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedRepoView {
    Source { tree: Tree },
    History { commits: Vec<CommitInfo> },
    Commit { commit: CommitInfo },
    Issues { issues: Vec<Issue> },
    Issue { issue: Issue },
    Patches { patches: Vec<Patch> },
    Patch { patch: Patch },
}
