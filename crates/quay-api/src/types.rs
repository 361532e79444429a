//! Response types returned by a node's httpd API.

use serde::Deserialize;

/// Information about the node itself, from `/node`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    /// The node's DID.
    pub id: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Aggregate counters, from `/stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStats {
    /// Repositories seeded by this node.
    pub repos: usize,
    /// Identities known to this node.
    #[serde(default)]
    pub users: usize,
}

/// A node identity resolved by DID, from `/nodes/{pubkey}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeIdentity {
    pub did: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// A repository as listed by the node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoInfo {
    /// Repository id, e.g. `rad:zKtT7DmF9H34KkvcKj9PHW19WzjT`.
    pub rid: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_branch")]
    pub default_branch: String,
    /// Head commit of the default branch, absent for empty repositories.
    #[serde(default)]
    pub head: Option<String>,
}

fn default_branch() -> String {
    "main".to_string()
}

/// Kind of a tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Blob,
    Tree,
    Submodule,
}

/// One entry in a source tree listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub name: String,
    /// Full path from the repository root.
    pub path: String,
    pub oid: String,
}

/// A source tree listing, from `/repos/{rid}/tree`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
    #[serde(default)]
    pub last_commit: Option<CommitInfo>,
}

/// Commit author or committer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    /// DID of the author when known, otherwise the raw identity string.
    pub id: String,
    #[serde(default)]
    pub alias: Option<String>,
}

/// A single commit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitInfo {
    pub id: String,
    pub summary: String,
    pub author: Author,
    /// Commit time as a unix timestamp.
    pub time: i64,
}

/// Issue lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

/// An issue on a repository.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    pub title: String,
    pub state: IssueState,
    pub author: Author,
    #[serde(default)]
    pub labels: Vec<String>,
}

/// Patch lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchState {
    Draft,
    Open,
    Merged,
    Archived,
}

/// A patch (proposed change) on a repository.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patch {
    pub id: String,
    pub title: String,
    pub state: PatchState,
    pub author: Author,
    /// Revision ids, oldest first.
    #[serde(default)]
    pub revisions: Vec<String>,
}

/// Commit activity for one week, from `/repos/{rid}/activity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyActivity {
    /// Unix timestamp of the start of the week.
    pub week: i64,
    pub commits: usize,
}
