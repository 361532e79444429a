//! Typed HTTP client for a forge node's httpd API.
//!
//! This crate provides the collaborator the Quay router talks to: a
//! [`HttpdClient`] bound to one node's [`BaseUrl`], the response types the
//! node returns, and the [`ApiError`] taxonomy the router classifies into
//! terminal route states.

mod base_url;
mod client;
mod did;
mod error;
mod types;

pub use base_url::{is_local, BaseUrl, Scheme};
pub use client::HttpdClient;
pub use did::Did;
pub use error::{ApiError, ApiResult};
pub use types::{
    Author, CommitInfo, EntryKind, Issue, IssueState, NodeIdentity, NodeInfo, NodeStats, Patch,
    PatchState, RepoInfo, Tree, TreeEntry, WeeklyActivity,
};
