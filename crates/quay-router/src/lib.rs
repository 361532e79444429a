//! Route model, URL codec and navigation core for the Quay interface.
//!
//! ## Architecture
//!
//! A browser event or a programmatic push/replace supplies a [`Route`];
//! the [`Navigator`] marks the loading state and hands the route to a
//! [`RouteLoader`], which resolves it into a [`LoadedRoute`] by fetching
//! from the node's httpd API; the navigator publishes the result and
//! writes the address derived by the [`UrlCodec`] back into history.
//! Overlapping loads are resolved by supersession: only the most recent
//! navigation's result is ever published.
//!
//! ## Modules
//!
//! - [`route`] - The route union and its loaded counterparts
//! - [`codec`] - Route/address encoding in path and hash mode
//! - [`hosts`] - `hostname[:port]` extraction rules
//! - [`loader`] - Per-resource data loading and error classification
//! - [`navigator`] - Observable navigation state and history sync
//! - [`config`] - Persisted interface configuration

pub mod codec;
pub mod config;
pub mod hosts;
pub mod loader;
pub mod navigator;
pub mod route;

pub use codec::UrlCodec;
pub use config::{Config, PinnedRepo, RoutingMode};
pub use loader::{HttpdLoader, RouteLoader};
pub use navigator::{BrowserEvent, History, Navigator};
pub use route::{
    Fragment, LoadedRepo, LoadedRepoView, LoadedRoute, PinnedRepoInfo, RepoRoute, RepoView, Route,
};
