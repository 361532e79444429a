//! Navigation state machine.
//!
//! Owns the two observable cells (`is_loading`, `active_route`), mediates
//! push/replace navigation, and guarantees that of any overlapping loads
//! only the most recent navigation's result is ever published.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use crate::codec::UrlCodec;
use crate::loader::RouteLoader;
use crate::route::{Fragment, LoadedRoute, Route};

/// Browser history and address bar, abstracted so the navigator can be
/// driven without a browser. Locations are the part after the origin:
/// `/path?query#frag`, or `#/…` in hash mode.
pub trait History: Send + Sync {
    /// The current address.
    fn location(&self) -> String;
    /// Creates a new history entry for `href`.
    fn push(&self, href: &str);
    /// Overwrites the current history entry with `href`.
    fn replace(&self, href: &str);
}

/// Navigation events arriving from the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserEvent {
    /// Back/forward navigation; can land on any route, so the address is
    /// fully re-resolved.
    PopState,
    /// An in-page anchor jump; `url` is the new address.
    HashChange { url: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Push,
    Replace,
}

/// Owns the current-route state and synchronizes it with history.
///
/// Both cells have a single writer: this navigator. Consumers subscribe
/// via [`Navigator::is_loading`] and [`Navigator::active_route`].
pub struct Navigator<L, H> {
    loader: L,
    history: H,
    codec: UrlCodec,
    /// Sequence token of the most recent navigation. A load only publishes
    /// if its token is still the latest when it resolves.
    seq: AtomicU64,
    is_loading: watch::Sender<bool>,
    active_route: watch::Sender<LoadedRoute>,
}

impl<L: RouteLoader, H: History> Navigator<L, H> {
    #[must_use]
    pub fn new(loader: L, history: H, codec: UrlCodec) -> Self {
        let (is_loading, _) = watch::channel(true);
        let (active_route, _) = watch::channel(LoadedRoute::Booting);
        Self {
            loader,
            history,
            codec,
            seq: AtomicU64::new(0),
            is_loading,
            active_route,
        }
    }

    /// Subscribes to the loading flag.
    #[must_use]
    pub fn is_loading(&self) -> watch::Receiver<bool> {
        self.is_loading.subscribe()
    }

    /// Subscribes to the active route.
    #[must_use]
    pub fn active_route(&self) -> watch::Receiver<LoadedRoute> {
        self.active_route.subscribe()
    }

    /// Navigates to `route`, creating a new history entry.
    pub async fn push(&self, route: Route) {
        self.navigate(Action::Push, route).await;
    }

    /// Navigates to `route`, overwriting the current history entry.
    pub async fn replace(&self, route: Route) {
        self.navigate(Action::Replace, route).await;
    }

    /// Resolves the current address and replaces to it. Invoked at startup
    /// and on every pop-state event.
    pub async fn load_from_location(&self) {
        let location = self.history.location();
        match self.codec.location_to_route(&location) {
            Some(route) => self.replace(route).await,
            None => self.replace(Route::NotFound { url: location }).await,
        }
    }

    /// Feeds a browser event into the navigator.
    pub async fn handle_event(&self, event: BrowserEvent) {
        match event {
            BrowserEvent::PopState => self.load_from_location().await,
            BrowserEvent::HashChange { url } => self.update_fragment(&url),
        }
    }

    async fn navigate(&self, action: Action, route: Route) {
        let token = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.is_loading.send_replace(true);

        let loaded = self.loader.load(route.clone()).await;

        // Only let the last navigation through.
        if self.seq.load(Ordering::SeqCst) != token {
            tracing::debug!(?route, "navigation superseded, dropping result");
            return;
        }

        self.active_route.send_replace(loaded);
        self.is_loading.send_replace(false);

        let href = self.codec.href(&route);
        match action {
            Action::Push => self.history.push(&href),
            Action::Replace => self.history.replace(&href),
        }
    }

    /// An in-page anchor jump: when a repository view is active and the new
    /// address carries a fragment, rewrite only the fragment of the active
    /// route instead of reloading.
    fn update_fragment(&self, url: &str) {
        let Some(Route::Repo(new_route)) = self.codec.location_to_route(url) else {
            return;
        };
        let Some(fragment) = new_route.fragment else {
            return;
        };
        self.apply_fragment(fragment);
    }

    fn apply_fragment(&self, fragment: Fragment) {
        self.active_route.send_if_modified(|active| {
            if let LoadedRoute::Repo(loaded) = active {
                loaded.route.fragment = Some(fragment);
                true
            } else {
                false
            }
        });
    }
}
