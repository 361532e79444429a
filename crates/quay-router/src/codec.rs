//! Bidirectional mapping between [`Route`] values and address strings.
//!
//! Encoding and parsing are mutual inverses for every route the interface
//! itself produces. Parsing returns `None` for anything else; the caller
//! turns that into a not-found route.

use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};
use url::Url;

use crate::config::{Config, RoutingMode};
use crate::hosts::{extract_base_url, host_str};
use crate::route::{Fragment, RepoRoute, RepoView, Route};

/// Origin used to resolve relative address strings; the codec never looks
/// at the origin itself.
const DUMMY_ORIGIN: &str = "http://localhost/";

/// Encodes routes to address strings and back, in either path-based or
/// hash-based mode. The mode is fixed at construction.
#[derive(Debug, Clone)]
pub struct UrlCodec {
    mode: RoutingMode,
    config: Config,
}

impl UrlCodec {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            mode: config.routing_mode,
            config,
        }
    }

    #[must_use]
    pub fn mode(&self) -> RoutingMode {
        self.mode
    }

    /// Renders a route as a path string, e.g. `/nodes/seed.example.com`.
    ///
    /// The same path is produced in both routing modes; [`Self::href`]
    /// adds the leading `#` for hash mode.
    #[must_use]
    pub fn route_to_path(&self, route: &Route) -> String {
        match route {
            Route::Home => "/".to_string(),
            Route::Session {
                id,
                signature,
                public_key,
            } => format!("/session/{id}?sig={signature}&pk={public_key}"),
            Route::Nodes { base_url } => {
                format!("/nodes/{}", host_str(base_url, &self.config))
            }
            Route::Users { base_url, did } => {
                format!("/nodes/{}/users/{did}", host_str(base_url, &self.config))
            }
            Route::Repo(repo) => self.repo_to_path(repo),
            Route::NotFound { url } => url.clone(),
        }
    }

    /// The string to hand to the history API for a route.
    #[must_use]
    pub fn href(&self, route: &Route) -> String {
        let path = self.route_to_path(route);
        match self.mode {
            RoutingMode::Path => path,
            RoutingMode::Hash => format!("#{path}"),
        }
    }

    fn repo_to_path(&self, repo: &RepoRoute) -> String {
        let mut path = format!(
            "/nodes/{}/{}",
            host_str(&repo.base_url, &self.config),
            repo.rid
        );
        if let Some(peer) = &repo.peer {
            path.push_str("/remotes/");
            path.push_str(peer);
        }
        match &repo.view {
            RepoView::Source { locator: None } => {}
            RepoView::Source {
                locator: Some(locator),
            } => {
                path.push_str("/tree/");
                path.push_str(locator);
            }
            RepoView::History { revision: None } => path.push_str("/history"),
            RepoView::History {
                revision: Some(revision),
            } => {
                path.push_str("/history/");
                path.push_str(revision);
            }
            RepoView::Commit { commit } => {
                path.push_str("/commits/");
                path.push_str(commit);
            }
            RepoView::Issues => path.push_str("/issues"),
            RepoView::Issue { id } => {
                path.push_str("/issues/");
                path.push_str(id);
            }
            RepoView::Patches => path.push_str("/patches"),
            RepoView::Patch { patch, revision } => {
                path.push_str("/patches/");
                path.push_str(patch);
                if let Some(revision) = revision {
                    path.push('/');
                    path.push_str(revision);
                }
            }
        }
        if let Some(search) = &repo.search {
            path.push_str("?search=");
            path.push_str(&utf8_percent_encode(search, NON_ALPHANUMERIC).to_string());
        }
        if let Some(fragment) = &repo.fragment {
            path.push('#');
            path.push_str(&fragment.to_string());
        }
        path
    }

    /// Decodes an address string as read from the history API.
    ///
    /// Accepts `/path?query#frag` in path mode and `#/path?query#frag` in
    /// hash mode. Returns `None` for empty or unparseable addresses.
    #[must_use]
    pub fn location_to_route(&self, location: &str) -> Option<Route> {
        if location.is_empty() {
            return None;
        }
        let base = Url::parse(DUMMY_ORIGIN).expect("dummy origin is a valid URL");
        let url = base.join(location).ok()?;
        self.url_to_route(&url)
    }

    /// Decodes a full URL into a route, honoring the routing mode.
    #[must_use]
    pub fn url_to_route(&self, url: &Url) -> Option<Route> {
        match self.mode {
            RoutingMode::Path => self.parse_url(url),
            RoutingMode::Hash => {
                // The packed address lives in the fragment; an absent
                // fragment is the home address.
                let packed = url.fragment().unwrap_or("/");
                if !packed.starts_with('/') {
                    return None;
                }
                let base = Url::parse(DUMMY_ORIGIN).expect("dummy origin is a valid URL");
                let synthetic = base.join(packed).ok()?;
                self.parse_url(&synthetic)
            }
        }
    }

    fn parse_url(&self, url: &Url) -> Option<Route> {
        let path = url.path();
        let trimmed = path.strip_prefix('/').unwrap_or(path);
        let mut segments: Vec<&str> = trimmed.split('/').collect();
        // A single trailing slash addresses the same route.
        if segments.len() > 1 && segments.last() == Some(&"") {
            segments.pop();
        }

        let mut it = segments.into_iter();
        match it.next() {
            Some("") => it.next().is_none().then_some(Route::Home),
            Some("session") => {
                let id = decode(it.next().filter(|s| !s.is_empty())?)?;
                if it.next().is_some() {
                    return None;
                }
                Some(Route::Session {
                    id,
                    signature: query_param(url, "sig").unwrap_or_default(),
                    public_key: query_param(url, "pk").unwrap_or_default(),
                })
            }
            Some("nodes") => {
                let base_url = extract_base_url(it.next().filter(|s| !s.is_empty())?, &self.config)?;
                match it.next() {
                    None => Some(Route::Nodes { base_url }),
                    Some("users") => {
                        let did = decode(it.next().filter(|s| !s.is_empty())?)?;
                        if it.next().is_some() {
                            return None;
                        }
                        Some(Route::Users { base_url, did })
                    }
                    Some(rid) if !rid.is_empty() => self.parse_repo(url, base_url, rid, it),
                    Some(_) => None,
                }
            }
            _ => None,
        }
    }

    fn parse_repo<'a>(
        &self,
        url: &Url,
        base_url: quay_api::BaseUrl,
        rid: &str,
        mut it: std::vec::IntoIter<&'a str>,
    ) -> Option<Route> {
        let rid = decode(rid)?;

        let mut peer = None;
        let mut next = it.next();
        if next == Some("remotes") {
            peer = Some(decode(it.next().filter(|s| !s.is_empty())?)?);
            next = it.next();
        }

        let rest: Vec<String> = it.map(decode).collect::<Option<_>>()?;
        let view = match next {
            None => RepoView::Source { locator: None },
            Some("tree") => RepoView::Source {
                locator: join_locator(&rest),
            },
            Some("history") => RepoView::History {
                revision: join_locator(&rest),
            },
            Some("commits") => match rest.as_slice() {
                [commit] => RepoView::Commit {
                    commit: commit.clone(),
                },
                _ => return None,
            },
            Some("issues") => match rest.as_slice() {
                [] => RepoView::Issues,
                [id] => RepoView::Issue { id: id.clone() },
                _ => return None,
            },
            Some("patches") => match rest.as_slice() {
                [] => RepoView::Patches,
                [patch] => RepoView::Patch {
                    patch: patch.clone(),
                    revision: None,
                },
                [patch, revision] => RepoView::Patch {
                    patch: patch.clone(),
                    revision: Some(revision.clone()),
                },
                _ => return None,
            },
            Some(_) => return None,
        };

        Some(Route::Repo(RepoRoute {
            base_url,
            rid,
            peer,
            view,
            search: query_param(url, "search"),
            fragment: url.fragment().and_then(Fragment::parse),
        }))
    }
}

/// Joins trailing segments back into a raw locator, treating an empty
/// suffix as no locator.
fn join_locator(segments: &[String]) -> Option<String> {
    if segments.is_empty() || segments.iter().all(String::is_empty) {
        None
    } else {
        Some(segments.join("/"))
    }
}

fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

fn decode(segment: &str) -> Option<String> {
    percent_decode_str(segment)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quay_api::{BaseUrl, Scheme};

    const ORIGIN: &str = "http://localhost:3000";
    const RID: &str = "rad:zKtT7DmF9H34KkvcKj9PHW19WzjT";

    fn codec() -> UrlCodec {
        UrlCodec::new(Config::default())
    }

    fn hash_codec() -> UrlCodec {
        UrlCodec::new(Config {
            routing_mode: RoutingMode::Hash,
            ..Config::default()
        })
    }

    fn node() -> BaseUrl {
        BaseUrl {
            hostname: "example.node.tld".to_string(),
            port: 8000,
            scheme: Scheme::Https,
        }
    }

    fn repo(view: RepoView) -> RepoRoute {
        RepoRoute {
            base_url: node(),
            rid: RID.to_string(),
            peer: None,
            view,
            search: None,
            fragment: None,
        }
    }

    fn repo_route(view: RepoView) -> Route {
        Route::Repo(repo(view))
    }

    #[track_caller]
    fn assert_round_trip(route: Route) {
        let codec = codec();
        let path = codec.route_to_path(&route);
        let url = Url::parse(ORIGIN).unwrap().join(&path).unwrap();
        assert_eq!(codec.url_to_route(&url), Some(route), "path: {path}");
    }

    #[test]
    fn test_round_trip_home() {
        assert_round_trip(Route::Home);
    }

    #[test]
    fn test_round_trip_session() {
        assert_round_trip(Route::Session {
            id: "aabbcc".to_string(),
            signature: "zSig".to_string(),
            public_key: "zPk".to_string(),
        });
    }

    #[test]
    fn test_round_trip_nodes() {
        assert_round_trip(Route::Nodes { base_url: node() });
        assert_round_trip(Route::Nodes {
            base_url: BaseUrl {
                hostname: "seed.example.com".to_string(),
                port: 8080,
                scheme: Scheme::Https,
            },
        });
    }

    #[test]
    fn test_round_trip_users() {
        assert_round_trip(Route::Users {
            base_url: node(),
            did: "did:key:z6MkmzRwg47UWQxczLLLFfkEwpBGitjzJ1vKPE8U9ymd6fz6".to_string(),
        });
    }

    #[test]
    fn test_round_trip_repo_source() {
        assert_round_trip(repo_route(RepoView::Source { locator: None }));
        assert_round_trip(repo_route(RepoView::Source {
            locator: Some("main/src/lib.rs".to_string()),
        }));
    }

    #[test]
    fn test_round_trip_repo_source_with_peer() {
        let mut route = repo(RepoView::Source { locator: None });
        route.peer = Some("z6MkPeer".to_string());
        assert_round_trip(Route::Repo(route.clone()));

        route.view = RepoView::Source {
            locator: Some("main/README.md".to_string()),
        };
        assert_round_trip(Route::Repo(route));
    }

    #[test]
    fn test_round_trip_repo_history() {
        assert_round_trip(repo_route(RepoView::History { revision: None }));
        assert_round_trip(repo_route(RepoView::History {
            revision: Some("feature/codec".to_string()),
        }));
    }

    #[test]
    fn test_round_trip_repo_commit() {
        assert_round_trip(repo_route(RepoView::Commit {
            commit: "a8a6a979a6261a2ec1ea85fc9a65a4a30aa22cc8".to_string(),
        }));
    }

    #[test]
    fn test_round_trip_repo_issues() {
        assert_round_trip(repo_route(RepoView::Issues));
        assert_round_trip(repo_route(RepoView::Issue {
            id: "aabbcc".to_string(),
        }));
    }

    #[test]
    fn test_round_trip_repo_patches() {
        assert_round_trip(repo_route(RepoView::Patches));
        assert_round_trip(repo_route(RepoView::Patch {
            patch: "ddeeff".to_string(),
            revision: None,
        }));
        assert_round_trip(repo_route(RepoView::Patch {
            patch: "ddeeff".to_string(),
            revision: Some("112233".to_string()),
        }));
    }

    #[test]
    fn test_round_trip_repo_with_search_and_fragment() {
        let mut repo = repo(RepoView::Issues);
        repo.search = Some("is:open label:bug".to_string());
        assert_round_trip(Route::Repo(repo.clone()));

        repo.search = None;
        repo.view = RepoView::Source {
            locator: Some("main/src/lib.rs".to_string()),
        };
        repo.fragment = Some(Fragment::Line(42));
        assert_round_trip(Route::Repo(repo.clone()));

        repo.fragment = Some(Fragment::Anchor("usage".to_string()));
        assert_round_trip(Route::Repo(repo));
    }

    #[track_caller]
    fn parse(path: &str) -> Option<Route> {
        let url = Url::parse(ORIGIN).unwrap().join(path).unwrap();
        codec().url_to_route(&url)
    }

    #[test]
    fn test_unknown_paths_parse_to_none() {
        assert_eq!(parse("/foo/baz/bar"), None);
        assert_eq!(parse("/nodes"), None);
        assert_eq!(parse("/nodes/example.node.tld/users"), None);
        assert_eq!(
            parse("/nodes/example.node.tld/users/zUser/extra"),
            None
        );
    }

    #[test]
    fn test_valid_prefix_with_garbage_suffix_parses_to_none() {
        assert_eq!(parse(&format!("/nodes/example.node.tld/{RID}/nope")), None);
        assert_eq!(
            parse(&format!("/nodes/example.node.tld/{RID}/commits/a/b")),
            None
        );
        assert_eq!(
            parse(&format!("/nodes/example.node.tld/{RID}/issues/a/b")),
            None
        );
    }

    #[test]
    fn test_trailing_slash_is_equivalent() {
        let with = parse(&format!("/nodes/example.node.tld/{RID}/"));
        let without = parse(&format!("/nodes/example.node.tld/{RID}"));
        assert!(with.is_some());
        assert_eq!(with, without);
    }

    #[test]
    fn test_nodes_path_applies_extraction_defaults() {
        assert_eq!(
            parse("/nodes/example.node.tld"),
            Some(Route::Nodes {
                base_url: BaseUrl {
                    hostname: "example.node.tld".to_string(),
                    port: 8080,
                    scheme: Scheme::Https,
                },
            })
        );
    }

    #[test]
    fn test_bare_repo_parses_to_source_root() {
        assert_eq!(
            parse(&format!("/nodes/example.node.tld/{RID}")),
            Some(Route::Repo(RepoRoute::source(
                BaseUrl {
                    hostname: "example.node.tld".to_string(),
                    port: 8080,
                    scheme: Scheme::Https,
                },
                RID,
            )))
        );
    }

    #[test]
    fn test_hash_mode_round_trips_behind_the_same_interface() {
        let codec = hash_codec();
        let route = repo_route(RepoView::Issues);
        let href = codec.href(&route);
        assert!(href.starts_with("#/nodes/"), "href: {href}");

        let url = Url::parse(ORIGIN).unwrap().join(&href).unwrap();
        assert_eq!(codec.url_to_route(&url), Some(route));
    }

    #[test]
    fn test_hash_mode_keeps_inner_fragment() {
        let codec = hash_codec();
        let url = Url::parse(&format!("{ORIGIN}/#/nodes/example.node.tld/{RID}/tree/main#L7"))
            .unwrap();
        match codec.url_to_route(&url) {
            Some(Route::Repo(repo)) => assert_eq!(repo.fragment, Some(Fragment::Line(7))),
            other => panic!("unexpected route: {other:?}"),
        }
    }

    #[test]
    fn test_hash_mode_without_fragment_is_home() {
        let codec = hash_codec();
        let url = Url::parse(ORIGIN).unwrap();
        assert_eq!(codec.url_to_route(&url), Some(Route::Home));
    }

    #[test]
    fn test_location_to_route_rejects_empty() {
        assert_eq!(codec().location_to_route(""), None);
    }
}
