//! Route table, navigation guard and the current-location holder
pub mod guard;
pub mod navigator;

use std::collections::BTreeMap;

pub use guard::{auth_guard, NavigationDecision};
pub use navigator::{NavigationError, NavigationOutcome, Navigator};

pub const HOME: &str = "home";
pub const LOGIN: &str = "login";
pub const REGISTER: &str = "register";

/// Views whose 401 responses must not trigger a token refresh
pub const AUTH_VIEW_PATHS: [&str; 2] = ["/login", "/register"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub guest_only: bool,
    pub requires_sidebar: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub name: &'static str,
    pub path: &'static str,
    pub meta: RouteMeta,
}

const APP: RouteMeta = RouteMeta {
    requires_auth: true,
    guest_only: false,
    requires_sidebar: true,
};

const GUEST: RouteMeta = RouteMeta {
    requires_auth: false,
    guest_only: true,
    requires_sidebar: false,
};

pub static ROUTES: &[Route] = &[
    Route { name: HOME, path: "/", meta: APP },
    Route { name: "about", path: "/about", meta: APP },
    Route { name: "tasks", path: "/workspace/:workspaceId/project/:projectId/tasks", meta: APP },
    Route { name: "workspace-settings", path: "/workspace/settings", meta: APP },
    Route { name: "workspace-members", path: "/workspace/members", meta: APP },
    Route { name: "workspace-invitations", path: "/workspace/invitations", meta: APP },
    Route { name: "workspace-projects", path: "/workspace/projects", meta: APP },
    Route { name: "workspace-labels", path: "/workspace/labels", meta: APP },
    Route { name: LOGIN, path: "/login", meta: GUEST },
    Route { name: REGISTER, path: "/register", meta: GUEST },
];

/// A resolved navigation target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTarget {
    pub route: &'static Route,
    pub full_path: String,
    pub params: BTreeMap<String, String>,
    pub query: BTreeMap<String, String>,
}

/// Where a redirect sends the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub name: &'static str,
    pub query: BTreeMap<String, String>,
}

impl Location {
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            query: BTreeMap::new(),
        }
    }

    pub fn login_with_redirect(full_path: &str) -> Self {
        let mut query = BTreeMap::new();
        query.insert("redirect".to_string(), full_path.to_string());
        Self { name: LOGIN, query }
    }

    /// Render as a path plus encoded query string
    pub fn to_path(&self) -> String {
        let base = route_by_name(self.name).map(|r| r.path).unwrap_or("/");
        if self.query.is_empty() {
            return base.to_string();
        }

        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish();
        format!("{}?{}", base, query)
    }
}

pub fn route_by_name(name: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|r| r.name == name)
}

/// Split a full path into its path part and decoded query pairs
pub fn split_path(full_path: &str) -> (&str, BTreeMap<String, String>) {
    let without_fragment = full_path.split('#').next().unwrap_or(full_path);
    match without_fragment.split_once('?') {
        Some((path, query)) => (
            path,
            url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        ),
        None => (without_fragment, BTreeMap::new()),
    }
}

/// Match a full path against the route table
pub fn resolve(full_path: &str) -> Option<RouteTarget> {
    let (path, query) = split_path(full_path);
    let path = if path.len() > 1 { path.trim_end_matches('/') } else { path };

    ROUTES.iter().find_map(|route| {
        match_pattern(route.path, path).map(|params| RouteTarget {
            route,
            full_path: full_path.to_string(),
            params,
            query: query.clone(),
        })
    })
}

fn match_pattern(pattern: &str, path: &str) -> Option<BTreeMap<String, String>> {
    let pattern_segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if pattern_segments.len() != path_segments.len() {
        return None;
    }

    let mut params = BTreeMap::new();
    for (expected, actual) in pattern_segments.iter().zip(path_segments.iter()) {
        if let Some(param) = expected.strip_prefix(':') {
            params.insert(param.to_string(), actual.to_string());
        } else if expected != actual {
            return None;
        }
    }
    Some(params)
}
