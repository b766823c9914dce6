use super::{Location, RouteTarget, HOME};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    Allow,
    Redirect(Location),
}

/// Decide whether a navigation may proceed.
///
/// Guest-only views bounce signed-in users home; protected views send
/// anonymous users to login with the requested path kept as `redirect`.
pub fn auth_guard(to: &RouteTarget, has_token: bool) -> NavigationDecision {
    if to.route.meta.guest_only && has_token {
        return NavigationDecision::Redirect(Location::named(HOME));
    }

    if to.route.meta.requires_auth && !has_token {
        return NavigationDecision::Redirect(Location::login_with_redirect(&to.full_path));
    }

    NavigationDecision::Allow
}
