use parking_lot::RwLock;
use thiserror::Error;

use super::{auth_guard, resolve, split_path, Location, NavigationDecision, AUTH_VIEW_PATHS, LOGIN};
use crate::session::Session;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("No route matches {0}")]
    UnknownRoute(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationOutcome {
    /// Full path the user ended up on
    pub path: String,
    pub redirected: bool,
}

/// Holds the current location and applies the auth guard on every navigation
#[derive(Debug)]
pub struct Navigator {
    session: Session,
    current: RwLock<String>,
}

impl Navigator {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            current: RwLock::new("/".to_string()),
        }
    }

    /// Full path of the current location, query included
    pub fn current(&self) -> String {
        self.current.read().clone()
    }

    pub fn current_path(&self) -> String {
        let current = self.current.read();
        split_path(&current).0.to_string()
    }

    pub fn is_on_auth_view(&self) -> bool {
        AUTH_VIEW_PATHS.contains(&self.current_path().as_str())
    }

    pub fn navigate(&self, full_path: &str) -> Result<NavigationOutcome, NavigationError> {
        let target =
            resolve(full_path).ok_or_else(|| NavigationError::UnknownRoute(full_path.to_string()))?;

        let outcome = match auth_guard(&target, self.session.has_token()) {
            NavigationDecision::Allow => NavigationOutcome {
                path: target.full_path,
                redirected: false,
            },
            NavigationDecision::Redirect(location) => {
                tracing::debug!("Navigation to {} redirected to {}", full_path, location.name);
                NavigationOutcome {
                    path: location.to_path(),
                    redirected: true,
                }
            }
        };

        *self.current.write() = outcome.path.clone();
        Ok(outcome)
    }

    /// Unconditional jump to the login view, used on session teardown
    pub fn redirect_to_login(&self) {
        tracing::info!("Redirecting to login");
        *self.current.write() = Location::named(LOGIN).to_path();
    }

    /// Post-login continuation target taken from the `redirect` query, "/" otherwise
    pub fn redirect_after_login(&self) -> String {
        let current = self.current.read();
        split_path(&current)
            .1
            .get("redirect")
            .filter(|target| target.starts_with('/'))
            .cloned()
            .unwrap_or_else(|| "/".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    fn navigator() -> (Session, Navigator) {
        let session = Session::new(Arc::new(MemoryStorage::new()));
        let navigator = Navigator::new(session.clone());
        (session, navigator)
    }

    #[test]
    fn anonymous_user_lands_on_login_and_continues_after_sign_in() {
        let (session, navigator) = navigator();

        let outcome = navigator.navigate("/workspace/projects").unwrap();
        assert!(outcome.redirected);
        assert_eq!(navigator.current_path(), "/login");
        assert!(navigator.is_on_auth_view());
        assert_eq!(navigator.redirect_after_login(), "/workspace/projects");

        session.set_access_token("t").unwrap();
        let outcome = navigator.navigate("/workspace/projects").unwrap();
        assert!(!outcome.redirected);
        assert_eq!(navigator.current(), "/workspace/projects");
    }

    #[test]
    fn expired_but_present_token_still_allows_navigation() {
        let (session, navigator) = navigator();
        session.set_access_token("expired-token").unwrap();
        assert!(!navigator.navigate("/").unwrap().redirected);
    }

    #[test]
    fn unknown_route_is_an_error() {
        let (_, navigator) = navigator();
        assert_eq!(
            navigator.navigate("/missing"),
            Err(NavigationError::UnknownRoute("/missing".to_string()))
        );
    }

    #[test]
    fn redirect_after_login_ignores_external_targets() {
        let (_, navigator) = navigator();
        navigator.navigate("/login?redirect=https://evil.example").unwrap();
        assert_eq!(navigator.redirect_after_login(), "/");
    }
}
