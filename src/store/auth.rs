use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{has_status, Status, Store};
use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::models::{LoginRequest, RefreshTokenResponse, RegisterRequest, RegisterResponse, UserResponse};
use crate::notify::Notices;
use crate::storage::keys;
use crate::validation::Validate;

#[derive(Debug, Clone, Default, Serialize)]
pub struct AuthState {
    pub user: Option<UserResponse>,
    pub status: Status,
}

has_status!(AuthState);

/// Persisted form of the auth store
#[derive(Debug, Serialize, Deserialize)]
struct AuthSnapshot {
    user: Option<UserResponse>,
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: UserResponse,
    pub token: String,
}

pub struct AuthStore {
    client: Arc<ApiClient>,
    notices: Notices,
    state: Store<AuthState>,
}

impl AuthStore {
    pub fn new(client: Arc<ApiClient>, notices: Notices) -> Self {
        let session = client.session();
        let user = session
            .stored_user()
            .or_else(|| session.snapshot::<AuthSnapshot>(keys::AUTH).and_then(|s| s.user));

        Self {
            client,
            notices,
            state: Store::new(AuthState {
                user,
                status: Status::default(),
            }),
        }
    }

    pub fn state(&self) -> &Store<AuthState> {
        &self.state
    }

    pub fn user(&self) -> Option<UserResponse> {
        self.state.read(|s| s.user.clone())
    }

    /// Token presence, not the loaded profile, decides authentication
    pub fn is_authenticated(&self) -> bool {
        self.client.session().has_token()
    }

    pub fn user_name(&self) -> String {
        self.state
            .read(|s| s.user.as_ref().map(|u| u.display_name()).unwrap_or_default())
    }

    pub fn user_email(&self) -> String {
        self.state
            .read(|s| s.user.as_ref().map(|u| u.email.clone()).unwrap_or_default())
    }

    pub fn user_id(&self) -> String {
        self.state
            .read(|s| s.user.as_ref().map(|u| u.id.clone()).unwrap_or_default())
    }

    /// Log in, then load and persist the profile of the signed-in user
    pub async fn login(&self, credentials: &LoginRequest) -> ClientResult<LoginOutcome> {
        credentials.validate()?;

        let client = &self.client;
        let call = async move {
            let auth = client.auth().login(credentials).await?;
            let user = client.auth().current_user().await?;
            client.session().store_user(&user)?;
            Ok::<_, ClientError>(LoginOutcome {
                user,
                token: auth.token,
            })
        };

        let outcome = self
            .state
            .action(&self.notices, "Login failed", call, |s, outcome| {
                s.user = Some(outcome.user.clone());
            })
            .await?;

        self.persist();
        tracing::info!("Logged in as {}", outcome.user.email);
        Ok(outcome)
    }

    pub async fn register(&self, user: &RegisterRequest) -> ClientResult<RegisterResponse> {
        user.validate()?;
        self.state
            .action(
                &self.notices,
                "Registration failed",
                self.client.auth().register(user),
                |_, _| {},
            )
            .await
    }

    /// End the session locally whatever the server says; API failures are recorded, not returned
    pub async fn logout(&self) {
        self.state.update(|s| {
            s.status.loading = true;
            s.status.error = None;
        });

        let result = self.client.auth().logout().await;
        if let Err(e) = &result {
            tracing::warn!("Logout call failed, clearing session anyway: {}", e);
        }

        self.state.update(|s| {
            s.user = None;
            s.status.loading = false;
            if let Err(e) = &result {
                s.status.error = Some(e.user_message("Logout failed"));
            }
        });
        self.clear_storage();
        tracing::info!("Logged out");
    }

    pub async fn fetch_profile(&self) -> ClientResult<UserResponse> {
        let client = &self.client;
        let call = async move {
            let user = client.auth().current_user().await?;
            client.session().store_user(&user)?;
            Ok::<_, ClientError>(user)
        };

        let user = self
            .state
            .action(&self.notices, "Failed to fetch profile", call, |s, user| {
                s.user = Some(user.clone());
            })
            .await?;
        self.persist();
        Ok(user)
    }

    /// Exchange the stored refresh token; the profile is dropped on failure
    pub async fn refresh_token(&self) -> ClientResult<RefreshTokenResponse> {
        let result = match self.client.session().refresh_token() {
            Some(token) => self.client.auth().refresh_token(&token).await,
            None => Err(ClientError::MissingRefreshToken),
        };

        if result.is_err() {
            self.state.update(|s| s.user = None);
        }
        result
    }

    pub fn clear_error(&self) {
        self.state.clear_error();
    }

    /// Drop the profile and stored credentials without calling the server
    pub fn clear_all_data(&self) {
        self.state.update(|s| {
            s.user = None;
            s.status.error = None;
        });
        self.clear_storage();
    }

    fn persist(&self) {
        let snapshot = AuthSnapshot { user: self.user() };
        if let Err(e) = self.client.session().save_snapshot(keys::AUTH, &snapshot) {
            tracing::warn!("Failed to persist auth state: {}", e);
        }
    }

    fn clear_storage(&self) {
        let session = self.client.session();
        let result = session
            .clear_credentials()
            .and_then(|_| session.storage().remove(keys::AUTH));
        if let Err(e) = result {
            tracing::warn!("Failed to clear stored credentials: {}", e);
        }
    }
}
