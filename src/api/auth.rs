use super::ApiClient;
use crate::error::ClientResult;
use crate::models::{
    AuthResponse, LoginRequest, RefreshTokenRequest, RefreshTokenResponse, RegisterRequest,
    RegisterResponse, UserResponse,
};

/// Authentication endpoints plus the locally stored credentials
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Log in and persist the returned tokens
    pub async fn login(&self, credentials: &LoginRequest) -> ClientResult<AuthResponse> {
        let response: AuthResponse = self.client.post("/auth/login", credentials).await?;
        if !response.token.is_empty() {
            self.client
                .session()
                .store_tokens(&response.token, response.refresh_token.as_deref())?;
        }
        Ok(response)
    }

    pub async fn register(&self, user: &RegisterRequest) -> ClientResult<RegisterResponse> {
        self.client.post("/auth/register", user).await
    }

    /// Call the logout endpoint; stored credentials are removed whatever the outcome
    pub async fn logout(&self) -> ClientResult<()> {
        let result = self.client.post_empty("/auth/logout").await;
        self.client.session().clear_credentials()?;
        result
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> ClientResult<RefreshTokenResponse> {
        let request = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };
        let response: RefreshTokenResponse = self.client.post("/auth/refresh", &request).await?;
        if !response.access_token.is_empty() {
            self.client
                .session()
                .store_tokens(&response.access_token, response.refresh_token.as_deref())?;
        }
        Ok(response)
    }

    pub async fn current_user(&self) -> ClientResult<UserResponse> {
        self.client.get("/users/me").await
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.session().has_token()
    }

    pub fn access_token(&self) -> Option<String> {
        self.client.session().access_token()
    }

    pub fn stored_user(&self) -> Option<UserResponse> {
        self.client.session().stored_user()
    }
}
