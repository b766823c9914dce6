//! Shared HTTP client: bearer auth, one-shot token refresh on 401, forbidden notices.

use std::sync::Arc;

use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::{ApiErrorResponse, ClientError, ClientResult};
use crate::models::{RefreshTokenRequest, RefreshTokenResponse};
use crate::notify::Notices;
use crate::router::Navigator;
use crate::session::Session;

/// Requests whose 401 means bad credentials rather than an expired token
const AUTH_REQUEST_PATHS: [&str; 2] = ["/auth/login", "/auth/register"];

pub const REFRESH_PATH: &str = "/auth/refresh";
pub const FORBIDDEN_MESSAGE: &str = "You do not have permission to perform this action.";

/// One outgoing call; `retried` marks the replay after a token refresh
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub retried: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            retried: false,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Credential and refresh calls never trigger a refresh of their own
    fn is_auth_request(&self) -> bool {
        let path = self.path.split('?').next().unwrap_or(&self.path);
        AUTH_REQUEST_PATHS.contains(&path) || path == REFRESH_PATH
    }
}

pub struct ApiClient {
    // Shared by credential, refresh and replayed calls (one cookie jar)
    http: reqwest::Client,
    base_url: String,
    session: Session,
    navigator: Arc<Navigator>,
    notices: Notices,
}

impl ApiClient {
    pub fn new(
        config: &ApiConfig,
        session: Session,
        navigator: Arc<Navigator>,
        notices: Notices,
    ) -> ClientResult<Self> {
        url::Url::parse(&config.base_url)?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .cookie_store(config.with_credentials)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
            navigator,
            notices,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.execute(ApiRequest::new(Method::GET, path)).await?;
        decode(response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = ApiRequest::new(Method::POST, path).with_body(serde_json::to_value(body)?);
        let response = self.execute(request).await?;
        decode(response).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = ApiRequest::new(Method::PUT, path).with_body(serde_json::to_value(body)?);
        let response = self.execute(request).await?;
        decode(response).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = ApiRequest::new(Method::PATCH, path).with_body(serde_json::to_value(body)?);
        let response = self.execute(request).await?;
        decode(response).await
    }

    /// PATCH without a body (state transitions such as restore)
    pub async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.execute(ApiRequest::new(Method::PATCH, path)).await?;
        decode(response).await
    }

    /// POST without a body, ignoring whatever the server returns
    pub async fn post_empty(&self, path: &str) -> ClientResult<()> {
        self.execute(ApiRequest::new(Method::POST, path)).await?;
        Ok(())
    }

    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.execute(ApiRequest::new(Method::DELETE, path)).await?;
        Ok(())
    }

    /// Send a request, refreshing the access token once if the server answers 401
    pub async fn execute(&self, request: ApiRequest) -> ClientResult<Response> {
        let response = self.dispatch(&request).await?;

        if response.status() == StatusCode::UNAUTHORIZED && self.should_refresh(&request) {
            let original = error_from(response).await;
            tracing::warn!("{} {} returned 401, refreshing token", request.method, request.path);
            return self.refresh_and_retry(request, original).await;
        }

        self.check(response).await
    }

    fn should_refresh(&self, request: &ApiRequest) -> bool {
        !request.retried && !request.is_auth_request() && !self.navigator.is_on_auth_view()
    }

    async fn dispatch(&self, request: &ApiRequest) -> ClientResult<Response> {
        tracing::debug!(
            method = %request.method,
            path = %request.path,
            retried = request.retried,
            "API request"
        );

        let mut builder = self
            .http
            .request(request.method.clone(), self.url(&request.path));
        if let Some(token) = self.session.access_token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        Ok(builder.send().await?)
    }

    async fn refresh_and_retry(
        &self,
        mut request: ApiRequest,
        original: ClientError,
    ) -> ClientResult<Response> {
        request.retried = true;

        let Some(refresh_token) = self.session.refresh_token() else {
            tracing::warn!("No refresh token stored, ending session");
            self.end_session();
            return Err(original);
        };

        if let Err(e) = self.refresh_tokens(refresh_token).await {
            tracing::warn!("Token refresh failed: {}", e);
            self.end_session();
            return Err(e);
        }

        let response = self.dispatch(&request).await?;
        self.check(response).await
    }

    async fn refresh_tokens(&self, refresh_token: String) -> ClientResult<()> {
        let response = self
            .http
            .post(self.url(REFRESH_PATH))
            .json(&RefreshTokenRequest { refresh_token })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from(response).await);
        }

        let tokens: RefreshTokenResponse = decode(response).await?;
        self.session
            .store_tokens(&tokens.access_token, tokens.refresh_token.as_deref())?;
        tracing::info!("Access token refreshed");
        Ok(())
    }

    fn end_session(&self) {
        if let Err(e) = self.session.clear() {
            tracing::error!("Failed to clear session storage: {}", e);
        }
        self.navigator.redirect_to_login();
    }

    async fn check(&self, response: Response) -> ClientResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let error = error_from(response).await;
        if error.is_forbidden() {
            tracing::warn!("Access forbidden: {}", error);
            self.notices.error(FORBIDDEN_MESSAGE);
        }
        Err(error)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

async fn error_from(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let raw = response.text().await.unwrap_or_default();

    let body = match serde_json::from_str::<ApiErrorResponse>(&raw) {
        Ok(mut body) => {
            if body.status == 0 {
                body.status = status;
            }
            body
        }
        Err(_) => ApiErrorResponse::from_status(status, &raw),
    };
    ClientError::api(status, body)
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_and_refresh_calls_are_auth_requests() {
        assert!(ApiRequest::new(Method::POST, "/auth/login").is_auth_request());
        assert!(ApiRequest::new(Method::POST, "/auth/register?x=1").is_auth_request());
        assert!(ApiRequest::new(Method::POST, "/auth/refresh").is_auth_request());
        assert!(!ApiRequest::new(Method::POST, "/auth/logout").is_auth_request());
        assert!(!ApiRequest::new(Method::GET, "/workspaces").is_auth_request());
    }

    #[test]
    fn relative_base_url_is_rejected() {
        let config = ApiConfig {
            base_url: "/api/v1".into(),
            timeout_ms: 1000,
            with_credentials: false,
        };
        let session = Session::new(Arc::new(crate::storage::MemoryStorage::new()));
        let navigator = Arc::new(Navigator::new(session.clone()));
        let err = ApiClient::new(&config, session, navigator, Notices::new()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_URL");
    }
}
