//! REST resource wrappers over the shared `ApiClient`
pub mod auth;
pub mod client;
pub mod notification;
pub mod project;
pub mod task;
pub mod workspace;

pub use auth::AuthApi;
pub use client::{ApiClient, ApiRequest, FORBIDDEN_MESSAGE};
pub use notification::NotificationApi;
pub use project::ProjectApi;
pub use task::TaskApi;
pub use workspace::WorkspaceApi;

impl ApiClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn workspaces(&self) -> WorkspaceApi<'_> {
        WorkspaceApi::new(self)
    }

    pub fn projects(&self) -> ProjectApi<'_> {
        ProjectApi::new(self)
    }

    pub fn tasks(&self) -> TaskApi<'_> {
        TaskApi::new(self)
    }

    pub fn notifications(&self) -> NotificationApi<'_> {
        NotificationApi::new(self)
    }
}
