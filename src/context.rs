//! Process-wide client state, constructed once and passed explicitly

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::error::ClientResult;
use crate::hooks::NotificationPoller;
use crate::notify::Notices;
use crate::router::Navigator;
use crate::session::Session;
use crate::storage::{MemoryStorage, Storage};
use crate::store::{AuthStore, NotificationStore, ProjectStore, TaskStore, WorkspaceStore};

pub struct AppContext {
    config: AppConfig,
    session: Session,
    notices: Notices,
    navigator: Arc<Navigator>,
    client: Arc<ApiClient>,
    auth: Arc<AuthStore>,
    workspaces: Arc<WorkspaceStore>,
    projects: Arc<ProjectStore>,
    tasks: Arc<TaskStore>,
    notifications: Arc<NotificationStore>,
}

impl AppContext {
    pub fn new(config: AppConfig, storage: Arc<dyn Storage>) -> ClientResult<Self> {
        let session = Session::new(storage);
        let notices = Notices::new();
        let navigator = Arc::new(Navigator::new(session.clone()));
        let client = Arc::new(ApiClient::new(
            &config.api,
            session.clone(),
            navigator.clone(),
            notices.clone(),
        )?);

        Ok(Self {
            auth: Arc::new(AuthStore::new(client.clone(), notices.clone())),
            workspaces: Arc::new(WorkspaceStore::new(client.clone(), notices.clone())),
            projects: Arc::new(ProjectStore::new(client.clone(), notices.clone())),
            tasks: Arc::new(TaskStore::new(client.clone(), notices.clone())),
            notifications: Arc::new(NotificationStore::new(client.clone(), notices.clone())),
            config,
            session,
            notices,
            navigator,
            client,
        })
    }

    /// Context whose session lives only as long as the process
    pub fn in_memory(config: AppConfig) -> ClientResult<Self> {
        Self::new(config, Arc::new(MemoryStorage::new()))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn navigator(&self) -> &Arc<Navigator> {
        &self.navigator
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    pub fn auth(&self) -> &Arc<AuthStore> {
        &self.auth
    }

    pub fn workspaces(&self) -> &Arc<WorkspaceStore> {
        &self.workspaces
    }

    pub fn projects(&self) -> &Arc<ProjectStore> {
        &self.projects
    }

    pub fn tasks(&self) -> &Arc<TaskStore> {
        &self.tasks
    }

    pub fn notifications(&self) -> &Arc<NotificationStore> {
        &self.notifications
    }

    /// Sign out and reset every store, then go to the login view
    pub async fn logout(&self) {
        self.auth.logout().await;
        self.workspaces.clear_all_data();
        self.projects.clear_all_data();
        self.tasks.clear_all_data();
        self.notifications.clear_notifications();
        self.navigator.redirect_to_login();
    }

    /// Poll the unread count at the configured interval
    pub fn start_notification_polling(&self) -> NotificationPoller {
        NotificationPoller::start(
            self.notifications.clone(),
            self.config.polling.notification_interval(),
        )
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("environment", &self.config.environment)
            .field("client", &self.client)
            .field("session", &self.session)
            .finish()
    }
}
