use std::sync::Arc;

use serde::Serialize;

use super::{has_status, remove_by_id, replace_by_id, Status, Store};
use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::models::{ProjectRequest, ProjectResponse};
use crate::notify::Notices;
use crate::rbac::{ProjectAccess, ProjectRole};
use crate::storage::keys;
use crate::validation::Validate;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectState {
    pub projects: Vec<ProjectResponse>,
    pub current: Option<ProjectResponse>,
    pub status: Status,
}

has_status!(ProjectState);

pub struct ProjectStore {
    client: Arc<ApiClient>,
    notices: Notices,
    state: Store<ProjectState>,
}

impl ProjectStore {
    pub fn new(client: Arc<ApiClient>, notices: Notices) -> Self {
        let current = client.session().snapshot::<ProjectResponse>(keys::PROJECT);
        Self {
            client,
            notices,
            state: Store::new(ProjectState {
                current,
                ..Default::default()
            }),
        }
    }

    pub fn state(&self) -> &Store<ProjectState> {
        &self.state
    }

    pub fn projects(&self) -> Vec<ProjectResponse> {
        self.state.read(|s| s.projects.clone())
    }

    pub fn current_project(&self) -> Option<ProjectResponse> {
        self.state.read(|s| s.current.clone())
    }

    /// Role of the current user in the current project
    pub fn current_role(&self) -> Option<ProjectRole> {
        self.state.read(|s| {
            s.current
                .as_ref()
                .and_then(|p| p.current_member_type.as_deref())
                .and_then(|role| role.parse().ok())
        })
    }

    pub fn access(&self) -> ProjectAccess {
        ProjectAccess::new(self.current_role())
    }

    pub async fn fetch_projects(&self, workspace_id: &str) -> ClientResult<Vec<ProjectResponse>> {
        if !self.client.session().has_token() {
            return Ok(Vec::new());
        }

        self.state
            .action(
                &self.notices,
                "Failed to fetch projects",
                self.client.projects().list(workspace_id),
                |s, projects| s.projects = projects.clone(),
            )
            .await
    }

    /// Load one project and make it current
    pub async fn fetch_project(&self, workspace_id: &str, project_id: &str) -> ClientResult<ProjectResponse> {
        let project = self
            .state
            .action(
                &self.notices,
                "Failed to fetch project",
                self.client.projects().get(workspace_id, project_id),
                |s, project| s.current = Some(project.clone()),
            )
            .await?;
        self.persist_current();
        Ok(project)
    }

    pub async fn create_project(&self, workspace_id: &str, data: &ProjectRequest) -> ClientResult<ProjectResponse> {
        data.validate()?;
        self.state
            .action(
                &self.notices,
                "Failed to create project",
                self.client.projects().create(workspace_id, data),
                |s, project| s.projects.push(project.clone()),
            )
            .await
    }

    pub async fn update_project(
        &self,
        workspace_id: &str,
        project_id: &str,
        data: &ProjectRequest,
    ) -> ClientResult<ProjectResponse> {
        data.validate()?;
        let project = self
            .state
            .action(
                &self.notices,
                "Failed to update project",
                self.client.projects().update(workspace_id, project_id, data),
                |s, project| {
                    replace_by_id(&mut s.projects, project.clone());
                    if s.current.as_ref().map(|p| p.id.as_str()) == Some(project_id) {
                        s.current = Some(project.clone());
                    }
                },
            )
            .await?;
        self.persist_current();
        Ok(project)
    }

    pub async fn delete_project(&self, workspace_id: &str, project_id: &str) -> ClientResult<()> {
        self.state
            .action(
                &self.notices,
                "Failed to delete project",
                self.client.projects().delete(workspace_id, project_id),
                |s, _| {
                    remove_by_id(&mut s.projects, project_id);
                    if s.current.as_ref().map(|p| p.id.as_str()) == Some(project_id) {
                        s.current = None;
                    }
                },
            )
            .await?;
        self.persist_current();
        Ok(())
    }

    /// Drop the list and current project, keeping any error
    pub fn clear_projects(&self) {
        self.state.update(|s| {
            s.projects.clear();
            s.current = None;
        });
        self.persist_current();
    }

    pub fn clear_error(&self) {
        self.state.clear_error();
    }

    pub fn clear_all_data(&self) {
        self.state.update(|s| {
            s.projects.clear();
            s.current = None;
            s.status.error = None;
        });
        self.persist_current();
    }

    fn persist_current(&self) {
        let session = self.client.session();
        let result = match self.current_project() {
            Some(project) => session.save_snapshot(keys::PROJECT, &project),
            None => session.storage().remove(keys::PROJECT),
        };
        if let Err(e) = result {
            tracing::warn!("Failed to persist current project: {}", e);
        }
    }
}
