use super::ApiClient;
use crate::error::ClientResult;
use crate::models::{ProjectRequest, ProjectResponse};

/// Projects live under a workspace
pub struct ProjectApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ProjectApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    fn path(workspace_id: &str) -> String {
        format!("/workspaces/{}/projects", workspace_id)
    }

    pub async fn list(&self, workspace_id: &str) -> ClientResult<Vec<ProjectResponse>> {
        self.client.get(&Self::path(workspace_id)).await
    }

    pub async fn get(&self, workspace_id: &str, project_id: &str) -> ClientResult<ProjectResponse> {
        self.client
            .get(&format!("{}/{}", Self::path(workspace_id), project_id))
            .await
    }

    pub async fn create(&self, workspace_id: &str, data: &ProjectRequest) -> ClientResult<ProjectResponse> {
        self.client.post(&Self::path(workspace_id), data).await
    }

    pub async fn update(
        &self,
        workspace_id: &str,
        project_id: &str,
        data: &ProjectRequest,
    ) -> ClientResult<ProjectResponse> {
        self.client
            .put(&format!("{}/{}", Self::path(workspace_id), project_id), data)
            .await
    }

    pub async fn delete(&self, workspace_id: &str, project_id: &str) -> ClientResult<()> {
        self.client
            .delete(&format!("{}/{}", Self::path(workspace_id), project_id))
            .await
    }
}
