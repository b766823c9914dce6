use super::ApiClient;
use crate::error::ClientResult;
use crate::models::{TaskRequest, TaskResponse};

pub struct TaskApi<'a> {
    client: &'a ApiClient,
}

impl<'a> TaskApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    fn path(project_id: &str) -> String {
        format!("/projects/{}/tasks", project_id)
    }

    pub async fn list(&self, project_id: &str) -> ClientResult<Vec<TaskResponse>> {
        self.client.get(&Self::path(project_id)).await
    }

    pub async fn get(&self, project_id: &str, task_id: &str) -> ClientResult<TaskResponse> {
        self.client
            .get(&format!("{}/{}", Self::path(project_id), task_id))
            .await
    }

    pub async fn create(&self, project_id: &str, data: &TaskRequest) -> ClientResult<TaskResponse> {
        self.client.post(&Self::path(project_id), data).await
    }

    pub async fn update(
        &self,
        project_id: &str,
        task_id: &str,
        data: &TaskRequest,
    ) -> ClientResult<TaskResponse> {
        self.client
            .put(&format!("{}/{}", Self::path(project_id), task_id), data)
            .await
    }

    pub async fn delete(&self, project_id: &str, task_id: &str) -> ClientResult<()> {
        self.client
            .delete(&format!("{}/{}", Self::path(project_id), task_id))
            .await
    }
}
