use std::sync::Arc;

use serde::Serialize;

use super::{has_status, remove_by_id, replace_by_id, Status, Store};
use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::models::{TaskRequest, TaskResponse};
use crate::notify::Notices;
use crate::validation::Validate;

#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskState {
    pub tasks: Vec<TaskResponse>,
    pub current: Option<TaskResponse>,
    pub status: Status,
}

has_status!(TaskState);

pub struct TaskStore {
    client: Arc<ApiClient>,
    notices: Notices,
    state: Store<TaskState>,
}

impl TaskStore {
    pub fn new(client: Arc<ApiClient>, notices: Notices) -> Self {
        Self {
            client,
            notices,
            state: Store::new(TaskState::default()),
        }
    }

    pub fn state(&self) -> &Store<TaskState> {
        &self.state
    }

    pub fn tasks(&self) -> Vec<TaskResponse> {
        self.state.read(|s| s.tasks.clone())
    }

    pub fn current_task(&self) -> Option<TaskResponse> {
        self.state.read(|s| s.current.clone())
    }

    pub async fn fetch_tasks(&self, project_id: &str) -> ClientResult<Vec<TaskResponse>> {
        if !self.client.session().has_token() {
            return Ok(Vec::new());
        }

        self.state
            .action(
                &self.notices,
                "Failed to fetch tasks",
                self.client.tasks().list(project_id),
                |s, tasks| s.tasks = tasks.clone(),
            )
            .await
    }

    pub async fn fetch_task(&self, project_id: &str, task_id: &str) -> ClientResult<TaskResponse> {
        self.state
            .action(
                &self.notices,
                "Failed to fetch task",
                self.client.tasks().get(project_id, task_id),
                |s, task| s.current = Some(task.clone()),
            )
            .await
    }

    pub async fn create_task(&self, project_id: &str, data: &TaskRequest) -> ClientResult<TaskResponse> {
        data.validate()?;
        self.state
            .action(
                &self.notices,
                "Failed to create task",
                self.client.tasks().create(project_id, data),
                |s, task| s.tasks.push(task.clone()),
            )
            .await
    }

    pub async fn update_task(
        &self,
        project_id: &str,
        task_id: &str,
        data: &TaskRequest,
    ) -> ClientResult<TaskResponse> {
        data.validate()?;
        self.state
            .action(
                &self.notices,
                "Failed to update task",
                self.client.tasks().update(project_id, task_id, data),
                |s, task| {
                    replace_by_id(&mut s.tasks, task.clone());
                    if s.current.as_ref().map(|t| t.id.as_str()) == Some(task_id) {
                        s.current = Some(task.clone());
                    }
                },
            )
            .await
    }

    pub async fn delete_task(&self, project_id: &str, task_id: &str) -> ClientResult<()> {
        self.state
            .action(
                &self.notices,
                "Failed to delete task",
                self.client.tasks().delete(project_id, task_id),
                |s, _| {
                    remove_by_id(&mut s.tasks, task_id);
                    if s.current.as_ref().map(|t| t.id.as_str()) == Some(task_id) {
                        s.current = None;
                    }
                },
            )
            .await
    }

    pub fn clear_tasks(&self) {
        self.state.update(|s| {
            s.tasks.clear();
            s.current = None;
        });
    }

    pub fn clear_error(&self) {
        self.state.clear_error();
    }

    pub fn clear_all_data(&self) {
        self.state.update(|s| {
            s.tasks.clear();
            s.current = None;
            s.status.error = None;
        });
    }
}
