use async_trait::async_trait;

use crate::config::AppConfig;
use crate::core::error::StoreError;
use crate::core::models::{Task, TaskStatus};
use super::api::{decode_payload, decode_task_list, error_from_response, ApiClient};

/// Remote source of truth for tasks.
///
/// Futures are `!Send`: everything runs on the browser's single thread.
#[async_trait(?Send)]
pub trait TaskStore {
    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError>;

    async fn set_task_status(&self, task_id: &str, status: TaskStatus) -> Result<Task, StoreError>;
}

/// [`TaskStore`] backed by the ToggleNest REST API.
#[derive(Debug, Clone)]
pub struct HttpTaskStore {
    client: ApiClient,
}

impl HttpTaskStore {
    pub fn new(config: AppConfig) -> Self {
        Self { client: ApiClient::new(config) }
    }
}

#[async_trait(?Send)]
impl TaskStore for HttpTaskStore {
    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let response = self.client.send("GET", "/tasks", None).await?;
        if !response.is_success() {
            return Err(error_from_response(&response, None));
        }
        decode_task_list("/tasks", &response.body)
    }

    async fn set_task_status(&self, task_id: &str, status: TaskStatus) -> Result<Task, StoreError> {
        let path = format!("/tasks/{}/status", task_id);
        let body = serde_json::json!({ "status": status });

        let response = self.client.send("PATCH", &path, Some(&body)).await?;
        if !response.is_success() {
            return Err(error_from_response(&response, Some(task_id)));
        }
        decode_payload(&path, &response.body)
    }
}
