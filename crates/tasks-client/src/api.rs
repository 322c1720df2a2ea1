use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use tracing::debug;

use tasks_core::{Task, TaskFilter, TaskId, TaskInput};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

/// The five task endpoints.
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>, ClientError>;
    async fn get(&self, id: TaskId) -> Result<Task, ClientError>;
    async fn create(&self, input: &TaskInput) -> Result<Task, ClientError>;
    /// Full replacement of the stored task with the same id.
    async fn update(&self, task: &Task) -> Result<(), ClientError>;
    async fn delete(&self, id: TaskId) -> Result<(), ClientError>;
}

/// [`TaskApi`] over HTTP.
#[derive(Clone, Debug)]
pub struct TaskClient {
    http: reqwest::Client,
    base_url: String,
}

impl TaskClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn tasks_url(&self) -> String {
        format!("{}/api/tasks", self.base_url)
    }

    fn task_url(&self, id: TaskId) -> String {
        format!("{}/api/tasks/{id}", self.base_url)
    }
}

async fn check(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::Status { status, body })
}

#[async_trait]
impl TaskApi for TaskClient {
    async fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>, ClientError> {
        let resp = self
            .http
            .get(self.tasks_url())
            .query(&filter.to_query())
            .send()
            .await?;
        let tasks: Vec<Task> = check(resp).await?.json().await?;
        debug!(count = tasks.len(), "fetched tasks");
        Ok(tasks)
    }

    async fn get(&self, id: TaskId) -> Result<Task, ClientError> {
        let resp = self.http.get(self.task_url(id)).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    async fn create(&self, input: &TaskInput) -> Result<Task, ClientError> {
        let resp = self.http.post(self.tasks_url()).json(input).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    async fn update(&self, task: &Task) -> Result<(), ClientError> {
        let resp = self
            .http
            .put(self.task_url(task.id))
            .json(&task.to_input())
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> Result<(), ClientError> {
        let resp = self.http.delete(self.task_url(id)).send().await?;
        check(resp).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let client = TaskClient::new("http://localhost:5266/");
        assert_eq!(client.base_url(), "http://localhost:5266");
        assert_eq!(client.task_url(3), "http://localhost:5266/api/tasks/3");
        assert_eq!(client.tasks_url(), "http://localhost:5266/api/tasks");
    }

    #[test]
    fn not_found_detection() {
        let err = ClientError::Status {
            status: StatusCode::NOT_FOUND,
            body: String::new(),
        };
        assert!(err.is_not_found());
        let err = ClientError::Status {
            status: StatusCode::BAD_REQUEST,
            body: String::new(),
        };
        assert!(!err.is_not_found());
    }
}
