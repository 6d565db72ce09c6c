use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use std::time::Duration;

use super::SyncGateway;
use crate::core::filter::StatusFilter;
use crate::core::task::{NewTask, Task, TaskId};
use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api/tasks/";

#[derive(Debug, Clone)]
pub struct RestConfig {
    pub base_url: String,
    /// No deadline when unset; a slow request is reported whenever it resolves.
    pub timeout: Option<Duration>,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: None,
        }
    }
}

/// Task API client: `GET/POST {base}` and `PUT/DELETE {base}{id}/`.
#[derive(Debug, Clone)]
pub struct RestGateway {
    base_url: Url,
    http: Client,
}

impl RestGateway {
    pub fn new(config: RestConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        // Url::join drops the last segment unless the base ends in a slash
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }

        Ok(Self {
            base_url: Url::parse(&base)?,
            http,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn task_url(&self, id: &TaskId) -> Result<Url> {
        Ok(self.base_url.join(&format!("{}/", id))?)
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let resp = request.send().await.map_err(|e| {
            log::warn!("{} failed: {}", what, e);
            Error::Network(e)
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        log::warn!("{} returned {}: {}", what, status, body);
        Err(Error::backend(status, body))
    }
}

#[async_trait]
impl SyncGateway for RestGateway {
    async fn list(&self, filter: StatusFilter) -> Result<Vec<Task>> {
        let mut request = self.http.get(self.base_url.clone());
        if filter != StatusFilter::All {
            request = request.query(&[("status", filter.as_query())]);
        }

        let resp = self.send(request, "GET tasks").await?;
        let tasks: Vec<Task> = resp.json().await?;
        log::debug!("Fetched {} tasks (filter: {})", tasks.len(), filter);
        Ok(tasks)
    }

    async fn create(&self, task: NewTask) -> Result<Task> {
        let request = self.http.post(self.base_url.clone()).json(&task);
        let resp = self.send(request, "POST task").await?;
        let created: Task = resp.json().await?;
        log::info!("Created task {}: {}", created.id, created.task);
        Ok(created)
    }

    async fn update(&self, id: &TaskId, task: Task) -> Result<Task> {
        let request = self.http.put(self.task_url(id)?).json(&task);
        let resp = self.send(request, &format!("PUT task {}", id)).await?;
        let updated: Task = resp.json().await?;
        log::info!("Updated task {} ({})", updated.id, updated.status);
        Ok(updated)
    }

    async fn delete(&self, id: &TaskId) -> Result<()> {
        let request = self.http.delete(self.task_url(id)?);
        self.send(request, &format!("DELETE task {}", id)).await?;
        log::info!("Deleted task {}", id);
        Ok(())
    }
}
