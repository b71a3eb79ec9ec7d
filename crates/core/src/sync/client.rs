//! REST client mirroring local collections to the backend
//!
//! The backend exposes `GET/POST/PUT {base}/{collection}` and
//! `PUT {base}/{collection}/{id}`. Ids always travel as strings.

use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::SyncOutcome;
use crate::config::TrackerConfig;
use crate::entity::Entity;
use crate::error::Error;
use crate::project::Project;
use crate::task::Task;
use crate::Result;

/// Client for the remote CRUD API
#[derive(Debug, Clone)]
pub struct RemoteSync {
    client: Client,
    /// `None` disables every call
    base_url: Option<String>,
}

impl RemoteSync {
    /// Create a client for `base_url`; `None` disables synchronization
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.map(|url| url.trim_end_matches('/').to_string()),
        }
    }

    /// A client that skips every call
    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(config.sync_base_url())
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.base_url.is_some()
    }

    pub async fn post_project(&self, project: &Project) -> Result<SyncOutcome> {
        self.create(project).await
    }

    pub async fn post_task(&self, task: &Task) -> Result<SyncOutcome> {
        self.create(task).await
    }

    pub async fn put_project(&self, project: &Project) -> Result<SyncOutcome> {
        self.upsert(project).await
    }

    pub async fn put_task(&self, task: &Task) -> Result<SyncOutcome> {
        self.upsert(task).await
    }

    pub async fn fetch_projects(&self) -> Result<Option<Vec<Project>>> {
        self.fetch_all().await
    }

    pub async fn fetch_tasks(&self) -> Result<Option<Vec<Task>>> {
        self.fetch_all().await
    }

    /// POST the entity to its collection
    pub async fn create<T: Entity>(&self, entity: &T) -> Result<SyncOutcome> {
        let Some(base_url) = self.base_url.as_deref() else {
            debug!("Sync disabled, skipping create of {} {}", T::LABEL, entity.id());
            return Ok(SyncOutcome::Skipped);
        };

        self.send_create(base_url, entity).await
    }

    /// PUT the entity if the backend already has it, POST it otherwise
    pub async fn upsert<T: Entity>(&self, entity: &T) -> Result<SyncOutcome> {
        let Some(base_url) = self.base_url.as_deref() else {
            debug!("Sync disabled, skipping update of {} {}", T::LABEL, entity.id());
            return Ok(SyncOutcome::Skipped);
        };

        if !self.exists_remotely(base_url, entity).await? {
            warn!(
                "{} {} not found on server. Creating it...",
                T::LABEL,
                entity.id()
            );
            return self
                .send_create(base_url, entity)
                .await
                .map_err(|e| Error::CreateFallback(Box::new(e)));
        }

        let url = format!("{}/{}/{}", base_url, T::COLLECTION, entity.wire_id());
        let resp = self
            .client
            .put(&url)
            .json(&wire_body(entity)?)
            .send()
            .await
            .map_err(|e| {
                Error::Remote(format!("Failed to update {} {}: {}", T::LABEL, entity.id(), e))
            })?;
        ensure_success(resp, &format!("Failed to update {} {}", T::LABEL, entity.id())).await?;

        info!("Updated {} {} on server", T::LABEL, entity.id());
        Ok(SyncOutcome::Updated)
    }

    /// Download the whole collection, or `None` when sync is disabled
    pub async fn fetch_all<T: Entity>(&self) -> Result<Option<Vec<T>>> {
        let Some(base_url) = self.base_url.as_deref() else {
            return Ok(None);
        };

        let url = format!("{}/{}/", base_url, T::COLLECTION);
        let resp = self.client.get(&url).send().await.map_err(|e| {
            Error::Remote(format!("Failed to fetch {}: {}", T::COLLECTION, e))
        })?;
        let resp = ensure_success(resp, &format!("Failed to fetch {}", T::COLLECTION)).await?;

        let items: Vec<T> = resp.json().await.map_err(|e| {
            Error::Remote(format!("Failed to parse {} response: {}", T::COLLECTION, e))
        })?;

        debug!("Fetched {} {} from server", items.len(), T::COLLECTION);
        Ok(Some(items))
    }

    async fn send_create<T: Entity>(&self, base_url: &str, entity: &T) -> Result<SyncOutcome> {
        let url = format!("{}/{}", base_url, T::COLLECTION);
        let resp = self
            .client
            .post(&url)
            .json(&wire_body(entity)?)
            .send()
            .await
            .map_err(|e| {
                Error::Remote(format!("Failed to create {} {}: {}", T::LABEL, entity.id(), e))
            })?;
        ensure_success(resp, &format!("Failed to create {} {}", T::LABEL, entity.id())).await?;

        info!("Created {} {} on server", T::LABEL, entity.id());
        Ok(SyncOutcome::Created)
    }

    async fn exists_remotely<T: Entity>(&self, base_url: &str, entity: &T) -> Result<bool> {
        let wire_id = entity.wire_id();
        let url = format!("{}/{}?id={}", base_url, T::COLLECTION, wire_id);

        let resp = self.client.get(&url).send().await.map_err(|e| {
            Error::Remote(format!("Failed to look up {} {}: {}", T::LABEL, wire_id, e))
        })?;
        let resp = ensure_success(resp, &format!("Failed to look up {} {}", T::LABEL, wire_id)).await?;

        let data: Value = resp.json().await.map_err(|e| {
            Error::Remote(format!("Failed to parse lookup response: {}", e))
        })?;

        Ok(data
            .as_array()
            .is_some_and(|records| records.iter().any(|r| id_matches(r.get("id"), &wire_id))))
    }
}

/// Serialize the entity with its id replaced by the string form
fn wire_body<T: Entity>(entity: &T) -> Result<Value> {
    let mut body = serde_json::to_value(entity)?;
    if let Some(fields) = body.as_object_mut() {
        fields.insert("id".to_string(), Value::String(entity.wire_id()));
    }
    Ok(body)
}

fn id_matches(id: Option<&Value>, wire_id: &str) -> bool {
    match id {
        Some(Value::String(id)) => id == wire_id,
        Some(Value::Number(id)) => id.to_string() == wire_id,
        _ => false,
    }
}

async fn ensure_success(resp: Response, context: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_default();
    Err(Error::Remote(format!("{}: HTTP {} {}", context, status, text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskStatus;
    use serde_json::json;

    #[test]
    fn test_wire_body_stringifies_id() {
        let task = Task::new(42, "Ship it", 7).with_status(TaskStatus::Completed);
        let body = wire_body(&task).unwrap();

        assert_eq!(body["id"], json!("42"));
        assert_eq!(body["projectId"], json!(7));
        assert_eq!(body["status"], json!("Completed"));
    }

    #[test]
    fn test_id_matches_string_and_number() {
        assert!(id_matches(Some(&json!("5")), "5"));
        assert!(id_matches(Some(&json!(5)), "5"));
        assert!(!id_matches(Some(&json!("50")), "5"));
        assert!(!id_matches(None, "5"));
        assert!(!id_matches(Some(&json!(null)), "5"));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let remote = RemoteSync::new(Some("http://localhost:3000/".to_string()));
        assert_eq!(remote.base_url(), Some("http://localhost:3000"));
        assert!(remote.is_enabled());
    }

    #[tokio::test]
    async fn test_disabled_client_skips_everything() {
        let remote = RemoteSync::disabled();
        let project = Project::new(1, "Offline");
        let task = Task::new(1, "Offline task", 1);

        assert_eq!(remote.post_project(&project).await.unwrap(), SyncOutcome::Skipped);
        assert_eq!(remote.put_project(&project).await.unwrap(), SyncOutcome::Skipped);
        assert_eq!(remote.post_task(&task).await.unwrap(), SyncOutcome::Skipped);
        assert_eq!(remote.put_task(&task).await.unwrap(), SyncOutcome::Skipped);
        assert!(remote.fetch_projects().await.unwrap().is_none());
        assert!(remote.fetch_tasks().await.unwrap().is_none());
    }

    #[test]
    fn test_production_config_without_url_disables_client() {
        let config = TrackerConfig::default().with_production(true);
        assert!(!RemoteSync::from_config(&config).is_enabled());
    }
}
