//! Project model definitions

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::entity::{deserialize_id, Entity};
use crate::task::TaskStatus;

/// A project grouping a set of tasks.
///
/// `tasks_amount` is informational only. It is stored and transmitted as-is
/// and never recomputed from the task collection; use
/// [`crate::filter::task_amount`] for the real count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique project identifier
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,

    /// Display name, matched by the search box
    pub name: String,

    pub status: TaskStatus,

    /// Creation date as a date string (e.g. "2024-03-18")
    #[serde(default)]
    pub created_at: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub tasks_amount: i64,
}

impl Project {
    /// Create a new project dated today
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            status: TaskStatus::default(),
            created_at: Utc::now().format("%Y-%m-%d").to_string(),
            description: String::new(),
            tasks_amount: 0,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the creation date
    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = created_at.into();
        self
    }
}

impl Entity for Project {
    const COLLECTION: &'static str = "projects";
    const STORAGE_KEY: &'static str = "projectsData";
    const LABEL: &'static str = "Project";

    fn id(&self) -> i64 {
        self.id
    }
}
