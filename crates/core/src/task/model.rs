//! Task model definitions

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entity::{deserialize_id, Entity};

/// Workflow status shared by tasks and projects
///
/// Statuses outside the three known ones are kept verbatim in `Other` and
/// rank with `To Do` when sorting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
    #[serde(untagged)]
    Other(String),
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::ToDo
    }
}

impl TaskStatus {
    /// Rank used when sorting by status; completed work sorts first.
    pub fn priority(&self) -> u8 {
        match self {
            Self::Completed => 1,
            Self::InProgress => 2,
            Self::ToDo | Self::Other(_) => 3,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::ToDo => "To Do",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task belonging to a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    pub name: String,
    pub status: TaskStatus,
    /// Owning project; not checked against the project collection
    #[serde(deserialize_with = "deserialize_id")]
    pub project_id: i64,
    #[serde(default)]
    pub performer: String,
    /// Free-form date string, parsed only when sorting
    #[serde(default)]
    pub deadline: String,
}

impl Task {
    /// Create a new task in the given project
    pub fn new(id: i64, name: impl Into<String>, project_id: i64) -> Self {
        Self {
            id,
            name: name.into(),
            status: TaskStatus::default(),
            project_id,
            performer: String::new(),
            deadline: String::new(),
        }
    }

    /// Set the status
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the performer
    pub fn with_performer(mut self, performer: impl Into<String>) -> Self {
        self.performer = performer.into();
        self
    }

    /// Set the deadline
    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = deadline.into();
        self
    }
}

impl Entity for Task {
    const COLLECTION: &'static str = "tasks";
    const STORAGE_KEY: &'static str = "tasksData";
    const LABEL: &'static str = "Task";

    fn id(&self) -> i64 {
        self.id
    }
}
