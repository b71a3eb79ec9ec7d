//! Core library for the task tracker
//!
//! This crate contains the client-side data layer, including:
//! - Project and task models
//! - The local-cache-first application store
//! - Best-effort synchronization with a remote REST backend
//! - Filtering and sorting of the displayed collections

pub mod config;
pub mod entity;
pub mod error;
pub mod filter;
pub mod fixture;
pub mod notification;
pub mod project;
pub mod storage;
pub mod store;
pub mod sync;
pub mod task;

pub use config::TrackerConfig;
pub use entity::Entity;
pub use error::Error;
pub use filter::SortBy;
pub use notification::{Notification, NotificationType, Notifier};
pub use project::Project;
pub use store::AppStore;
pub use sync::{RemoteSync, SyncHandle, SyncOutcome};
pub use task::{Task, TaskStatus};

pub type Result<T> = std::result::Result<T, Error>;
