//! Local-cache-first application store
//!
//! Owns the project and task collections. Every mutation is applied in
//! memory and written to local storage before the call returns; the remote
//! backend is updated by a background task whose handle is returned to the
//! caller.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::config::TrackerConfig;
use crate::entity::Entity;
use crate::error::Error;
use crate::filter::{self, SortBy};
use crate::fixture::{self, SeedData};
use crate::notification::{Notification, Notifier};
use crate::project::Project;
use crate::storage::{load_collection, save_collection, FileStorage, LocalStorage};
use crate::sync::{RemoteSync, SyncHandle, SyncOutcome};
use crate::task::{Task, TaskStatus};
use crate::Result;

/// Application state shared by everything that renders or mutates data
#[derive(Clone)]
pub struct AppStore {
    inner: Arc<AppStoreInner>,
}

struct AppStoreInner {
    projects: RwLock<Vec<Project>>,
    tasks: RwLock<Vec<Task>>,
    storage: Arc<dyn LocalStorage>,
    remote: RemoteSync,
    notifier: Notifier,
}

impl AppStore {
    /// Open the store with file-backed storage in the configured data directory
    pub async fn open(config: &TrackerConfig) -> Result<Self> {
        info!("Using data directory: {:?}", config.data_dir);
        match config.sync_base_url() {
            Some(url) => info!("Syncing with {}", url),
            None => info!("Remote sync disabled"),
        }

        Self::load(
            Arc::new(FileStorage::new(&config.data_dir)),
            RemoteSync::from_config(config),
            Notifier::new(),
        )
        .await
    }

    /// Load both collections from `storage`, seeding any missing one from the
    /// bundled fixture and writing it back.
    pub async fn load(
        storage: Arc<dyn LocalStorage>,
        remote: RemoteSync,
        notifier: Notifier,
    ) -> Result<Self> {
        let stored_projects = load_collection::<Project>(storage.as_ref()).await?;
        let stored_tasks = load_collection::<Task>(storage.as_ref()).await?;

        let mut seed = if stored_projects.is_none() || stored_tasks.is_none() {
            Some(fixture::seed()?)
        } else {
            None
        };

        let projects = match stored_projects {
            Some(projects) => projects,
            None => {
                let projects = take_seed(&mut seed, |s| &mut s.projects);
                save_collection(storage.as_ref(), &projects).await?;
                info!("Seeded {} projects from fixture", projects.len());
                projects
            }
        };

        let tasks = match stored_tasks {
            Some(tasks) => tasks,
            None => {
                let tasks = take_seed(&mut seed, |s| &mut s.tasks);
                save_collection(storage.as_ref(), &tasks).await?;
                info!("Seeded {} tasks from fixture", tasks.len());
                tasks
            }
        };

        debug!("Loaded {} projects and {} tasks", projects.len(), tasks.len());

        Ok(Self {
            inner: Arc::new(AppStoreInner {
                projects: RwLock::new(projects),
                tasks: RwLock::new(tasks),
                storage,
                remote,
                notifier,
            }),
        })
    }

    /// Snapshot of all projects
    pub async fn projects(&self) -> Vec<Project> {
        self.inner.projects.read().await.clone()
    }

    /// Snapshot of all tasks
    pub async fn tasks(&self) -> Vec<Task> {
        self.inner.tasks.read().await.clone()
    }

    /// The notification currently displayed
    pub async fn notification(&self) -> Notification {
        self.inner.notifier.current().await
    }

    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    pub fn remote(&self) -> &RemoteSync {
        &self.inner.remote
    }

    /// Append a project, persist, and create it remotely in the background.
    ///
    /// The success notification does not wait for the remote call.
    pub async fn add_project(&self, project: Project) -> Result<SyncHandle> {
        {
            let mut projects = self.inner.projects.write().await;
            projects.push(project.clone());
            save_collection(self.inner.storage.as_ref(), projects.as_slice()).await?;
        }

        self.inner.notifier.success("Project added successfully").await;

        let remote = self.inner.remote.clone();
        Ok(self.dispatch(|_| "Error posting project", async move {
            remote.post_project(&project).await
        }))
    }

    /// Append a task, persist, and create it remotely in the background.
    pub async fn add_task(&self, task: Task) -> Result<SyncHandle> {
        {
            let mut tasks = self.inner.tasks.write().await;
            tasks.push(task.clone());
            save_collection(self.inner.storage.as_ref(), tasks.as_slice()).await?;
        }

        self.inner.notifier.success("Task added successfully").await;

        let remote = self.inner.remote.clone();
        Ok(self.dispatch(|_| "Error posting task", async move {
            remote.post_task(&task).await
        }))
    }

    /// Replace the task with the same id.
    ///
    /// Returns `None` without touching anything when no task has that id.
    pub async fn update_task_status(&self, task: Task) -> Result<Option<SyncHandle>> {
        let Some(updated) = replace_by_id(&self.inner.tasks, task, self.inner.storage.as_ref()).await?
        else {
            return Ok(None);
        };

        self.inner.notifier.success("Task updated successfully").await;

        let remote = self.inner.remote.clone();
        Ok(Some(self.dispatch(task_update_failure, async move {
            remote.put_task(&updated).await
        })))
    }

    /// Replace the project with the same id, overriding its status.
    ///
    /// Returns `None` without touching anything when no project has that id.
    pub async fn update_project_status(
        &self,
        project: Project,
        status: TaskStatus,
    ) -> Result<Option<SyncHandle>> {
        let project = Project { status, ..project };
        let Some(updated) =
            replace_by_id(&self.inner.projects, project, self.inner.storage.as_ref()).await?
        else {
            return Ok(None);
        };

        self.inner.notifier.success("Project updated successfully").await;

        let remote = self.inner.remote.clone();
        Ok(Some(self.dispatch(project_update_failure, async move {
            remote.put_project(&updated).await
        })))
    }

    /// Replace the local projects with the backend's copy.
    ///
    /// Returns `false` when sync is disabled or the download failed; remote
    /// failures are only logged and leave local state untouched.
    pub async fn refresh_projects(&self) -> Result<bool> {
        self.refresh(&self.inner.projects).await
    }

    /// Replace the local tasks with the backend's copy.
    pub async fn refresh_tasks(&self) -> Result<bool> {
        self.refresh(&self.inner.tasks).await
    }

    /// Projects matching `query`, or all projects sorted by `sort_by`
    pub async fn filtered_project(&self, query: &str, sort_by: SortBy) -> Vec<Project> {
        let projects = self.projects().await;
        let tasks = self.tasks().await;
        filter::filtered_projects(&projects, &tasks, query, sort_by)
    }

    /// Tasks from `data` matching `query`, or all of `data` sorted by `sort_by`
    ///
    /// Works on the caller's slice rather than the store's tasks, so views can
    /// filter a per-project selection; the same as [`filter::filtered_tasks`].
    pub fn filtered_task(&self, query: &str, sort_by: SortBy, data: &[Task]) -> Vec<Task> {
        filter::filtered_tasks(data, query, sort_by)
    }

    /// Tasks belonging to `project_id`
    pub async fn get_tasks(&self, project_id: i64) -> Vec<Task> {
        filter::tasks_for_project(&self.inner.tasks.read().await, project_id)
    }

    /// Number of tasks belonging to `project_id`
    pub async fn get_task_amount(&self, project_id: i64) -> usize {
        filter::task_amount(&self.inner.tasks.read().await, project_id)
    }

    async fn refresh<T: Entity>(&self, collection: &RwLock<Vec<T>>) -> Result<bool> {
        let items = match self.inner.remote.fetch_all::<T>().await {
            Ok(Some(items)) => items,
            Ok(None) => return Ok(false),
            Err(e) => {
                error!("Failed to fetch {}: {}", T::COLLECTION, e);
                return Ok(false);
            }
        };

        let mut guard = collection.write().await;
        *guard = items;
        save_collection(self.inner.storage.as_ref(), guard.as_slice()).await?;

        info!("Refreshed {} {} from server", guard.len(), T::COLLECTION);
        Ok(true)
    }

    /// Run a remote call in the background, reporting failure as an error
    /// notification. Local state is never rolled back.
    fn dispatch<F>(&self, failure_message: fn(&Error) -> &'static str, job: F) -> SyncHandle
    where
        F: Future<Output = Result<SyncOutcome>> + Send + 'static,
    {
        let notifier = self.inner.notifier.clone();
        SyncHandle::spawn(async move {
            let result = job.await;
            if let Err(e) = &result {
                let failure_message = failure_message(e);
                error!("{}: {}", failure_message, e);
                notifier.error(failure_message).await;
            }
            result
        })
    }
}

/// A failed create during an upsert is reported as a failed post
fn task_update_failure(error: &Error) -> &'static str {
    match error {
        Error::CreateFallback(_) => "Error posting task",
        _ => "Error updating task",
    }
}

fn project_update_failure(error: &Error) -> &'static str {
    match error {
        Error::CreateFallback(_) => "Error posting project",
        _ => "Error updating project",
    }
}

/// Replace the element with the same id, persist, and return the stored copy
async fn replace_by_id<T: Entity>(
    collection: &RwLock<Vec<T>>,
    item: T,
    storage: &dyn LocalStorage,
) -> Result<Option<T>> {
    let mut items = collection.write().await;
    let Some(index) = items.iter().position(|existing| existing.id() == item.id()) else {
        debug!("{} {} not found locally, ignoring update", T::LABEL, item.id());
        return Ok(None);
    };

    items[index] = item;
    save_collection(storage, items.as_slice()).await?;
    Ok(Some(items[index].clone()))
}

fn take_seed<T>(seed: &mut Option<SeedData>, field: impl FnOnce(&mut SeedData) -> &mut Vec<T>) -> Vec<T> {
    seed.as_mut()
        .map(|s| std::mem::take(field(s)))
        .unwrap_or_default()
}
