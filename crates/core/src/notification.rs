//! Transient user notifications
//!
//! The store reports the outcome of every mutation here. A UI renders
//! [`Notifier::current`] as a toast; the toast hides itself after the
//! display duration.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tracing::{info, warn};

/// How long a notification stays visible
pub const DEFAULT_DISPLAY_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Success,
    Error,
    Info,
}

impl Default for NotificationType {
    fn default() -> Self {
        Self::Success
    }
}

/// Notification value rendered by the UI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub show: bool,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
}

struct NotifierState {
    current: Notification,
    /// Bumped on every `show` so stale hide timers leave newer toasts alone
    generation: u64,
}

/// Shared handle to the current notification
#[derive(Clone)]
pub struct Notifier {
    state: Arc<RwLock<NotifierState>>,
    event_tx: broadcast::Sender<Notification>,
    display_for: Duration,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self::with_display_duration(DEFAULT_DISPLAY_DURATION)
    }

    pub fn with_display_duration(display_for: Duration) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            state: Arc::new(RwLock::new(NotifierState {
                current: Notification::default(),
                generation: 0,
            })),
            event_tx,
            display_for,
        }
    }

    /// Subscribe to every notification shown from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.event_tx.subscribe()
    }

    /// Snapshot of the current notification
    pub async fn current(&self) -> Notification {
        self.state.read().await.current.clone()
    }

    pub async fn success(&self, message: impl Into<String>) {
        self.show(message, NotificationType::Success).await;
    }

    pub async fn error(&self, message: impl Into<String>) {
        self.show(message, NotificationType::Error).await;
    }

    /// Display a notification and schedule it to hide.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn show(&self, message: impl Into<String>, kind: NotificationType) {
        let notification = Notification {
            show: true,
            message: message.into(),
            kind,
        };

        match kind {
            NotificationType::Error => warn!("Notification: {}", notification.message),
            _ => info!("Notification: {}", notification.message),
        }

        let generation = {
            let mut state = self.state.write().await;
            state.generation += 1;
            state.current = notification.clone();
            state.generation
        };

        let _ = self.event_tx.send(notification);

        let state = Arc::clone(&self.state);
        let display_for = self.display_for;
        tokio::spawn(async move {
            tokio::time::sleep(display_for).await;
            let mut state = state.write().await;
            if state.generation == generation {
                state.current.show = false;
            }
        });
    }
}
