use std::sync::Arc;

use serde::Serialize;

use super::{has_status, Status, Store};
use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::models::NotificationResponse;
use crate::notify::Notices;

#[derive(Debug, Clone, Default, Serialize)]
pub struct NotificationState {
    pub notifications: Vec<NotificationResponse>,
    pub unread_count: u64,
    pub status: Status,
}

has_status!(NotificationState);

impl NotificationState {
    fn decrement_unread(&mut self) {
        self.unread_count = self.unread_count.saturating_sub(1);
    }
}

/// Notifications keep fixed error messages rather than server text
pub struct NotificationStore {
    client: Arc<ApiClient>,
    notices: Notices,
    state: Store<NotificationState>,
}

impl NotificationStore {
    pub fn new(client: Arc<ApiClient>, notices: Notices) -> Self {
        Self {
            client,
            notices,
            state: Store::new(NotificationState::default()),
        }
    }

    pub fn state(&self) -> &Store<NotificationState> {
        &self.state
    }

    pub fn notifications(&self) -> Vec<NotificationResponse> {
        self.state.read(|s| s.notifications.clone())
    }

    pub fn unread_count(&self) -> u64 {
        self.state.read(|s| s.unread_count)
    }

    pub fn unread(&self) -> Vec<NotificationResponse> {
        self.state
            .read(|s| s.notifications.iter().filter(|n| !n.is_read).cloned().collect())
    }

    pub fn read(&self) -> Vec<NotificationResponse> {
        self.state
            .read(|s| s.notifications.iter().filter(|n| n.is_read).cloned().collect())
    }

    pub fn has_unread(&self) -> bool {
        self.unread_count() > 0
    }

    pub async fn fetch_notifications(&self) -> ClientResult<Vec<NotificationResponse>> {
        self.state.update(|s| {
            s.status.loading = true;
            s.status.error = None;
        });

        let result = self.client.notifications().list().await;

        self.state.update(|s| {
            s.status.loading = false;
            match &result {
                Ok(notifications) => s.notifications = notifications.clone(),
                Err(_) => s.status.error = Some("Failed to fetch notifications".to_string()),
            }
        });
        self.report(&result, "Failed to fetch notifications");
        result
    }

    /// Refresh the unread badge; failures are logged but leave the state untouched
    pub async fn fetch_unread_count(&self) -> ClientResult<u64> {
        let result = self.client.notifications().unread_count().await;
        match &result {
            Ok(count) => self.state.update(|s| s.unread_count = *count),
            Err(e) => tracing::warn!("Failed to fetch unread count: {}", e),
        }
        result
    }

    pub async fn mark_all_as_read(&self) -> ClientResult<u64> {
        self.state.update(|s| s.status.error = None);
        let result = self.client.notifications().mark_all_as_read().await;
        self.state.update(|s| match &result {
            Ok(_) => {
                for n in s.notifications.iter_mut() {
                    n.is_read = true;
                }
                s.unread_count = 0;
            }
            Err(_) => s.status.error = Some("Failed to mark all as read".to_string()),
        });
        self.report(&result, "Failed to mark all as read");
        result
    }

    pub async fn delete_notification(&self, id: &str) -> ClientResult<()> {
        self.state.update(|s| s.status.error = None);
        let result = self.client.notifications().delete(id).await;
        self.state.update(|s| match &result {
            Ok(()) => {
                let was_unread = s.notifications.iter().any(|n| n.id == id && !n.is_read);
                if was_unread {
                    s.decrement_unread();
                }
                s.notifications.retain(|n| n.id != id);
            }
            Err(_) => s.status.error = Some("Failed to delete notification".to_string()),
        });
        self.report(&result, "Failed to delete notification");
        result
    }

    pub async fn clear_all(&self) -> ClientResult<()> {
        self.state.update(|s| s.status.error = None);
        let result = self.client.notifications().clear_all().await;
        self.state.update(|s| match &result {
            Ok(()) => {
                s.notifications.clear();
                s.unread_count = 0;
            }
            Err(_) => s.status.error = Some("Failed to clear notifications".to_string()),
        });
        self.report(&result, "Failed to clear notifications");
        result
    }

    /// Prepend a notification received out of band
    pub fn add_notification(&self, notification: NotificationResponse) {
        self.state.update(|s| {
            if !notification.is_read {
                s.unread_count += 1;
            }
            s.notifications.insert(0, notification);
        });
    }

    /// Local-only read marker
    pub fn mark_as_read(&self, id: &str) {
        self.state.update(|s| {
            let newly_read = match s.notifications.iter_mut().find(|n| n.id == id) {
                Some(n) if !n.is_read => {
                    n.is_read = true;
                    true
                }
                _ => false,
            };
            if newly_read {
                s.decrement_unread();
            }
        });
    }

    pub fn clear_notifications(&self) {
        self.state.update(|s| *s = NotificationState::default());
    }

    fn report<T>(&self, result: &ClientResult<T>, message: &str) {
        if let Err(e) = result {
            tracing::warn!("{}: {}", message, e);
            self.notices.error(message);
        }
    }
}
