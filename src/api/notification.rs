use super::ApiClient;
use crate::error::ClientResult;
use crate::models::NotificationResponse;

/// Notifications of the signed-in user
pub struct NotificationApi<'a> {
    client: &'a ApiClient,
}

impl<'a> NotificationApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ClientResult<Vec<NotificationResponse>> {
        self.client.get("/notifications").await
    }

    pub async fn unread_count(&self) -> ClientResult<u64> {
        self.client.get("/notifications/unread/count").await
    }

    pub async fn get(&self, id: &str) -> ClientResult<NotificationResponse> {
        self.client.get(&format!("/notifications/{}", id)).await
    }

    /// Returns how many notifications were marked
    pub async fn mark_all_as_read(&self) -> ClientResult<u64> {
        self.client.patch_empty("/notifications/mark-all-read").await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.client.delete(&format!("/notifications/{}", id)).await
    }

    pub async fn clear_all(&self) -> ClientResult<()> {
        self.client.delete("/notifications/clear-all").await
    }
}
