use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::store::NotificationStore;

/// Periodic unread-count refresh.
///
/// Fetches immediately, then once per interval until stopped or dropped.
/// A fetch already in flight when the poller stops is allowed to finish.
#[derive(Debug)]
pub struct NotificationPoller {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl NotificationPoller {
    pub fn start(store: Arc<NotificationStore>, interval: Duration) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        // zero periods are rejected by tokio
        let period = interval.max(Duration::from_millis(1));

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        // errors are logged by the store
                        let _ = store.fetch_unread_count().await;
                    }
                }
            }
            tracing::debug!("Notification polling stopped");
        });

        tracing::debug!("Notification polling every {:?}", period);
        Self { cancel, handle }
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled() && !self.handle.is_finished()
    }
}

impl Drop for NotificationPoller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
