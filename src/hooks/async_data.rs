use std::future::Future;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Serialize;
use tokio::sync::watch;

use crate::error::{ClientError, ClientResult};
use crate::notify::Notices;
use crate::store::Store;

type Loader<T> = Box<dyn Fn() -> BoxFuture<'static, ClientResult<T>> + Send + Sync>;

#[derive(Debug, Clone, Default)]
pub struct AsyncOptions {
    /// Published as a success notice after each successful run
    pub success_message: Option<String>,
    /// Replaces the error text in state and notices
    pub error_message: Option<String>,
}

impl AsyncOptions {
    pub fn success(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }

    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AsyncState<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<String>,
}

fn error_text(options: &AsyncOptions, err: &ClientError, default: &str) -> String {
    if let Some(message) = &options.error_message {
        return message.clone();
    }
    let text = err.to_string();
    if text.is_empty() {
        default.to_string()
    } else {
        text
    }
}

/// Single value loaded by an async function
pub struct AsyncData<T> {
    loader: Loader<T>,
    options: AsyncOptions,
    notices: Notices,
    state: Store<AsyncState<Option<T>>>,
}

impl<T> AsyncData<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F, Fut>(notices: Notices, options: AsyncOptions, loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ClientResult<T>> + Send + 'static,
    {
        Self {
            loader: Box::new(move || loader().boxed()),
            options,
            notices,
            state: Store::new(AsyncState {
                data: None,
                loading: false,
                error: None,
            }),
        }
    }

    pub async fn execute(&self) -> ClientResult<T> {
        self.state.update(|s| {
            s.loading = true;
            s.error = None;
        });

        let result = (self.loader)().await;

        match &result {
            Ok(value) => {
                self.state.update(|s| {
                    s.data = Some(value.clone());
                    s.loading = false;
                });
                if let Some(message) = &self.options.success_message {
                    self.notices.success(message.clone());
                }
            }
            Err(e) => {
                let message = error_text(&self.options, e, "An error occurred");
                self.notices.error(message.clone());
                self.state.update(|s| {
                    s.error = Some(message);
                    s.loading = false;
                });
            }
        }

        result
    }

    pub async fn refresh(&self) -> ClientResult<T> {
        self.execute().await
    }

    pub fn data(&self) -> Option<T> {
        self.state.read(|s| s.data.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.state.read(|s| s.loading)
    }

    pub fn error(&self) -> Option<String> {
        self.state.read(|s| s.error.clone())
    }

    pub fn subscribe(&self) -> watch::Receiver<AsyncState<Option<T>>> {
        self.state.subscribe()
    }
}

/// List loaded by an async function
pub struct AsyncList<T> {
    loader: Loader<Vec<T>>,
    options: AsyncOptions,
    notices: Notices,
    state: Store<AsyncState<Vec<T>>>,
}

impl<T> AsyncList<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F, Fut>(notices: Notices, options: AsyncOptions, loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ClientResult<Vec<T>>> + Send + 'static,
    {
        Self {
            loader: Box::new(move || loader().boxed()),
            options,
            notices,
            state: Store::new(AsyncState {
                data: Vec::new(),
                loading: false,
                error: None,
            }),
        }
    }

    pub async fn load(&self) -> ClientResult<Vec<T>> {
        self.state.update(|s| {
            s.loading = true;
            s.error = None;
        });

        let result = (self.loader)().await;

        match &result {
            Ok(items) => self.state.update(|s| {
                s.data = items.clone();
                s.loading = false;
            }),
            Err(e) => {
                let message = error_text(&self.options, e, "Failed to load data");
                self.notices.error(message.clone());
                self.state.update(|s| {
                    s.error = Some(message);
                    s.loading = false;
                });
            }
        }

        result
    }

    pub async fn refresh(&self) -> ClientResult<Vec<T>> {
        self.load().await
    }

    /// Empty the list and forget the last error
    pub fn clear(&self) {
        self.state.update(|s| {
            s.data.clear();
            s.error = None;
        });
    }

    pub fn items(&self) -> Vec<T> {
        self.state.read(|s| s.data.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.state.read(|s| s.loading)
    }

    pub fn error(&self) -> Option<String> {
        self.state.read(|s| s.error.clone())
    }

    pub fn subscribe(&self) -> watch::Receiver<AsyncState<Vec<T>>> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorResponse;
    use crate::notify::NoticeLevel;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn execute_stores_data_and_announces_success() {
        let notices = Notices::new();
        let mut rx = notices.subscribe();
        let data = AsyncData::new(notices.clone(), AsyncOptions::default().success("Saved"), || async {
            Ok(42u32)
        });

        assert_eq!(data.execute().await.unwrap(), 42);
        assert_eq!(data.data(), Some(42));
        assert!(!data.is_loading());

        let notice = rx.recv().await.unwrap();
        assert_eq!(notice.level, NoticeLevel::Success);
        assert_eq!(notice.message, "Saved");
    }

    #[tokio::test]
    async fn configured_error_message_wins() {
        let notices = Notices::new();
        let data = AsyncData::new(
            notices,
            AsyncOptions::default().error("Could not load"),
            || async { Err::<u32, _>(ClientError::api(500, ApiErrorResponse::from_status(500, "boom"))) },
        );

        assert!(data.execute().await.is_err());
        assert_eq!(data.error().as_deref(), Some("Could not load"));
        assert_eq!(data.data(), None);
    }

    #[tokio::test]
    async fn list_refresh_reruns_loader_and_clear_empties() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let list = AsyncList::new(Notices::new(), AsyncOptions::default(), move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move { Ok(vec![n; n + 1]) }
        });

        list.load().await.unwrap();
        list.refresh().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(list.items(), vec![1, 1]);

        list.clear();
        assert!(list.items().is_empty());
        assert_eq!(list.error(), None);
    }

    #[tokio::test]
    async fn list_error_uses_error_text() {
        let list = AsyncList::<u8>::new(Notices::new(), AsyncOptions::default(), || async {
            Err(ClientError::WorkspaceRequired("No workspace selected".into()))
        });

        assert!(list.load().await.is_err());
        assert_eq!(list.error().as_deref(), Some("No workspace selected"));
    }
}
