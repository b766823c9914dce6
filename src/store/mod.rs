//! Observable state stores.
//!
//! Each store owns a `watch` channel holding its state; subscribers see every
//! mutation. Actions issue one API call and reconcile the local collection by id.

pub mod auth;
pub mod notification;
pub mod project;
pub mod task;
pub mod workspace;

use std::future::Future;

use serde::Serialize;
use tokio::sync::watch;

use crate::error::ClientResult;
use crate::models::Identified;
use crate::notify::Notices;

pub use auth::{AuthState, AuthStore};
pub use notification::{NotificationState, NotificationStore};
pub use project::{ProjectState, ProjectStore};
pub use task::{TaskState, TaskStore};
pub use workspace::{WorkspaceState, WorkspaceStore};

/// Loading flag and last error shared by every store state
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Status {
    pub loading: bool,
    pub error: Option<String>,
}

pub trait HasStatus {
    fn status(&self) -> &Status;
    fn status_mut(&mut self) -> &mut Status;
}

macro_rules! has_status {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::store::HasStatus for $ty {
                fn status(&self) -> &$crate::store::Status {
                    &self.status
                }

                fn status_mut(&mut self) -> &mut $crate::store::Status {
                    &mut self.status
                }
            }
        )+
    };
}
pub(crate) use has_status;

/// Observable state cell
#[derive(Debug)]
pub struct Store<S> {
    tx: watch::Sender<S>,
}

impl<S: Clone> Store<S> {
    pub fn new(initial: S) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }

    /// Clone of the current state
    pub fn snapshot(&self) -> S {
        self.tx.borrow().clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.tx.borrow())
    }

    pub fn update(&self, f: impl FnOnce(&mut S)) {
        self.tx.send_modify(f);
    }
}

impl<S: Clone + HasStatus> Store<S> {
    /// Run one store action: loading on, error cleared, one call, loading off.
    ///
    /// `apply` reconciles state on success. On failure the error message is
    /// recorded, published as a notice and the error returned.
    pub async fn action<T, Fut>(
        &self,
        notices: &Notices,
        fallback: &str,
        call: Fut,
        apply: impl FnOnce(&mut S, &T),
    ) -> ClientResult<T>
    where
        Fut: Future<Output = ClientResult<T>>,
    {
        self.update(|s| {
            let status = s.status_mut();
            status.loading = true;
            status.error = None;
        });

        let result = call.await;

        match &result {
            Ok(value) => self.update(|s| {
                apply(s, value);
                s.status_mut().loading = false;
            }),
            Err(e) => {
                let message = e.user_message(fallback);
                tracing::warn!("{}: {}", fallback, e);
                notices.error(message.clone());
                self.update(|s| {
                    let status = s.status_mut();
                    status.loading = false;
                    status.error = Some(message);
                });
            }
        }

        result
    }

    pub fn is_loading(&self) -> bool {
        self.read(|s| s.status().loading)
    }

    pub fn error(&self) -> Option<String> {
        self.read(|s| s.status().error.clone())
    }

    pub fn clear_error(&self) {
        self.update(|s| s.status_mut().error = None);
    }
}

/// Replace the item with the same id; returns false when absent
pub(crate) fn replace_by_id<T: Identified>(items: &mut [T], item: T) -> bool {
    match items.iter_mut().find(|existing| existing.id() == item.id()) {
        Some(slot) => {
            *slot = item;
            true
        }
        None => false,
    }
}

/// Remove every item with the given id; returns false when none matched
pub(crate) fn remove_by_id<T: Identified>(items: &mut Vec<T>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}
