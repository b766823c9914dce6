use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::context::AppContext;
use crate::error::{ClientError, ClientResult};
use crate::notify::Notices;
use crate::store::WorkspaceStore;

pub const NO_WORKSPACE_MESSAGE: &str = "No workspace selected";

/// Return the workspace id or fail with a notice when none is selected
pub fn require_workspace(
    workspace_id: Option<&str>,
    notices: &Notices,
    message: Option<&str>,
) -> ClientResult<String> {
    match workspace_id {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => {
            let message = message.unwrap_or(NO_WORKSPACE_MESSAGE);
            notices.error(message);
            Err(ClientError::WorkspaceRequired(message.to_string()))
        }
    }
}

/// Make sure workspaces are loaded once; true when a workspace is active
pub async fn init_workspace(ctx: &AppContext) -> bool {
    if !ctx.auth().is_authenticated() {
        return false;
    }

    let workspaces = ctx.workspaces();
    if !workspaces.is_initialized() {
        if let Err(e) = workspaces.fetch_workspaces().await {
            tracing::error!("Failed to fetch workspaces: {}", e);
            ctx.notices().error("Failed to load workspace");
            return false;
        }
    }

    workspaces.has_active_workspace()
}

/// Run `load` for the active workspace, initializing workspaces first.
///
/// Yields `None` when no workspace is available.
pub async fn load_for_active_workspace<T, F, Fut>(ctx: &AppContext, load: F) -> ClientResult<Option<T>>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = ClientResult<T>>,
{
    if !init_workspace(ctx).await {
        return Ok(None);
    }

    match ctx.workspaces().active_workspace_id() {
        Some(id) => load(id).await.map(Some),
        None => Ok(None),
    }
}

/// Background reload bound to active-workspace changes; stops on drop
#[derive(Debug)]
pub struct WorkspaceWatch {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl WorkspaceWatch {
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for WorkspaceWatch {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Call `load` with the new id each time a different workspace becomes active
pub fn watch_active_workspace<F, Fut>(workspaces: Arc<WorkspaceStore>, load: F) -> WorkspaceWatch
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ClientResult<()>> + Send + 'static,
{
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let mut rx = workspaces.state().subscribe();
    let mut current = rx.borrow_and_update().active_workspace_id().map(str::to_string);

    let handle = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }

            let next = rx.borrow_and_update().active_workspace_id().map(str::to_string);
            if next == current {
                continue;
            }
            current = next.clone();

            if let Some(id) = next {
                tracing::debug!("Active workspace changed to {}, reloading", id);
                if let Err(e) = load(id).await {
                    tracing::warn!("Reload after workspace change failed: {}", e);
                }
            }
        }
    });

    WorkspaceWatch { cancel, handle }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn require_workspace_passes_through_ids() {
        let notices = Notices::new();
        assert_eq!(require_workspace(Some("w1"), &notices, None).unwrap(), "w1");
    }

    #[tokio::test]
    async fn require_workspace_fails_with_notice() {
        let notices = Notices::new();
        let mut rx = notices.subscribe();

        let err = require_workspace(None, &notices, Some("Pick a workspace first")).unwrap_err();
        assert_eq!(err.error_code(), "WORKSPACE_REQUIRED");
        assert_eq!(rx.recv().await.unwrap().message, "Pick a workspace first");

        let err = require_workspace(Some(""), &notices, None).unwrap_err();
        assert_eq!(err.to_string(), NO_WORKSPACE_MESSAGE);
    }
}
