//! Reusable loading patterns built on the stores: loading/error/data triads,
//! workspace guards and the unread-notification poller.

pub mod async_data;
pub mod polling;
pub mod workspace;

pub use async_data::{AsyncData, AsyncList, AsyncOptions, AsyncState};
pub use polling::NotificationPoller;
pub use workspace::{
    init_workspace, load_for_active_workspace, require_workspace, watch_active_workspace,
    WorkspaceWatch, NO_WORKSPACE_MESSAGE,
};
