//! Wire types exchanged with the backend (camelCase JSON)
pub mod auth;
pub mod label;
pub mod notification;
pub mod project;
pub mod task;
pub mod user;
pub mod workspace;

pub use auth::{
    AuthResponse, LoginRequest, RefreshTokenRequest, RefreshTokenResponse, RegisterRequest,
    RegisterResponse,
};
pub use label::{LabelRequest, LabelResponse};
pub use notification::{NotificationKind, NotificationResponse};
pub use project::{ProjectInvitationResponse, ProjectMemberResponse, ProjectRequest, ProjectResponse};
pub use task::{TaskRequest, TaskResponse};
pub use user::UserResponse;
pub use workspace::{
    InviteMemberRequest, UpdateMemberRoleRequest, WorkspaceInvitationResponse,
    WorkspaceMemberResponse, WorkspaceRequest, WorkspaceResponse,
};

/// Entities that stores reconcile by identifier
pub trait Identified {
    fn id(&self) -> &str;
}

macro_rules! identified {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Identified for $ty {
                fn id(&self) -> &str {
                    &self.id
                }
            }
        )+
    };
}

identified!(
    UserResponse,
    LabelResponse,
    NotificationResponse,
    ProjectResponse,
    ProjectMemberResponse,
    ProjectInvitationResponse,
    TaskResponse,
    WorkspaceResponse,
    WorkspaceMemberResponse,
    WorkspaceInvitationResponse,
);
