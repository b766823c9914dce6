//! Role-based access control tables for the workspace and project scopes.
//!
//! Each scope has a fixed permission enumeration, a fixed role enumeration
//! ordered by seniority, and a static table mapping every role to the exact
//! permission set it holds. The senior role of each scope holds the whole
//! enumeration.

pub mod access;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

pub use access::{ProjectAccess, WorkspaceAccess};

/// Declares a string-backed enum with `ALL`, `as_str`, `Display` and `FromStr`
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(UnknownValue {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind}: {value}")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

string_enum!(
    /// Granular permissions within a workspace
    WorkspacePermission {
        WorkspaceView => "WORKSPACE_VIEW",
        WorkspaceDelete => "WORKSPACE_DELETE",
        WorkspaceUpdate => "WORKSPACE_UPDATE",
        WorkspaceCreate => "WORKSPACE_CREATE",
        WorkspaceArchive => "WORKSPACE_ARCHIVE",
        WorkspaceRestore => "WORKSPACE_RESTORE",
        MemberView => "MEMBER_VIEW",
        MemberInvite => "MEMBER_INVITE",
        MemberDelete => "MEMBER_DELETE",
        MemberUpdate => "MEMBER_UPDATE",
        ProjectCreate => "PROJECT_CREATE",
        ProjectView => "PROJECT_VIEW",
        InvitationView => "INVITATION_VIEW",
        InvitationCancel => "INVITATION_CANCEL",
    }
);

string_enum!(
    /// Granular permissions within a project
    ProjectPermission {
        ProjectView => "PROJECT_VIEW",
        ProjectUpdate => "PROJECT_UPDATE",
        ProjectCreate => "PROJECT_CREATE",
        ProjectDelete => "PROJECT_DELETE",
        ProjectArchive => "PROJECT_ARCHIVE",
        ProjectRestore => "PROJECT_RESTORE",
        MemberView => "MEMBER_VIEW",
        MemberInvite => "MEMBER_INVITE",
        MemberRemove => "MEMBER_REMOVE",
        MemberUpdate => "MEMBER_UPDATE",
        TaskCreate => "TASK_CREATE",
        TaskView => "TASK_VIEW",
        TaskUpdate => "TASK_UPDATE",
        TaskDelete => "TASK_DELETE",
        TaskAssign => "TASK_ASSIGN",
        TaskUnassign => "TASK_UNASSIGN",
        LabelCreate => "LABEL_CREATE",
        LabelView => "LABEL_VIEW",
        LabelDelete => "LABEL_DELETE",
        LabelUpdate => "LABEL_UPDATE",
        InvitationView => "INVITATION_VIEW",
        InvitationCancel => "INVITATION_CANCEL",
    }
);

string_enum!(
    /// Workspace member roles, most senior first
    WorkspaceRole {
        Owner => "OWNER",
        Admin => "ADMIN",
        Member => "MEMBER",
        Viewer => "VIEWER",
    }
);

string_enum!(
    /// Project member roles, most senior first
    ProjectRole {
        ProjectLead => "PROJECT_LEAD",
        Contributor => "CONTRIBUTOR",
        Viewer => "VIEWER",
    }
);

static WORKSPACE_PERMISSIONS: Lazy<HashMap<WorkspaceRole, HashSet<WorkspacePermission>>> =
    Lazy::new(|| {
        use WorkspacePermission::*;

        HashMap::from([
            (WorkspaceRole::Owner, WorkspacePermission::ALL.iter().copied().collect::<HashSet<_>>()),
            (
                WorkspaceRole::Admin,
                HashSet::from([
                    WorkspaceView,
                    WorkspaceUpdate,
                    MemberView,
                    MemberInvite,
                    MemberDelete,
                    MemberUpdate,
                    ProjectCreate,
                    ProjectView,
                    InvitationView,
                    InvitationCancel,
                ]),
            ),
            (
                WorkspaceRole::Member,
                HashSet::from([WorkspaceView, MemberView, ProjectView, InvitationView]),
            ),
            (
                WorkspaceRole::Viewer,
                HashSet::from([WorkspaceView, MemberView, ProjectView]),
            ),
        ])
    });

static PROJECT_PERMISSIONS: Lazy<HashMap<ProjectRole, HashSet<ProjectPermission>>> =
    Lazy::new(|| {
        use ProjectPermission::*;

        HashMap::from([
            (ProjectRole::ProjectLead, ProjectPermission::ALL.iter().copied().collect::<HashSet<_>>()),
            (
                ProjectRole::Contributor,
                HashSet::from([
                    ProjectView,
                    MemberView,
                    MemberInvite,
                    TaskCreate,
                    TaskView,
                    TaskUpdate,
                    TaskDelete,
                    TaskAssign,
                    TaskUnassign,
                    LabelView,
                    InvitationView,
                    InvitationCancel,
                ]),
            ),
            (
                ProjectRole::Viewer,
                HashSet::from([ProjectView, MemberView, TaskView, LabelView]),
            ),
        ])
    });

impl WorkspaceRole {
    pub fn permissions(&self) -> &'static HashSet<WorkspacePermission> {
        // Every variant has a row
        &WORKSPACE_PERMISSIONS[self]
    }

    pub fn can(&self, permission: WorkspacePermission) -> bool {
        self.permissions().contains(&permission)
    }

    /// Strict seniority: OWNER > ADMIN > MEMBER > VIEWER
    pub fn is_higher_than(&self, other: WorkspaceRole) -> bool {
        // Declaration order is seniority order, most senior first
        *self < other
    }
}

impl ProjectRole {
    pub fn permissions(&self) -> &'static HashSet<ProjectPermission> {
        &PROJECT_PERMISSIONS[self]
    }

    pub fn can(&self, permission: ProjectPermission) -> bool {
        self.permissions().contains(&permission)
    }

    /// Strict seniority: PROJECT_LEAD > CONTRIBUTOR > VIEWER
    pub fn is_higher_than(&self, other: ProjectRole) -> bool {
        *self < other
    }
}

/// Membership test on a raw role string; absent or unknown roles hold nothing
pub fn has_workspace_permission(role: Option<&str>, permission: WorkspacePermission) -> bool {
    role.and_then(|r| r.parse::<WorkspaceRole>().ok())
        .map(|r| r.can(permission))
        .unwrap_or(false)
}

pub fn has_project_permission(role: Option<&str>, permission: ProjectPermission) -> bool {
    role.and_then(|r| r.parse::<ProjectRole>().ok())
        .map(|r| r.can(permission))
        .unwrap_or(false)
}
