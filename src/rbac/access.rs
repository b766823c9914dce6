//! Permission views over the signed-in user's role in the active scope

use super::{ProjectPermission, ProjectRole, WorkspacePermission, WorkspaceRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkspaceAccess {
    pub role: Option<WorkspaceRole>,
}

impl WorkspaceAccess {
    pub fn new(role: Option<WorkspaceRole>) -> Self {
        Self { role }
    }

    /// Unknown role strings grant nothing
    pub fn from_role_str(role: Option<&str>) -> Self {
        Self::new(role.and_then(|r| r.parse().ok()))
    }

    pub fn has(&self, permission: WorkspacePermission) -> bool {
        self.role.map(|r| r.can(permission)).unwrap_or(false)
    }

    pub fn can_create_project(&self) -> bool {
        self.has(WorkspacePermission::ProjectCreate)
    }

    pub fn can_invite_member(&self) -> bool {
        self.has(WorkspacePermission::MemberInvite)
    }

    pub fn can_update_workspace(&self) -> bool {
        self.has(WorkspacePermission::WorkspaceUpdate)
    }

    pub fn can_delete_workspace(&self) -> bool {
        self.has(WorkspacePermission::WorkspaceDelete)
    }

    pub fn can_update_member(&self) -> bool {
        self.has(WorkspacePermission::MemberUpdate)
    }

    pub fn can_delete_member(&self) -> bool {
        self.has(WorkspacePermission::MemberDelete)
    }

    pub fn can_cancel_invitation(&self) -> bool {
        self.has(WorkspacePermission::InvitationCancel)
    }

    pub fn can_archive_workspace(&self) -> bool {
        self.has(WorkspacePermission::WorkspaceArchive)
    }

    pub fn can_restore_workspace(&self) -> bool {
        self.has(WorkspacePermission::WorkspaceRestore)
    }

    /// Role changes are only offered on members strictly junior to the actor
    pub fn can_change_role_of(&self, target: WorkspaceRole) -> bool {
        self.can_update_member() && self.role.map(|r| r.is_higher_than(target)).unwrap_or(false)
    }

    pub fn is_owner(&self) -> bool {
        self.role == Some(WorkspaceRole::Owner)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Some(WorkspaceRole::Admin)
    }

    pub fn is_member(&self) -> bool {
        self.role == Some(WorkspaceRole::Member)
    }

    pub fn is_viewer(&self) -> bool {
        self.role == Some(WorkspaceRole::Viewer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProjectAccess {
    pub role: Option<ProjectRole>,
}

impl ProjectAccess {
    pub fn new(role: Option<ProjectRole>) -> Self {
        Self { role }
    }

    pub fn from_role_str(role: Option<&str>) -> Self {
        Self::new(role.and_then(|r| r.parse().ok()))
    }

    pub fn has(&self, permission: ProjectPermission) -> bool {
        self.role.map(|r| r.can(permission)).unwrap_or(false)
    }

    pub fn can_update_project(&self) -> bool {
        self.has(ProjectPermission::ProjectUpdate)
    }

    pub fn can_delete_project(&self) -> bool {
        self.has(ProjectPermission::ProjectDelete)
    }

    pub fn can_invite_member(&self) -> bool {
        self.has(ProjectPermission::MemberInvite)
    }

    pub fn can_update_member(&self) -> bool {
        self.has(ProjectPermission::MemberUpdate)
    }

    pub fn can_remove_member(&self) -> bool {
        self.has(ProjectPermission::MemberRemove)
    }

    pub fn can_create_task(&self) -> bool {
        self.has(ProjectPermission::TaskCreate)
    }

    pub fn can_update_task(&self) -> bool {
        self.has(ProjectPermission::TaskUpdate)
    }

    pub fn can_delete_task(&self) -> bool {
        self.has(ProjectPermission::TaskDelete)
    }

    pub fn can_assign_task(&self) -> bool {
        self.has(ProjectPermission::TaskAssign)
    }

    pub fn can_create_label(&self) -> bool {
        self.has(ProjectPermission::LabelCreate)
    }

    pub fn can_update_label(&self) -> bool {
        self.has(ProjectPermission::LabelUpdate)
    }

    pub fn can_delete_label(&self) -> bool {
        self.has(ProjectPermission::LabelDelete)
    }

    pub fn can_cancel_invitation(&self) -> bool {
        self.has(ProjectPermission::InvitationCancel)
    }

    pub fn can_archive_project(&self) -> bool {
        self.has(ProjectPermission::ProjectArchive)
    }

    pub fn can_restore_project(&self) -> bool {
        self.has(ProjectPermission::ProjectRestore)
    }

    pub fn can_change_role_of(&self, target: ProjectRole) -> bool {
        self.can_update_member() && self.role.map(|r| r.is_higher_than(target)).unwrap_or(false)
    }

    pub fn is_project_lead(&self) -> bool {
        self.role == Some(ProjectRole::ProjectLead)
    }

    pub fn is_contributor(&self) -> bool {
        self.role == Some(ProjectRole::Contributor)
    }

    pub fn is_viewer(&self) -> bool {
        self.role == Some(ProjectRole::Viewer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_can_manage_members_but_not_delete_workspace() {
        let access = WorkspaceAccess::from_role_str(Some("ADMIN"));
        assert!(access.is_admin());
        assert!(access.can_invite_member());
        assert!(access.can_delete_member());
        assert!(!access.can_delete_workspace());
        assert!(access.can_change_role_of(WorkspaceRole::Member));
        assert!(!access.can_change_role_of(WorkspaceRole::Owner));
        assert!(!access.can_change_role_of(WorkspaceRole::Admin));
    }

    #[test]
    fn no_role_grants_nothing() {
        let access = WorkspaceAccess::from_role_str(Some("SUPERUSER"));
        assert_eq!(access.role, None);
        assert!(!access.can_create_project());

        let project = ProjectAccess::default();
        assert!(!project.can_create_task());
    }

    #[test]
    fn viewer_project_access_is_read_only() {
        let access = ProjectAccess::new(Some(ProjectRole::Viewer));
        assert!(access.is_viewer());
        assert!(!access.can_create_task());
        assert!(!access.can_update_task());
        assert!(access.has(ProjectPermission::TaskView));
    }
}
