use std::sync::Arc;

use serde::Serialize;

use super::{has_status, remove_by_id, replace_by_id, Status, Store};
use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::models::{
    InviteMemberRequest, LabelRequest, LabelResponse, UpdateMemberRoleRequest,
    WorkspaceInvitationResponse, WorkspaceMemberResponse, WorkspaceRequest, WorkspaceResponse,
};
use crate::notify::Notices;
use crate::rbac::{WorkspaceAccess, WorkspaceRole};
use crate::storage::keys;
use crate::validation::Validate;

#[derive(Debug, Clone, Default, Serialize)]
pub struct WorkspaceState {
    pub workspaces: Vec<WorkspaceResponse>,
    pub active: Option<WorkspaceResponse>,
    /// Set once the list has been fetched this session
    pub is_initialized: bool,
    pub members: Vec<WorkspaceMemberResponse>,
    pub invitations: Vec<WorkspaceInvitationResponse>,
    pub labels: Vec<LabelResponse>,
    pub status: Status,
}

has_status!(WorkspaceState);

impl WorkspaceState {
    pub fn active_workspace_id(&self) -> Option<&str> {
        self.active.as_ref().map(|w| w.id.as_str())
    }

    /// Keep the active selection valid against a freshly fetched list
    fn reconcile_active(&mut self) {
        let active_id = self.active.as_ref().map(|w| w.id.clone());
        let refreshed = active_id
            .and_then(|id| self.workspaces.iter().find(|w| w.id == id))
            .cloned();

        // a vanished or missing selection falls back to the first workspace
        self.active = refreshed.or_else(|| self.workspaces.first().cloned());
    }
}

pub struct WorkspaceStore {
    client: Arc<ApiClient>,
    notices: Notices,
    state: Store<WorkspaceState>,
}

impl WorkspaceStore {
    pub fn new(client: Arc<ApiClient>, notices: Notices) -> Self {
        let active = client.session().snapshot::<WorkspaceResponse>(keys::WORKSPACE);
        Self {
            client,
            notices,
            state: Store::new(WorkspaceState {
                active,
                ..Default::default()
            }),
        }
    }

    pub fn state(&self) -> &Store<WorkspaceState> {
        &self.state
    }

    pub fn workspaces(&self) -> Vec<WorkspaceResponse> {
        self.state.read(|s| s.workspaces.clone())
    }

    pub fn active_workspace(&self) -> Option<WorkspaceResponse> {
        self.state.read(|s| s.active.clone())
    }

    pub fn active_workspace_id(&self) -> Option<String> {
        self.state.read(|s| s.active_workspace_id().map(str::to_string))
    }

    pub fn is_initialized(&self) -> bool {
        self.state.read(|s| s.is_initialized)
    }

    pub fn has_workspaces(&self) -> bool {
        self.state.read(|s| !s.workspaces.is_empty())
    }

    pub fn has_active_workspace(&self) -> bool {
        self.state.read(|s| s.active.is_some())
    }

    /// Role of the current user in the active workspace
    pub fn current_role(&self) -> Option<WorkspaceRole> {
        self.state.read(|s| {
            s.active
                .as_ref()
                .and_then(|w| w.current_member_type.as_deref())
                .and_then(|role| role.parse().ok())
        })
    }

    pub fn access(&self) -> WorkspaceAccess {
        WorkspaceAccess::new(self.current_role())
    }

    /// Fetch all workspaces; without a stored token this is an empty no-op
    pub async fn fetch_workspaces(&self) -> ClientResult<Vec<WorkspaceResponse>> {
        if !self.client.session().has_token() {
            return Ok(Vec::new());
        }

        let result = self
            .state
            .action(
                &self.notices,
                "Failed to fetch workspaces",
                self.client.workspaces().list(),
                |s, workspaces| {
                    s.workspaces = workspaces.clone();
                    s.reconcile_active();
                    s.is_initialized = true;
                },
            )
            .await;

        match result {
            Ok(workspaces) => {
                self.persist_active();
                Ok(workspaces)
            }
            Err(e) => {
                self.state.update(|s| {
                    s.active = None;
                    s.is_initialized = false;
                });
                self.persist_active();
                Err(e)
            }
        }
    }

    pub async fn fetch_workspace(&self, id: &str) -> ClientResult<WorkspaceResponse> {
        self.state
            .action(
                &self.notices,
                "Failed to fetch workspace",
                self.client.workspaces().get(id),
                |s, workspace| {
                    if !replace_by_id(&mut s.workspaces, workspace.clone()) {
                        s.workspaces.push(workspace.clone());
                    }
                    if s.active_workspace_id() == Some(workspace.id.as_str()) {
                        s.active = Some(workspace.clone());
                    }
                },
            )
            .await
    }

    pub fn set_active_workspace(&self, workspace: Option<WorkspaceResponse>) {
        if let Some(w) = &workspace {
            tracing::info!("Switched to workspace {} ({})", w.name, w.id);
        }
        self.state.update(|s| s.active = workspace);
        self.persist_active();
    }

    /// Select a workspace already in the list; unknown ids are ignored
    pub fn set_active_workspace_by_id(&self, id: &str) -> bool {
        let found = self.state.read(|s| s.workspaces.iter().find(|w| w.id == id).cloned());
        match found {
            Some(workspace) => {
                self.set_active_workspace(Some(workspace));
                true
            }
            None => false,
        }
    }

    /// Create a workspace and make it the active one
    pub async fn create_workspace(&self, data: &WorkspaceRequest) -> ClientResult<WorkspaceResponse> {
        data.validate()?;
        let workspace = self
            .state
            .action(
                &self.notices,
                "Failed to create workspace",
                self.client.workspaces().create(data),
                |s, workspace| {
                    s.workspaces.push(workspace.clone());
                    s.active = Some(workspace.clone());
                },
            )
            .await?;
        self.persist_active();
        Ok(workspace)
    }

    pub async fn update_workspace(
        &self,
        id: &str,
        data: &WorkspaceRequest,
    ) -> ClientResult<WorkspaceResponse> {
        data.validate()?;
        let workspace = self
            .state
            .action(
                &self.notices,
                "Failed to update workspace",
                self.client.workspaces().update(id, data),
                |s, workspace| {
                    replace_by_id(&mut s.workspaces, workspace.clone());
                    if s.active_workspace_id() == Some(id) {
                        s.active = Some(workspace.clone());
                    }
                },
            )
            .await?;
        self.persist_active();
        Ok(workspace)
    }

    /// Delete a workspace; an active one is replaced by the first remaining workspace
    pub async fn delete_workspace(&self, id: &str) -> ClientResult<()> {
        self.state
            .action(
                &self.notices,
                "Failed to delete workspace",
                self.client.workspaces().delete(id),
                |s, _| {
                    remove_by_id(&mut s.workspaces, id);
                    if s.active_workspace_id() == Some(id) {
                        s.active = s.workspaces.first().cloned();
                    }
                },
            )
            .await?;
        self.persist_active();
        Ok(())
    }

    pub async fn restore_workspace(&self, id: &str) -> ClientResult<WorkspaceResponse> {
        self.state
            .action(
                &self.notices,
                "Failed to restore workspace",
                self.client.workspaces().restore(id),
                |s, workspace| {
                    if !replace_by_id(&mut s.workspaces, workspace.clone()) {
                        s.workspaces.push(workspace.clone());
                    }
                },
            )
            .await
    }

    // Members

    pub async fn fetch_members(&self, workspace_id: &str) -> ClientResult<Vec<WorkspaceMemberResponse>> {
        self.state
            .action(
                &self.notices,
                "Failed to fetch members",
                self.client.workspaces().members(workspace_id),
                |s, members| s.members = members.clone(),
            )
            .await
    }

    pub async fn fetch_member(
        &self,
        workspace_id: &str,
        member_id: &str,
    ) -> ClientResult<WorkspaceMemberResponse> {
        self.state
            .action(
                &self.notices,
                "Failed to fetch member",
                self.client.workspaces().member(workspace_id, member_id),
                |s, member| {
                    replace_by_id(&mut s.members, member.clone());
                },
            )
            .await
    }

    /// Invite by email; the invitation joins the pending list
    pub async fn invite_member(
        &self,
        workspace_id: &str,
        data: &InviteMemberRequest,
    ) -> ClientResult<WorkspaceInvitationResponse> {
        data.validate()?;
        self.state
            .action(
                &self.notices,
                "Failed to invite member",
                self.client.workspaces().invite_member(workspace_id, data),
                |s, invitation| s.invitations.push(invitation.clone()),
            )
            .await
    }

    pub async fn update_member_role(
        &self,
        workspace_id: &str,
        member_id: &str,
        data: &UpdateMemberRoleRequest,
    ) -> ClientResult<WorkspaceMemberResponse> {
        data.validate()?;
        self.state
            .action(
                &self.notices,
                "Failed to update member role",
                self.client
                    .workspaces()
                    .update_member_role(workspace_id, member_id, data),
                |s, member| {
                    replace_by_id(&mut s.members, member.clone());
                },
            )
            .await
    }

    pub async fn remove_member(&self, workspace_id: &str, user_id: &str) -> ClientResult<()> {
        self.state
            .action(
                &self.notices,
                "Failed to remove member",
                self.client.workspaces().remove_member(workspace_id, user_id),
                |s, _| {
                    s.members.retain(|member| member.user.id != user_id);
                },
            )
            .await
    }

    // Invitations

    pub async fn fetch_invitations(
        &self,
        workspace_id: &str,
    ) -> ClientResult<Vec<WorkspaceInvitationResponse>> {
        self.state
            .action(
                &self.notices,
                "Failed to fetch invitations",
                self.client.workspaces().pending_invitations(workspace_id),
                |s, invitations| s.invitations = invitations.clone(),
            )
            .await
    }

    pub async fn cancel_invitation(&self, workspace_id: &str, invitation_id: &str) -> ClientResult<()> {
        self.state
            .action(
                &self.notices,
                "Failed to cancel invitation",
                self.client
                    .workspaces()
                    .cancel_invitation(workspace_id, invitation_id),
                |s, _| {
                    remove_by_id(&mut s.invitations, invitation_id);
                },
            )
            .await
    }

    // Labels

    pub async fn fetch_labels(&self, workspace_id: &str) -> ClientResult<Vec<LabelResponse>> {
        self.state
            .action(
                &self.notices,
                "Failed to fetch labels",
                self.client.workspaces().labels(workspace_id),
                |s, labels| s.labels = labels.clone(),
            )
            .await
    }

    pub async fn create_label(&self, workspace_id: &str, data: &LabelRequest) -> ClientResult<LabelResponse> {
        data.validate()?;
        self.state
            .action(
                &self.notices,
                "Failed to create label",
                self.client.workspaces().create_label(workspace_id, data),
                |s, label| s.labels.push(label.clone()),
            )
            .await
    }

    pub fn clear_error(&self) {
        self.state.clear_error();
    }

    /// Forget every workspace and the selection, persisted marker included
    pub fn clear_all_data(&self) {
        self.state.update(|s| *s = WorkspaceState::default());
        self.persist_active();
    }

    fn persist_active(&self) {
        let session = self.client.session();
        let result = match self.active_workspace() {
            Some(workspace) => session
                .save_snapshot(keys::WORKSPACE, &workspace)
                .and_then(|_| session.storage().set(keys::ACTIVE_WORKSPACE_ID, &workspace.id)),
            None => session
                .storage()
                .remove(keys::WORKSPACE)
                .and_then(|_| session.storage().remove(keys::ACTIVE_WORKSPACE_ID)),
        };
        if let Err(e) = result {
            tracing::warn!("Failed to persist active workspace: {}", e);
        }
    }
}
