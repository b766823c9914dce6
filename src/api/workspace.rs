use super::ApiClient;
use crate::error::ClientResult;
use crate::models::{
    InviteMemberRequest, LabelRequest, LabelResponse, UpdateMemberRoleRequest, WorkspaceInvitationResponse, WorkspaceMemberResponse,
    WorkspaceRequest, WorkspaceResponse,
};

pub struct WorkspaceApi<'a> {
    client: &'a ApiClient,
}

impl<'a> WorkspaceApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ClientResult<Vec<WorkspaceResponse>> {
        self.client.get("/workspaces").await
    }

    pub async fn get(&self, id: &str) -> ClientResult<WorkspaceResponse> {
        self.client.get(&format!("/workspaces/{}", id)).await
    }

    pub async fn create(&self, data: &WorkspaceRequest) -> ClientResult<WorkspaceResponse> {
        self.client.post("/workspaces", data).await
    }

    pub async fn update(&self, id: &str, data: &WorkspaceRequest) -> ClientResult<WorkspaceResponse> {
        self.client.put(&format!("/workspaces/{}", id), data).await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.client.delete(&format!("/workspaces/{}", id)).await
    }

    /// Restore a deleted workspace
    pub async fn restore(&self, id: &str) -> ClientResult<WorkspaceResponse> {
        self.client.patch_empty(&format!("/workspaces/{}/restore", id)).await
    }

    // Members

    pub async fn members(&self, workspace_id: &str) -> ClientResult<Vec<WorkspaceMemberResponse>> {
        self.client
            .get(&format!("/workspaces/{}/members", workspace_id))
            .await
    }

    pub async fn member(
        &self,
        workspace_id: &str,
        member_id: &str,
    ) -> ClientResult<WorkspaceMemberResponse> {
        self.client
            .get(&format!("/workspaces/{}/members/{}", workspace_id, member_id))
            .await
    }

    pub async fn invite_member(
        &self,
        workspace_id: &str,
        data: &InviteMemberRequest,
    ) -> ClientResult<WorkspaceInvitationResponse> {
        self.client
            .post(&format!("/workspaces/{}/members", workspace_id), data)
            .await
    }

    pub async fn update_member_role(
        &self,
        workspace_id: &str,
        member_id: &str,
        data: &UpdateMemberRoleRequest,
    ) -> ClientResult<WorkspaceMemberResponse> {
        self.client
            .patch(&format!("/workspaces/{}/members/{}", workspace_id, member_id), data)
            .await
    }

    /// Memberships are removed by the member's user id, not the membership id
    pub async fn remove_member(&self, workspace_id: &str, user_id: &str) -> ClientResult<()> {
        self.client
            .delete(&format!("/workspaces/{}/members/{}", workspace_id, user_id))
            .await
    }

    // Invitations

    pub async fn pending_invitations(
        &self,
        workspace_id: &str,
    ) -> ClientResult<Vec<WorkspaceInvitationResponse>> {
        self.client
            .get(&format!("/workspaces/{}/invitations", workspace_id))
            .await
    }

    pub async fn cancel_invitation(&self, workspace_id: &str, invitation_id: &str) -> ClientResult<()> {
        self.client
            .delete(&format!("/workspaces/{}/invitations/{}", workspace_id, invitation_id))
            .await
    }

    // Labels

    pub async fn labels(&self, workspace_id: &str) -> ClientResult<Vec<LabelResponse>> {
        self.client
            .get(&format!("/workspaces/{}/labels", workspace_id))
            .await
    }

    pub async fn create_label(
        &self,
        workspace_id: &str,
        data: &LabelRequest,
    ) -> ClientResult<LabelResponse> {
        self.client
            .post(&format!("/workspaces/{}/labels", workspace_id), data)
            .await
    }
}
