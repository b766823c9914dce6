use serde::{Deserialize, Serialize};

use super::user::UserResponse;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub owner: Option<UserResponse>,
    #[serde(default)]
    pub is_active: bool,
    /// Role of the signed-in user in this workspace, when the backend reports it
    #[serde(default)]
    pub current_member_type: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Body of both create and update calls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceRequest {
    pub name: String,
    pub description: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceMemberResponse {
    pub id: String,
    pub user: UserResponse,
    pub member_type: String,
    #[serde(default)]
    pub invited_by: Option<UserResponse>,
    #[serde(default)]
    pub added_by: Option<UserResponse>,
    #[serde(default)]
    pub joined_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceInvitationResponse {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub invited_by: Option<UserResponse>,
    pub member_type: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteMemberRequest {
    pub email: String,
    pub member_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRoleRequest {
    pub member_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_omits_missing_logo() {
        let req = WorkspaceRequest {
            name: "Acme".into(),
            description: "Main".into(),
            slug: "acme".into(),
            logo_url: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("logoUrl").is_none());
        assert_eq!(json["slug"], "acme");
    }
}
