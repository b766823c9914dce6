use serde::{Deserialize, Serialize};

use super::user::UserResponse;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub project_key: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub owner: Option<UserResponse>,
    /// Role of the signed-in user in this project, when the backend reports it
    #[serde(default)]
    pub current_member_type: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRequest {
    pub name: String,
    pub description: String,
    pub project_key: String,
    pub priority: String,
    pub color: String,
    pub start_date: String,
    pub end_date: String,
    pub is_public: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMemberResponse {
    pub id: String,
    pub user: UserResponse,
    pub member_type: String,
    #[serde(default)]
    pub added_by: Option<UserResponse>,
    #[serde(default)]
    pub added_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInvitationResponse {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub invited_by: Option<UserResponse>,
    pub member_type: String,
    #[serde(default)]
    pub status: String,
}
