use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: String,
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(rename = "type", default)]
    pub notification_type: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub related_entity_id: Option<String>,
    #[serde(default)]
    pub related_entity_type: Option<String>,
}

impl NotificationResponse {
    pub fn kind(&self) -> NotificationKind {
        self.notification_type
            .parse()
            .unwrap_or(NotificationKind::General)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    TaskAssigned,
    TaskUpdated,
    TaskCompleted,
    ProjectUpdated,
    MemberAdded,
    MemberRemoved,
    WorkspaceInvitation,
    CommentAdded,
    General,
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TASK_ASSIGNED" => Ok(Self::TaskAssigned),
            "TASK_UPDATED" => Ok(Self::TaskUpdated),
            "TASK_COMPLETED" => Ok(Self::TaskCompleted),
            "PROJECT_UPDATED" => Ok(Self::ProjectUpdated),
            "MEMBER_ADDED" => Ok(Self::MemberAdded),
            "MEMBER_REMOVED" => Ok(Self::MemberRemoved),
            "WORKSPACE_INVITATION" => Ok(Self::WorkspaceInvitation),
            "COMMENT_ADDED" => Ok(Self::CommentAdded),
            "GENERAL" => Ok(Self::General),
            other => Err(format!("unknown notification type: {}", other)),
        }
    }
}
