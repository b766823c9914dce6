use clap::Subcommand;
use serde_json::json;

use crate::cli::config::open_context;
use crate::cli::utils::{output_collection, output_success, report_client_error};
use crate::cli::{resolve_workspace, OutputFormat};
use crate::models::{InviteMemberRequest, LabelRequest, UpdateMemberRoleRequest, WorkspaceRequest};
use crate::rbac::WorkspaceRole;

#[derive(Subcommand)]
pub enum WorkspaceCommands {
    #[command(about = "List workspaces (* marks the active one)")]
    List,

    #[command(about = "Switch the active workspace")]
    Use {
        #[arg(help = "Workspace ID")]
        id: String,
    },

    #[command(about = "Create a workspace and make it active")]
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        slug: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        logo_url: Option<String>,
    },

    #[command(about = "Delete a workspace")]
    Delete {
        #[arg(help = "Workspace ID (defaults to the active workspace)")]
        id: Option<String>,
    },

    #[command(about = "Restore a deleted workspace")]
    Restore {
        #[arg(help = "Workspace ID")]
        id: String,
    },

    #[command(about = "List members")]
    Members {
        #[arg(long, help = "Workspace ID (defaults to the active workspace)")]
        workspace: Option<String>,
    },

    #[command(about = "Invite a member by email")]
    Invite {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, default_value = "MEMBER", help = "OWNER, ADMIN, MEMBER or VIEWER")]
        role: String,
        #[arg(long)]
        workspace: Option<String>,
    },

    #[command(about = "Change the role of a member")]
    Role {
        #[arg(help = "Member ID")]
        member_id: String,
        #[arg(help = "OWNER, ADMIN, MEMBER or VIEWER")]
        role: String,
        #[arg(long)]
        workspace: Option<String>,
    },

    #[command(about = "Remove a member")]
    RemoveMember {
        #[arg(help = "User ID of the member")]
        user_id: String,
        #[arg(long)]
        workspace: Option<String>,
    },

    #[command(about = "List pending invitations")]
    Invitations {
        #[arg(long)]
        workspace: Option<String>,
    },

    #[command(about = "Cancel a pending invitation")]
    CancelInvitation {
        #[arg(help = "Invitation ID")]
        invitation_id: String,
        #[arg(long)]
        workspace: Option<String>,
    },

    #[command(about = "List labels")]
    Labels {
        #[arg(long)]
        workspace: Option<String>,
    },

    #[command(about = "Create a label")]
    CreateLabel {
        #[arg(long)]
        name: String,
        #[arg(long, help = "Hex color such as #A1B2C3")]
        color: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        workspace: Option<String>,
    },
}

/// Refuse locally when the role held in the active workspace lacks a permission
fn ensure(allowed: bool, action: &str) -> anyhow::Result<()> {
    if allowed {
        Ok(())
    } else {
        Err(anyhow::anyhow!("Your workspace role does not allow you to {}", action))
    }
}

pub async fn handle(cmd: WorkspaceCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = open_context()?;
    let store = ctx.workspaces();
    let fail = |e| report_client_error(&output_format, e);

    match cmd {
        WorkspaceCommands::List => {
            let workspaces = store.fetch_workspaces().await.map_err(fail)?;
            let active = store.active_workspace_id();

            output_collection(
                &output_format,
                "workspaces",
                &workspaces,
                "No workspaces",
                &format!(" {:<38} {:<24} {:<20} {}", "ID", "NAME", "SLUG", "ROLE"),
                |w| {
                    let marker = if active.as_deref() == Some(w.id.as_str()) { "*" } else { " " };
                    format!(
                        "{}{:<38} {:<24} {:<20} {}",
                        marker,
                        w.id,
                        w.name,
                        w.slug,
                        w.current_member_type.as_deref().unwrap_or("-")
                    )
                },
            )
        }
        WorkspaceCommands::Use { id } => {
            store.fetch_workspaces().await.map_err(fail)?;
            if !store.set_active_workspace_by_id(&id) {
                return Err(anyhow::anyhow!("Workspace '{}' not found", id));
            }
            output_success(
                &output_format,
                &format!("Switched to workspace '{}'", id),
                Some(json!({ "active_workspace": id })),
            )
        }
        WorkspaceCommands::Create { name, slug, description, logo_url } => {
            let request = WorkspaceRequest { name, description, slug, logo_url };
            let workspace = store.create_workspace(&request).await.map_err(fail)?;
            output_success(
                &output_format,
                &format!("Workspace '{}' created and selected", workspace.name),
                Some(json!({ "workspace": workspace })),
            )
        }
        WorkspaceCommands::Delete { id } => {
            if id.is_none() {
                ensure(store.access().can_delete_workspace(), "delete this workspace")?;
            }
            let id = resolve_workspace(&ctx, id)?;
            store.delete_workspace(&id).await.map_err(fail)?;
            output_success(&output_format, &format!("Workspace '{}' deleted", id), None)
        }
        WorkspaceCommands::Restore { id } => {
            let workspace = store.restore_workspace(&id).await.map_err(fail)?;
            output_success(
                &output_format,
                &format!("Workspace '{}' restored", workspace.name),
                Some(json!({ "workspace": workspace })),
            )
        }
        WorkspaceCommands::Members { workspace } => {
            let id = resolve_workspace(&ctx, workspace)?;
            let members = store.fetch_members(&id).await.map_err(fail)?;
            output_collection(
                &output_format,
                "members",
                &members,
                "No members",
                &format!("{:<38} {:<30} {:<24} {}", "ID", "EMAIL", "NAME", "ROLE"),
                |m| {
                    format!(
                        "{:<38} {:<30} {:<24} {}",
                        m.id,
                        m.user.email,
                        m.user.display_name(),
                        m.member_type
                    )
                },
            )
        }
        WorkspaceCommands::Invite { email, role, workspace } => {
            if workspace.is_none() {
                ensure(store.access().can_invite_member(), "invite members")?;
            }
            let id = resolve_workspace(&ctx, workspace)?;
            let request = InviteMemberRequest {
                email,
                member_type: role.to_uppercase(),
            };
            let invitation = store.invite_member(&id, &request).await.map_err(fail)?;
            output_success(
                &output_format,
                &format!("Invitation sent to {}", invitation.email),
                Some(json!({ "invitation": invitation })),
            )
        }
        WorkspaceCommands::Role { member_id, role, workspace } => {
            let role = role.to_uppercase();
            if workspace.is_none() {
                let access = store.access();
                let target: Option<WorkspaceRole> = role.parse().ok();
                let allowed = access.can_update_member()
                    && target.map(|t| access.can_change_role_of(t)).unwrap_or(true);
                ensure(allowed, "assign that role")?;
            }
            let id = resolve_workspace(&ctx, workspace)?;
            let request = UpdateMemberRoleRequest { member_type: role };
            let member = store
                .update_member_role(&id, &member_id, &request)
                .await
                .map_err(fail)?;
            output_success(
                &output_format,
                &format!("{} is now {}", member.user.email, member.member_type),
                Some(json!({ "member": member })),
            )
        }
        WorkspaceCommands::RemoveMember { user_id, workspace } => {
            if workspace.is_none() {
                ensure(store.access().can_delete_member(), "remove members")?;
            }
            let id = resolve_workspace(&ctx, workspace)?;
            store.remove_member(&id, &user_id).await.map_err(fail)?;
            output_success(&output_format, &format!("Member '{}' removed", user_id), None)
        }
        WorkspaceCommands::Invitations { workspace } => {
            let id = resolve_workspace(&ctx, workspace)?;
            let invitations = store.fetch_invitations(&id).await.map_err(fail)?;
            output_collection(
                &output_format,
                "invitations",
                &invitations,
                "No pending invitations",
                &format!("{:<38} {:<30} {:<10} {}", "ID", "EMAIL", "ROLE", "STATUS"),
                |i| format!("{:<38} {:<30} {:<10} {}", i.id, i.email, i.member_type, i.status),
            )
        }
        WorkspaceCommands::CancelInvitation { invitation_id, workspace } => {
            if workspace.is_none() {
                ensure(store.access().can_cancel_invitation(), "cancel invitations")?;
            }
            let id = resolve_workspace(&ctx, workspace)?;
            store.cancel_invitation(&id, &invitation_id).await.map_err(fail)?;
            output_success(
                &output_format,
                &format!("Invitation '{}' cancelled", invitation_id),
                None,
            )
        }
        WorkspaceCommands::Labels { workspace } => {
            let id = resolve_workspace(&ctx, workspace)?;
            let labels = store.fetch_labels(&id).await.map_err(fail)?;
            output_collection(
                &output_format,
                "labels",
                &labels,
                "No labels",
                &format!("{:<38} {:<20} {:<8} {}", "ID", "NAME", "COLOR", "DESCRIPTION"),
                |l| format!("{:<38} {:<20} {:<8} {}", l.id, l.name, l.color, l.description),
            )
        }
        WorkspaceCommands::CreateLabel { name, color, description, workspace } => {
            let id = resolve_workspace(&ctx, workspace)?;
            let request = LabelRequest { name, color, description };
            let label = store.create_label(&id, &request).await.map_err(fail)?;
            output_success(
                &output_format,
                &format!("Label '{}' created", label.name),
                Some(json!({ "label": label })),
            )
        }
    }
}
