use clap::{Args, Subcommand};
use serde_json::json;

use crate::cli::config::open_context;
use crate::cli::utils::{output_collection, output_item, output_success, report_client_error};
use crate::cli::{resolve_workspace, OutputFormat};
use crate::models::{ProjectRequest, ProjectResponse};
use crate::rbac::ProjectAccess;

#[derive(Subcommand)]
pub enum ProjectCommands {
    #[command(about = "List projects")]
    List {
        #[arg(long, help = "Workspace ID (defaults to the active workspace)")]
        workspace: Option<String>,
    },

    #[command(about = "Show a project and what you may do with it")]
    Show {
        #[arg(help = "Project ID")]
        id: String,
        #[arg(long)]
        workspace: Option<String>,
    },

    #[command(about = "Create a project")]
    Create {
        #[command(flatten)]
        fields: ProjectFields,
        #[arg(long)]
        workspace: Option<String>,
    },

    #[command(about = "Update a project; omitted fields keep their value")]
    Update {
        #[arg(help = "Project ID")]
        id: String,
        #[command(flatten)]
        fields: ProjectFields,
        #[arg(long)]
        workspace: Option<String>,
    },

    #[command(about = "Delete a project")]
    Delete {
        #[arg(help = "Project ID")]
        id: String,
        #[arg(long)]
        workspace: Option<String>,
    },
}

#[derive(Args, Debug, Default)]
pub struct ProjectFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long = "key", help = "Project key, e.g. WEB")]
    project_key: Option<String>,
    #[arg(long, help = "LOW, MEDIUM, HIGH or CRITICAL")]
    priority: Option<String>,
    #[arg(long, help = "Hex color such as #A1B2C3")]
    color: Option<String>,
    #[arg(long = "start", help = "Start date (yyyy-MM-dd)")]
    start_date: Option<String>,
    #[arg(long = "end", help = "End date (yyyy-MM-dd)")]
    end_date: Option<String>,
    #[arg(long = "public")]
    is_public: Option<bool>,
}

impl ProjectFields {
    /// Overlay the given fields on `base`
    fn apply(self, mut base: ProjectRequest) -> ProjectRequest {
        if let Some(v) = self.name {
            base.name = v;
        }
        if let Some(v) = self.description {
            base.description = v;
        }
        if let Some(v) = self.project_key {
            base.project_key = v;
        }
        if let Some(v) = self.priority {
            base.priority = v.to_uppercase();
        }
        if let Some(v) = self.color {
            base.color = v;
        }
        if let Some(v) = self.start_date {
            base.start_date = v;
        }
        if let Some(v) = self.end_date {
            base.end_date = v;
        }
        if let Some(v) = self.is_public {
            base.is_public = v;
        }
        base
    }
}

fn request_from(project: &ProjectResponse) -> ProjectRequest {
    ProjectRequest {
        name: project.name.clone(),
        description: project.description.clone(),
        project_key: project.project_key.clone(),
        priority: project.priority.clone(),
        color: project.color.clone(),
        start_date: project.start_date.clone().unwrap_or_default(),
        end_date: project.end_date.clone().unwrap_or_default(),
        is_public: project.is_public,
    }
}

fn print_project(project: &ProjectResponse) {
    let access = ProjectAccess::from_role_str(project.current_member_type.as_deref());

    println!("ID:          {}", project.id);
    println!("Name:        {} [{}]", project.name, project.project_key);
    println!("Status:      {}", project.status);
    println!("Priority:    {}", project.priority);
    println!(
        "Dates:       {} .. {}",
        project.start_date.as_deref().unwrap_or("-"),
        project.end_date.as_deref().unwrap_or("-")
    );
    println!("Public:      {}", project.is_public);
    println!("Your role:   {}", project.current_member_type.as_deref().unwrap_or("-"));
    println!(
        "You may:     update={} delete={} create tasks={} invite={}",
        access.can_update_project(),
        access.can_delete_project(),
        access.can_create_task(),
        access.can_invite_member()
    );
    if !project.description.is_empty() {
        println!("Description: {}", project.description);
    }
}

pub async fn handle(cmd: ProjectCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = open_context()?;
    let store = ctx.projects();
    let fail = |e| report_client_error(&output_format, e);

    match cmd {
        ProjectCommands::List { workspace } => {
            let workspace_id = resolve_workspace(&ctx, workspace)?;
            let projects = store.fetch_projects(&workspace_id).await.map_err(fail)?;
            output_collection(
                &output_format,
                "projects",
                &projects,
                "No projects",
                &format!("{:<38} {:<10} {:<28} {:<10} {}", "ID", "KEY", "NAME", "PRIORITY", "STATUS"),
                |p| {
                    format!(
                        "{:<38} {:<10} {:<28} {:<10} {}",
                        p.id, p.project_key, p.name, p.priority, p.status
                    )
                },
            )
        }
        ProjectCommands::Show { id, workspace } => {
            let workspace_id = resolve_workspace(&ctx, workspace)?;
            let project = store.fetch_project(&workspace_id, &id).await.map_err(fail)?;
            output_item(&output_format, "project", &project, print_project)
        }
        ProjectCommands::Create { fields, workspace } => {
            if workspace.is_none() && !ctx.workspaces().access().can_create_project() {
                return Err(anyhow::anyhow!("Your workspace role does not allow you to create projects"));
            }
            let workspace_id = resolve_workspace(&ctx, workspace)?;
            let request = fields.apply(ProjectRequest {
                priority: "MEDIUM".to_string(),
                color: "#3B82F6".to_string(),
                ..Default::default()
            });
            let project = store.create_project(&workspace_id, &request).await.map_err(fail)?;
            output_success(
                &output_format,
                &format!("Project '{}' created", project.name),
                Some(json!({ "project": project })),
            )
        }
        ProjectCommands::Update { id, fields, workspace } => {
            let workspace_id = resolve_workspace(&ctx, workspace)?;
            let current = store.fetch_project(&workspace_id, &id).await.map_err(fail)?;
            if !ProjectAccess::from_role_str(current.current_member_type.as_deref()).can_update_project() {
                return Err(anyhow::anyhow!("Your project role does not allow you to update this project"));
            }

            let request = fields.apply(request_from(&current));
            let project = store
                .update_project(&workspace_id, &id, &request)
                .await
                .map_err(fail)?;
            output_success(
                &output_format,
                &format!("Project '{}' updated", project.name),
                Some(json!({ "project": project })),
            )
        }
        ProjectCommands::Delete { id, workspace } => {
            let workspace_id = resolve_workspace(&ctx, workspace)?;
            store.delete_project(&workspace_id, &id).await.map_err(fail)?;
            output_success(&output_format, &format!("Project '{}' deleted", id), None)
        }
    }
}
