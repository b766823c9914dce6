use clap::{Args, Subcommand};
use serde_json::json;

use crate::cli::config::open_context;
use crate::cli::utils::{output_collection, output_item, output_success, report_client_error};
use crate::cli::OutputFormat;
use crate::models::{TaskRequest, TaskResponse};
use crate::utils::{format_date, format_relative_time, truncate};

#[derive(Subcommand)]
pub enum TaskCommands {
    #[command(about = "List tasks of a project")]
    List {
        #[arg(help = "Project ID")]
        project: String,
    },

    #[command(about = "Show one task")]
    Show {
        #[arg(help = "Project ID")]
        project: String,
        #[arg(help = "Task ID")]
        id: String,
    },

    #[command(about = "Create a task")]
    Create {
        #[arg(help = "Project ID")]
        project: String,
        #[command(flatten)]
        fields: TaskFields,
    },

    #[command(about = "Update a task; omitted fields keep their value")]
    Update {
        #[arg(help = "Project ID")]
        project: String,
        #[arg(help = "Task ID")]
        id: String,
        #[command(flatten)]
        fields: TaskFields,
    },

    #[command(about = "Delete a task")]
    Delete {
        #[arg(help = "Project ID")]
        project: String,
        #[arg(help = "Task ID")]
        id: String,
    },
}

#[derive(Args, Debug, Default)]
pub struct TaskFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long, help = "TODO, IN_PROGRESS, IN_REVIEW, DONE or CANCELLED")]
    status: Option<String>,
    #[arg(long, help = "LOW, MEDIUM, HIGH or CRITICAL")]
    priority: Option<String>,
    #[arg(long = "due", help = "Due date (yyyy-MM-dd)")]
    due_date: Option<String>,
    #[arg(long = "hours")]
    estimated_hours: Option<f64>,
    #[arg(long = "assignee", help = "Assignee user ID (repeatable)")]
    assignee_ids: Vec<String>,
    #[arg(long = "label", help = "Label ID (repeatable)")]
    label_ids: Vec<String>,
    #[arg(long = "parent")]
    parent_task_id: Option<String>,
}

impl TaskFields {
    fn apply(self, mut base: TaskRequest) -> TaskRequest {
        if let Some(v) = self.title {
            base.title = v;
        }
        if self.description.is_some() {
            base.description = self.description;
        }
        if let Some(v) = self.status {
            base.status = v.to_uppercase();
        }
        if let Some(v) = self.priority {
            base.priority = v.to_uppercase();
        }
        if self.due_date.is_some() {
            base.due_date = self.due_date;
        }
        if self.estimated_hours.is_some() {
            base.estimated_hours = self.estimated_hours;
        }
        if !self.assignee_ids.is_empty() {
            base.assignee_ids = Some(self.assignee_ids);
        }
        if !self.label_ids.is_empty() {
            base.label_ids = Some(self.label_ids);
        }
        if self.parent_task_id.is_some() {
            base.parent_task_id = self.parent_task_id;
        }
        base
    }
}

fn request_from(task: &TaskResponse) -> TaskRequest {
    TaskRequest {
        title: task.title.clone(),
        description: Some(task.description.clone()).filter(|d| !d.is_empty()),
        status: task.status.clone(),
        priority: task.priority.clone(),
        due_date: task.due_date.clone(),
        estimated_hours: task.estimated_hours,
        assignee_ids: Some(task.assignees.iter().map(|u| u.id.clone()).collect()),
        label_ids: Some(task.labels.iter().map(|l| l.id.clone()).collect()),
        parent_task_id: task.parent_task.as_ref().map(|p| p.id.clone()),
    }
}

fn print_task(task: &TaskResponse) {
    println!("ID:        {}", task.id);
    println!("Key:       {}", task.task_key);
    println!("Title:     {}", task.title);
    println!("Status:    {}", task.status);
    println!("Priority:  {}", task.priority);
    if let Some(due) = &task.due_date {
        println!("Due:       {}", format_date(due));
    }
    if let Some(hours) = task.estimated_hours {
        println!("Estimate:  {}h", hours);
    }
    if !task.assignees.is_empty() {
        let names: Vec<String> = task.assignees.iter().map(|u| u.display_name()).collect();
        println!("Assignees: {}", names.join(", "));
    }
    if !task.labels.is_empty() {
        let names: Vec<&str> = task.labels.iter().map(|l| l.name.as_str()).collect();
        println!("Labels:    {}", names.join(", "));
    }
    if let Some(parent) = &task.parent_task {
        println!("Parent:    {} {}", parent.task_key, parent.title);
    }
    println!("Updated:   {}", format_relative_time(Some(task.updated_at.as_str())));
    if !task.description.is_empty() {
        println!();
        println!("{}", task.description);
    }
}

pub async fn handle(cmd: TaskCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = open_context()?;
    let store = ctx.tasks();
    let fail = |e| report_client_error(&output_format, e);

    match cmd {
        TaskCommands::List { project } => {
            let tasks = store.fetch_tasks(&project).await.map_err(fail)?;
            output_collection(
                &output_format,
                "tasks",
                &tasks,
                "No tasks",
                &format!("{:<38} {:<10} {:<12} {:<9} {}", "ID", "KEY", "STATUS", "PRIORITY", "TITLE"),
                |t| {
                    format!(
                        "{:<38} {:<10} {:<12} {:<9} {}",
                        t.id,
                        t.task_key,
                        t.status,
                        t.priority,
                        truncate(&t.title, 60)
                    )
                },
            )
        }
        TaskCommands::Show { project, id } => {
            let task = store.fetch_task(&project, &id).await.map_err(fail)?;
            output_item(&output_format, "task", &task, print_task)
        }
        TaskCommands::Create { project, fields } => {
            let request = fields.apply(TaskRequest {
                status: "TODO".to_string(),
                priority: "MEDIUM".to_string(),
                ..Default::default()
            });
            let task = store.create_task(&project, &request).await.map_err(fail)?;
            output_success(
                &output_format,
                &format!("Task '{}' created", task.title),
                Some(json!({ "task": task })),
            )
        }
        TaskCommands::Update { project, id, fields } => {
            let current = store.fetch_task(&project, &id).await.map_err(fail)?;
            let request = fields.apply(request_from(&current));
            let task = store.update_task(&project, &id, &request).await.map_err(fail)?;
            output_success(
                &output_format,
                &format!("Task '{}' updated", task.title),
                Some(json!({ "task": task })),
            )
        }
        TaskCommands::Delete { project, id } => {
            store.delete_task(&project, &id).await.map_err(fail)?;
            output_success(&output_format, &format!("Task '{}' deleted", id), None)
        }
    }
}
