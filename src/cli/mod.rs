pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::context::AppContext;
use crate::hooks::require_workspace;

#[derive(Parser)]
#[command(name = "planboard")]
#[command(about = "Planboard CLI - command-line client for the Planboard project-management API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Show or change CLI configuration")]
    Config {
        #[command(subcommand)]
        cmd: commands::config::ConfigCommands,
    },

    #[command(about = "Authentication and token management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Workspaces, members, invitations and labels")]
    Workspace {
        #[command(subcommand)]
        cmd: commands::workspace::WorkspaceCommands,
    },

    #[command(about = "Projects in the active workspace")]
    Project {
        #[command(subcommand)]
        cmd: commands::project::ProjectCommands,
    },

    #[command(about = "Tasks of a project")]
    Task {
        #[command(subcommand)]
        cmd: commands::task::TaskCommands,
    },

    #[command(about = "Notifications of the signed-in user")]
    Notification {
        #[command(subcommand)]
        cmd: commands::notification::NotificationCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Config { cmd } => commands::config::handle(cmd, output_format).await,
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format).await,
        Commands::Workspace { cmd } => commands::workspace::handle(cmd, output_format).await,
        Commands::Project { cmd } => commands::project::handle(cmd, output_format).await,
        Commands::Task { cmd } => commands::task::handle(cmd, output_format).await,
        Commands::Notification { cmd } => commands::notification::handle(cmd, output_format).await,
    }
}

/// Explicit workspace id, else the persisted active workspace
pub fn resolve_workspace(ctx: &AppContext, explicit: Option<String>) -> anyhow::Result<String> {
    if let Some(id) = explicit {
        return Ok(id);
    }
    let active = ctx.workspaces().active_workspace_id();
    Ok(require_workspace(
        active.as_deref(),
        ctx.notices(),
        Some("No workspace selected (use `planboard workspace use <id>` or --workspace)"),
    )?)
}
