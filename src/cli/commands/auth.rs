use clap::Subcommand;
use serde_json::json;

use crate::cli::config::open_context;
use crate::cli::utils::{output_item, output_success, report_client_error, value_or_prompt};
use crate::cli::OutputFormat;
use crate::models::{LoginRequest, RegisterRequest};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login with email and password")]
    Login {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Logout and clear the stored session")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Refresh authentication token")]
    Refresh,

    #[command(about = "Show current user information")]
    Whoami,

    #[command(about = "Register new user")]
    Register {
        #[arg(help = "Display name")]
        name: String,
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = open_context()?;

    match cmd {
        AuthCommands::Login { email, password } => {
            let password = value_or_prompt(password, "Password")?;
            let request = LoginRequest { email, password };

            let outcome = ctx
                .auth()
                .login(&request)
                .await
                .map_err(|e| report_client_error(&output_format, e))?;

            output_success(
                &output_format,
                &format!("Logged in as {}", outcome.user.email),
                Some(json!({ "user": outcome.user })),
            )
        }
        AuthCommands::Logout => {
            ctx.logout().await;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Status => {
            let authenticated = ctx.auth().is_authenticated();
            let user = ctx.auth().user();

            match output_format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&json!({
                            "authenticated": authenticated,
                            "has_refresh_token": ctx.session().refresh_token().is_some(),
                            "user": user,
                        }))?
                    );
                }
                OutputFormat::Text => {
                    if authenticated {
                        let who = user.map(|u| u.email).unwrap_or_else(|| "unknown user".to_string());
                        println!("Authenticated as {}", who);
                    } else {
                        println!("Not authenticated");
                    }
                }
            }
            Ok(())
        }
        AuthCommands::Refresh => {
            ctx.auth()
                .refresh_token()
                .await
                .map_err(|e| report_client_error(&output_format, e))?;
            output_success(&output_format, "Access token refreshed", None)
        }
        AuthCommands::Whoami => {
            let user = ctx
                .auth()
                .fetch_profile()
                .await
                .map_err(|e| report_client_error(&output_format, e))?;

            output_item(&output_format, "user", &user, |u| {
                println!("ID:    {}", u.id);
                println!("Name:  {}", u.display_name());
                println!("Email: {}", u.email);
                if !u.roles.is_empty() {
                    println!("Roles: {}", u.roles.join(", "));
                }
            })
        }
        AuthCommands::Register { name, email, password } => {
            let password = value_or_prompt(password, "Password")?;
            let request = RegisterRequest { email, password, name };

            let response = ctx
                .auth()
                .register(&request)
                .await
                .map_err(|e| report_client_error(&output_format, e))?;

            let message = if response.message.is_empty() {
                format!("Registered {}", response.user.email)
            } else {
                response.message.clone()
            };
            output_success(&output_format, &message, Some(json!({ "user": response.user })))
        }
    }
}
