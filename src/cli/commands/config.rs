use clap::Subcommand;
use serde_json::json;

use crate::cli::config::{effective_config, load_settings, save_settings, session_file};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Show the effective configuration")]
    Show,

    #[command(about = "Save the API base URL used by later commands")]
    SetUrl {
        #[arg(help = "Base URL, e.g. http://localhost:8080/api/v1")]
        url: String,
    },
}

pub async fn handle(cmd: ConfigCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ConfigCommands::Show => {
            let config = effective_config()?;
            let session = session_file(&config)?;

            match output_format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&json!({
                            "config": config,
                            "session_file": session,
                        }))?
                    );
                }
                OutputFormat::Text => {
                    println!("Environment:       {:?}", config.environment);
                    println!("API base URL:      {}", config.api.base_url);
                    println!("Timeout:           {} ms", config.api.timeout_ms);
                    println!("With credentials:  {}", config.api.with_credentials);
                    println!("Notification poll: {} ms", config.polling.notification_interval_ms);
                    println!("Session file:      {}", session.display());
                }
            }
            Ok(())
        }
        ConfigCommands::SetUrl { url } => {
            url::Url::parse(&url).map_err(|e| anyhow::anyhow!("Invalid URL '{}': {}", url, e))?;

            let mut settings = load_settings()?;
            settings.api_base_url = Some(url.trim_end_matches('/').to_string());
            save_settings(&settings)?;

            output_success(
                &output_format,
                &format!("API base URL set to {}", url),
                Some(json!({ "api_base_url": settings.api_base_url })),
            )
        }
    }
}
