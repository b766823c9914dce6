use clap::Subcommand;
use serde_json::json;

use crate::cli::config::open_context;
use crate::cli::utils::{output_collection, output_success, report_client_error};
use crate::cli::OutputFormat;
use crate::utils::format_relative_time;

#[derive(Subcommand)]
pub enum NotificationCommands {
    #[command(about = "List notifications")]
    List {
        #[arg(long, help = "Only unread notifications")]
        unread: bool,
    },

    #[command(about = "Show the unread count")]
    Unread,

    #[command(about = "Mark every notification as read")]
    ReadAll,

    #[command(about = "Delete one notification")]
    Delete {
        #[arg(help = "Notification ID")]
        id: String,
    },

    #[command(about = "Delete all notifications")]
    Clear,

    #[command(about = "Poll the unread count until interrupted")]
    Watch {
        #[arg(long, help = "Polling interval in milliseconds (defaults to configuration)")]
        interval_ms: Option<u64>,
    },
}

pub async fn handle(cmd: NotificationCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = open_context()?;
    let store = ctx.notifications();
    let fail = |e| report_client_error(&output_format, e);

    match cmd {
        NotificationCommands::List { unread } => {
            store.fetch_notifications().await.map_err(fail)?;
            let notifications = if unread { store.unread() } else { store.notifications() };

            output_collection(
                &output_format,
                "notifications",
                &notifications,
                "No notifications",
                &format!(" {:<38} {:<22} {:<16} {}", "ID", "TYPE", "WHEN", "MESSAGE"),
                |n| {
                    format!(
                        "{}{:<38} {:<22} {:<16} {}",
                        if n.is_read { " " } else { "•" },
                        n.id,
                        n.notification_type,
                        format_relative_time(n.created_at.as_deref()),
                        n.message
                    )
                },
            )
        }
        NotificationCommands::Unread => {
            let count = store.fetch_unread_count().await.map_err(fail)?;
            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "unread": count }))?);
                }
                OutputFormat::Text => println!("{} unread", count),
            }
            Ok(())
        }
        NotificationCommands::ReadAll => {
            let marked = store.mark_all_as_read().await.map_err(fail)?;
            output_success(
                &output_format,
                &format!("Marked {} notifications as read", marked),
                Some(json!({ "marked": marked })),
            )
        }
        NotificationCommands::Delete { id } => {
            store.delete_notification(&id).await.map_err(fail)?;
            output_success(&output_format, &format!("Notification '{}' deleted", id), None)
        }
        NotificationCommands::Clear => {
            store.clear_all().await.map_err(fail)?;
            output_success(&output_format, "All notifications cleared", None)
        }
        NotificationCommands::Watch { interval_ms } => {
            let poller = match interval_ms {
                Some(ms) => crate::hooks::NotificationPoller::start(
                    store.clone(),
                    std::time::Duration::from_millis(ms),
                ),
                None => ctx.start_notification_polling(),
            };

            let mut rx = store.state().subscribe();
            let mut last = None;
            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let count = rx.borrow_and_update().unread_count;
                        if last != Some(count) {
                            last = Some(count);
                            match output_format {
                                OutputFormat::Json => println!("{}", json!({ "unread": count })),
                                OutputFormat::Text => println!("{} unread", count),
                            }
                        }
                    }
                }
            }

            poller.stop();
            Ok(())
        }
    }
}
