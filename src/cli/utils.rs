use std::io::{self, BufRead, Write};

use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::error::ClientError;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(target)) = (data, response.as_object_mut()) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Turn a client error into the CLI error, printing a JSON body when asked for JSON
pub fn report_client_error(output_format: &OutputFormat, err: ClientError) -> anyhow::Error {
    let message = match &err {
        ClientError::Validation(errors) => {
            let fields = errors
                .iter()
                .map(|e| format!("  {}: {}", e.field, e.message))
                .collect::<Vec<_>>()
                .join("\n");
            format!("Invalid input:\n{}", fields)
        }
        other => other.user_message("Request failed"),
    };

    if let OutputFormat::Json = output_format {
        if let Err(e) = output_error(output_format, &message, Some(err.error_code())) {
            tracing::warn!("Failed to print error: {}", e);
        }
    }
    anyhow::Error::msg(message)
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                collection_name: []
            }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Output a single item as JSON, or through `text` for humans
pub fn output_item<T: Serialize>(
    output_format: &OutputFormat,
    name: &str,
    item: &T,
    text: impl FnOnce(&T),
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ name: item }))?);
        }
        OutputFormat::Text => text(item),
    }
    Ok(())
}

/// Output a collection: JSON array under `name`, or a header plus one row per item
pub fn output_collection<T: Serialize>(
    output_format: &OutputFormat,
    name: &str,
    items: &[T],
    empty_message: &str,
    header: &str,
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if items.is_empty() {
        return output_empty_collection(output_format, name, empty_message);
    }

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ name: items }))?);
        }
        OutputFormat::Text => {
            println!("{}", header);
            println!("{}", "-".repeat(header.len().max(20)));
            for item in items {
                println!("{}", row(item));
            }
        }
    }
    Ok(())
}

/// Use the provided value or read one line from stdin
pub fn value_or_prompt(value: Option<String>, prompt: &str) -> anyhow::Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }

    eprint!("{}: ", prompt);
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
