use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::views::ViewOutcome;

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

            if let (Some(Value::Object(extra)), Some(obj)) = (data, response.as_object_mut()) {
                obj.extend(extra);
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

pub const LOGIN_HINT: &str = "Please log in first: mtrack session login <email>";

/// Render a view outcome. Redirects and failures become command errors so
/// the binary exits non-zero.
pub fn render_outcome<T: Serialize>(
    output_format: &OutputFormat,
    outcome: ViewOutcome<T>,
    text: impl FnOnce(&T),
) -> anyhow::Result<()> {
    match outcome {
        ViewOutcome::Ready(state) => {
            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&state)?),
                OutputFormat::Text => text(&state),
            }
            Ok(())
        }
        ViewOutcome::RedirectToLogin => {
            if let OutputFormat::Json = output_format {
                output_error(output_format, LOGIN_HINT, Some("LOGIN_REQUIRED"))?;
            }
            Err(anyhow::anyhow!(LOGIN_HINT))
        }
        ViewOutcome::Failed(message) => {
            if let OutputFormat::Json = output_format {
                output_error(output_format, &message, Some("REQUEST_FAILED"))?;
            }
            Err(anyhow::anyhow!(message))
        }
    }
}

/// Cut `s` to at most `width` characters, marking the cut
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let kept: String = s.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", kept)
}

/// Text progress bar for table output
pub fn progress_bar(percent: u32, width: usize) -> String {
    let filled = (percent.min(100) as usize * width + 50) / 100;
    format!("[{}{}] {:>3}%", "#".repeat(filled), ".".repeat(width - filled), percent)
}

/// Read a line from stdin, used when a password is not passed as a flag
pub fn prompt(label: &str) -> anyhow::Result<String> {
    use std::io::Write;

    eprint!("{}: ", label);
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
