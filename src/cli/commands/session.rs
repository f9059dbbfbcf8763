use clap::Subcommand;
use serde_json::json;

use crate::api::TrackerApi;
use crate::cli::utils::*;
use crate::cli::{OutputFormat, Runtime};
use crate::models::{Credentials, Registration};
use crate::session::SessionError;
use crate::views::ViewOutcome;

#[derive(Subcommand)]
pub enum SessionCommands {
    #[command(about = "Log in and store the session credential")]
    Login {
        #[arg(help = "Account email")]
        email: String,
        #[arg(long, help = "Password (prompted for when omitted)")]
        password: Option<String>,
    },

    #[command(about = "Create an account")]
    Register {
        #[arg(help = "Display name")]
        name: String,
        #[arg(help = "Account email")]
        email: String,
        #[arg(long, help = "Password (prompted for when omitted)")]
        password: Option<String>,
    },

    #[command(about = "Forget the stored session credential")]
    Logout,

    #[command(about = "Show whether the stored credential is usable")]
    Status,

    #[command(about = "Print the user id carried by the stored credential")]
    Whoami,
}

pub async fn handle(cmd: SessionCommands, runtime: &Runtime, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        SessionCommands::Login { email, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt("Password")?,
            };

            let api = runtime.api()?;
            let token = api.login(&Credentials { email: email.clone(), password }).await?;
            let claims = runtime.resolver().store_credential(&token)?;
            tracing::info!(user_id = %claims.user_id, "logged in");

            output_success(
                &output_format,
                &format!("Logged in as {} ({})", claims.name.as_deref().unwrap_or(&email), claims.user_id),
                Some(json!({ "user_id": claims.user_id, "server": runtime.base_url })),
            )
        }
        SessionCommands::Register { name, email, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt("Password")?,
            };
            if password.is_empty() {
                return Err(anyhow::anyhow!("Password is required"));
            }

            let api = runtime.api()?;
            api.register(&Registration {
                name: name.clone(),
                email: email.clone(),
                password,
            })
            .await?;

            output_success(
                &output_format,
                &format!("Registered {}. Log in with: mtrack session login {}", name, email),
                Some(json!({ "name": name, "email": email })),
            )
        }
        SessionCommands::Logout => {
            runtime.resolver().clear()?;
            output_success(&output_format, "Logged out", None)
        }
        SessionCommands::Status => {
            let (status, detail) = match runtime.resolver().resolve() {
                Ok(claims) if claims.is_expired() => ("expired", Some(claims.user_id.to_string())),
                Ok(claims) => ("authenticated", Some(claims.user_id.to_string())),
                Err(SessionError::NoCredential) => ("missing", None),
                Err(SessionError::InvalidCredential(reason)) => ("invalid", Some(reason)),
                Err(e) => return Err(e.into()),
            };

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({
                        "status": status,
                        "detail": detail,
                        "server": runtime.base_url,
                        "storage": runtime.store.path()
                    }))?);
                }
                OutputFormat::Text => match (status, detail) {
                    ("authenticated", Some(user_id)) => println!("Logged in as {}", user_id),
                    ("expired", Some(user_id)) => println!("Credential for {} has expired; log in again", user_id),
                    ("invalid", Some(reason)) => println!("Stored credential is unreadable: {}", reason),
                    _ => println!("Not logged in"),
                },
            }

            Ok(())
        }
        SessionCommands::Whoami => {
            let session = runtime.resolver().context();
            match session.user_id() {
                Some(user_id) => match output_format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&json!({ "user_id": user_id }))?),
                    OutputFormat::Text => println!("{}", user_id),
                },
                None => return render_outcome(&output_format, ViewOutcome::<()>::RedirectToLogin, |_| {}),
            }
            Ok(())
        }
    }
}
