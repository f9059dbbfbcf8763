use clap::{Args, Subcommand};

use crate::cli::utils::*;
use crate::cli::{OutputFormat, Runtime};
use crate::models::UserUpdate;
use crate::views::{profile, profile_edit, ViewOutcome};

#[derive(Subcommand)]
pub enum ProfileCommands {
    #[command(about = "Your details, stats and favourites")]
    Show,

    #[command(about = "Change your details (only the given fields change)")]
    Edit(ProfileArgs),
}

#[derive(Args, Debug, Default)]
pub struct ProfileArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub age: Option<u32>,
    #[arg(long)]
    pub gender: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub bio: Option<String>,
}

impl From<ProfileArgs> for UserUpdate {
    fn from(args: ProfileArgs) -> Self {
        UserUpdate {
            name: args.name,
            email: args.email,
            age: args.age,
            gender: args.gender,
            country: args.country,
            bio: args.bio,
        }
    }
}

pub async fn handle(cmd: ProfileCommands, runtime: &Runtime, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = runtime.view_context()?;

    match cmd {
        ProfileCommands::Show => {
            let outcome = profile::load(&ctx).await;
            render_outcome(&output_format, outcome, |state| {
                match &state.user {
                    Some(user) => {
                        println!("{:<10} {}", "Name:", user.name);
                        println!("{:<10} {}", "Email:", user.email);
                        if let Some(age) = user.age {
                            println!("{:<10} {}", "Age:", age);
                        }
                        if let Some(gender) = &user.gender {
                            println!("{:<10} {}", "Gender:", gender);
                        }
                        if let Some(country) = &user.country {
                            println!("{:<10} {}", "Country:", country);
                        }
                        if let Some(bio) = &user.bio {
                            println!("{:<10} {}", "Bio:", bio);
                        }
                    }
                    None => println!("User {} (details unavailable)", state.user_id),
                }

                println!();
                println!(
                    "Tracking {} ({} movies, {} shows, {} novels)",
                    state.stats.total, state.stats.movie, state.stats.show, state.stats.novel
                );
                println!("{:<16} {}", "Show progress:", progress_bar(state.stats.show_progress_percent(), 20));
                println!("{:<16} {}", "Novel progress:", progress_bar(state.stats.novel_progress_percent(), 20));

                if !state.favourites.is_empty() {
                    println!();
                    println!("Favourites:");
                    for media in &state.favourites {
                        println!("  {:<7} {}", media.kind, media.name);
                    }
                }
            })
        }
        ProfileCommands::Edit(args) => {
            // Pre-fill from the current record so untouched fields survive
            let current = match profile_edit::load_form(&ctx).await {
                ViewOutcome::Ready(form) => form,
                ViewOutcome::RedirectToLogin => {
                    return render_outcome(&output_format, ViewOutcome::<()>::RedirectToLogin, |_| {});
                }
                ViewOutcome::Failed(message) => {
                    return render_outcome(&output_format, ViewOutcome::<()>::Failed(message), |_| {});
                }
            };

            let outcome = profile_edit::submit(&ctx, current.merge(args.into())).await;
            render_outcome(&output_format, outcome, |state| {
                let name = state
                    .user
                    .as_ref()
                    .map(|u| u.name.as_str())
                    .or(state.submitted.name.as_deref())
                    .unwrap_or_default();
                println!("✓ Profile updated for {}", name);
            })
        }
    }
}
