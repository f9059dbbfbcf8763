use clap::Subcommand;

use crate::cli::utils::*;
use crate::cli::{OutputFormat, Runtime};
use crate::models::NewPost;
use crate::views::forum::{self, ForumQuery};
use crate::views::post_compose;

#[derive(Subcommand)]
pub enum ForumCommands {
    #[command(about = "List forum posts")]
    List {
        #[arg(long, help = "Only posts in this category")]
        category: Option<String>,
        #[arg(long, help = "Only posts you wrote")]
        mine: bool,
    },

    #[command(about = "Write a new post")]
    Post {
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: String,
        #[arg(long)]
        category: String,
    },
}

pub async fn handle(cmd: ForumCommands, runtime: &Runtime, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = runtime.view_context()?;

    match cmd {
        ForumCommands::List { category, mine } => {
            let query = ForumQuery { category, mine };
            let outcome = forum::load(&ctx, &query).await;
            render_outcome(&output_format, outcome, |state| {
                if state.posts.is_empty() {
                    println!("No posts");
                } else {
                    println!("{:<14} {:<40} {:<10} {}", "CATEGORY", "TITLE", "AUTHOR", "LIKES");
                    println!("{}", "-".repeat(80));
                    for post in &state.posts {
                        let author = post.author.as_ref().map(|a| a.as_str()).unwrap_or("-");
                        println!(
                            "{:<14} {:<40} {:<10} {}",
                            truncate(&post.category, 14),
                            truncate(&post.title, 40),
                            truncate(author, 10),
                            post.likes
                        );
                    }
                }
                if !state.categories.is_empty() {
                    println!();
                    println!("Categories: {}", state.categories.join(", "));
                }
            })
        }
        ForumCommands::Post { title, body, category } => {
            let outcome = post_compose::submit(&ctx, NewPost::new(title, body, category)).await;
            render_outcome(&output_format, outcome, |post| {
                println!("✓ Posted '{}' in {}", post.title, post.category);
            })
        }
    }
}
