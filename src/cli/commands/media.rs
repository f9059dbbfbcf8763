use clap::{Args, Subcommand};

use crate::cli::utils::*;
use crate::cli::{OutputFormat, Runtime};
use crate::filter::TypeFilter;
use crate::models::{Media, MediaDraft, MediaKind};
use crate::views::{media_detail, media_form, profile, track_list};

#[derive(Subcommand)]
pub enum MediaCommands {
    #[command(about = "List your tracked media with progress")]
    List {
        #[arg(long = "type", default_value = "all", help = "Only one kind: movie, show, novel or all")]
        kind: TypeFilter,
    },

    #[command(about = "Show one record")]
    Show {
        #[arg(value_parser = parse_kind, help = "Movie, Show or Novel")]
        kind: MediaKind,
        #[arg(help = "Title of the record")]
        name: String,
    },

    #[command(about = "Start tracking something new")]
    Add {
        #[arg(value_parser = parse_kind, help = "Movie, Show or Novel")]
        kind: MediaKind,
        #[arg(help = "Title of the record")]
        name: String,
        #[command(flatten)]
        fields: MediaArgs,
    },

    #[command(
        about = "Update a tracked record (only the given fields change)",
        long_about = "Update a tracked record. Only the given fields change; pass an empty value \
                      (e.g. --synopsis \"\") to clear a text field."
    )]
    Edit {
        #[arg(value_parser = parse_kind, help = "Movie, Show or Novel")]
        kind: MediaKind,
        #[arg(help = "Title of the record")]
        name: String,
        #[command(flatten)]
        fields: MediaArgs,
    },

    #[command(about = "Counts and average progress over your library")]
    Stats,

    #[command(about = "Your favourites")]
    Favourites,
}

#[derive(Args, Debug, Default)]
pub struct MediaArgs {
    #[arg(long, help = "Episodes watched (shows)")]
    pub episodes: Option<u32>,
    #[arg(long, help = "Total episodes (shows)")]
    pub total_episodes: Option<u32>,
    #[arg(long, help = "Pages read (novels)")]
    pub pages: Option<u32>,
    #[arg(long, help = "Total pages (novels)")]
    pub total_pages: Option<u32>,
    #[arg(long, help = "Started on, e.g. 2024-01-31")]
    pub start_date: Option<String>,
    #[arg(long, help = "Finished on, e.g. 2024-02-14")]
    pub end_date: Option<String>,
    #[arg(long)]
    pub synopsis: Option<String>,
    #[arg(long, help = "Director, creator or author, depending on the kind")]
    pub credit: Option<String>,
    #[arg(long)]
    pub rating: Option<f64>,
    #[arg(long, help = "Mark as favourite (true/false)")]
    pub favourite: Option<bool>,
}

impl MediaArgs {
    fn into_draft(self, kind: Option<MediaKind>, name: Option<String>) -> MediaDraft {
        MediaDraft {
            kind: kind.map(|k| k.as_str().to_string()),
            name,
            episodes_watched: self.episodes,
            total_episodes: self.total_episodes,
            pages_read: self.pages,
            total_pages: self.total_pages,
            start_date: self.start_date,
            end_date: self.end_date,
            synopsis: self.synopsis,
            credit: self.credit,
            rating: self.rating,
            favourite: self.favourite,
        }
    }
}

fn parse_kind(s: &str) -> Result<MediaKind, String> {
    MediaKind::parse(s).ok_or_else(|| format!("unknown media type '{}': expected movie, show or novel", s))
}

pub async fn handle(cmd: MediaCommands, runtime: &Runtime, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = runtime.view_context()?;

    match cmd {
        MediaCommands::List { kind } => {
            let outcome = track_list::load(&ctx, kind).await;
            render_outcome(&output_format, outcome, |state| {
                if state.entries.is_empty() {
                    println!("Nothing tracked yet ({})", state.filter);
                    return;
                }
                println!("{:<7} {:<32} {:<18} {}", "TYPE", "NAME", "CREDIT", "PROGRESS");
                println!("{}", "-".repeat(80));
                for entry in &state.entries {
                    println!(
                        "{:<7} {:<32} {:<18} {}",
                        entry.media.kind,
                        truncate(&entry.media.name, 32),
                        truncate(entry.media.credit().unwrap_or("-"), 18),
                        progress_bar(entry.progress, 20)
                    );
                }
                println!();
                println!("{} shown, {} tracked", state.entries.len(), state.stats.total);
            })
        }
        MediaCommands::Show { kind, name } => {
            let outcome = media_detail::load(&ctx, kind, &name).await;
            render_outcome(&output_format, outcome, |state| {
                print_media(&state.media);
                println!("{:<12} {}", "Progress:", progress_bar(state.progress, 20));
                if !state.owned_by_viewer {
                    println!("(not in your library)");
                }
            })
        }
        MediaCommands::Add { kind, name, fields } => {
            let draft = fields.into_draft(Some(kind), Some(name));
            let outcome = media_form::add(&ctx, draft).await;
            render_outcome(&output_format, outcome, |saved| {
                println!("✓ Added {} '{}' ({}%)", saved.media.kind, saved.media.name, saved.progress);
            })
        }
        MediaCommands::Edit { kind, name, fields } => {
            let changes = fields.into_draft(None, None);
            let outcome = media_form::edit(&ctx, kind, &name, changes).await;
            render_outcome(&output_format, outcome, |saved| {
                println!("✓ Updated {} '{}' ({}%)", saved.media.kind, saved.media.name, saved.progress);
            })
        }
        MediaCommands::Stats => {
            let outcome = track_list::load(&ctx, TypeFilter::All).await.map(|state| state.stats);
            render_outcome(&output_format, outcome, |stats| {
                println!("{:<16} {}", "Total:", stats.total);
                println!("{:<16} {}", "Movies:", stats.movie);
                println!("{:<16} {}", "Shows:", stats.show);
                println!("{:<16} {}", "Novels:", stats.novel);
                println!("{:<16} {}", "Show progress:", progress_bar(stats.show_progress_percent(), 20));
                println!("{:<16} {}", "Novel progress:", progress_bar(stats.novel_progress_percent(), 20));
            })
        }
        MediaCommands::Favourites => {
            let outcome = profile::favourites(&ctx).await;
            render_outcome(&output_format, outcome, |favourites| {
                if favourites.is_empty() {
                    println!("No favourites yet");
                    return;
                }
                for media in favourites {
                    println!("{:<7} {}", media.kind, media.name);
                }
            })
        }
    }
}

fn print_media(media: &Media) {
    println!("{:<12} {}", "Name:", media.name);
    println!("{:<12} {}", "Type:", media.kind);
    if let Some(credit) = media.credit() {
        let label = match media.kind {
            MediaKind::Movie => "Director:",
            MediaKind::Show => "Creator:",
            _ => "Author:",
        };
        println!("{:<12} {}", label, credit);
    }
    if let (Some(watched), Some(total)) = (media.episodes_watched, media.total_episodes) {
        println!("{:<12} {}/{}", "Episodes:", watched, total);
    }
    if let (Some(read), Some(total)) = (media.pages_read, media.total_pages) {
        println!("{:<12} {}/{}", "Pages:", read, total);
    }
    if let Some(start) = &media.start_date {
        println!("{:<12} {}", "Started:", start);
    }
    if let Some(end) = &media.end_date {
        println!("{:<12} {}", "Finished:", end);
    }
    if let Some(rating) = media.rating {
        println!("{:<12} {}", "Rating:", rating);
    }
    if media.is_favourite() {
        println!("{:<12} yes", "Favourite:");
    }
    if let Some(synopsis) = &media.synopsis {
        println!();
        println!("{}", synopsis);
    }
}
