use serde::Serialize;

use super::{gate, try_view, ViewContext, ViewOutcome};
use crate::config::ViewKind;
use crate::error::ClientError;
use crate::models::{Media, MediaDraft, MediaKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMode {
    Add,
    Edit,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedMedia {
    pub mode: FormMode,
    pub media: Media,
    pub progress: u32,
}

/// Submit the add form. The record is owned by the viewer.
pub async fn add(ctx: &ViewContext, draft: MediaDraft) -> ViewOutcome<SavedMedia> {
    let viewer = gate!(ctx, ViewKind::MediaForm);

    let media = try_view!(draft.into_media(viewer).map_err(ClientError::Validation));
    let saved = try_view!(ctx.api().add_media(&media, ctx.session().token()).await);

    tracing::debug!(kind = %saved.kind, name = %saved.name, "media added");
    ViewOutcome::Ready(SavedMedia {
        mode: FormMode::Add,
        progress: saved.progress_percent(),
        media: saved,
    })
}

/// Pre-filled edit form for an existing record
pub async fn load_for_edit(ctx: &ViewContext, kind: MediaKind, name: &str) -> ViewOutcome<MediaDraft> {
    let _ = gate!(ctx, ViewKind::MediaForm);

    let media = try_view!(ctx.api().get_media(kind, name).await);
    ViewOutcome::Ready(MediaDraft::from_media(&media))
}

/// Apply `changes` on top of the stored record and submit the edit form.
/// Unset fields keep their stored value; an empty text field clears it.
pub async fn edit(ctx: &ViewContext, kind: MediaKind, name: &str, changes: MediaDraft) -> ViewOutcome<SavedMedia> {
    let viewer = gate!(ctx, ViewKind::MediaForm);

    let current = try_view!(ctx.api().get_media(kind, name).await);
    let draft = MediaDraft::from_media(&current).overlay(changes);
    let mut media = try_view!(draft.into_media(current.owner.clone().or(viewer)).map_err(ClientError::Validation));
    // The draft only carries the credit for this kind; keep the others as stored
    if media.kind != MediaKind::Movie {
        media.director = current.director;
    }
    if media.kind != MediaKind::Show {
        media.creator = current.creator;
    }
    if media.kind != MediaKind::Novel {
        media.author = current.author;
    }

    let saved = try_view!(ctx.api().edit_media(&media, ctx.session().token()).await);

    tracing::debug!(kind = %saved.kind, name = %saved.name, "media updated");
    ViewOutcome::Ready(SavedMedia {
        mode: FormMode::Edit,
        progress: saved.progress_percent(),
        media: saved,
    })
}
