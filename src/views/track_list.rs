use serde::Serialize;

use super::{gate, try_view, ViewContext, ViewOutcome};
use crate::config::ViewKind;
use crate::filter::{filter_by_owner, TypeFilter};
use crate::models::Media;
use crate::tracking::{aggregate_stats, AggregateStats};
use crate::types::UserId;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackEntry {
    #[serde(flatten)]
    pub media: Media,
    pub progress: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackListState {
    pub user_id: Option<UserId>,
    pub filter: TypeFilter,
    pub entries: Vec<TrackEntry>,
    /// Over everything the viewer owns, regardless of `filter`
    pub stats: AggregateStats,
}

/// The viewer's tracked media, optionally narrowed to one kind.
pub async fn load(ctx: &ViewContext, filter: TypeFilter) -> ViewOutcome<TrackListState> {
    let viewer = gate!(ctx, ViewKind::TrackList);

    // Anonymous access (if a policy allows it) has nothing to list
    let Some(user_id) = viewer else {
        return ViewOutcome::Ready(TrackListState {
            user_id: None,
            filter,
            entries: Vec::new(),
            stats: AggregateStats::default(),
        });
    };

    let all = try_view!(ctx.api().list_media(Some(&user_id)).await);
    let owned = filter_by_owner(&all, Some(&user_id));
    let stats = aggregate_stats(&owned);

    let entries = filter
        .apply(owned)
        .into_iter()
        .map(|media| TrackEntry {
            progress: media.progress_percent(),
            media,
        })
        .collect();

    ViewOutcome::Ready(TrackListState {
        user_id: Some(user_id),
        filter,
        entries,
        stats,
    })
}
