use serde::Serialize;

use super::{gate, try_view, ViewContext, ViewOutcome};
use crate::config::ViewKind;
use crate::error::ClientError;
use crate::filter::filter_by_owner;
use crate::models::{Media, User};
use crate::tracking::{aggregate_stats, AggregateStats};
use crate::types::UserId;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileState {
    pub user_id: UserId,
    /// `None` when the user lookup failed or found nobody
    pub user: Option<User>,
    pub stats: AggregateStats,
    pub favourites: Vec<Media>,
}

/// The viewer's profile: user record, stats over their media, favourites.
///
/// The three fetches run concurrently. One failing leaves its part of the
/// page empty; only when all of them fail is the page replaced by the error.
pub async fn load(ctx: &ViewContext) -> ViewOutcome<ProfileState> {
    let Some(user_id) = gate!(ctx, ViewKind::Profile) else {
        return ViewOutcome::Failed("Log in to see your profile".to_string());
    };

    let api = ctx.api();
    let (users, media, favourites) = futures::join!(
        api.list_users(Some(&user_id)),
        api.list_media(Some(&user_id)),
        api.favourites(&user_id),
    );

    if let (Err(error), Err(_), Err(_)) = (&users, &media, &favourites) {
        return ViewOutcome::Failed(error.to_string());
    }

    let user = keep_partial("user", users).and_then(|users| users.into_iter().find(|u| u.id.as_str() == user_id.as_str()));

    let owned = keep_partial("media", media)
        .map(|all| filter_by_owner(&all, Some(&user_id)))
        .unwrap_or_default();

    let favourites = keep_partial("favourites", favourites).unwrap_or_default();

    ViewOutcome::Ready(ProfileState {
        stats: aggregate_stats(&owned),
        user_id,
        user,
        favourites,
    })
}

/// Just the viewer's favourites, under the profile's policy
pub async fn favourites(ctx: &ViewContext) -> ViewOutcome<Vec<Media>> {
    let Some(user_id) = gate!(ctx, ViewKind::Profile) else {
        return ViewOutcome::Failed("Log in to see your favourites".to_string());
    };

    ViewOutcome::Ready(try_view!(ctx.api().favourites(&user_id).await))
}

fn keep_partial<T>(part: &str, result: Result<T, ClientError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("profile {} fetch failed: {}", part, e);
            None
        }
    }
}
