use serde::Serialize;

use super::{gate, try_view, ViewContext, ViewOutcome};
use crate::config::ViewKind;
use crate::filter::{filter_by_category, filter_by_owner};
use crate::models::Post;
use crate::types::UserId;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForumQuery {
    pub category: Option<String>,
    /// Only posts written by the viewer
    pub mine: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForumState {
    pub viewer: Option<UserId>,
    pub posts: Vec<Post>,
    /// Every category present before filtering, first-seen order
    pub categories: Vec<String>,
}

pub async fn load(ctx: &ViewContext, query: &ForumQuery) -> ViewOutcome<ForumState> {
    let viewer = gate!(ctx, ViewKind::Forum);

    let posts = try_view!(ctx.api().list_posts().await);

    let mut categories: Vec<String> = Vec::new();
    for post in &posts {
        let category = post.category.trim();
        if !category.is_empty() && !categories.iter().any(|c| c.eq_ignore_ascii_case(category)) {
            categories.push(category.to_string());
        }
    }

    let posts = if query.mine {
        filter_by_owner(&posts, viewer.as_ref())
    } else {
        posts
    };
    let posts = filter_by_category(posts, query.category.as_deref());

    ViewOutcome::Ready(ForumState {
        viewer,
        posts,
        categories,
    })
}
