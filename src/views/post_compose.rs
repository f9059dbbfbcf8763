use super::{gate, try_view, ViewContext, ViewOutcome};
use crate::config::ViewKind;
use crate::error::ClientError;
use crate::models::{NewPost, Post};

/// Publish a forum post as the viewer.
pub async fn submit(ctx: &ViewContext, post: NewPost) -> ViewOutcome<Post> {
    let viewer = gate!(ctx, ViewKind::PostCompose);

    let mut post = try_view!(post.validated().map_err(ClientError::Validation));
    post.author = viewer;

    let token = try_view!(ctx.require_token());
    let created = try_view!(ctx.api().create_post(&post, token).await);

    tracing::debug!(title = %created.title, "post created");
    ViewOutcome::Ready(created)
}
