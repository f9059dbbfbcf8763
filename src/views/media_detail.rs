use serde::Serialize;

use super::{gate, try_view, ViewContext, ViewOutcome};
use crate::config::ViewKind;
use crate::models::{Media, MediaKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaDetailState {
    pub media: Media,
    pub progress: u32,
    /// Whether the viewer may open the edit form for this record
    pub owned_by_viewer: bool,
}

pub async fn load(ctx: &ViewContext, kind: MediaKind, name: &str) -> ViewOutcome<MediaDetailState> {
    let viewer = gate!(ctx, ViewKind::MediaDetail);

    let media = try_view!(ctx.api().get_media(kind, name).await);
    let owned_by_viewer = match (&viewer, &media.owner) {
        (Some(viewer), Some(owner)) => viewer.as_str() == owner.as_str(),
        _ => false,
    };

    ViewOutcome::Ready(MediaDetailState {
        // Progress follows the kind the record was asked for
        progress: crate::tracking::progress_percent(kind, &media),
        media,
        owned_by_viewer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionContext;
    use crate::testing::{session_for, FakeApi, TestContext};

    fn api() -> FakeApi {
        FakeApi::new().with_media(vec![
            Media::new(MediaKind::Novel, "Dune").owned_by("1").with_pages(50, 200),
        ])
    }

    #[tokio::test]
    async fn shows_record_with_progress_and_ownership() {
        let test = TestContext::new(api());

        let mine = load(&test.view_context(session_for("1")), MediaKind::Novel, "Dune").await.ready().unwrap();
        assert_eq!(mine.progress, 25);
        assert!(mine.owned_by_viewer);

        let theirs = load(&test.view_context(session_for("2")), MediaKind::Novel, "Dune").await.ready().unwrap();
        assert!(!theirs.owned_by_viewer);
    }

    #[tokio::test]
    async fn anonymous_viewers_may_read_details() {
        let test = TestContext::new(api());
        let state = load(&test.view_context(SessionContext::anonymous()), MediaKind::Novel, "Dune")
            .await
            .ready()
            .unwrap();
        assert!(!state.owned_by_viewer);
    }

    #[tokio::test]
    async fn missing_record_is_a_message() {
        let test = TestContext::new(api());
        let outcome = load(&test.view_context(session_for("1")), MediaKind::Movie, "Dune").await;
        assert_eq!(outcome.failure(), Some("Media not found"));
    }
}
