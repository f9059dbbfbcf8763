use serde::Serialize;

use super::{gate, try_view, ViewContext, ViewOutcome};
use crate::config::ViewKind;
use crate::error::ClientError;
use crate::models::{User, UserUpdate};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileEditState {
    pub submitted: UserUpdate,
    /// The server's copy, when it sent one back
    pub user: Option<User>,
}

/// The edit form, pre-filled from the viewer's current record
pub async fn load_form(ctx: &ViewContext) -> ViewOutcome<UserUpdate> {
    let Some(user_id) = gate!(ctx, ViewKind::ProfileEdit) else {
        return ClientError::Unauthenticated.into();
    };

    let users = try_view!(ctx.api().list_users(Some(&user_id)).await);
    match users.iter().find(|u| u.id.as_str() == user_id.as_str()) {
        Some(user) => ViewOutcome::Ready(UserUpdate::from_user(user)),
        None => ViewOutcome::Failed(format!("User {} not found", user_id)),
    }
}

pub async fn submit(ctx: &ViewContext, update: UserUpdate) -> ViewOutcome<ProfileEditState> {
    let _ = gate!(ctx, ViewKind::ProfileEdit);

    let update = try_view!(update.validated().map_err(ClientError::Validation));
    let token = try_view!(ctx.require_token());
    let user = try_view!(ctx.api().edit_user(&update, token).await);

    ViewOutcome::Ready(ProfileEditState { submitted: update, user })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, AuthPolicy};
    use crate::session::SessionContext;
    use crate::testing::{session_for, user, FakeApi, TestContext};

    #[tokio::test]
    async fn form_is_prefilled_from_current_user() {
        let test = TestContext::new(FakeApi::new().with_users(vec![user("1", "Ada"), user("2", "Grace")]));
        let form = load_form(&test.view_context(session_for("2"))).await.ready().unwrap();
        assert_eq!(form.name.as_deref(), Some("Grace"));
        assert_eq!(form.email.as_deref(), Some("grace@example.com"));
    }

    #[tokio::test]
    async fn submit_sends_bearer_token() {
        let test = TestContext::new(FakeApi::new().with_users(vec![user("1", "Ada")]));
        let session = session_for("1");
        let token = session.token().unwrap().to_string();
        let ctx = test.view_context(session);

        let update = UserUpdate {
            name: Some("Ada L.".into()),
            email: Some("ada@example.com".into()),
            bio: Some("Counting engines".into()),
            ..Default::default()
        };
        let state = submit(&ctx, update).await.ready().unwrap();

        assert_eq!(state.user.unwrap().name, "Ada L.");
        assert_eq!(test.api.token_sent_to("edit_user"), Some(token));
    }

    #[tokio::test]
    async fn missing_required_fields_are_reported_before_sending() {
        let test = TestContext::new(FakeApi::new());
        let ctx = test.view_context(session_for("1"));

        let outcome = submit(&ctx, UserUpdate { name: Some("Ada".into()), ..Default::default() }).await;
        assert_eq!(outcome.failure(), Some("Email is required"));
        assert!(test.api.calls().is_empty());
    }

    #[tokio::test]
    async fn anonymous_submit_without_token_fails_inline() {
        let test = TestContext::new(FakeApi::new());
        let mut policies = AppConfig::development().views;
        policies.profile_edit = AuthPolicy::ANONYMOUS;
        let ctx = test.view_context_with(SessionContext::anonymous(), policies);

        let update = UserUpdate {
            name: Some("Ada".into()),
            email: Some("ada@example.com".into()),
            ..Default::default()
        };
        let outcome = submit(&ctx, update).await;
        assert_eq!(outcome.failure(), Some("You need to be logged in to do that"));
    }
}
