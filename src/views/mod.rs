//! View controllers, one per screen.
//!
//! Each controller checks the injected session against its own auth policy,
//! fetches what it needs, and returns the derived state for a renderer. Request
//! failures never escape as errors: they become an inline message.

pub mod forum;
pub mod media_detail;
pub mod media_form;
pub mod post_compose;
pub mod profile;
pub mod profile_edit;
pub mod track_list;

use std::sync::Arc;

use crate::api::TrackerApi;
use crate::config::{ViewKind, ViewPolicies};
use crate::error::ClientError;
use crate::session::{Access, SessionContext};

/// Built once per command and handed to whichever view runs.
#[derive(Clone)]
pub struct ViewContext {
    api: Arc<dyn TrackerApi>,
    session: SessionContext,
    policies: ViewPolicies,
}

impl ViewContext {
    pub fn new(api: Arc<dyn TrackerApi>, session: SessionContext, policies: ViewPolicies) -> Self {
        Self { api, session, policies }
    }

    pub fn api(&self) -> &dyn TrackerApi {
        self.api.as_ref()
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn access(&self, view: ViewKind) -> Access {
        self.session.authorize(&self.policies.for_view(view))
    }

    /// Bearer token for write endpoints
    pub fn require_token(&self) -> Result<&str, ClientError> {
        self.session.token().ok_or(ClientError::Unauthenticated)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewOutcome<T> {
    Ready(T),
    RedirectToLogin,
    /// Dismissable message shown in place of the view
    Failed(String),
}

impl<T> ViewOutcome<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            ViewOutcome::Ready(state) => Some(state),
            _ => None,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, ViewOutcome::RedirectToLogin)
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            ViewOutcome::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ViewOutcome<U> {
        match self {
            ViewOutcome::Ready(state) => ViewOutcome::Ready(f(state)),
            ViewOutcome::RedirectToLogin => ViewOutcome::RedirectToLogin,
            ViewOutcome::Failed(message) => ViewOutcome::Failed(message),
        }
    }
}

impl<T> From<ClientError> for ViewOutcome<T> {
    fn from(error: ClientError) -> Self {
        tracing::warn!(code = error.error_code(), "view request failed: {}", error);
        ViewOutcome::Failed(error.to_string())
    }
}

/// Unwrap a `Result` inside a view, turning the error into `Failed`
macro_rules! try_view {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(error) => return $crate::views::ViewOutcome::from($crate::error::ClientError::from(error)),
        }
    };
}

/// Resolve access for `view`, returning early on redirect
macro_rules! gate {
    ($ctx:expr, $view:expr) => {
        match $ctx.access($view) {
            $crate::session::Access::Granted(viewer) => viewer,
            $crate::session::Access::RedirectToLogin => return $crate::views::ViewOutcome::RedirectToLogin,
        }
    };
}

pub(crate) use gate;
pub(crate) use try_view;
