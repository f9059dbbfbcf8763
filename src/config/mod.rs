use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub views: ViewPolicies,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// No timeout unless one is configured explicitly.
    pub request_timeout_secs: Option<u64>,
    pub enable_request_logging: bool,
    /// Send `?ownerId=` / `?id=` so the server can scope collections.
    pub scope_queries: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Client-storage key the credential lives under.
    pub credential_key: String,
    pub validate_expiry: bool,
}

/// Whether a view sends the user to the login screen when the session is
/// missing or unreadable. `false` means the view renders anonymously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPolicy {
    pub redirect_on_missing: bool,
    pub redirect_on_invalid: bool,
}

impl AuthPolicy {
    pub const REQUIRED: AuthPolicy = AuthPolicy {
        redirect_on_missing: true,
        redirect_on_invalid: true,
    };

    pub const ANONYMOUS: AuthPolicy = AuthPolicy {
        redirect_on_missing: false,
        redirect_on_invalid: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewKind {
    TrackList,
    MediaDetail,
    MediaForm,
    Profile,
    ProfileEdit,
    Forum,
    PostCompose,
}

impl ViewKind {
    pub const ALL: [ViewKind; 7] = [
        ViewKind::TrackList,
        ViewKind::MediaDetail,
        ViewKind::MediaForm,
        ViewKind::Profile,
        ViewKind::ProfileEdit,
        ViewKind::Forum,
        ViewKind::PostCompose,
    ];

    /// Prefix used for `VIEW_<NAME>_*` environment overrides
    pub fn env_name(&self) -> &'static str {
        match self {
            ViewKind::TrackList => "TRACK_LIST",
            ViewKind::MediaDetail => "MEDIA_DETAIL",
            ViewKind::MediaForm => "MEDIA_FORM",
            ViewKind::Profile => "PROFILE",
            ViewKind::ProfileEdit => "PROFILE_EDIT",
            ViewKind::Forum => "FORUM",
            ViewKind::PostCompose => "POST_COMPOSE",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewPolicies {
    pub track_list: AuthPolicy,
    pub media_detail: AuthPolicy,
    pub media_form: AuthPolicy,
    pub profile: AuthPolicy,
    pub profile_edit: AuthPolicy,
    pub forum: AuthPolicy,
    pub post_compose: AuthPolicy,
}

impl ViewPolicies {
    pub fn for_view(&self, view: ViewKind) -> AuthPolicy {
        *self.slot(view)
    }

    fn slot(&self, view: ViewKind) -> &AuthPolicy {
        match view {
            ViewKind::TrackList => &self.track_list,
            ViewKind::MediaDetail => &self.media_detail,
            ViewKind::MediaForm => &self.media_form,
            ViewKind::Profile => &self.profile,
            ViewKind::ProfileEdit => &self.profile_edit,
            ViewKind::Forum => &self.forum,
            ViewKind::PostCompose => &self.post_compose,
        }
    }

    fn slot_mut(&mut self, view: ViewKind) -> &mut AuthPolicy {
        match view {
            ViewKind::TrackList => &mut self.track_list,
            ViewKind::MediaDetail => &mut self.media_detail,
            ViewKind::MediaForm => &mut self.media_form,
            ViewKind::Profile => &mut self.profile,
            ViewKind::ProfileEdit => &mut self.profile_edit,
            ViewKind::Forum => &mut self.forum,
            ViewKind::PostCompose => &mut self.post_compose,
        }
    }
}

impl Default for ViewPolicies {
    fn default() -> Self {
        Self {
            track_list: AuthPolicy::REQUIRED,
            // Detail pages can be shared, but a broken session still bounces
            media_detail: AuthPolicy {
                redirect_on_missing: false,
                redirect_on_invalid: true,
            },
            media_form: AuthPolicy::REQUIRED,
            profile: AuthPolicy::REQUIRED,
            profile_edit: AuthPolicy::REQUIRED,
            forum: AuthPolicy::ANONYMOUS,
            post_compose: AuthPolicy::REQUIRED,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Ok(v) = env::var("API_BASE_URL") {
            let v = v.trim().trim_end_matches('/');
            if !v.is_empty() {
                self.api.base_url = v.to_string();
            }
        }
        if let Ok(v) = env::var("API_REQUEST_TIMEOUT_SECS") {
            self.api.request_timeout_secs = v.parse().ok().filter(|secs| *secs > 0);
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_SCOPE_QUERIES") {
            self.api.scope_queries = v.parse().unwrap_or(self.api.scope_queries);
        }

        // Session overrides
        if let Ok(v) = env::var("SESSION_CREDENTIAL_KEY") {
            if !v.trim().is_empty() {
                self.session.credential_key = v.trim().to_string();
            }
        }
        if let Ok(v) = env::var("SESSION_VALIDATE_EXPIRY") {
            self.session.validate_expiry = v.parse().unwrap_or(self.session.validate_expiry);
        }

        // Per-view policy overrides
        for view in ViewKind::ALL {
            let policy = self.views.slot_mut(view);
            if let Ok(v) = env::var(format!("VIEW_{}_REDIRECT_ON_MISSING", view.env_name())) {
                policy.redirect_on_missing = v.parse().unwrap_or(policy.redirect_on_missing);
            }
            if let Ok(v) = env::var(format!("VIEW_{}_REDIRECT_ON_INVALID", view.env_name())) {
                policy.redirect_on_invalid = v.parse().unwrap_or(policy.redirect_on_invalid);
            }
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://localhost:3000".to_string(),
                request_timeout_secs: None,
                enable_request_logging: true,
                scope_queries: true,
            },
            session: SessionConfig {
                credential_key: "token".to_string(),
                validate_expiry: false,
            },
            views: ViewPolicies::default(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                enable_request_logging: true,
                ..Self::development().api
            },
            ..Self::development()
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                enable_request_logging: false,
                ..Self::development().api
            },
            ..Self::development()
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
