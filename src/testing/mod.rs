use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;

use crate::api::TrackerApi;
use crate::auth::decode_credential;
use crate::config::{AppConfig, ViewPolicies};
use crate::error::ClientError;
use crate::models::{Credentials, Media, MediaKind, NewPost, Post, Registration, User, UserUpdate};
use crate::session::SessionContext;
use crate::types::UserId;
use crate::views::ViewContext;

/// Sign `payload` the way the server would. The client never checks the
/// signature, so any secret will do.
pub fn mint_token(payload: Value) -> String {
    encode(&Header::default(), &payload, &EncodingKey::from_secret(b"test-secret")).expect("token encodes")
}

pub fn session_for(user_id: &str) -> SessionContext {
    let token = mint_token(serde_json::json!({ "id": user_id }));
    let claims = decode_credential(&token, false).expect("minted token decodes");
    SessionContext::authenticated(claims, token)
}

/// In-memory stand-in for the remote API. Like a server that ignores
/// `ownerId`, `list_media` always answers with the whole collection.
#[derive(Default)]
pub struct FakeApi {
    media: Mutex<Vec<Media>>,
    favourites: Mutex<Vec<Media>>,
    users: Mutex<Vec<User>>,
    posts: Mutex<Vec<Post>>,
    failures: Mutex<HashMap<&'static str, (u16, String)>>,
    calls: Mutex<Vec<(&'static str, Option<String>)>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_media(self, media: Vec<Media>) -> Self {
        *self.media.lock().unwrap() = media;
        self
    }

    pub fn with_favourites(self, media: Vec<Media>) -> Self {
        *self.favourites.lock().unwrap() = media;
        self
    }

    pub fn with_users(self, users: Vec<User>) -> Self {
        *self.users.lock().unwrap() = users;
        self
    }

    pub fn with_posts(self, posts: Vec<Post>) -> Self {
        *self.posts.lock().unwrap() = posts;
        self
    }

    /// Make `endpoint` answer with an error response
    pub fn failing(self, endpoint: &'static str, status: u16, message: &str) -> Self {
        self.failures.lock().unwrap().insert(endpoint, (status, message.to_string()));
        self
    }

    /// Endpoints hit so far, in order
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().iter().map(|(name, _)| *name).collect()
    }

    /// Bearer token sent with the most recent call to `endpoint`
    pub fn token_sent_to(&self, endpoint: &str) -> Option<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(name, _)| *name == endpoint)
            .and_then(|(_, token)| token.clone())
    }

    pub fn media(&self) -> Vec<Media> {
        self.media.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<Post> {
        self.posts.lock().unwrap().clone()
    }

    fn hit(&self, endpoint: &'static str, token: Option<&str>) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push((endpoint, token.map(str::to_string)));
        match self.failures.lock().unwrap().get(endpoint) {
            Some((status, message)) => Err(ClientError::application(*status, message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TrackerApi for FakeApi {
    async fn list_media(&self, _owner: Option<&UserId>) -> Result<Vec<Media>, ClientError> {
        self.hit("list_media", None)?;
        Ok(self.media())
    }

    async fn get_media(&self, kind: MediaKind, name: &str) -> Result<Media, ClientError> {
        self.hit("get_media", None)?;
        self.media()
            .into_iter()
            .find(|m| m.kind == kind && m.name == name)
            .ok_or_else(|| ClientError::application(404, "Media not found"))
    }

    async fn add_media(&self, media: &Media, token: Option<&str>) -> Result<Media, ClientError> {
        self.hit("add_media", token)?;
        self.media.lock().unwrap().push(media.clone());
        Ok(media.clone())
    }

    async fn edit_media(&self, media: &Media, token: Option<&str>) -> Result<Media, ClientError> {
        self.hit("edit_media", token)?;
        let mut all = self.media.lock().unwrap();
        match all.iter_mut().find(|m| m.kind == media.kind && m.name == media.name) {
            Some(existing) => {
                *existing = media.clone();
                Ok(media.clone())
            }
            None => Err(ClientError::application(404, "Media not found")),
        }
    }

    async fn favourites(&self, _user: &UserId) -> Result<Vec<Media>, ClientError> {
        self.hit("favourites", None)?;
        Ok(self.favourites.lock().unwrap().clone())
    }

    async fn list_users(&self, _id: Option<&UserId>) -> Result<Vec<User>, ClientError> {
        self.hit("list_users", None)?;
        Ok(self.users.lock().unwrap().clone())
    }

    async fn edit_user(&self, update: &UserUpdate, token: &str) -> Result<Option<User>, ClientError> {
        self.hit("edit_user", Some(token))?;
        let claims = decode_credential(token, false)?;
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == claims.user_id) else {
            return Ok(None);
        };
        if let Some(name) = &update.name {
            user.name = name.clone();
        }
        if let Some(email) = &update.email {
            user.email = email.clone();
        }
        if update.bio.is_some() {
            user.bio = update.bio.clone();
        }
        Ok(Some(user.clone()))
    }

    async fn list_posts(&self) -> Result<Vec<Post>, ClientError> {
        self.hit("list_posts", None)?;
        Ok(self.posts())
    }

    async fn create_post(&self, post: &NewPost, token: &str) -> Result<Post, ClientError> {
        self.hit("create_post", Some(token))?;
        let saved: Post = serde_json::from_value(serde_json::to_value(post)?)?;
        self.posts.lock().unwrap().push(saved.clone());
        Ok(saved)
    }

    async fn register(&self, _registration: &Registration) -> Result<(), ClientError> {
        self.hit("register", None)
    }

    async fn login(&self, credentials: &Credentials) -> Result<String, ClientError> {
        self.hit("login", None)?;
        Ok(mint_token(serde_json::json!({ "id": credentials.email })))
    }
}

/// Everything a view needs, backed by a [`FakeApi`]
pub struct TestContext {
    pub api: Arc<FakeApi>,
}

impl TestContext {
    pub fn new(api: FakeApi) -> Self {
        Self { api: Arc::new(api) }
    }

    pub fn view_context(&self, session: SessionContext) -> ViewContext {
        self.view_context_with(session, AppConfig::development().views)
    }

    pub fn view_context_with(&self, session: SessionContext, policies: ViewPolicies) -> ViewContext {
        ViewContext::new(self.api.clone(), session, policies)
    }
}

pub fn user(id: &str, name: &str) -> User {
    User {
        id: UserId::new(id),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        age: None,
        gender: None,
        country: None,
        bio: None,
    }
}
