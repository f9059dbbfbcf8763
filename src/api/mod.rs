//! The boundary to the remote media tracker API.
//!
//! Views only see [`TrackerApi`]; [`ApiClient`] is the HTTP implementation.

pub mod client;
pub mod format;

use async_trait::async_trait;

use crate::error::ClientError;
use crate::models::{Credentials, Media, MediaKind, NewPost, Post, Registration, User, UserUpdate};
use crate::types::UserId;

pub use client::ApiClient;

#[async_trait]
pub trait TrackerApi: Send + Sync {
    /// `GET /media`, scoped to `owner` when given. Callers still filter the
    /// result locally; the server is free to ignore the scope.
    async fn list_media(&self, owner: Option<&UserId>) -> Result<Vec<Media>, ClientError>;

    /// `GET /media/:type/:name`
    async fn get_media(&self, kind: MediaKind, name: &str) -> Result<Media, ClientError>;

    /// `POST /media/addmedia`
    async fn add_media(&self, media: &Media, token: Option<&str>) -> Result<Media, ClientError>;

    /// `PUT /media/editmedia`, matched on `{type, name}`
    async fn edit_media(&self, media: &Media, token: Option<&str>) -> Result<Media, ClientError>;

    /// `GET /media/favourites/:id`
    async fn favourites(&self, user: &UserId) -> Result<Vec<Media>, ClientError>;

    /// `GET /user/`, scoped to one id when given
    async fn list_users(&self, id: Option<&UserId>) -> Result<Vec<User>, ClientError>;

    /// `PUT /user/edit`. Some servers answer with the updated record, some
    /// with a bare message.
    async fn edit_user(&self, update: &UserUpdate, token: &str) -> Result<Option<User>, ClientError>;

    /// `GET /post/`
    async fn list_posts(&self) -> Result<Vec<Post>, ClientError>;

    /// `POST /post/create`
    async fn create_post(&self, post: &NewPost, token: &str) -> Result<Post, ClientError>;

    /// `POST /user/register`
    async fn register(&self, registration: &Registration) -> Result<(), ClientError>;

    /// `POST /user/login`, returning the session credential
    async fn login(&self, credentials: &Credentials) -> Result<String, ClientError>;
}
