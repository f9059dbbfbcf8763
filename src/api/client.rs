use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::format::{decode_list, decode_record, error_message, extract_token};
use super::TrackerApi;
use crate::config::ApiConfig;
use crate::error::ClientError;
use crate::models::{Credentials, Media, MediaKind, NewPost, Post, Registration, User, UserUpdate};
use crate::types::UserId;

/// HTTP client for the media tracker API. One request per call: no retry,
/// no caching.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    scope_queries: bool,
    log_requests: bool,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        Self::with_base_url(&config.base_url, config)
    }

    /// Same settings as `config`, pointed at another server
    pub fn with_base_url(base_url: &str, config: &ApiConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url.trim())?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
            scope_queries: config.scope_queries,
            log_requests: config.enable_request_logging,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL plus path segments, each percent-encoded on its own so media
    /// names with spaces or slashes stay one segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, token: Option<&str>) -> RequestBuilder {
        if self.log_requests {
            tracing::info!("{} {}", method, url);
        } else {
            tracing::debug!("{} {}", method, url);
        }

        let builder = self.http.request(method, url);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Value, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = error_message(status, &text);
            tracing::debug!(status = status.as_u16(), "request failed: {}", message);
            return Err(ClientError::application(status.as_u16(), message));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        // A plain-text success body ("Media added") is kept as a string
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }

    async fn get(&self, url: Url) -> Result<Value, ClientError> {
        self.send(self.request(Method::GET, url, None)).await
    }

    async fn send_json<B: Serialize + ?Sized + Sync>(
        &self,
        method: Method,
        url: Url,
        body: &B,
        token: Option<&str>,
    ) -> Result<Value, ClientError> {
        self.send(self.request(method, url, token).json(body)).await
    }

    /// Health probe: any HTTP answer from the root counts as up
    pub async fn ping(&self) -> bool {
        match self.request(Method::GET, self.base_url.clone(), None).send().await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("ping failed: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl TrackerApi for ApiClient {
    async fn list_media(&self, owner: Option<&UserId>) -> Result<Vec<Media>, ClientError> {
        let mut url = self.endpoint(&["media"])?;
        if let (true, Some(owner)) = (self.scope_queries, owner) {
            url.query_pairs_mut().append_pair("ownerId", owner.as_str());
        }
        decode_list(self.get(url).await?, "media")
    }

    async fn get_media(&self, kind: MediaKind, name: &str) -> Result<Media, ClientError> {
        let url = self.endpoint(&["media", kind.as_str(), name])?;
        decode_record(self.get(url).await?, "media")
            .ok_or_else(|| ClientError::application(404, format!("{} '{}' not found", kind, name)))
    }

    async fn add_media(&self, media: &Media, token: Option<&str>) -> Result<Media, ClientError> {
        let url = self.endpoint(&["media", "addmedia"])?;
        let body = self.send_json(Method::POST, url, media, token).await?;
        Ok(saved_or_submitted(body, media))
    }

    async fn edit_media(&self, media: &Media, token: Option<&str>) -> Result<Media, ClientError> {
        let url = self.endpoint(&["media", "editmedia"])?;
        let body = self.send_json(Method::PUT, url, media, token).await?;
        Ok(saved_or_submitted(body, media))
    }

    async fn favourites(&self, user: &UserId) -> Result<Vec<Media>, ClientError> {
        let url = self.endpoint(&["media", "favourites", user.as_str()])?;
        decode_list(self.get(url).await?, "media")
    }

    async fn list_users(&self, id: Option<&UserId>) -> Result<Vec<User>, ClientError> {
        let mut url = self.endpoint(&["user", ""])?;
        if let (true, Some(id)) = (self.scope_queries, id) {
            url.query_pairs_mut().append_pair("id", id.as_str());
        }
        decode_list(self.get(url).await?, "users")
    }

    async fn edit_user(&self, update: &UserUpdate, token: &str) -> Result<Option<User>, ClientError> {
        let url = self.endpoint(&["user", "edit"])?;
        let body = self.send_json(Method::PUT, url, update, Some(token)).await?;
        Ok(decode_record(body, "user"))
    }

    async fn list_posts(&self) -> Result<Vec<Post>, ClientError> {
        let url = self.endpoint(&["post", ""])?;
        decode_list(self.get(url).await?, "posts")
    }

    async fn create_post(&self, post: &NewPost, token: &str) -> Result<Post, ClientError> {
        let url = self.endpoint(&["post", "create"])?;
        let body = self.send_json(Method::POST, url, post, Some(token)).await?;
        Ok(decode_record::<Post>(body, "post")
            .filter(|saved| !saved.title.is_empty())
            .unwrap_or_else(|| Post {
                id: None,
                title: post.title.clone(),
                body: post.body.clone(),
                category: post.category.clone(),
                author: post.author.clone(),
                replies: Vec::new(),
                likes: 0,
                created_at: None,
            }))
    }

    async fn register(&self, registration: &Registration) -> Result<(), ClientError> {
        let url = self.endpoint(&["user", "register"])?;
        self.send_json(Method::POST, url, registration, None).await?;
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> Result<String, ClientError> {
        let url = self.endpoint(&["user", "login"])?;
        let body = self.send_json(Method::POST, url, credentials, None).await?;
        extract_token(&body).ok_or_else(|| ClientError::application(200, "Login response did not include a token"))
    }
}

/// The server's copy when it sent one back, otherwise what we submitted
fn saved_or_submitted(body: Value, submitted: &Media) -> Media {
    decode_record::<Media>(body, "media")
        .filter(|saved| !saved.name.is_empty())
        .unwrap_or_else(|| submitted.clone())
}
