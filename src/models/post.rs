use serde::{Deserialize, Deserializer, Serialize};

use super::{folded_serde, non_blank};
use crate::types::{PostId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct Post {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PostId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<UserId>,
    #[serde(default)]
    pub replies: Vec<Reply>,
    #[serde(default, deserialize_with = "like_count")]
    pub likes: u32,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct Reply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<UserId>,
    #[serde(default)]
    pub body: String,
}

folded_serde!(Post, &[&["id", "_id"], &["body", "content"], &["author", "userId"]]);
folded_serde!(Reply, &[&["author", "userId"], &["body", "content", "text"]]);

/// Likes arrive either as a count or as the list of users who liked
fn like_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let count = match value {
        Some(serde_json::Value::Array(likers)) => likers.len() as u32,
        Some(serde_json::Value::Number(n)) => n.as_u64().unwrap_or(0) as u32,
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    };
    Ok(count)
}

/// Body of `POST /post/create`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<UserId>,
}

impl NewPost {
    pub fn new(title: impl Into<String>, body: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            category: category.into(),
            author: None,
        }
    }

    /// Title, body and category must all be filled in.
    pub fn validated(self) -> Result<Self, String> {
        let title = non_blank(Some(self.title)).ok_or_else(|| "Title is required".to_string())?;
        let body = non_blank(Some(self.body)).ok_or_else(|| "Body is required".to_string())?;
        let category = non_blank(Some(self.category)).ok_or_else(|| "Category is required".to_string())?;
        Ok(Self {
            title,
            body,
            category,
            author: self.author,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn likes_accept_count_or_list() {
        let post: Post = serde_json::from_value(json!({ "_id": 1, "title": "t", "likes": ["a", "b"] })).unwrap();
        assert_eq!(post.likes, 2);
        assert_eq!(post.id, Some(PostId::new("1")));

        let post: Post = serde_json::from_value(json!({ "title": "t", "likes": 5 })).unwrap();
        assert_eq!(post.likes, 5);

        let post: Post = serde_json::from_value(json!({ "title": "t" })).unwrap();
        assert_eq!(post.likes, 0);
        assert!(post.replies.is_empty());
    }

    #[test]
    fn mongo_virtual_id_alongside_id_still_decodes() {
        let post: Post = serde_json::from_value(json!({
            "_id": "p1",
            "id": "p1",
            "title": "t",
            "content": "hello",
            "author": "1",
            "userId": "1",
            "replies": [{ "userId": "2", "author": null, "text": "hi" }]
        }))
        .unwrap();
        assert_eq!(post.id, Some(PostId::new("p1")));
        assert_eq!(post.body, "hello");
        assert_eq!(post.author, Some(UserId::new("1")));
        assert_eq!(post.replies[0].author, Some(UserId::new("2")));
        assert_eq!(post.replies[0].body, "hi");
    }

    #[test]
    fn serializes_canonical_names() {
        let post = Post {
            id: Some(PostId::new("p1")),
            title: "t".into(),
            body: "b".into(),
            category: "c".into(),
            author: None,
            replies: Vec::new(),
            likes: 3,
            created_at: None,
        };
        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value, json!({ "id": "p1", "title": "t", "body": "b", "category": "c", "replies": [], "likes": 3 }));
    }

    #[test]
    fn new_post_requires_every_field() {
        assert_eq!(NewPost::new("", "b", "c").validated().unwrap_err(), "Title is required");
        assert_eq!(NewPost::new("t", " ", "c").validated().unwrap_err(), "Body is required");
        assert_eq!(NewPost::new("t", "b", "").validated().unwrap_err(), "Category is required");

        let post = NewPost::new(" Hello ", "World", "general").validated().unwrap();
        assert_eq!(post.title, "Hello");
    }
}
