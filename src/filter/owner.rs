use crate::models::{Media, Post};
use crate::types::UserId;

/// Records that belong to a user.
pub trait Owned {
    fn owner(&self) -> Option<&UserId>;
}

impl Owned for Media {
    fn owner(&self) -> Option<&UserId> {
        self.owner.as_ref()
    }
}

impl Owned for Post {
    fn owner(&self) -> Option<&UserId> {
        self.author.as_ref()
    }
}

/// Keep the items owned by `owner`, in their original order.
///
/// With no owner there is nothing to show: the result is empty, never the
/// unfiltered collection. Ids compare as canonical strings, so a numeric id
/// from one endpoint matches the same id sent as text by another.
pub fn filter_by_owner<T: Owned + Clone>(items: &[T], owner: Option<&UserId>) -> Vec<T> {
    let Some(owner) = owner.filter(|id| !id.is_empty()) else {
        return Vec::new();
    };

    items
        .iter()
        .filter(|item| item.owner().is_some_and(|id| id.as_str() == owner.as_str()))
        .cloned()
        .collect()
}

/// Forum category narrowing; case-insensitive, order preserving.
pub fn filter_by_category(posts: Vec<Post>, category: Option<&str>) -> Vec<Post> {
    match category.map(str::trim).filter(|c| !c.is_empty()) {
        None => posts,
        Some(category) => posts
            .into_iter()
            .filter(|p| p.category.trim().eq_ignore_ascii_case(category))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaKind;
    use serde_json::json;

    fn library() -> Vec<Media> {
        vec![
            Media::new(MediaKind::Movie, "one").owned_by("1"),
            Media::new(MediaKind::Show, "two").owned_by("2"),
            Media::new(MediaKind::Novel, "three").owned_by("1"),
            Media::new(MediaKind::Movie, "orphan"),
            Media::new(MediaKind::Show, "four").owned_by("1"),
        ]
    }

    fn names(items: &[Media]) -> Vec<&str> {
        items.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn keeps_only_owned_items_in_order() {
        let mine = filter_by_owner(&library(), Some(&UserId::new("1")));
        assert_eq!(names(&mine), vec!["one", "three", "four"]);
        assert!(mine.iter().all(|m| m.owner == Some(UserId::new("1"))));
    }

    #[test]
    fn is_idempotent() {
        let owner = UserId::new("1");
        let once = filter_by_owner(&library(), Some(&owner));
        let twice = filter_by_owner(&once, Some(&owner));
        assert_eq!(once, twice);
    }

    #[test]
    fn absent_owner_yields_nothing() {
        assert!(filter_by_owner(&library(), None).is_empty());
        assert!(filter_by_owner(&library(), Some(&UserId::new(""))).is_empty());
    }

    #[test]
    fn numeric_and_string_owner_ids_match() {
        let items: Vec<Media> = serde_json::from_value(json!([
            { "type": "Movie", "name": "numeric", "userId": 1 },
            { "type": "Movie", "name": "text", "userId": "1" },
            { "type": "Movie", "name": "other", "userId": 10 }
        ]))
        .unwrap();

        let mine = filter_by_owner(&items, Some(&UserId::from(1i64)));
        assert_eq!(names(&mine), vec!["numeric", "text"]);
    }

    #[test]
    fn posts_filter_by_author() {
        let posts: Vec<Post> = serde_json::from_value(json!([
            { "title": "a", "author": 5 },
            { "title": "b", "author": "6" },
            { "title": "c", "userId": "5" }
        ]))
        .unwrap();

        let mine = filter_by_owner(&posts, Some(&UserId::new("5")));
        let titles: Vec<_> = mine.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "c"]);
    }

    #[test]
    fn category_filter_is_case_insensitive() {
        let posts: Vec<Post> = serde_json::from_value(json!([
            { "title": "a", "category": "Movies" },
            { "title": "b", "category": "books" },
            { "title": "c", "category": "movies" }
        ]))
        .unwrap();

        assert_eq!(filter_by_category(posts.clone(), None).len(), 3);
        let movies = filter_by_category(posts, Some("MOVIES"));
        let titles: Vec<_> = movies.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "c"]);
    }
}
