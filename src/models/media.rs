use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{folded_serde, lenient_count, lenient_flag, lenient_rating, non_blank};
use crate::types::UserId;

/// Kind of tracked media. Anything the client does not recognise decodes as
/// `Unknown` rather than failing the whole list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Movie,
    Show,
    Novel,
    Unknown,
}

impl MediaKind {
    pub const KNOWN: [MediaKind; 3] = [MediaKind::Movie, MediaKind::Show, MediaKind::Novel];

    /// Case-insensitive; `None` for anything that is not a known kind
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "movie" => Some(MediaKind::Movie),
            "show" => Some(MediaKind::Show),
            "novel" => Some(MediaKind::Novel),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "Movie",
            MediaKind::Show => "Show",
            MediaKind::Novel => "Novel",
            MediaKind::Unknown => "Unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, MediaKind::Unknown)
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl Serialize for MediaKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MediaKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label
            .as_deref()
            .and_then(MediaKind::parse)
            .unwrap_or(MediaKind::Unknown))
    }
}

/// A tracked movie, show or novel. Identified by `(kind, name)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct Media {
    #[serde(rename = "type", default = "unknown_kind")]
    pub kind: MediaKind,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserId>,

    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub episodes_watched: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub total_episodes: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub pages_read: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient_rating", skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_flag", skip_serializing_if = "Option::is_none")]
    pub favourite: Option<bool>,
}

folded_serde!(Media, &[&["userId", "owner"]]);

fn unknown_kind() -> MediaKind {
    MediaKind::Unknown
}

impl Media {
    pub fn new(kind: MediaKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            owner: None,
            episodes_watched: None,
            total_episodes: None,
            pages_read: None,
            total_pages: None,
            start_date: None,
            end_date: None,
            synopsis: None,
            director: None,
            creator: None,
            author: None,
            rating: None,
            favourite: None,
        }
    }

    pub fn owned_by(mut self, owner: impl Into<UserId>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_episodes(mut self, watched: u32, total: u32) -> Self {
        self.episodes_watched = Some(watched);
        self.total_episodes = Some(total);
        self
    }

    pub fn with_pages(mut self, read: u32, total: u32) -> Self {
        self.pages_read = Some(read);
        self.total_pages = Some(total);
        self
    }

    /// Director, creator or author, whichever fits the kind
    pub fn credit(&self) -> Option<&str> {
        match self.kind {
            MediaKind::Movie => self.director.as_deref(),
            MediaKind::Show => self.creator.as_deref(),
            MediaKind::Novel => self.author.as_deref(),
            MediaKind::Unknown => None,
        }
        .or(self.director.as_deref())
        .or(self.creator.as_deref())
        .or(self.author.as_deref())
    }

    pub fn is_favourite(&self) -> bool {
        self.favourite.unwrap_or(false)
    }
}

/// Add/edit form input. Only presence is checked; progress bounds are the
/// server's concern.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaDraft {
    pub kind: Option<String>,
    pub name: Option<String>,
    pub episodes_watched: Option<u32>,
    pub total_episodes: Option<u32>,
    pub pages_read: Option<u32>,
    pub total_pages: Option<u32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub synopsis: Option<String>,
    pub credit: Option<String>,
    pub rating: Option<f64>,
    pub favourite: Option<bool>,
}

impl MediaDraft {
    /// Pre-fill the edit form from a stored record
    pub fn from_media(media: &Media) -> Self {
        Self {
            kind: Some(media.kind.as_str().to_string()),
            name: Some(media.name.clone()),
            episodes_watched: media.episodes_watched,
            total_episodes: media.total_episodes,
            pages_read: media.pages_read,
            total_pages: media.total_pages,
            start_date: media.start_date.clone(),
            end_date: media.end_date.clone(),
            synopsis: media.synopsis.clone(),
            credit: media.credit().map(str::to_string),
            rating: media.rating,
            favourite: media.favourite,
        }
    }

    /// Fields set in `changes` replace ours; `kind` and `name` never change
    /// because they identify the record. A text field set to an empty string
    /// survives the overlay and is dropped by [`MediaDraft::into_media`], which
    /// is how an edit clears it.
    pub fn overlay(self, changes: MediaDraft) -> Self {
        Self {
            kind: self.kind,
            name: self.name,
            episodes_watched: changes.episodes_watched.or(self.episodes_watched),
            total_episodes: changes.total_episodes.or(self.total_episodes),
            pages_read: changes.pages_read.or(self.pages_read),
            total_pages: changes.total_pages.or(self.total_pages),
            start_date: changes.start_date.or(self.start_date),
            end_date: changes.end_date.or(self.end_date),
            synopsis: changes.synopsis.or(self.synopsis),
            credit: changes.credit.or(self.credit),
            rating: changes.rating.or(self.rating),
            favourite: changes.favourite.or(self.favourite),
        }
    }

    /// Turn the form into a record owned by `owner`, or say what is missing.
    pub fn into_media(self, owner: Option<UserId>) -> Result<Media, String> {
        let kind = match non_blank(self.kind) {
            None => return Err("Type is required".to_string()),
            Some(label) => MediaKind::parse(&label)
                .ok_or_else(|| format!("Unknown media type '{}': expected Movie, Show or Novel", label))?,
        };
        let name = non_blank(self.name).ok_or_else(|| "Name is required".to_string())?;

        let mut media = Media::new(kind, name);
        media.owner = owner;
        media.start_date = non_blank(self.start_date);
        media.end_date = non_blank(self.end_date);
        media.synopsis = non_blank(self.synopsis);
        media.rating = self.rating;
        media.favourite = self.favourite;

        let credit = non_blank(self.credit);
        match kind {
            MediaKind::Movie => media.director = credit,
            MediaKind::Show => {
                media.creator = credit;
                media.episodes_watched = self.episodes_watched;
                media.total_episodes = self.total_episodes;
            }
            MediaKind::Novel => {
                media.author = credit;
                media.pages_read = self.pages_read;
                media.total_pages = self.total_pages;
            }
            MediaKind::Unknown => {}
        }

        Ok(media)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_form_style_payload() {
        let media: Media = serde_json::from_value(json!({
            "type": "Show",
            "name": "Severance",
            "userId": 4,
            "episodesWatched": "3",
            "totalEpisodes": 9,
            "creator": "Dan Erickson"
        }))
        .unwrap();

        assert_eq!(media.kind, MediaKind::Show);
        assert_eq!(media.owner, Some(UserId::new("4")));
        assert_eq!(media.episodes_watched, Some(3));
        assert_eq!(media.total_episodes, Some(9));
        assert_eq!(media.credit(), Some("Dan Erickson"));
    }

    #[test]
    fn unrecognised_type_does_not_fail_decoding() {
        let media: Media = serde_json::from_value(json!({ "type": "Podcast", "name": "x" })).unwrap();
        assert_eq!(media.kind, MediaKind::Unknown);

        let media: Media = serde_json::from_value(json!({ "name": "no type" })).unwrap();
        assert_eq!(media.kind, MediaKind::Unknown);
    }

    #[test]
    fn blank_counters_are_unset() {
        let media: Media = serde_json::from_value(json!({
            "type": "novel",
            "name": "Dune",
            "pagesRead": "",
            "totalPages": null
        }))
        .unwrap();
        assert_eq!(media.kind, MediaKind::Novel);
        assert_eq!(media.pages_read, None);
        assert_eq!(media.total_pages, None);
    }

    #[test]
    fn form_strings_for_rating_and_favourite_keep_the_record() {
        let media: Media = serde_json::from_value(json!({
            "type": "Movie", "name": "Up", "userId": "1", "rating": "4", "favourite": "true"
        }))
        .unwrap();
        assert_eq!(media.rating, Some(4.0));
        assert!(media.is_favourite());

        let media: Media = serde_json::from_value(json!({
            "type": "Show", "name": "Dark", "rating": "great", "favourite": "maybe"
        }))
        .unwrap();
        assert_eq!(media.rating, None);
        assert_eq!(media.favourite, None);

        let media: Media = serde_json::from_value(json!({ "type": "Novel", "name": "Dune", "favourite": 0 })).unwrap();
        assert_eq!(media.favourite, Some(false));
    }

    #[test]
    fn owner_and_user_id_together_decode() {
        let media: Media = serde_json::from_value(json!({
            "type": "Movie", "name": "Up", "userId": null, "owner": 5
        }))
        .unwrap();
        assert_eq!(media.owner, Some(UserId::new("5")));

        let media: Media = serde_json::from_value(json!({
            "type": "Movie", "name": "Up", "userId": "1", "owner": "1"
        }))
        .unwrap();
        assert_eq!(media.owner, Some(UserId::new("1")));
    }

    #[test]
    fn draft_requires_type_and_name() {
        let err = MediaDraft { name: Some("Alien".into()), ..Default::default() }
            .into_media(None)
            .unwrap_err();
        assert_eq!(err, "Type is required");

        let err = MediaDraft { kind: Some("movie".into()), name: Some("  ".into()), ..Default::default() }
            .into_media(None)
            .unwrap_err();
        assert_eq!(err, "Name is required");

        assert!(MediaDraft { kind: Some("opera".into()), name: Some("Tosca".into()), ..Default::default() }
            .into_media(None)
            .is_err());
    }

    #[test]
    fn draft_places_credit_by_kind() {
        let media = MediaDraft {
            kind: Some("Novel".into()),
            name: Some("Dune".into()),
            credit: Some("Frank Herbert".into()),
            pages_read: Some(10),
            total_pages: Some(400),
            episodes_watched: Some(2),
            ..Default::default()
        }
        .into_media(Some(UserId::new("u1")))
        .unwrap();

        assert_eq!(media.author.as_deref(), Some("Frank Herbert"));
        assert_eq!(media.director, None);
        assert_eq!(media.pages_read, Some(10));
        assert_eq!(media.episodes_watched, None);
        assert_eq!(media.owner, Some(UserId::new("u1")));
    }

    #[test]
    fn overlay_keeps_identity_and_unset_fields() {
        let stored = Media::new(MediaKind::Show, "Dark").with_episodes(3, 26);
        let draft = MediaDraft::from_media(&stored).overlay(MediaDraft {
            kind: Some("Movie".into()),
            name: Some("Other".into()),
            episodes_watched: Some(10),
            ..Default::default()
        });
        let media = draft.into_media(None).unwrap();
        assert_eq!(media.kind, MediaKind::Show);
        assert_eq!(media.name, "Dark");
        assert_eq!(media.episodes_watched, Some(10));
        assert_eq!(media.total_episodes, Some(26));
    }

    #[test]
    fn serializes_with_wire_names() {
        let value = serde_json::to_value(Media::new(MediaKind::Show, "Dark").owned_by("7").with_episodes(1, 26)).unwrap();
        assert_eq!(value["type"], json!("Show"));
        assert_eq!(value["userId"], json!("7"));
        assert_eq!(value["episodesWatched"], json!(1));
        assert!(value.get("pagesRead").is_none());
    }
}
