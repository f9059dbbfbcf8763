use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use super::error::FilterError;
use crate::models::{Media, MediaKind};

/// Secondary narrowing of a media list by kind. Never touches ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(MediaKind),
}

impl TypeFilter {
    pub fn matches(&self, media: &Media) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(kind) => media.kind == *kind,
        }
    }

    /// Stable: keeps the relative order of `items`.
    pub fn apply(&self, items: Vec<Media>) -> Vec<Media> {
        items.into_iter().filter(|m| self.matches(m)).collect()
    }
}

impl FromStr for TypeFilter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(TypeFilter::All);
        }
        MediaKind::parse(s)
            .map(TypeFilter::Only)
            .ok_or_else(|| FilterError::InvalidMediaType(s.to_string()))
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => f.write_str("all"),
            TypeFilter::Only(kind) => write!(f, "{}", kind.as_str().to_ascii_lowercase()),
        }
    }
}

impl Serialize for TypeFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
