pub mod media;
pub mod post;
pub mod user;

pub use media::{Media, MediaDraft, MediaKind};
pub use post::{NewPost, Post, Reply};
pub use user::{Credentials, Registration, User, UserUpdate};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Counters come back as numbers, numeric strings (straight from form
/// inputs), empty strings or null. Anything unreadable is treated as unset.
pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Other(serde_json::Value),
    }

    let count = match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) if n.is_finite() => Some(n.max(0.0).round() as u32),
        Some(Raw::Text(s)) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()).map(|n| n.max(0.0).round() as u32),
        _ => None,
    };
    Ok(count)
}

/// Trims a form field, mapping blank to `None`
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Ratings arrive as numbers or numeric strings. Anything else is unset.
pub(crate) fn lenient_rating<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let rating = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(rating.filter(|r| r.is_finite()))
}

/// Checkbox values: booleans, "true"/"false" strings or 0/1
pub(crate) fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let flag = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(n) if n == 0.0 => Some(false),
            Some(n) if n == 1.0 => Some(true),
            _ => None,
        },
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    };
    Ok(flag)
}

/// Fold alternative spellings of a key into the first one listed. The first
/// non-null spelling wins and the rest are dropped, so a record carrying both
/// `_id` and `id` still decodes.
pub(crate) fn fold_keys(value: Value, keys: &[&[&str]]) -> Value {
    let Value::Object(mut fields) = value else {
        return value;
    };

    for spellings in keys {
        let Some(canonical) = spellings.first() else {
            continue;
        };
        let mut chosen = None;
        for key in spellings.iter() {
            if let Some(found) = fields.remove(*key) {
                if chosen.is_none() && !found.is_null() {
                    chosen = Some(found);
                }
            }
        }
        if let Some(found) = chosen {
            fields.insert(canonical.to_string(), found);
        }
    }

    Value::Object(fields)
}

/// Implement `Deserialize` for a `#[serde(remote = "Self")]` model by folding
/// its key spellings first, and forward `Serialize` to the derived code.
macro_rules! folded_serde {
    ($ty:ty, $keys:expr) => {
        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
                <$ty>::deserialize($crate::models::fold_keys(value, $keys)).map_err(serde::de::Error::custom)
            }
        }

        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                <$ty>::serialize(self, serializer)
            }
        }
    };
}

pub(crate) use folded_serde;
