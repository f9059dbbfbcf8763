use serde::{Deserialize, Serialize};

use super::{folded_serde, lenient_count, non_blank};
use crate::types::UserId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

folded_serde!(User, &[&["id", "_id", "userId"], &["name", "username"]]);

/// Body of `PUT /user/edit`. Unset fields are left alone by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl UserUpdate {
    /// Pre-fill from the current record, as the edit form does
    pub fn from_user(user: &User) -> Self {
        Self {
            name: Some(user.name.clone()),
            email: Some(user.email.clone()),
            age: user.age,
            gender: user.gender.clone(),
            country: user.country.clone(),
            bio: user.bio.clone(),
        }
    }

    /// Name and email are required; everything else is optional.
    pub fn validated(self) -> Result<Self, String> {
        let name = non_blank(self.name).ok_or_else(|| "Name is required".to_string())?;
        let email = non_blank(self.email).ok_or_else(|| "Email is required".to_string())?;
        Ok(Self {
            name: Some(name),
            email: Some(email),
            gender: non_blank(self.gender),
            country: non_blank(self.country),
            age: self.age,
            bio: non_blank(self.bio),
        })
    }

    /// Overlay the non-empty fields of `other`
    pub fn merge(mut self, other: UserUpdate) -> Self {
        if other.name.is_some() {
            self.name = other.name;
        }
        if other.email.is_some() {
            self.email = other.email;
        }
        if other.age.is_some() {
            self.age = other.age;
        }
        if other.gender.is_some() {
            self.gender = other.gender;
        }
        if other.country.is_some() {
            self.country = other.country;
        }
        if other.bio.is_some() {
            self.bio = other.bio;
        }
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}
