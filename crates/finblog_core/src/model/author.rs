//! Author domain model.
//!
//! # Responsibility
//! - Describe a content contributor and its public profile fields.
//!
//! # Invariants
//! - `byline` equals `"{first_name} {last_name}"` or `username`.
//! - `username` and `external_uid` are unique (enforced by storage).
//! - Authors are immutable after creation.

use crate::model::validation::{
    limit_length, require_email, require_id, require_short_text, require_url, ValidationError,
};
use crate::model::EntityKind;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type AuthorId = Uuid;

pub const DEFAULT_SMALL_AVATAR_URL: &str = "http://g.foolcdn.com/avatar/1593347483/small.ashx";
pub const DEFAULT_LARGE_AVATAR_URL: &str = "http://g.foolcdn.com/avatar/1593347483/large.ashx";

/// Kind of contributor behind an author profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributorType {
    #[default]
    Individual,
    Company,
    Sponsor,
    Staff,
}

impl ContributorType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Company => "company",
            Self::Sponsor => "sponsor",
            Self::Staff => "staff",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "individual" => Some(Self::Individual),
            "company" => Some(Self::Company),
            "sponsor" => Some(Self::Sponsor),
            "staff" => Some(Self::Staff),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default = "Uuid::new_v4")]
    pub id: AuthorId,
    pub username: String,
    /// Public display name. Articles point at authors through this value.
    pub byline: String,
    #[serde(default)]
    pub contributor_type: ContributorType,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Identifier in the upstream content system.
    pub external_uid: i64,
    #[serde(default)]
    pub primary: bool,
    #[serde(default = "default_small_avatar_url")]
    pub small_avatar_url: String,
    #[serde(default = "default_large_avatar_url")]
    pub large_avatar_url: String,
    #[serde(default)]
    pub twitter_username: Option<String>,
    #[serde(default)]
    pub short_bio: Option<String>,
    #[serde(default)]
    pub long_bio: Option<String>,
}

fn default_small_avatar_url() -> String {
    DEFAULT_SMALL_AVATAR_URL.to_string()
}

fn default_large_avatar_url() -> String {
    DEFAULT_LARGE_AVATAR_URL.to_string()
}

impl Author {
    /// Creates an individual author whose byline is the full name.
    pub fn new(
        username: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        external_uid: i64,
    ) -> Self {
        let first_name = first_name.into();
        let last_name = last_name.into();
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            byline: format!("{first_name} {last_name}"),
            contributor_type: ContributorType::default(),
            email: email.into(),
            first_name,
            last_name,
            external_uid,
            primary: false,
            small_avatar_url: default_small_avatar_url(),
            large_avatar_url: default_large_avatar_url(),
            twitter_username: None,
            short_bio: None,
            long_bio: None,
        }
    }

    /// Returns `"{first_name} {last_name}"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns whether `byline` is one of the two accepted forms.
    pub fn byline_matches(&self) -> bool {
        self.byline == self.full_name() || self.byline == self.username
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let kind = EntityKind::Author;
        require_id(kind, self.id)?;
        require_short_text(kind, "username", &self.username)?;
        require_short_text(kind, "byline", &self.byline)?;
        require_short_text(kind, "first_name", &self.first_name)?;
        require_short_text(kind, "last_name", &self.last_name)?;
        require_email(&self.email)?;
        require_url("small_avatar_url", &self.small_avatar_url)?;
        require_url("large_avatar_url", &self.large_avatar_url)?;
        if let Some(twitter) = self.twitter_username.as_deref() {
            limit_length(kind, "twitter_username", twitter)?;
        }

        if !self.byline_matches() {
            return Err(ValidationError::BylineMismatch {
                byline: self.byline.clone(),
                full_name: self.full_name(),
                username: self.username.clone(),
            });
        }
        Ok(())
    }
}

impl Display for Author {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.byline)
    }
}
