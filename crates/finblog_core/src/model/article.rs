//! Article domain model.
//!
//! # Invariants
//! - `path` is globally unique (enforced by storage).
//! - `byline` is a soft reference to `Author::byline`; no foreign key.
//! - `modified` is stamped by the store on every update.

use crate::model::validation::{
    require_id, require_short_text, require_text, require_timestamp, require_url, ValidationError,
};
use crate::model::EntityKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type ArticleId = Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArticleType {
    #[default]
    #[serde(rename = "article")]
    Article,
    /// Featured "10 Promise Series" content shown as the front page lead.
    #[serde(rename = "10-promise-series")]
    TenPromiseSeries,
}

impl ArticleType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::TenPromiseSeries => "10-promise-series",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "article" => Some(Self::Article),
            "10-promise-series" => Some(Self::TenPromiseSeries),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default = "Uuid::new_v4")]
    pub id: ArticleId,
    pub body: String,
    pub headline: String,
    #[serde(default)]
    pub promo: String,
    pub byline: String,
    #[serde(default)]
    pub article_type: ArticleType,
    pub featured_image_url: String,
    #[serde(default)]
    pub featured_image_name: Option<String>,
    #[serde(default)]
    pub static_page: bool,
    /// External slug; unique across all articles.
    pub path: String,
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
    pub publish_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub modified: DateTime<Utc>,
    #[serde(default)]
    pub disclosure: Option<String>,
}

impl Article {
    /// Creates a regular article published now.
    pub fn new(
        headline: impl Into<String>,
        body: impl Into<String>,
        byline: impl Into<String>,
        path: impl Into<String>,
        featured_image_url: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            body: body.into(),
            headline: headline.into(),
            promo: String::new(),
            byline: byline.into(),
            article_type: ArticleType::default(),
            featured_image_url: featured_image_url.into(),
            featured_image_name: None,
            static_page: false,
            path: path.into(),
            created: now,
            publish_at: now,
            modified: now,
            disclosure: None,
        }
    }

    pub fn is_featured(&self) -> bool {
        self.article_type == ArticleType::TenPromiseSeries
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let kind = EntityKind::Article;
        require_id(kind, self.id)?;
        require_text(kind, "headline", &self.headline)?;
        require_text(kind, "body", &self.body)?;
        require_short_text(kind, "byline", &self.byline)?;
        require_text(kind, "path", &self.path)?;
        require_url("featured_image_url", &self.featured_image_url)?;
        require_timestamp("created", &self.created)?;
        require_timestamp("publish_at", &self.publish_at)?;
        require_timestamp("modified", &self.modified)?;
        Ok(())
    }
}

impl Display for Article {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.headline)
    }
}
