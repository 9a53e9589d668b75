//! Content domain model: authors, articles, quotes and reserved entities.
//!
//! # Responsibility
//! - Define the canonical records persisted by the entity store.
//! - Own per-entity invariants through `validate()`.
//!
//! # Invariants
//! - Every entity is identified by a stable, non-nil UUID.
//! - Validation is pure; uniqueness is enforced by storage at write time.

use std::fmt::{Display, Formatter};

pub mod article;
pub mod author;
pub mod quote;
pub mod reserved;
pub mod validation;

/// Entity kinds known by the content store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Author,
    Article,
    Quote,
    Tag,
    Instrument,
}

impl EntityKind {
    /// Returns the lowercase name used in logs and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Article => "article",
            Self::Quote => "quote",
            Self::Tag => "tag",
            Self::Instrument => "instrument",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
