//! Reserved entities without fields yet.
//!
//! Tags and instruments only carry identity so later relations to articles
//! and quotes have a stable target.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type TagId = Uuid;
pub type InstrumentId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
}

impl Tag {
    pub fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }
}

impl Default for Tag {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instrument {
    pub id: InstrumentId,
}

impl Instrument {
    pub fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }
}

impl Default for Instrument {
    fn default() -> Self {
        Self::new()
    }
}
