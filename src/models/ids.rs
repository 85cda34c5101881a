//! Crawl and completion identifiers.
//!
//! Crawl ids come from the data source as-is. Completion ids are derived
//! from (crawl, user, stop), so a user completing the same stop twice
//! produces the same id.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Hex characters kept from the digest.
const DERIVED_ID_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Hash `fields`, `|`-separated, into a short hex id.
    pub fn generate(fields: &[&str]) -> Self {
        let digest = Sha256::digest(fields.join("|").as_bytes());
        let mut hex = hex::encode(digest);
        hex.truncate(DERIVED_ID_LEN);
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

pub type CrawlId = EntityId;

/// Derived from (crawl, user, stop); see [`super::StopCompletion::new`].
pub type CompletionId = EntityId;
