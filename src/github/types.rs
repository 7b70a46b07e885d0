// GitHub API response types and identifiers.
// Defines the commit shape returned by the commits listing endpoint and
// the owner/name pair the augmenter is keyed on.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, UpliftError};

/// A commit as returned by the commits listing endpoint. Only the fields
/// the locator consults are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub html_url: String,
}

/// An owner/name pair identifying a repository. Parsed once at injection
/// time from page metadata and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    pub fn new(owner: &str, name: &str) -> Result<Self> {
        if owner.is_empty() || name.is_empty() {
            return Err(UpliftError::MissingMetadata(format!(
                "empty repository identifier `{}/{}`",
                owner, name
            )));
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// Parse an `owner/repo` pair as embedded in the page's
    /// `octolytics-dimension-repository_network_root_nwo` meta content.
    /// Case is preserved as supplied.
    pub fn from_nwo(nwo: &str) -> Result<Self> {
        let Some((owner, name)) = nwo.split_once('/') else {
            return Err(UpliftError::MissingMetadata(format!(
                "repository identifier `{}` is not owner/name",
                nwo
            )));
        };
        Self::new(owner, name)
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Default)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
}
