// GitHub API module.
// Client, pagination link parsing, and first-commit resolution over the
// commits listing endpoint.

pub mod client;
pub mod locator;
pub mod pagination;
pub mod types;

pub use client::GitHubClient;
pub use locator::{CommitPage, CommitSource, first_commit_url};
pub use pagination::PageLinks;
pub use types::{Commit, RateLimit, RepoId};
