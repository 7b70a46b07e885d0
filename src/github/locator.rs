// First-commit resolution.
// Commit history pages are newest-first, so the repository's first commit
// is the final element of the final page: fetch page one, follow the
// `last` pagination link if there is one, and take the last entry.

use crate::error::{Result, UpliftError};

use super::client::GitHubClient;
use super::pagination::PageLinks;
use super::types::{Commit, RepoId};

/// One page of commit history together with its pagination links.
#[derive(Debug, Clone, Default)]
pub struct CommitPage {
    pub commits: Vec<Commit>,
    pub links: PageLinks,
}

/// Source of paginated commit history. The live implementation is
/// `GitHubClient`; tests substitute scripted pages.
#[allow(async_fn_in_trait)]
pub trait CommitSource {
    /// Fetch the first page of a repository's commit history, newest-first.
    async fn list_commits(&mut self, repo: &RepoId) -> Result<CommitPage>;

    /// Fetch a page by the absolute URL taken from a pagination link.
    async fn fetch_page(&mut self, url: &str) -> Result<Vec<Commit>>;
}

impl CommitSource for GitHubClient {
    async fn list_commits(&mut self, repo: &RepoId) -> Result<CommitPage> {
        let response = self
            .get(&format!("/repos/{}/{}/commits", repo.owner, repo.name))
            .await?;
        let links = PageLinks::from_headers(response.headers());
        let commits: Vec<Commit> = response.json().await?;
        Ok(CommitPage { commits, links })
    }

    async fn fetch_page(&mut self, url: &str) -> Result<Vec<Commit>> {
        let response = self.get_url(url).await?;
        let commits: Vec<Commit> = response.json().await?;
        Ok(commits)
    }
}

/// Resolve the URL of a repository's first commit.
///
/// At most two sequential requests: the first page, and the `last` page
/// when the pagination links name one. An empty history is an explicit
/// error rather than a broken URL.
pub async fn first_commit_url<S: CommitSource>(source: &mut S, repo: &RepoId) -> Result<String> {
    let page = source.list_commits(repo).await?;
    let commits = match &page.links.last {
        Some(url) => {
            log::debug!("following last-page link for {}: {}", repo, url);
            source.fetch_page(url).await?
        }
        None => page.commits,
    };
    commits
        .last()
        .map(|c| c.html_url.clone())
        .ok_or_else(|| UpliftError::EmptyHistory {
            owner: repo.owner.clone(),
            repo: repo.name.clone(),
        })
}
