// GitHub first-commit augmenter.
// Watches repository homepages for the commit bar, injects the placeholder
// link, and on activation resolves and navigates to the first commit.

use std::collections::HashMap;

use crate::dom::{Document, NodeId, Selector};
use crate::error::{Result, UpliftError};
use crate::github::{CommitSource, RepoId, first_commit_url};
use crate::inject::{self, LINK_LABEL, LOADING_LABEL};
use crate::watch::Watcher;

use super::Navigator;

/// The commit bar on a repository homepage. Statically present for
/// logged-out users, loaded via an include fragment otherwise; watching
/// covers both.
pub const COMMIT_BAR: &str = "div.commit-tease.js-details-container > span.float-right";

/// Container swapped by pjax navigation; only repo homepages create it.
pub const PJAX_CONTAINER: &str = "#js-repo-pjax-container";

/// Meta element carrying the `owner/repo` pair.
pub const REPO_META: &str = "octolytics-dimension-repository_network_root_nwo";

/// Injects and drives the first-commit link.
pub struct FirstCommitScript {
    watcher: Watcher,
    bindings: HashMap<NodeId, RepoId>,
}

impl FirstCommitScript {
    pub fn new() -> Result<Self> {
        Ok(Self {
            // the commit bar is recreated on every pjax navigation, so keep
            // watching for new instances
            watcher: Watcher::new(
                Selector::parse(PJAX_CONTAINER)?,
                Selector::parse(COMMIT_BAR)?,
                true,
            ),
            bindings: HashMap::new(),
        })
    }

    /// Handle newly-appeared commit bars: inject the placeholder and
    /// (re)bind its activation, replacing any binding stranded by a
    /// previous DOM lifecycle. Returns the bound links.
    pub fn pump(&mut self, doc: &mut Document) -> Result<Vec<NodeId>> {
        let bars = self.watcher.scan(doc);
        let mut links = Vec::new();
        for bar in bars {
            let repo = repo_from_meta(doc)?;
            let link = inject::ensure_link(doc, bar);
            self.bindings.insert(link, repo);
            links.push(link);
        }
        Ok(links)
    }

    /// The repository a link is bound to.
    pub fn binding(&self, link: NodeId) -> Option<&RepoId> {
        self.bindings.get(&link)
    }

    /// Activate a bound link: show the loading label synchronously, resolve
    /// the first commit, and hand the URL to the navigator. On failure the
    /// label is restored and the error logged as well as returned.
    pub async fn activate<S, N>(
        &self,
        doc: &mut Document,
        link: NodeId,
        source: &mut S,
        navigator: &mut N,
    ) -> Result<()>
    where
        S: CommitSource,
        N: Navigator,
    {
        let Some(repo) = self.bindings.get(&link) else {
            return Err(UpliftError::Other(
                "activation on a link with no bound repository".to_string(),
            ));
        };
        doc.set_text(link, LOADING_LABEL);
        match first_commit_url(source, repo).await {
            Ok(url) => {
                navigator.goto(&url);
                Ok(())
            }
            Err(e) => {
                log::error!("first-commit lookup for {} failed: {}", repo, e);
                doc.set_text(link, LINK_LABEL);
                Err(e)
            }
        }
    }
}

/// Read the repository identifier from page metadata.
fn repo_from_meta(doc: &Document) -> Result<RepoId> {
    let selector = Selector::parse(&format!(r#"meta[name="{}"]"#, REPO_META))?;
    let meta = doc.query_first(&selector).ok_or_else(|| {
        UpliftError::MissingMetadata(format!("no meta element named {}", REPO_META))
    })?;
    let content = doc
        .attr(meta, "content")
        .ok_or_else(|| UpliftError::MissingMetadata(format!("meta {} has no content", REPO_META)))?;
    RepoId::from_nwo(content)
}
