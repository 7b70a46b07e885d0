// Digg front-page highlighter.
// Watches the story list and hands newly-rendered stories to the
// freshness highlighter, configured for Digg's markup.

use chrono::{DateTime, Utc};

use crate::dom::{Document, NodeId, Selector};
use crate::error::Result;
use crate::highlight::{HighlightConfig, SeenStore, highlight};
use crate::watch::Watcher;

/// Both front-page story flavors, keyed by their stable identifier.
pub const STORY_ITEMS: &str =
    "article[data-id].fp-featured-story, article[data-id].fp-vertical-story";

/// Stories whose alternative headline still carries the inert style have
/// not yet been re-rendered as already-seen by the host page's own
/// scripts; only those are candidates.
pub const UNRENDERED_MARKER: &str = r#"[itemprop="alternativeHeadline"][style="color:"]"#;

/// Element that receives the freshness marker.
pub const HEADLINE: &str = r#"[itemprop="headline"]"#;

/// Attribute identifying a story.
pub const STORY_ID: &str = "data-id";

/// Highlights stories that have not been seen within the retention window.
pub struct DiggScript {
    watcher: Watcher,
    config: HighlightConfig,
}

impl DiggScript {
    pub fn new() -> Result<Self> {
        Ok(Self {
            watcher: Watcher::new(
                Selector::parse("body")?,
                Selector::parse(STORY_ITEMS)?,
                true,
            ),
            config: HighlightConfig {
                item: Selector::parse(STORY_ITEMS)?,
                filter: Selector::parse(UNRENDERED_MARKER)?,
                id_attr: STORY_ID.to_string(),
                target: Selector::parse(HEADLINE)?,
            },
        })
    }

    /// Open the persisted seen-store for this script.
    pub fn open_store() -> Result<SeenStore> {
        SeenStore::open("digg")
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    /// Run the highlighter when new stories have appeared. Returns the
    /// items marked on this pass.
    pub fn pump(
        &mut self,
        doc: &mut Document,
        store: &mut SeenStore,
        now: DateTime<Utc>,
    ) -> Result<Vec<NodeId>> {
        if self.watcher.scan(doc).is_empty() {
            return Ok(Vec::new());
        }
        highlight(doc, &self.config, store, now)
    }
}
