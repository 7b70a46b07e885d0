// Freshness highlighting.
// Diffs visible story items against the persisted seen records, marks the
// unseen ones, and refreshes the records with the current timestamp.

pub mod store;

pub use store::{DEFAULT_TTL, SeenStore};

use chrono::{DateTime, Utc};

use crate::dom::{Document, NodeId, Selector};
use crate::error::Result;

/// Attribute set on a marked target element.
pub const FRESH_ATTR: &str = "data-fresh";

/// What counts as a story item and which part of it gets marked.
#[derive(Debug, Clone)]
pub struct HighlightConfig {
    /// Candidate story elements.
    pub item: Selector,
    /// Required descendant; items without it have not reached their final
    /// rendered state and are skipped on this pass.
    pub filter: Selector,
    /// Attribute holding an item's stable identifier.
    pub id_attr: String,
    /// Sub-element that receives the marker.
    pub target: Selector,
}

/// Mark unseen items and refresh the seen records.
///
/// Items whose identifier has no unexpired record get their target
/// sub-element marked; every observed identifier is (re)recorded at `now`,
/// so an item only becomes markable again after the retention window of
/// inactivity. Returns the marked items in document order. The store is
/// pruned and saved once per run.
pub fn highlight(
    doc: &mut Document,
    config: &HighlightConfig,
    store: &mut SeenStore,
    now: DateTime<Utc>,
) -> Result<Vec<NodeId>> {
    store.prune(now);

    let candidates: Vec<NodeId> = doc
        .query_all(&config.item)
        .into_iter()
        .filter(|&item| doc.select_first(item, &config.filter).is_some())
        .collect();

    let mut marked = Vec::new();
    for item in candidates {
        let Some(id) = doc.attr(item, &config.id_attr) else {
            continue;
        };
        let id = id.to_string();
        if !store.seen(&id, now) {
            if let Some(target) = doc.select_first(item, &config.target) {
                doc.set_attr(target, FRESH_ATTR, "true");
                marked.push(item);
            }
        }
        store.record(id, now);
    }

    store.save()?;
    Ok(marked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use tempfile::TempDir;

    fn config() -> HighlightConfig {
        HighlightConfig {
            item: Selector::parse(
                "article[data-id].fp-featured-story, article[data-id].fp-vertical-story",
            )
            .unwrap(),
            filter: Selector::parse(r#"[itemprop="alternativeHeadline"][style="color:"]"#).unwrap(),
            id_attr: "data-id".to_string(),
            target: Selector::parse(r#"[itemprop="headline"]"#).unwrap(),
        }
    }

    fn story_page() -> (Document, NodeId) {
        let mut doc = Document::new();
        let body = doc.element("body", &[]);
        doc.set_root(body);
        (doc, body)
    }

    // a story in its final rendered state: inert alternative headline plus
    // a headline to receive the marker
    fn add_story(doc: &mut Document, parent: NodeId, id: &str) -> (NodeId, NodeId) {
        let story = doc.element(
            "article",
            &[("data-id", id), ("class", "fp-featured-story")],
        );
        let alt = doc.element(
            "span",
            &[("itemprop", "alternativeHeadline"), ("style", "color:")],
        );
        let headline = doc.element("h2", &[("itemprop", "headline")]);
        doc.append_child(parent, story);
        doc.append_child(story, alt);
        doc.append_child(story, headline);
        (story, headline)
    }

    fn test_store(dir: &TempDir) -> SeenStore {
        SeenStore::load(dir.path().join("seen.json")).unwrap()
    }

    #[test]
    fn test_marks_unseen_and_records() {
        let dir = TempDir::new().unwrap();
        let (mut doc, body) = story_page();
        let (story, headline) = add_story(&mut doc, body, "42");
        let mut store = test_store(&dir);
        let now = Utc::now();

        let marked = highlight(&mut doc, &config(), &mut store, now).unwrap();

        assert_eq!(marked, vec![story]);
        assert_eq!(doc.attr(headline, FRESH_ATTR), Some("true"));
        assert!(store.seen("42", now));
    }

    #[test]
    fn test_recorded_item_is_not_remarked_within_retention() {
        let dir = TempDir::new().unwrap();
        let (mut doc, body) = story_page();
        add_story(&mut doc, body, "42");
        let mut store = test_store(&dir);
        let now = Utc::now();

        highlight(&mut doc, &config(), &mut store, now).unwrap();
        let marked = highlight(
            &mut doc,
            &config(),
            &mut store,
            now + ChronoDuration::days(3),
        )
        .unwrap();

        assert!(marked.is_empty());
    }

    #[test]
    fn test_expired_item_is_markable_again() {
        let dir = TempDir::new().unwrap();
        let (mut doc, body) = story_page();
        let (story, _) = add_story(&mut doc, body, "42");
        let mut store = test_store(&dir);
        let now = Utc::now();
        store.record("42", now - ChronoDuration::days(5));

        let marked = highlight(&mut doc, &config(), &mut store, now).unwrap();

        assert_eq!(marked, vec![story]);
    }

    #[test]
    fn test_observation_refreshes_retention() {
        let dir = TempDir::new().unwrap();
        let (mut doc, body) = story_page();
        add_story(&mut doc, body, "42");
        let mut store = test_store(&dir);
        let now = Utc::now();

        highlight(&mut doc, &config(), &mut store, now).unwrap();
        // observed again on day 3; the record is refreshed, so day 6 is
        // still within the retention window
        highlight(
            &mut doc,
            &config(),
            &mut store,
            now + ChronoDuration::days(3),
        )
        .unwrap();

        assert!(store.seen("42", now + ChronoDuration::days(6)));
    }

    #[test]
    fn test_unrendered_item_is_skipped_entirely() {
        let dir = TempDir::new().unwrap();
        let (mut doc, body) = story_page();
        // no alternativeHeadline marker yet: the host page has not finished
        // rendering this story
        let story = doc.element(
            "article",
            &[("data-id", "7"), ("class", "fp-vertical-story")],
        );
        let headline = doc.element("h2", &[("itemprop", "headline")]);
        doc.append_child(body, story);
        doc.append_child(story, headline);
        let mut store = test_store(&dir);
        let now = Utc::now();

        let marked = highlight(&mut doc, &config(), &mut store, now).unwrap();

        assert!(marked.is_empty());
        assert!(doc.attr(headline, FRESH_ATTR).is_none());
        assert!(!store.seen("7", now));
    }

    #[test]
    fn test_item_without_identifier_is_skipped() {
        let dir = TempDir::new().unwrap();
        let (mut doc, body) = story_page();
        let story = doc.element("article", &[("class", "fp-featured-story")]);
        let alt = doc.element(
            "span",
            &[("itemprop", "alternativeHeadline"), ("style", "color:")],
        );
        let headline = doc.element("h2", &[("itemprop", "headline")]);
        doc.append_child(body, story);
        doc.append_child(story, alt);
        doc.append_child(story, headline);
        let mut store = test_store(&dir);

        // candidate selector that does not itself require the id attribute
        let lax = HighlightConfig {
            item: Selector::parse("article.fp-featured-story").unwrap(),
            ..config()
        };

        let marked = highlight(&mut doc, &lax, &mut store, Utc::now()).unwrap();

        assert!(marked.is_empty());
        assert!(doc.attr(headline, FRESH_ATTR).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_saved_after_run() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seen.json");
        let (mut doc, body) = story_page();
        add_story(&mut doc, body, "42");
        let mut store = SeenStore::load(&path).unwrap();
        let now = Utc::now();

        highlight(&mut doc, &config(), &mut store, now).unwrap();

        let reloaded = SeenStore::load(&path).unwrap();
        assert!(reloaded.seen("42", now));
    }
}
