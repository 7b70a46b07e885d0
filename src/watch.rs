// Mutation watching.
// Reports target-selector matches inside a root element's subtree, whether
// the match was present at registration or inserted later. The host drives
// `scan` after every mutation batch; matched nodes are the typed payload.

use std::collections::HashSet;

use crate::dom::{Document, NodeId, Selector};

/// Watches a root element's subtree for elements matching a target selector.
///
/// Single-match mode reports one appearance and then goes dormant.
/// Multi-match mode keeps reporting each distinct new match; a recreated
/// element has a fresh id and counts as new.
#[derive(Debug)]
pub struct Watcher {
    root: Selector,
    target: Selector,
    multi: bool,
    seen: HashSet<NodeId>,
    done: bool,
}

impl Watcher {
    pub fn new(root: Selector, target: Selector, multi: bool) -> Self {
        Self {
            root,
            target,
            multi,
            seen: HashSet::new(),
            done: false,
        }
    }

    /// Matches not yet reported, in document order. If the root selector
    /// currently matches nothing, reports nothing; the feature is simply
    /// inactive on such pages.
    pub fn scan(&mut self, doc: &Document) -> Vec<NodeId> {
        if self.done {
            return Vec::new();
        }
        let Some(root) = doc.query_first(&self.root) else {
            return Vec::new();
        };
        let fresh: Vec<NodeId> = doc
            .select_all(root, &self.target)
            .into_iter()
            .filter(|n| !self.seen.contains(n))
            .collect();
        if self.multi {
            self.seen.extend(fresh.iter().copied());
            fresh
        } else if let Some(&first) = fresh.first() {
            self.done = true;
            vec![first]
        } else {
            Vec::new()
        }
    }
}
