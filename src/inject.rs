// Placeholder link injection.
// Keeps the invariant that a commit bar contains exactly one placeholder
// no matter how many times injection runs, including against markup
// restored from the back-forward cache with its bindings lost.

use crate::dom::{Document, NodeId};

pub const CONTAINER_ID: &str = "first-commit";
pub const LINK_ID: &str = "first-commit-link";
pub const LINK_LABEL: &str = "First commit";
pub const LOADING_LABEL: &str = "Loading...";

/// Find or create the placeholder inside the commit bar, returning the
/// activatable link element. Safe to call any number of times for the
/// same container; the caller rebinds the activation action afterwards.
pub fn ensure_link(doc: &mut Document, commit_bar: NodeId) -> NodeId {
    if let Some(container) = doc.find_by_id(commit_bar, CONTAINER_ID) {
        if let Some(link) = doc.find_by_id(container, LINK_ID) {
            return link;
        }
        // container survived but lost its link
        let link = build_link(doc);
        doc.append_child(container, link);
        return link;
    }

    let container = doc.element("span", &[("id", CONTAINER_ID)]);
    doc.set_text(container, "| ");
    let link = build_link(doc);
    doc.append_child(container, link);
    doc.append_child(commit_bar, container);
    link
}

fn build_link(doc: &mut Document) -> NodeId {
    let link = doc.element(
        "a",
        &[
            ("id", LINK_ID),
            ("class", "message"),
            ("style", "cursor: pointer"),
        ],
    );
    doc.set_text(link, LINK_LABEL);
    link
}
