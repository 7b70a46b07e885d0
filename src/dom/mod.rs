// Element tree and selector matching.
// Stands in for the host page so augmenters can be driven without a browser.

pub mod selector;
pub mod tree;

pub use selector::Selector;
pub use tree::{Document, NodeId};
