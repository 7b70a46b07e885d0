// Page augmenters for GitHub repository pages and the Digg front page.
// The browser capabilities the augmenters rely on (element tree, mutation
// observation, activation events, persisted per-script state, navigation)
// are modeled as injectable components so each piece tests in isolation.

pub mod dom;
pub mod error;
pub mod github;
pub mod highlight;
pub mod inject;
pub mod script;
pub mod watch;

pub use error::{Result, UpliftError};
