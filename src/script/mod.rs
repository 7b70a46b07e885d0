// Script registry.
// Each augmenter declares the URL patterns it activates on, userscript
// style; the host installs the scripts whose pattern matches the page.

pub mod digg;
pub mod first_commit;

pub use digg::DiggScript;
pub use first_commit::FirstCommitScript;

/// Navigation seam: resolved URLs are handed to the host instead of
/// assigning a browser location directly.
pub trait Navigator {
    fn goto(&mut self, url: &str);
}

/// Which augmenter a registry entry names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    FirstCommit,
    DiggHighlighter,
}

/// A registered augmenter: name plus the URL patterns it activates on.
#[derive(Debug, Clone, Copy)]
pub struct ScriptInfo {
    pub name: &'static str,
    pub patterns: &'static [&'static str],
    pub kind: ScriptKind,
}

const REGISTRY: &[ScriptInfo] = &[
    ScriptInfo {
        name: "github-first-commit",
        patterns: &["https://github.com/*/*"],
        kind: ScriptKind::FirstCommit,
    },
    ScriptInfo {
        name: "digg-highlighter",
        patterns: &["https://digg.com/"],
        kind: ScriptKind::DiggHighlighter,
    },
];

/// All registered augmenters.
pub fn registry() -> &'static [ScriptInfo] {
    REGISTRY
}

/// Augmenters whose patterns match the given page URL.
pub fn scripts_for_url(url: &str) -> Vec<&'static ScriptInfo> {
    REGISTRY
        .iter()
        .filter(|s| s.patterns.iter().any(|p| pattern_matches(p, url)))
        .collect()
}

/// Userscript-style include matching: `*` spans any characters and the
/// pattern is anchored at both ends.
pub fn pattern_matches(pattern: &str, url: &str) -> bool {
    let mut parts = pattern.split('*');
    let first = parts.next().unwrap_or_default();
    let rest: Vec<&str> = parts.collect();
    if rest.is_empty() {
        return pattern == url;
    }
    if !url.starts_with(first) {
        return false;
    }
    let mut pos = first.len();
    let last_index = rest.len() - 1;
    for (i, part) in rest.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if i == last_index {
            // the final literal must close out the URL
            return url.len() >= pos + part.len() && url.ends_with(part);
        }
        match url[pos..].find(part) {
            Some(idx) => pos += idx + part.len(),
            None => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_homepage_matches() {
        assert!(pattern_matches(
            "https://github.com/*/*",
            "https://github.com/rust-lang/rust"
        ));
    }

    #[test]
    fn test_owner_page_does_not_match() {
        assert!(!pattern_matches(
            "https://github.com/*/*",
            "https://github.com/rust-lang"
        ));
        assert!(!pattern_matches("https://github.com/*/*", "https://github.com/"));
    }

    #[test]
    fn test_literal_pattern_is_exact() {
        assert!(pattern_matches("https://digg.com/", "https://digg.com/"));
        assert!(!pattern_matches("https://digg.com/", "https://digg.com/video"));
        assert!(!pattern_matches("https://digg.com/", "http://digg.com/"));
    }

    #[test]
    fn test_trailing_literal_is_anchored() {
        assert!(pattern_matches("https://*.example.com/feed", "https://a.example.com/feed"));
        assert!(!pattern_matches(
            "https://*.example.com/feed",
            "https://a.example.com/feed/extra"
        ));
    }

    #[test]
    fn test_scripts_for_url() {
        let github = scripts_for_url("https://github.com/chocolateboy/userscripts");
        assert_eq!(github.len(), 1);
        assert_eq!(github[0].kind, ScriptKind::FirstCommit);

        let digg = scripts_for_url("https://digg.com/");
        assert_eq!(digg.len(), 1);
        assert_eq!(digg[0].kind, ScriptKind::DiggHighlighter);

        assert!(scripts_for_url("https://example.com/").is_empty());
    }
}
