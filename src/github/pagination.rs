// Link header parsing for paginated responses.
// The header lists related page URLs as comma-separated entries of the form
// `<url>; rel="name"`. Entries that do not parse are skipped; a header with
// no usable relations behaves exactly like an absent header.

use reqwest::header::{HeaderMap, LINK};

/// Related page URLs extracted from a `Link` response header. An empty
/// value means the current page is the only page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub first: Option<String>,
    pub prev: Option<String>,
    pub next: Option<String>,
    pub last: Option<String>,
}

impl PageLinks {
    /// Parse a `Link` header value. For each relation name the first entry
    /// wins; unknown relations and malformed entries are ignored.
    pub fn parse(header: &str) -> Self {
        let mut links = PageLinks::default();
        for entry in header.split(',') {
            let entry = entry.trim();
            let Some(rest) = entry.strip_prefix('<') else {
                continue;
            };
            let Some((url, params)) = rest.split_once('>') else {
                continue;
            };
            for param in params.split(';') {
                let Some(value) = param.trim().strip_prefix("rel=") else {
                    continue;
                };
                let slot = match value.trim_matches('"') {
                    "first" => &mut links.first,
                    "prev" => &mut links.prev,
                    "next" => &mut links.next,
                    "last" => &mut links.last,
                    _ => continue,
                };
                if slot.is_none() {
                    *slot = Some(url.to_string());
                }
            }
        }
        links
    }

    /// Extract pagination links from response headers. An absent or
    /// non-ASCII header yields the empty value.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .map(Self::parse)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.prev.is_none() && self.next.is_none() && self.last.is_none()
    }
}
