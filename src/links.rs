//! Link and media classification heuristics.
//!
//! These are string heuristics, not URL parsing. `contains_link`
//! matches any `http`/`www` substring; `is_allowed_media` checks the
//! trailing extension of the whole trimmed text plus a small host
//! allow-list. The boundary behavior is pinned by the tests below;
//! keep it when changing either list.

use std::sync::LazyLock;

use regex::Regex;

/// Hosts whose links are always treated as media.
const MEDIA_HOSTS: &[&str] = &["giphy.com", "tenor.com"];

/// Trailing media file extension, anchored at the end of the text.
static MEDIA_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(gif|png|jpe?g|webp|mp4)$").expect("static regex"));

/// Whether the text contains an HTTP(S) URL-like substring or "www".
pub fn contains_link(text: &str) -> bool {
    text.contains("http") || text.contains("www")
}

/// Whether the text is an allowed media link: ends in a known media
/// extension or mentions an allow-listed media host.
pub fn is_allowed_media(text: &str) -> bool {
    let text = text.trim();
    if MEDIA_EXTENSION.is_match(text) {
        return true;
    }
    let lower = text.to_lowercase();
    MEDIA_HOSTS.iter().any(|host| lower.contains(host))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_http_links() {
        assert!(contains_link("see https://example.com/page"));
        assert!(contains_link("http://example.com"));
        assert!(contains_link("www.example.com no scheme"));
    }

    #[test]
    fn plain_text_is_not_a_link() {
        assert!(!contains_link("just a normal sentence"));
        assert!(!contains_link(""));
    }

    #[test]
    fn bare_word_fragments_count_as_links() {
        // Known permissiveness: any "http"/"www" substring matches.
        assert!(contains_link("the httpd daemon"));
    }

    #[test]
    fn media_extensions_are_allowed() {
        assert!(is_allowed_media("https://cdn.example.com/cat.gif"));
        assert!(is_allowed_media("https://cdn.example.com/cat.GIF"));
        assert!(is_allowed_media("https://img.example.com/pic.jpeg"));
        assert!(is_allowed_media("https://img.example.com/clip.mp4  "));
    }

    #[test]
    fn media_hosts_are_allowed() {
        assert!(is_allowed_media("https://giphy.com/gifs/abc123"));
        assert!(is_allowed_media("check https://tenor.com/view/xyz out"));
    }

    #[test]
    fn extension_must_be_trailing() {
        // The extension check anchors at the end of the trimmed text, so
        // a media URL followed by commentary is not matched by it.
        assert!(!is_allowed_media("https://cdn.example.com/cat.gif nice one"));
    }

    #[test]
    fn host_match_is_substring() {
        // Known permissiveness: host matching is containment, not parsing.
        assert!(is_allowed_media("https://notgiphy.com.evil.example/page"));
    }

    #[test]
    fn ordinary_links_are_not_media() {
        assert!(!is_allowed_media("https://example.com/signup"));
        assert!(!is_allowed_media("https://example.com/gifts"));
        assert!(!is_allowed_media("www.example.com"));
    }
}
