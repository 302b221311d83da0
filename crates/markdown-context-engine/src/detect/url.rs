//! URL classification.

use std::sync::OnceLock;

use regex::Regex;

use crate::context::LinkType;

fn resource_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^:/[0-9a-f]{32}(#.*)?$").expect("Invalid resource id regex pattern")
    })
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^mailto:").expect("Invalid mailto regex pattern"))
}

fn external_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^https?://").expect("Invalid http regex pattern"))
}

fn anchor_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#\S+$").expect("Invalid anchor regex pattern"))
}

/// Classify a URL, or `None` when it matches no known link type.
///
/// Rules are checked in order: resource id, `mailto:`, `http(s)://`, `#anchor`.
pub fn classify_url(url: &str) -> Option<LinkType> {
    if resource_regex().is_match(url) {
        Some(LinkType::Resource)
    } else if email_regex().is_match(url) {
        Some(LinkType::Email)
    } else if external_regex().is_match(url) {
        Some(LinkType::External)
    } else if anchor_regex().is_match(url) {
        Some(LinkType::Anchor)
    } else {
        None
    }
}

/// Strip punctuation that ends a sentence rather than a bare URL.
///
/// A trailing `)` is only removed while the URL has more closing than
/// opening parentheses, so `https://en.wikipedia.org/wiki/Rust_(language)`
/// survives intact.
pub fn trim_bare_url(url: &str) -> &str {
    let mut end = url.len();
    loop {
        let current = &url[..end];
        let Some(last) = current.chars().next_back() else {
            break;
        };
        let strip = match last {
            '.' | ',' | ':' | ';' | '!' | '?' | '\'' | '"' | '*' | '_' | '~' => true,
            ')' => current.matches(')').count() > current.matches('(').count(),
            _ => false,
        };
        if !strip {
            break;
        }
        end -= last.len_utf8();
    }
    &url[..end]
}
