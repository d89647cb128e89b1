//! Bare URL and email detection.
//!
//! Runs over escaped text, so `&amp;` inside a URL is already in attribute-safe
//! form and can be copied into `href` as is.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::segments::map_plain_text;

/// URLs (`http(s)://`, `www.`, dotted-quad hosts) or email addresses.
static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)(?P<url>\b(?:https?://\d{1,3}(?:\.\d{1,3}){3}",
        r"|(?:https?://|www\.)[-a-z0-9@:%._+~#=\x{00C0}-\x{024F}\x{1E00}-\x{1EFF}]{2,256}",
        r"\.[a-z]{2,13})",
        r"\b[-a-z0-9@:%_+.~#?&'$/=;\x{00C0}-\x{024F}\x{1E00}-\x{1EFF}]*)",
        r"|(?P<email>\b[a-z0-9._%+-]+@[a-z0-9-]+(?:\.[a-z0-9-]+)*\.[a-z]{2,}\b)",
    ))
    .expect("link regex")
});

/// Escaped forms of characters that end a URL in unescaped text.
const URL_TERMINATORS: [&str; 3] = ["&lt;", "&gt;", "&quot;"];

/// Builds the anchor markup for a detected link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkBuilder {
    pub target_blank: bool,
}

impl Default for LinkBuilder {
    fn default() -> Self {
        Self { target_blank: true }
    }
}

impl LinkBuilder {
    #[must_use]
    pub fn build(&self, href: &str, text: &str) -> String {
        if self.target_blank {
            format!("<a target=\"_blank\" rel=\"noreferrer noopener\" href=\"{href}\">{text}</a>")
        } else {
            format!("<a href=\"{href}\">{text}</a>")
        }
    }
}

/// Default link builder: opens in a new tab without leaking the referrer.
#[must_use]
pub fn add_link(href: &str, text: &str) -> String {
    LinkBuilder::default().build(href, text)
}

/// Wrap bare links found outside existing anchors with `build(href, text)`.
#[must_use]
pub fn linkify<F>(html: &str, build: F) -> String
where
    F: Fn(&str, &str) -> String,
{
    map_plain_text(html, |text| {
        LINK_PATTERN.replace_all(text, |caps: &Captures<'_>| link_for(caps, &build))
    })
}

fn link_for<F>(caps: &Captures<'_>, build: &F) -> String
where
    F: Fn(&str, &str) -> String,
{
    if let Some(email) = caps.name("email") {
        let address = email.as_str();
        return build(&format!("mailto:{address}"), address);
    }

    let whole = &caps[0];
    let cut = URL_TERMINATORS
        .iter()
        .filter_map(|t| whole.find(t))
        .min()
        .unwrap_or(whole.len());
    let (url, trailing) = whole.split_at(cut);
    if url.is_empty() {
        return whole.to_string();
    }
    let href: Cow<'_, str> = if has_scheme(url) {
        Cow::Borrowed(url)
    } else {
        Cow::Owned(format!("http://{url}"))
    };
    format!("{}{trailing}", build(&href, url))
}

fn has_scheme(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_plain_url() {
        assert_eq!(
            linkify("check http://example.com out", add_link),
            "check <a target=\"_blank\" rel=\"noreferrer noopener\" \
             href=\"http://example.com\">http://example.com</a> out"
        );
    }

    #[test]
    fn www_gets_scheme() {
        let out = linkify("go to www.example.org/path?a=1&amp;b=2 now", add_link);
        assert!(out.contains("href=\"http://www.example.org/path?a=1&amp;b=2\""));
        assert!(out.contains(">www.example.org/path?a=1&amp;b=2</a> now"));
    }

    #[test]
    fn email_gets_mailto() {
        let out = linkify("mail bob@example.com today", add_link);
        assert!(out.contains("href=\"mailto:bob@example.com\""));
        assert!(out.contains(">bob@example.com</a>"));
    }

    #[test]
    fn existing_anchor_untouched() {
        let html = "<a href=\"/web#id=1\">http://inside.example.com</a> and https://outside.io";
        let out = linkify(html, add_link);
        assert!(out.starts_with("<a href=\"/web#id=1\">http://inside.example.com</a>"));
        assert_eq!(out.matches("<a ").count(), 2);
        assert!(out.contains("href=\"https://outside.io\""));
    }

    #[test]
    fn escaped_angle_bracket_ends_url() {
        let out = linkify("&lt;https://example.com&gt;", add_link);
        assert_eq!(
            out,
            "&lt;<a target=\"_blank\" rel=\"noreferrer noopener\" \
             href=\"https://example.com\">https://example.com</a>&gt;"
        );
    }

    #[test]
    fn ip_host_is_linked() {
        let out = linkify("server http://10.0.0.12:8069/web", add_link);
        assert!(out.contains("href=\"http://10.0.0.12:8069/web\""));
    }

    #[test]
    fn custom_builder_is_used() {
        let out = linkify("see https://docs.example.com", |href, text| {
            format!("[{text}]({href})")
        });
        assert_eq!(out, "see [https://docs.example.com](https://docs.example.com)");
    }

    #[test]
    fn same_tab_builder() {
        let builder = LinkBuilder {
            target_blank: false,
        };
        assert_eq!(
            builder.build("https://x.io", "x"),
            "<a href=\"https://x.io\">x</a>"
        );
    }

    #[test]
    fn single_letter_host_is_not_linked() {
        assert_eq!(linkify("see https://x.io", add_link), "see https://x.io");
    }

    #[test]
    fn plain_text_unchanged() {
        assert_eq!(linkify("nothing to see here.", add_link), "nothing to see here.");
    }
}
