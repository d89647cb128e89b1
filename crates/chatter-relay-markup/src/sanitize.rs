//! Input escaping and the final HTML allowlist for message bodies.
//!
//! Raw composer input is plain text. It is escaped and compacted into a small
//! HTML fragment (text plus `<br/>`) before any enrichment runs, and the
//! enriched result goes through `ammonia` restricted to the markup the
//! pipeline itself emits.

use std::collections::HashSet;
use std::sync::LazyLock;

use ammonia::Builder;
use regex::Regex;

/// Non-breaking space markup produced by rich editors (`&nbsp;`, `&#160;`, `&#xa0;`).
static NBSP_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)&(?:nbsp|#160|#xa0);").expect("nbsp entity regex"));

/// Two or more consecutive newlines become a paragraph break.
static MULTI_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}").expect("multi-newline regex"));

static BODY_SANITIZER: LazyLock<Builder<'static>> = LazyLock::new(|| {
    let mut b = Builder::new();
    // Links carry their own `rel`; ammonia must not rewrite it.
    b.link_rel(None);

    b.tags(
        ["a", "br", "span"]
            .into_iter()
            .collect::<HashSet<&'static str>>(),
    );

    b.clean_content_tags(["script", "style"].into_iter().collect::<HashSet<_>>());

    b.add_generic_attributes(&["class"]);

    b.add_tag_attributes(
        "a",
        &["href", "target", "rel", "title", "data-oe-id", "data-oe-model"],
    );
    b.add_tag_attributes("span", &["title"]);

    b.url_schemes(
        ["http", "https", "mailto"]
            .into_iter()
            .collect::<HashSet<_>>(),
    );

    b
});

/// Escape the five HTML-significant characters.
#[must_use]
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Turn raw composer input into an escaped, compact HTML fragment.
///
/// Non-breaking spaces (entity or U+00A0) become plain spaces, line endings are
/// normalized, outer whitespace is trimmed, and newlines become `<br/>` with
/// runs of blank lines collapsed to a single paragraph break.
#[must_use]
pub fn sanitize_and_compact(raw: &str) -> String {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let normalized = NBSP_ENTITY
        .replace_all(&normalized, " ")
        .replace('\u{a0}', " ");
    let escaped = html_escape(normalized.trim());
    MULTI_NEWLINE
        .replace_all(&escaped, "<br/><br/>")
        .replace('\n', "<br/>")
}

/// Strip everything the body pipeline does not emit itself.
#[must_use]
pub fn clean_body_html(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    BODY_SANITIZER.clean(html).to_string()
}
