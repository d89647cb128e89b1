//! Emoji shortcode rendering.
//!
//! A shortcode is only replaced when it stands alone between whitespace (or
//! the edges of a text run), so `http://x.io/:)` or `a:)` stay untouched.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::sanitize::html_escape;
use crate::segments::map_plain_text;

/// Shortcode → emoji. Shortcodes are matched in their escaped form.
pub const EMOJI_SHORTCODES: &[(&str, &str)] = &[
    (":)", "😊"),
    (":-)", "😊"),
    (":(", "😞"),
    (":-(", "😞"),
    (":D", "😁"),
    (":-D", "😁"),
    (";)", "😉"),
    (";-)", "😉"),
    (":P", "😛"),
    (":-P", "😛"),
    (":O", "😮"),
    (":'(", "😢"),
    ("<3", "❤️"),
    (":smile:", "😄"),
    (":joy:", "😂"),
    (":wink:", "😉"),
    (":heart:", "❤️"),
    (":thumbsup:", "👍"),
    (":+1:", "👍"),
    (":thumbsdown:", "👎"),
    (":-1:", "👎"),
    (":ok_hand:", "👌"),
    (":clap:", "👏"),
    (":wave:", "👋"),
    (":pray:", "🙏"),
    (":fire:", "🔥"),
    (":tada:", "🎉"),
    (":rocket:", "🚀"),
    (":eyes:", "👀"),
    (":thinking:", "🤔"),
    (":100:", "💯"),
    (":check:", "✅"),
    (":warning:", "⚠️"),
];

static SHORTCODE_LOOKUP: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    let mut map = HashMap::with_capacity(EMOJI_SHORTCODES.len() * 2);
    for (code, emoji) in EMOJI_SHORTCODES {
        map.entry(html_escape(code)).or_insert(*emoji);
        map.entry((*emoji).to_string()).or_insert(*emoji);
    }
    map
});

static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").expect("token regex"));

fn emoji_span(source: &str, emoji: &str) -> String {
    format!("<span class=\"o_mail_emoji\" title=\"{source}\">{emoji}</span>")
}

fn render_run(text: &str) -> Cow<'_, str> {
    let mut out: Option<String> = None;
    let mut last = 0;
    for token in TOKEN.find_iter(text) {
        let Some(emoji) = SHORTCODE_LOOKUP.get(token.as_str()) else {
            continue;
        };
        let buf = out.get_or_insert_with(|| String::with_capacity(text.len() + 64));
        buf.push_str(&text[last..token.start()]);
        buf.push_str(&emoji_span(token.as_str(), emoji));
        last = token.end();
    }
    match out {
        Some(mut buf) => {
            buf.push_str(&text[last..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(text),
    }
}

/// Replace standalone shortcodes and emoji outside anchors with styled spans.
#[must_use]
pub fn render_emoji(html: &str) -> String {
    map_plain_text(html, render_run)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standalone_shortcode_is_rendered() {
        assert_eq!(
            render_emoji("nice :)"),
            "nice <span class=\"o_mail_emoji\" title=\":)\">😊</span>"
        );
    }

    #[test]
    fn escaped_shortcode_is_rendered() {
        let out = render_emoji("love &lt;3");
        assert!(out.contains("title=\"&lt;3\">❤️</span>"));
    }

    #[test]
    fn embedded_shortcode_is_ignored() {
        assert_eq!(render_emoji("a:) b:smile:"), "a:) b:smile:");
    }

    #[test]
    fn run_edges_count_as_boundaries() {
        let out = render_emoji(":tada:<br/>:rocket:");
        assert!(out.starts_with("<span class=\"o_mail_emoji\" title=\":tada:\">🎉</span><br/>"));
        assert!(out.ends_with("title=\":rocket:\">🚀</span>"));
    }

    #[test]
    fn anchors_are_skipped() {
        let html = "<a href=\"x\">:)</a> :)";
        let out = render_emoji(html);
        assert!(out.starts_with("<a href=\"x\">:)</a> <span"));
    }

    #[test]
    fn bare_emoji_gets_wrapped() {
        assert_eq!(
            render_emoji("🔥"),
            "<span class=\"o_mail_emoji\" title=\"🔥\">🔥</span>"
        );
    }

    #[test]
    fn text_without_shortcodes_is_borrowed() {
        assert!(matches!(render_run("plain words"), Cow::Borrowed(_)));
    }
}
