//! Splitting a body fragment into markup and text runs.
//!
//! Enrichment stages only ever rewrite text that sits outside an `<a>` element,
//! so anchors produced by an earlier stage are never touched again.

use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Markup(&'a str),
    Text { text: &'a str, in_anchor: bool },
}

/// Iterate over the tag and text runs of `html`, tracking `<a>` nesting.
///
/// An unterminated `<` is treated as text; escaped input never contains one.
pub(crate) fn segments(html: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut anchor_depth = 0usize;
    let mut rest = html;

    while !rest.is_empty() {
        let Some(open) = rest.find('<') else {
            out.push(Segment::Text {
                text: rest,
                in_anchor: anchor_depth > 0,
            });
            break;
        };
        if open > 0 {
            out.push(Segment::Text {
                text: &rest[..open],
                in_anchor: anchor_depth > 0,
            });
        }
        let tail = &rest[open..];
        let Some(close) = tail.find('>') else {
            out.push(Segment::Text {
                text: tail,
                in_anchor: anchor_depth > 0,
            });
            break;
        };
        let tag = &tail[..=close];
        if is_anchor_open(tag) {
            anchor_depth += 1;
        } else if is_anchor_close(tag) {
            anchor_depth = anchor_depth.saturating_sub(1);
        }
        out.push(Segment::Markup(tag));
        rest = &tail[close + 1..];
    }
    out
}

/// Rewrite every text run outside anchors with `f`, leaving markup untouched.
pub(crate) fn map_plain_text<F>(html: &str, mut f: F) -> String
where
    F: FnMut(&str) -> Cow<'_, str>,
{
    let mut out = String::with_capacity(html.len());
    for segment in segments(html) {
        match segment {
            Segment::Markup(tag) => out.push_str(tag),
            Segment::Text {
                text,
                in_anchor: true,
            } => out.push_str(text),
            Segment::Text {
                text,
                in_anchor: false,
            } => out.push_str(&f(text)),
        }
    }
    out
}

fn tag_name(tag: &str) -> &str {
    let inner = tag.trim_start_matches('<').trim_start_matches('/');
    let end = inner
        .find(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/')
        .unwrap_or(inner.len());
    &inner[..end]
}

fn is_anchor_open(tag: &str) -> bool {
    !tag.starts_with("</") && tag_name(tag).eq_ignore_ascii_case("a")
}

fn is_anchor_close(tag: &str) -> bool {
    tag.starts_with("</") && tag_name(tag).eq_ignore_ascii_case("a")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_tags_and_text() {
        let parts = segments("a<br/>b");
        assert_eq!(
            parts,
            vec![
                Segment::Text {
                    text: "a",
                    in_anchor: false
                },
                Segment::Markup("<br/>"),
                Segment::Text {
                    text: "b",
                    in_anchor: false
                },
            ]
        );
    }

    #[test]
    fn tracks_anchor_nesting() {
        let parts = segments("x<a href=\"y\">in</a>out");
        assert!(parts.contains(&Segment::Text {
            text: "in",
            in_anchor: true
        }));
        assert!(parts.contains(&Segment::Text {
            text: "out",
            in_anchor: false
        }));
    }

    #[test]
    fn abbr_is_not_an_anchor() {
        let parts = segments("<abbr>t</abbr>");
        assert!(parts.contains(&Segment::Text {
            text: "t",
            in_anchor: false
        }));
    }

    #[test]
    fn unterminated_tag_is_text() {
        let out = map_plain_text("a <b", |t| Cow::Owned(t.to_uppercase()));
        assert_eq!(out, "A <B");
    }

    #[test]
    fn map_skips_anchor_text() {
        let out = map_plain_text("x<a>y</a>z", |t| Cow::Owned(t.to_uppercase()));
        assert_eq!(out, "X<a>y</a>Z");
    }
}
