//! Message body pipeline for chatter-relay
//!
//! Turns raw composer text into sanitized, link-ified, mention-aware,
//! emoji-rendered HTML:
//! - `sanitize_and_compact`: escape and compact raw input
//! - `resolve_mentions`: `@partner` / `#channel` anchors
//! - `linkify`: bare URLs and emails, skipping existing anchors
//! - `render_emoji`: shortcodes to styled spans
//!
//! [`BodyPipeline`] runs them in the fixed [`BODY_STAGES`] order.

#![forbid(unsafe_code)]

pub mod emoji;
pub mod linkify;
pub mod mentions;
pub mod pipeline;
pub mod sanitize;
mod segments;

pub use emoji::{EMOJI_SHORTCODES, render_emoji};
pub use linkify::{LinkBuilder, add_link, linkify};
pub use mentions::{MentionContext, MentionResolver, RecordMentions};
pub use pipeline::{BODY_STAGES, BodyPipeline, Stage};
pub use sanitize::{clean_body_html, html_escape, sanitize_and_compact};

/// Resolve mentions with the default record resolver.
#[must_use]
pub fn resolve_mentions(body: &str, context: &MentionContext<'_>) -> String {
    RecordMentions::default().resolve_mentions(body, context)
}
