//! The ordered body pipeline.
//!
//! Raw text is escaped first, then enriched stage by stage, then cleaned.
//! Mentions must run before linkify: linkify skips anchor content, which is
//! what keeps mention anchors from being wrapped a second time.

use chatter_relay_core::Config;

use crate::emoji::render_emoji;
use crate::linkify::{LinkBuilder, linkify};
use crate::mentions::{MentionContext, MentionResolver, RecordMentions};
use crate::sanitize::{clean_body_html, sanitize_and_compact};

/// One enrichment pass over the escaped body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Mentions,
    Linkify,
    Emoji,
}

/// Stage order for outgoing message bodies.
pub const BODY_STAGES: [Stage; 3] = [Stage::Mentions, Stage::Linkify, Stage::Emoji];

/// Renders composer input into a message body.
#[derive(Debug, Clone)]
pub struct BodyPipeline<R = RecordMentions> {
    resolver: R,
    links: LinkBuilder,
    emoji_enabled: bool,
}

impl BodyPipeline<RecordMentions> {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::with_resolver(config, RecordMentions::from_config(config))
    }
}

impl Default for BodyPipeline<RecordMentions> {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl<R: MentionResolver> BodyPipeline<R> {
    #[must_use]
    pub fn with_resolver(config: &Config, resolver: R) -> Self {
        Self {
            resolver,
            links: LinkBuilder {
                target_blank: config.link_target_blank,
            },
            emoji_enabled: config.emoji_enabled,
        }
    }

    /// Stages this pipeline will run, in order.
    pub fn stages(&self) -> impl Iterator<Item = Stage> + '_ {
        BODY_STAGES
            .into_iter()
            .filter(|stage| *stage != Stage::Emoji || self.emoji_enabled)
    }

    fn apply(&self, stage: Stage, body: &str, mentions: &MentionContext<'_>) -> String {
        match stage {
            Stage::Mentions => self.resolver.resolve_mentions(body, mentions),
            Stage::Linkify => linkify(body, |href, text| self.links.build(href, text)),
            Stage::Emoji => render_emoji(body),
        }
    }

    /// Full body rendering: escape, enrich, clean. Empty input gives an empty body.
    #[must_use]
    pub fn render(&self, raw: &str, mentions: &MentionContext<'_>) -> String {
        let mut body = sanitize_and_compact(raw);
        if body.is_empty() {
            return body;
        }
        for stage in self.stages() {
            body = self.apply(stage, &body, mentions);
            tracing::trace!(?stage, len = body.len(), "body stage applied");
        }
        clean_body_html(&body)
    }
}
