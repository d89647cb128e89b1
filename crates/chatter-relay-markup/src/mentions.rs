//! `@partner` and `#channel` mention links.

use std::collections::{HashMap, HashSet};

use chatter_relay_core::{Channel, Config, Partner};
use regex::Regex;

use crate::sanitize::html_escape;
use crate::segments::map_plain_text;

/// Records the user picked from the mention suggestions while typing.
#[derive(Debug, Clone, Copy, Default)]
pub struct MentionContext<'a> {
    pub partners: &'a [Partner],
    pub channels: &'a [Channel],
}

impl<'a> MentionContext<'a> {
    #[must_use]
    pub const fn new(partners: &'a [Partner], channels: &'a [Channel]) -> Self {
        Self { partners, channels }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.partners.is_empty() && self.channels.is_empty()
    }
}

/// Turns mention markers in an escaped body into anchors.
pub trait MentionResolver {
    fn resolve_mentions(&self, body: &str, context: &MentionContext<'_>) -> String;
}

/// Default resolver: links each mention to the record's backend URL.
#[derive(Debug, Clone)]
pub struct RecordMentions {
    partner_model: String,
    channel_model: String,
    record_url_base: String,
}

impl RecordMentions {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            partner_model: config.partner_model.clone(),
            channel_model: config.channel_model.clone(),
            record_url_base: config.record_url_base.clone(),
        }
    }

    fn anchor(&self, target: &MentionTarget) -> String {
        let (model, class) = match target.kind {
            MentionKind::Partner => (&self.partner_model, "o_mail_redirect"),
            MentionKind::Channel => (&self.channel_model, "o_channel_redirect"),
        };
        let model = html_escape(model);
        format!(
            "<a href=\"{base}#model={model}&amp;id={id}\" class=\"{class}\" \
             data-oe-id=\"{id}\" data-oe-model=\"{model}\" target=\"_blank\">{text}</a>",
            base = html_escape(&self.record_url_base),
            id = target.id,
            text = target.text,
        )
    }
}

impl Default for RecordMentions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[derive(Debug, Clone, Copy)]
enum MentionKind {
    Partner,
    Channel,
}

struct MentionTarget {
    kind: MentionKind,
    id: i64,
    /// Escaped marker text as it appears in the body, e.g. `@Ann`.
    text: String,
}

impl MentionResolver for RecordMentions {
    fn resolve_mentions(&self, body: &str, context: &MentionContext<'_>) -> String {
        if context.is_empty() || body.is_empty() {
            return body.to_string();
        }

        let mut targets: HashMap<String, MentionTarget> = HashMap::new();
        let partners = context.partners.iter().map(|p| (MentionKind::Partner, p.id, '@', &p.name));
        let channels = context.channels.iter().map(|c| (MentionKind::Channel, c.id, '#', &c.name));
        for (kind, id, marker, name) in partners.chain(channels) {
            if name.trim().is_empty() {
                continue;
            }
            let text = format!("{marker}{}", html_escape(name));
            targets.entry(text.clone()).or_insert(MentionTarget {
                kind,
                id,
                text,
            });
        }
        if targets.is_empty() {
            return body.to_string();
        }

        // Longest marker first so `@Anna` is not swallowed by `@Ann`.
        let mut markers: Vec<&str> = targets.keys().map(String::as_str).collect();
        markers.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let alternation = markers
            .iter()
            .map(|m| regex::escape(m))
            .collect::<Vec<_>>()
            .join("|");
        let Ok(pattern) = Regex::new(&alternation) else {
            tracing::warn!(count = markers.len(), "mention pattern rejected; body left as is");
            return body.to_string();
        };

        // Only the first occurrence of each mention becomes a link.
        let mut linked: HashSet<&str> = HashSet::new();
        let out = map_plain_text(body, |text| {
            pattern.replace_all(text, |caps: &regex::Captures<'_>| {
                match targets.get_key_value(&caps[0]) {
                    Some((marker, target)) if linked.insert(marker.as_str()) => {
                        self.anchor(target)
                    }
                    _ => caps[0].to_string(),
                }
            })
        });
        tracing::debug!(linked = linked.len(), "resolved mentions");
        out
    }
}
