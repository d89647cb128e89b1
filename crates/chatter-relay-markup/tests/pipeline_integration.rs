//! End-to-end body rendering through the public API.

use chatter_relay_core::{Channel, Config, Partner};
use chatter_relay_markup::{
    BodyPipeline, MentionContext, MentionResolver, add_link, linkify, render_emoji,
    resolve_mentions, sanitize_and_compact,
};
use proptest::prelude::*;

struct UppercaseMentions;

impl MentionResolver for UppercaseMentions {
    fn resolve_mentions(&self, body: &str, _context: &MentionContext<'_>) -> String {
        body.replace("@bot", "<a href=\"https://bot.example.com\">@BOT</a>")
    }
}

#[test]
fn primitives_compose_in_documented_order() {
    let partners = [Partner::new(11, "Maria")];
    let channels = [Channel {
        id: 3,
        name: "sales".to_string(),
    }];
    let context = MentionContext::new(&partners, &channels);

    let escaped = sanitize_and_compact("@Maria see #sales :fire:\nhttps://crm.example.com");
    let body = render_emoji(&linkify(&resolve_mentions(&escaped, &context), add_link));

    assert!(body.contains("data-oe-id=\"11\""));
    assert!(body.contains("data-oe-id=\"3\""));
    assert!(body.contains("🔥</span><br/><a target=\"_blank\""));
    assert!(body.contains("href=\"https://crm.example.com\""));
}

#[test]
fn custom_resolver_output_is_not_relinked() {
    let pipeline = BodyPipeline::with_resolver(&Config::default(), UppercaseMentions);
    let body = pipeline.render("ask @bot", &MentionContext::default());
    assert_eq!(body.matches("<a ").count(), 1);
    assert!(body.contains(">@BOT</a>"));
}

#[test]
fn same_tab_links_when_configured() {
    let config = Config {
        link_target_blank: false,
        ..Config::default()
    };
    let body = BodyPipeline::from_config(&config)
        .render("https://docs.example.com", &MentionContext::default());
    assert_eq!(
        body,
        "<a href=\"https://docs.example.com\">https://docs.example.com</a>"
    );
}

#[test]
fn mention_base_url_from_config() {
    let config = Config {
        record_url_base: "https://erp.example.com/web".to_string(),
        ..Config::default()
    };
    let partners = [Partner::new(2, "Li")];
    let body = BodyPipeline::from_config(&config)
        .render("@Li", &MentionContext::new(&partners, &[]));
    assert!(body.contains("href=\"https://erp.example.com/web#model=res.partner&amp;id=2\""));
}

proptest! {
    #[test]
    fn rendering_is_deterministic_and_escapes_markup(raw in "[ a-z<>&\"'@:)\\n]{0,64}") {
        let pipeline = BodyPipeline::default();
        let first = pipeline.render(&raw, &MentionContext::default());
        let second = pipeline.render(&raw, &MentionContext::default());
        prop_assert_eq!(&first, &second);
        // Only pipeline-emitted tags may appear.
        for (idx, _) in first.match_indices('<') {
            let tail = &first[idx..];
            prop_assert!(
                tail.starts_with("<br>")
                    || tail.starts_with("<span")
                    || tail.starts_with("</span>"),
                "unexpected markup in {}", first
            );
        }
    }
}
