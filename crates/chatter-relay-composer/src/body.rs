//! Payload assembly for the "post comment" operation.

use chatter_relay_core::{MessagePayload, MessageType, ToggleState};
use chatter_relay_markup::{BodyPipeline, MentionResolver};

use crate::composer::Composer;

/// Build the outbound payload from the composer's current state.
///
/// Ids are projected from the composer on every call. `checkbox` is set only
/// when the send-by-email toggle is rendered.
#[must_use]
pub fn build_message_payload<R: MentionResolver>(
    composer: &Composer,
    toggle: &ToggleState,
    pipeline: &BodyPipeline<R>,
) -> MessagePayload {
    let body = pipeline.render(&composer.text_input_content, &composer.mention_context());
    let payload = MessagePayload {
        attachment_ids: composer.attachment_ids(),
        body,
        message_type: MessageType::Comment,
        partner_ids: composer.partner_ids(),
        checkbox: toggle.checked_if_present(),
    };
    tracing::debug!(
        attachments = payload.attachment_ids.len(),
        partners = payload.partner_ids.len(),
        checkbox = ?payload.checkbox,
        "built message payload"
    );
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatter_relay_core::{Attachment, Partner};

    fn composer() -> Composer {
        let mut composer = Composer::default();
        composer.text_input_content = "  hello @Ann :)  ".into();
        composer.attachments = vec![Attachment::new(9, "b.png"), Attachment::new(4, "a.png")];
        composer.recipients = vec![Partner::new(30, "Zed"), Partner::new(2, "Ann")];
        composer.mentioned_partners = vec![Partner::new(2, "Ann")];
        composer
    }

    #[test]
    fn ids_keep_composer_order() {
        let payload =
            build_message_payload(&composer(), &ToggleState::absent(), &BodyPipeline::default());
        assert_eq!(payload.attachment_ids, vec![9, 4]);
        assert_eq!(payload.partner_ids, vec![30, 2]);
        assert_eq!(payload.message_type, MessageType::Comment);
    }

    #[test]
    fn checkbox_absent_without_toggle() {
        let payload =
            build_message_payload(&composer(), &ToggleState::absent(), &BodyPipeline::default());
        assert_eq!(payload.checkbox, None);
    }

    #[test]
    fn checkbox_reflects_rendered_toggle() {
        let pipeline = BodyPipeline::default();
        let on = build_message_payload(&composer(), &ToggleState::rendered(true, "x"), &pipeline);
        let off = build_message_payload(&composer(), &ToggleState::rendered(false, "x"), &pipeline);
        assert_eq!(on.checkbox, Some(true));
        assert_eq!(off.checkbox, Some(false));
    }

    #[test]
    fn body_runs_full_pipeline() {
        let payload =
            build_message_payload(&composer(), &ToggleState::absent(), &BodyPipeline::default());
        assert!(payload.body.starts_with("hello <a "));
        assert!(payload.body.contains("data-oe-id=\"2\""));
        assert!(payload.body.ends_with("😊</span>"));
    }

    #[test]
    fn empty_composer_gives_empty_body() {
        let payload = build_message_payload(
            &Composer::default(),
            &ToggleState::absent(),
            &BodyPipeline::default(),
        );
        assert_eq!(payload.body, "");
        assert!(payload.attachment_ids.is_empty());
        assert!(payload.partner_ids.is_empty());
    }
}
