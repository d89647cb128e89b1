//! Chatter composer core
//!
//! Two entry points for the composer next to a record's message thread:
//! - [`ComposerView::message_data`]: the payload for a quick "post comment"
//! - [`ComposerView::open_full_composer`]: hand the draft to the full dialog
//!
//! [`post`] and [`routing`] cover what the server does with a posted message.

#![forbid(unsafe_code)]

pub mod body;
pub mod composer;
pub mod handoff;
pub mod post;
pub mod routing;

pub use body::build_message_payload;
pub use composer::{Composer, ComposerHandle, MessageThread, composer_exists};
pub use handoff::{
    ActionBus, ActionOptions, ActionRequest, CloseCallback, DO_ACTION_EVENT, ViewId,
    WINDOW_ACTION_TYPE, WindowAction, build_dialog_context, open_full_composer, refresh_on_close,
    resolve_recipient_mode,
};
pub use post::{ALLOWED_POST_PARAMS, PostParams, PostRequest};
pub use routing::{LeadRecord, PostedMessage, RecordRef, plan_direct_emails};

use chatter_relay_core::{Config, MessagePayload, RelayResult, ToggleState};
use chatter_relay_markup::{BodyPipeline, MentionResolver, RecordMentions};

/// A composer bound to its body pipeline and configuration.
pub struct ComposerView<R: MentionResolver = RecordMentions> {
    pub composer: ComposerHandle,
    pipeline: BodyPipeline<R>,
    config: Config,
}

impl ComposerView<RecordMentions> {
    #[must_use]
    pub fn new(composer: ComposerHandle, config: Config) -> Self {
        Self {
            pipeline: BodyPipeline::from_config(&config),
            composer,
            config,
        }
    }

    /// Bind `composer` to the process-wide configuration.
    #[must_use]
    pub fn from_env(composer: ComposerHandle) -> Self {
        Self::new(composer, Config::get())
    }
}

impl<R: MentionResolver> ComposerView<R> {
    #[must_use]
    pub fn with_resolver(composer: ComposerHandle, config: Config, resolver: R) -> Self {
        Self {
            pipeline: BodyPipeline::with_resolver(&config, resolver),
            composer,
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Payload for posting the current draft.
    #[must_use]
    pub fn message_data(&self, toggle: &ToggleState) -> MessagePayload {
        build_message_payload(&self.composer.borrow(), toggle, &self.pipeline)
    }

    /// Open the full composer dialog with the current draft.
    pub async fn open_full_composer<B: ActionBus>(
        &self,
        toggle: &ToggleState,
        bus: &B,
    ) -> RelayResult<()> {
        handoff::open_full_composer(&self.composer, toggle, bus, &self.config).await
    }
}

impl<R: MentionResolver> std::fmt::Debug for ComposerView<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComposerView")
            .field("composer", &self.composer)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
