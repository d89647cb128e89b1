//! Handoff to the full composer dialog.
//!
//! The dialog is opened through the host's action bus with defaults taken from
//! the composer. When it closes, the composer is reset and its thread reloads,
//! unless the composer was destroyed in the meantime.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use chatter_relay_core::{
    Config, DialogContext, RecipientMode, RelayError, RelayResult, ToggleState,
};
use chatter_relay_markup::sanitize_and_compact;
use serde::{Serialize, Serializer};

use crate::composer::{Composer, ComposerHandle};

/// Bus event that asks the host to run an action.
pub const DO_ACTION_EVENT: &str = "do-action";
/// Action type tag for opening a record view in a window.
pub const WINDOW_ACTION_TYPE: &str = "ir.actions.act_window";

/// Host action dispatcher.
///
/// `trigger` completes once the host has accepted the request, not when the
/// resulting dialog closes.
#[allow(async_fn_in_trait)]
pub trait ActionBus {
    async fn trigger(&self, event: &str, request: ActionRequest) -> RelayResult<()>;
}

/// View reference inside an action's `views` list.
///
/// The host expects `false` for "use the default view", not `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewId {
    Default,
    Id(i64),
}

impl Serialize for ViewId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Default => serializer.serialize_bool(false),
            Self::Id(id) => serializer.serialize_i64(*id),
        }
    }
}

/// Window action opening a form view as a new overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowAction {
    #[serde(rename = "type")]
    pub action_type: String,
    pub res_model: String,
    pub view_mode: String,
    /// `(view id, view type)` pairs.
    pub views: Vec<(ViewId, String)>,
    pub target: String,
    pub context: DialogContext,
}

impl WindowAction {
    #[must_use]
    pub fn form_overlay(res_model: &str, context: DialogContext) -> Self {
        Self {
            action_type: WINDOW_ACTION_TYPE.to_string(),
            res_model: res_model.to_string(),
            view_mode: "form".to_string(),
            views: vec![(ViewId::Default, "form".to_string())],
            target: "new".to_string(),
            context,
        }
    }
}

/// Runs once when the dialog closes. Consumed on invocation.
pub struct CloseCallback(Box<dyn FnOnce()>);

impl CloseCallback {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Box::new(f))
    }

    pub fn invoke(self) {
        (self.0)();
    }
}

impl fmt::Debug for CloseCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CloseCallback")
    }
}

#[derive(Debug, Default)]
pub struct ActionOptions {
    pub on_close: Option<CloseCallback>,
}

#[derive(Debug)]
pub struct ActionRequest {
    pub action: WindowAction,
    pub options: ActionOptions,
}

/// Decide how the dialog addresses the message.
///
/// | toggle    | checked | recipients | mode    |
/// |-----------|---------|------------|---------|
/// | absent    | -       | -          | partner |
/// | rendered  | no      | any        | unset   |
/// | rendered  | yes     | > 0        | partner |
/// | rendered  | yes     | 0          | email   |
#[must_use]
pub fn resolve_recipient_mode(toggle: &ToggleState, recipient_count: usize) -> RecipientMode {
    if !toggle.present {
        return RecipientMode::Partner;
    }
    match (toggle.checked, recipient_count) {
        (false, _) => RecipientMode::Unset,
        (true, 0) => RecipientMode::Email(toggle.label_address().to_string()),
        (true, _) => RecipientMode::Partner,
    }
}

/// Dialog defaults for the composer's current state.
pub fn build_dialog_context(
    composer: &Composer,
    toggle: &ToggleState,
) -> RelayResult<DialogContext> {
    let Some(thread) = composer.active_thread.as_ref() else {
        return Err(RelayError::MissingField("active_thread".to_string()));
    };
    let mode = resolve_recipient_mode(toggle, composer.recipients.len());
    Ok(DialogContext {
        default_attachment_ids: composer.attachment_ids(),
        default_body: sanitize_and_compact(&composer.text_input_content),
        default_is_log: composer.is_log,
        default_model: thread.model().to_string(),
        default_partner_ids: composer.partner_ids(),
        default_res_id: thread.id(),
        mail_post_autofollow: true,
        default_is_partner: mode.is_partner(),
        default_email_to: mode.email_to().to_string(),
    })
}

/// Close callback that resets the composer and reloads its thread.
///
/// Holds only a weak reference: a composer destroyed while the dialog was open
/// turns the callback into a no-op.
#[must_use]
pub fn refresh_on_close(composer: Weak<RefCell<Composer>>) -> CloseCallback {
    CloseCallback::new(move || {
        let Some(composer) = composer.upgrade() else {
            tracing::debug!("composer gone before dialog closed; skipping refresh");
            return;
        };
        let thread = {
            let Ok(mut guard) = composer.try_borrow_mut() else {
                tracing::warn!("composer busy when dialog closed; skipping refresh");
                return;
            };
            guard.reset();
            guard.active_thread.clone()
        };
        if let Some(thread) = thread {
            thread.load_new_messages();
        }
    })
}

/// Open the full composer dialog for `composer`.
///
/// Returns once the bus has accepted the request. Bus errors are returned
/// unchanged.
pub async fn open_full_composer<B: ActionBus>(
    composer: &ComposerHandle,
    toggle: &ToggleState,
    bus: &B,
    config: &Config,
) -> RelayResult<()> {
    let context = build_dialog_context(&composer.borrow(), toggle)?;
    let mode = context.recipient_mode();
    tracing::info!(
        res_model = %config.compose_model,
        thread_model = %context.default_model,
        thread_id = context.default_res_id,
        mode = mode.as_str(),
        "opening full composer"
    );

    let request = ActionRequest {
        action: WindowAction::form_overlay(&config.compose_model, context),
        options: ActionOptions {
            on_close: Some(refresh_on_close(Rc::downgrade(composer))),
        },
    };
    bus.trigger(DO_ACTION_EVENT, request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatter_relay_core::Partner;

    #[test]
    fn mode_table() {
        let absent = ToggleState::absent();
        let unchecked = ToggleState::rendered(false, "a@b.io");
        let checked = ToggleState::rendered(true, "a@b.io (guest)");

        assert_eq!(resolve_recipient_mode(&absent, 0), RecipientMode::Partner);
        assert_eq!(resolve_recipient_mode(&absent, 3), RecipientMode::Partner);
        assert_eq!(resolve_recipient_mode(&unchecked, 0), RecipientMode::Unset);
        assert_eq!(resolve_recipient_mode(&unchecked, 2), RecipientMode::Unset);
        assert_eq!(resolve_recipient_mode(&checked, 1), RecipientMode::Partner);
        assert_eq!(
            resolve_recipient_mode(&checked, 0),
            RecipientMode::Email("a@b.io".to_string())
        );
    }

    #[test]
    fn context_requires_thread() {
        let err = build_dialog_context(&Composer::default(), &ToggleState::absent()).unwrap_err();
        assert_eq!(err.error_type(), "MISSING_FIELD");
    }

    #[test]
    fn window_action_shape() {
        let ctx = DialogContext {
            default_attachment_ids: vec![],
            default_body: String::new(),
            default_is_log: false,
            default_model: "crm.lead".into(),
            default_partner_ids: vec![Partner::new(1, "x").id],
            default_res_id: 3,
            mail_post_autofollow: true,
            default_is_partner: Some(true),
            default_email_to: String::new(),
        };
        let json = serde_json::to_value(WindowAction::form_overlay("mail.compose.message", ctx))
            .unwrap();
        assert_eq!(json["type"], "ir.actions.act_window");
        assert_eq!(json["res_model"], "mail.compose.message");
        assert_eq!(json["view_mode"], "form");
        assert_eq!(json["views"], serde_json::json!([[false, "form"]]));
        assert_eq!(json["target"], "new");
        assert_eq!(json["context"]["default_res_id"], 3);
    }

    #[test]
    fn explicit_view_id_serializes_as_number() {
        let json = serde_json::to_value(vec![(ViewId::Id(42), "form")]).unwrap();
        assert_eq!(json, serde_json::json!([[42, "form"]]));
    }

    #[test]
    fn close_callback_runs_at_most_once_by_type() {
        let hits = Rc::new(std::cell::Cell::new(0));
        let counter = Rc::clone(&hits);
        let cb = CloseCallback::new(move || counter.set(counter.get() + 1));
        cb.invoke();
        assert_eq!(hits.get(), 1);
    }
}
