//! Data models for chatter-relay
//!
//! Records owned by the host (partners, channels, attachments) are mirrored as
//! plain value types. The payloads produced by the composer serialize to the
//! exact key layout the host's RPC and action layers expect.

use serde::{Deserialize, Serialize};

// =============================================================================
// Host records
// =============================================================================

/// An internal contact record that can receive messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
}

impl Partner {
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: None,
        }
    }
}

/// A discussion channel that can be referenced with `#name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: i64,
    pub name: String,
}

/// An uploaded file linked to the composer. Upload itself is the host's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: i64,
    pub name: String,
    pub mimetype: String,
}

impl Attachment {
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            mimetype: "application/octet-stream".to_string(),
        }
    }
}

// =============================================================================
// Message payload
// =============================================================================

/// Message kind accepted by the host's posting endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    #[default]
    Comment,
    Notification,
    Email,
    /// Reserved for direct notifications; posting one on a record is rejected.
    UserNotification,
}

impl MessageType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::Notification => "notification",
            Self::Email => "email",
            Self::UserNotification => "user_notification",
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outbound payload for the "post comment" operation.
///
/// `checkbox` is only serialized when the send-by-email toggle was rendered;
/// an absent key and `false` mean different things to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    pub attachment_ids: Vec<i64>,
    pub body: String,
    pub message_type: MessageType,
    pub partner_ids: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkbox: Option<bool>,
}

// =============================================================================
// Send-by-email toggle
// =============================================================================

/// Snapshot of the optional "send by email" toggle next to the composer.
///
/// The label carries the address the toggle refers to, e.g.
/// `"alice@example.com (guest)"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleState {
    pub present: bool,
    pub checked: bool,
    pub label: String,
}

impl ToggleState {
    /// The toggle is not rendered at all.
    #[must_use]
    pub fn absent() -> Self {
        Self::default()
    }

    /// The toggle is rendered with the given checked state and label text.
    #[must_use]
    pub fn rendered(checked: bool, label: impl Into<String>) -> Self {
        Self {
            present: true,
            checked,
            label: label.into(),
        }
    }

    /// Checked state when the toggle exists, `None` otherwise.
    #[must_use]
    pub const fn checked_if_present(&self) -> Option<bool> {
        if self.present {
            Some(self.checked)
        } else {
            None
        }
    }

    /// First whitespace-delimited token of the label.
    #[must_use]
    pub fn label_address(&self) -> &str {
        self.label.split_whitespace().next().unwrap_or_default()
    }
}

// =============================================================================
// Full composer handoff
// =============================================================================

/// Addressing strategy for the full composer dialog.
///
/// `Unset` is a real third state: the toggle exists but is unchecked, and the
/// dialog keeps its own default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientMode {
    /// Route to existing partner records.
    Partner,
    /// Route to a free-text email address.
    Email(String),
    Unset,
}

impl RecipientMode {
    /// Value of the dialog's `is_partner` default, `None` when unset.
    #[must_use]
    pub const fn is_partner(&self) -> Option<bool> {
        match self {
            Self::Partner => Some(true),
            Self::Email(_) => Some(false),
            Self::Unset => None,
        }
    }

    /// Short name of the mode, safe to log (never includes the address).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Partner => "partner",
            Self::Email(_) => "email",
            Self::Unset => "unset",
        }
    }

    /// Address for the dialog's `email_to` default; empty unless email mode.
    #[must_use]
    pub fn email_to(&self) -> &str {
        match self {
            Self::Email(address) => address,
            Self::Partner | Self::Unset => "",
        }
    }
}

/// Default values handed to the full composer dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogContext {
    pub default_attachment_ids: Vec<i64>,
    pub default_body: String,
    pub default_is_log: bool,
    pub default_model: String,
    pub default_partner_ids: Vec<i64>,
    pub default_res_id: i64,
    pub mail_post_autofollow: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_is_partner: Option<bool>,
    pub default_email_to: String,
}

impl DialogContext {
    /// Recover the addressing mode encoded in the context.
    #[must_use]
    pub fn recipient_mode(&self) -> RecipientMode {
        match self.default_is_partner {
            Some(true) => RecipientMode::Partner,
            Some(false) => RecipientMode::Email(self.default_email_to.clone()),
            None => RecipientMode::Unset,
        }
    }
}

// =============================================================================
// Direct email plan
// =============================================================================

/// Delivery bookkeeping row for a planned email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailNotification {
    pub res_partner_id: i64,
    pub notification_type: String,
    pub notification_status: String,
    pub is_read: bool,
}

/// An email the host should queue. Nothing in this workspace sends it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMail {
    pub mail_message_id: i64,
    pub email_to: String,
    pub subject: String,
    pub body_html: String,
    pub message_type: MessageType,
    pub is_notification: bool,
    pub references: Option<String>,
    pub notification: Option<MailNotification>,
}
