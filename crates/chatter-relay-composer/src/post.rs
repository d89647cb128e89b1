//! Server-side acceptance of a posted message.
//!
//! Incoming parameters pass an allowlist first, then are decoded into a
//! [`PostRequest`] and checked against the record they are posted on.

use chatter_relay_core::{MessageType, RelayError, RelayResult};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::routing::RecordRef;

/// Parameters the posting endpoint forwards. Everything else is dropped.
pub const ALLOWED_POST_PARAMS: &[&str] = &[
    "attachment_ids",
    "body",
    "message_type",
    "partner_ids",
    "subtype_xmlid",
    "parent_id",
    "checkbox",
];

/// Post parameters after the allowlist was applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostParams(Map<String, Value>);

impl PostParams {
    /// Keep only allowlisted keys. Dropped keys are logged, never their values.
    #[must_use]
    pub fn filter(params: Map<String, Value>) -> Self {
        let mut kept = Map::new();
        let mut dropped = Vec::new();
        for (key, value) in params {
            if ALLOWED_POST_PARAMS.contains(&key.as_str()) {
                kept.insert(key, value);
            } else {
                dropped.push(key);
            }
        }
        if !dropped.is_empty() {
            tracing::warn!(?dropped, "dropping unsupported post parameters");
        }
        Self(kept)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// A decoded post. Missing keys take the endpoint defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostRequest {
    #[serde(default)]
    pub attachment_ids: Vec<i64>,
    #[serde(default)]
    pub body: String,
    #[serde(default = "default_message_type")]
    pub message_type: MessageType,
    #[serde(default)]
    pub partner_ids: Vec<i64>,
    #[serde(default)]
    pub subtype_xmlid: Option<String>,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub checkbox: bool,
}

const fn default_message_type() -> MessageType {
    MessageType::Notification
}

impl PostRequest {
    /// Decode allowlisted parameters.
    pub fn from_params(params: PostParams) -> RelayResult<Self> {
        Ok(serde_json::from_value(Value::Object(params.into_inner()))?)
    }

    /// Check the post against the target record.
    ///
    /// Posts must land on a concrete business record, and direct notifications
    /// go through a different path. Partner ids are de-duplicated in first-seen
    /// order.
    pub fn validate(mut self, record: &RecordRef) -> RelayResult<Self> {
        if self.message_type == MessageType::UserNotification {
            return Err(RelayError::InvalidArgument(
                "user_notification messages cannot be posted on a record".to_string(),
            ));
        }
        if record.model.is_empty() || record.model == "mail.thread" || record.id <= 0 {
            return Err(RelayError::InvalidArgument(format!(
                "messages must be posted on a business record, got {}#{}",
                record.model, record.id
            )));
        }

        let mut seen = std::collections::HashSet::new();
        self.partner_ids.retain(|id| seen.insert(*id));
        Ok(self)
    }
}
