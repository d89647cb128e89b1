//! Direct-email routing for messages posted on leads.
//!
//! When the author opted in with the send-by-email toggle, a lead's contact
//! address gets a copy of the message even though it has no partner record.
//! The result is a plan; queueing and delivery belong to the host.

use std::sync::LazyLock;

use chatter_relay_core::{Config, MailNotification, MessageType, OutboundMail};
use regex::{Captures, Regex};

/// Record type that receives direct emails.
pub const LEAD_MODEL: &str = "crm.lead";

/// The record a message was posted on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRef {
    pub model: String,
    pub id: i64,
    pub display_name: String,
}

impl RecordRef {
    #[must_use]
    pub fn new(model: impl Into<String>, id: i64, display_name: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            id,
            display_name: display_name.into(),
        }
    }

    #[must_use]
    pub fn is_lead(&self) -> bool {
        self.model == LEAD_MODEL && self.id > 0
    }
}

/// A stored message, as seen by the notification step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedMessage {
    pub id: i64,
    /// RFC 5322 Message-Id.
    pub message_id: String,
    pub parent_message_id: Option<String>,
    pub record: RecordRef,
    pub subject: Option<String>,
    pub body: String,
    pub checkbox: bool,
    /// Explicit address passed along with the post.
    pub email_to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadRecord {
    pub id: i64,
    pub email_from: Option<String>,
}

/// Mail subject: explicit subject or `Re: <record>`, folded to one line.
#[must_use]
pub fn mail_subject(message: &PostedMessage) -> String {
    let subject = message
        .subject
        .as_deref()
        .filter(|s| !s.is_empty())
        .map_or_else(
            || {
                if message.record.display_name.is_empty() {
                    String::new()
                } else {
                    format!("Re: {}", message.record.display_name)
                }
            },
            str::to_string,
        );
    subject.lines().collect::<Vec<_>>().join(" ")
}

/// `References` header: parent id first when the message is a reply.
#[must_use]
pub fn mail_references(message: &PostedMessage) -> String {
    match message.parent_message_id.as_deref() {
        Some(parent) if !parent.is_empty() => format!("{parent} {}", message.message_id),
        _ => message.message_id.clone(),
    }
}

/// Root-relative `href`/`src` values. `//host` is protocol-relative and left alone.
static LOCAL_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?P<attr>\b(?:href|src)=["'])/(?P<rest>[^/])"#).expect("local link regex")
});

/// Rewrite root-relative `href`/`src` attributes against the public origin.
#[must_use]
pub fn absolutize_local_links(body: &str, base_url: Option<&str>) -> String {
    let Some(base) = base_url
        .map(|b| b.trim_end_matches('/'))
        .filter(|b| !b.is_empty())
    else {
        return body.to_string();
    };
    LOCAL_LINK
        .replace_all(body, |caps: &Captures<'_>| {
            format!("{}{base}/{}", &caps["attr"], &caps["rest"])
        })
        .into_owned()
}

/// Plan direct emails for a freshly posted message.
///
/// `emailed_partner_count` is how many partner recipients already get the
/// regular notification mail; the lead contact is only mailed when there are
/// none.
#[must_use]
pub fn plan_direct_emails(
    message: &PostedMessage,
    lead: Option<&LeadRecord>,
    emailed_partner_count: usize,
    config: &Config,
) -> Vec<OutboundMail> {
    let Some(lead) = lead.filter(|_| message.record.is_lead()) else {
        return Vec::new();
    };

    let subject = mail_subject(message);
    let references = mail_references(message);
    let body_html = absolutize_local_links(&message.body, config.public_base_url.as_deref());
    let outbound = |email_to: &str| OutboundMail {
        mail_message_id: message.id,
        email_to: email_to.to_string(),
        subject: subject.clone(),
        body_html: body_html.clone(),
        message_type: MessageType::Comment,
        is_notification: true,
        references: Some(references.clone()),
        notification: config.relay_contact_id.map(|partner_id| MailNotification {
            res_partner_id: partner_id,
            notification_type: "email".to_string(),
            notification_status: "ready".to_string(),
            is_read: true,
        }),
    };

    let mut mails = Vec::new();
    if let Some(address) = lead.email_from.as_deref().filter(|a| !a.is_empty())
        && emailed_partner_count == 0
        && message.checkbox
    {
        mails.push(outbound(address));
    }
    if let Some(address) = message.email_to.as_deref().filter(|a| !a.is_empty()) {
        mails.push(outbound(address));
    }

    tracing::debug!(
        message_id = message.id,
        lead_id = lead.id,
        planned = mails.len(),
        "planned direct emails"
    );
    mails
}
