//! The in-progress message and the thread it belongs to.
//!
//! The host owns composers. Everything here runs on the UI event loop, so
//! composers are shared as `Rc<RefCell<_>>` and never cross threads.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use chatter_relay_core::{Attachment, Channel, Partner};
use chatter_relay_markup::MentionContext;

/// A record with a message thread (lead, task, channel, ...).
pub trait MessageThread {
    /// Record type name, e.g. `crm.lead`.
    fn model(&self) -> &str;
    fn id(&self) -> i64;
    /// Ask the host to fetch messages posted since the last load.
    fn load_new_messages(&self);
}

/// Shared handle the host keeps for a live composer.
pub type ComposerHandle = Rc<RefCell<Composer>>;

/// A message that has not been sent yet.
#[derive(Default)]
pub struct Composer {
    pub text_input_content: String,
    pub attachments: Vec<Attachment>,
    pub recipients: Vec<Partner>,
    pub mentioned_partners: Vec<Partner>,
    pub mentioned_channels: Vec<Channel>,
    /// Log a note instead of sending a message.
    pub is_log: bool,
    pub active_thread: Option<Rc<dyn MessageThread>>,
    generation: u64,
}

impl Composer {
    #[must_use]
    pub fn new(thread: Option<Rc<dyn MessageThread>>) -> Self {
        Self {
            active_thread: thread,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn into_handle(self) -> ComposerHandle {
        Rc::new(RefCell::new(self))
    }

    #[must_use]
    pub fn attachment_ids(&self) -> Vec<i64> {
        self.attachments.iter().map(|a| a.id).collect()
    }

    #[must_use]
    pub fn partner_ids(&self) -> Vec<i64> {
        self.recipients.iter().map(|p| p.id).collect()
    }

    #[must_use]
    pub fn mention_context(&self) -> MentionContext<'_> {
        MentionContext::new(&self.mentioned_partners, &self.mentioned_channels)
    }

    /// Number of resets so far.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Clear the draft after it was sent elsewhere.
    ///
    /// Recipients, log mode and the active thread stay: they describe where
    /// the next message goes, not what it says.
    pub fn reset(&mut self) {
        self.text_input_content.clear();
        self.attachments.clear();
        self.mentioned_partners.clear();
        self.mentioned_channels.clear();
        self.generation += 1;
    }
}

impl fmt::Debug for Composer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composer")
            .field("text_len", &self.text_input_content.len())
            .field("attachments", &self.attachment_ids())
            .field("recipients", &self.partner_ids())
            .field("is_log", &self.is_log)
            .field(
                "active_thread",
                &self.active_thread.as_ref().map(|t| (t.model().to_string(), t.id())),
            )
            .field("generation", &self.generation)
            .finish()
    }
}

/// Whether the composer behind `weak` is still alive.
#[must_use]
pub fn composer_exists(weak: &Weak<RefCell<Composer>>) -> bool {
    weak.strong_count() > 0
}
