//! Core types, configuration, and models for chatter-relay
//!
//! This crate provides:
//! - Configuration management (`Config`, environment parsing)
//! - Data models (`Partner`, `MessagePayload`, `DialogContext`, etc.)
//! - Common error types

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod models;

// Re-export key types for convenience
pub use config::Config;
pub use error::{Error as RelayError, Result as RelayResult};
pub use models::{
    Attachment, Channel, DialogContext, MailNotification, MessagePayload, MessageType,
    OutboundMail, Partner, RecipientMode, ToggleState,
};
