//! Canonical events produced from provider webhooks and handed to the host.

use crate::urn::Urn;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical delivery status. The only values ever reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MsgStatus {
    Wired,
    Sent,
    Delivered,
    Errored,
    Failed,
}

impl MsgStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MsgStatus::Wired => "wired",
            MsgStatus::Sent => "sent",
            MsgStatus::Delivered => "delivered",
            MsgStatus::Errored => "errored",
            MsgStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for MsgStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mobile-originated message, normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalInboundMessage {
    pub channel_uuid: String,
    pub urn: Urn,
    pub text: String,
    /// Provider message id; later status webhooks are correlated by it.
    pub external_id: String,
    /// None when the provider omitted the date and the channel allows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_on: Option<DateTime<Utc>>,
}

/// A delivery-status update keyed by the provider message id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalStatus {
    pub channel_uuid: String,
    pub external_id: String,
    pub status: MsgStatus,
}

/// Event forwarded from the webhook gateway to the host processor.
#[derive(Debug, Clone)]
pub enum ChannelEvent {
    /// Inbound message with the host message uuid assigned at receipt.
    Message {
        msg_uuid: uuid::Uuid,
        msg: CanonicalInboundMessage,
    },
    Status(CanonicalStatus),
}
