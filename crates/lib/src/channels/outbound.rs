//! Outbound message handed in by the host and the per-attempt send record handed back.

use crate::channels::inbound::MsgStatus;
use crate::urn::Urn;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message the host wants delivered through a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Host-assigned message id.
    pub id: String,
    pub urn: Urn,
    pub text: String,
}

/// One HTTP exchange (or failure) recorded while sending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelLog {
    pub description: String,
    pub method: String,
    pub url: String,
    /// Request line, headers and body with the credential redacted.
    pub request: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u64,
    pub created_on: DateTime<Utc>,
}

impl ChannelLog {
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Result of one send attempt. Created as errored; only an accepted provider response moves it to wired.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundSendResult {
    pub msg_id: String,
    pub status: MsgStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default)]
    pub logs: Vec<ChannelLog>,
}

impl OutboundSendResult {
    pub fn pending(msg_id: impl Into<String>) -> Self {
        Self {
            msg_id: msg_id.into(),
            status: MsgStatus::Errored,
            external_id: None,
            logs: Vec::new(),
        }
    }

    pub fn add_log(&mut self, log: ChannelLog) {
        self.logs.push(log);
    }

    pub fn set_wired(&mut self, external_id: Option<String>) {
        self.status = MsgStatus::Wired;
        self.external_id = external_id;
    }
}
