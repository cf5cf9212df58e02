//! Webhook response bodies returned to the provider.

use crate::channels::{CanonicalInboundMessage, CanonicalStatus, MsgStatus};
use crate::urn::Urn;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MESSAGE_ACCEPTED: &str = "Message Accepted";
pub const STATUS_ACCEPTED: &str = "Status Update Accepted";
pub const ERROR: &str = "Error";

/// Wire response: `{ "message", "data": [ { "type": "msg" | "status" | "error", ... } ] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub message: String,
    pub data: Vec<ResponseData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResponseData {
    Msg {
        channel_uuid: String,
        msg_uuid: uuid::Uuid,
        text: String,
        urn: Urn,
        external_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        received_on: Option<DateTime<Utc>>,
    },
    Status {
        channel_uuid: String,
        external_id: String,
        status: MsgStatus,
    },
    Error {
        error: String,
    },
}

impl WebhookResponse {
    pub fn msg(msg_uuid: uuid::Uuid, msg: &CanonicalInboundMessage) -> Self {
        Self {
            message: MESSAGE_ACCEPTED.to_string(),
            data: vec![ResponseData::Msg {
                channel_uuid: msg.channel_uuid.clone(),
                msg_uuid,
                text: msg.text.clone(),
                urn: msg.urn.clone(),
                external_id: msg.external_id.clone(),
                received_on: msg.received_on,
            }],
        }
    }

    pub fn status(status: &CanonicalStatus) -> Self {
        Self {
            message: STATUS_ACCEPTED.to_string(),
            data: vec![ResponseData::Status {
                channel_uuid: status.channel_uuid.clone(),
                external_id: status.external_id.clone(),
                status: status.status,
            }],
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            message: ERROR.to_string(),
            data: vec![ResponseData::Error {
                error: error.into(),
            }],
        }
    }
}
