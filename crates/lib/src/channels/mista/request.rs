//! Outbound message to the provider's JSON send request.

use super::error::MistaError;
use crate::channels::channel::ChannelConfig;
use crate::channels::outbound::OutboundMessage;
use serde::Serialize;

const MESSAGE_TYPE: &str = "plain";
const REDACTED: &str = "****";

/// Body of `POST /sms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendRequestBody {
    pub recipient: String,
    pub sender_id: String,
    pub message: String,
    #[serde(rename = "type")]
    pub typ: &'static str,
}

/// A fully rendered send request, ready for the HTTP client.
#[derive(Debug, Clone)]
pub struct SendRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: SendRequestBody,
}

impl SendRequest {
    pub fn body_json(&self) -> String {
        serde_json::to_string(&self.body).unwrap_or_default()
    }

    /// Request dump for channel logs; the credential is masked.
    pub fn redacted(&self) -> String {
        let mut out = format!("POST {}\n", self.url);
        for (name, value) in &self.headers {
            let value = if name.eq_ignore_ascii_case("authorization") {
                format!("Bearer {}", REDACTED)
            } else {
                value.clone()
            };
            out.push_str(&format!("{}: {}\n", name, value));
        }
        out.push('\n');
        out.push_str(&self.body_json());
        out
    }
}

/// Render `msg` for `channel`. Fails before any I/O when the channel has no credential.
pub fn build_send_request(
    channel: &ChannelConfig,
    msg: &OutboundMessage,
) -> Result<SendRequest, MistaError> {
    let api_key = channel
        .api_key()
        .ok_or_else(|| MistaError::MissingCredential(channel.uuid().to_string()))?;
    Ok(SendRequest {
        url: channel.send_url().to_string(),
        headers: vec![
            ("Accept", "application/json".to_string()),
            ("Content-Type", "application/json".to_string()),
            ("Authorization", format!("Bearer {}", api_key)),
        ],
        body: SendRequestBody {
            recipient: msg.urn.path().to_string(),
            sender_id: channel.sender().to_string(),
            message: msg.text.clone(),
            typ: MESSAGE_TYPE,
        },
    })
}
