//! Webhook payloads to canonical events.

use super::error::MistaError;
use super::status::map_status;
use super::timestamp::resolve_timestamp;
use crate::channels::channel::ChannelConfig;
use crate::channels::inbound::{CanonicalInboundMessage, CanonicalStatus};
use serde::Deserialize;

/// Mobile-originated message webhook fields. Older deployments send `body` instead of `text`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundPayload {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub date: Option<String>,
}

impl InboundPayload {
    /// Message text: `text` when present, else `body`.
    pub fn message_text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .filter(|t| !t.is_empty())
            .or_else(|| self.body.as_deref().filter(|b| !b.is_empty()))
    }
}

/// Delivery-report webhook fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusPayload {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: String,
}

fn require<'a>(value: &'a str, field: &'static str) -> Result<&'a str, MistaError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(MistaError::Validation { field });
    }
    Ok(v)
}

/// Validate an MO payload and build the canonical message.
pub fn build_inbound_message(
    channel: &ChannelConfig,
    payload: &InboundPayload,
) -> Result<CanonicalInboundMessage, MistaError> {
    let id = require(&payload.id, "id")?;
    let text = payload
        .message_text()
        .ok_or(MistaError::Validation { field: "text" })?;
    let from = require(&payload.from, "from")?;
    require(&payload.to, "to")?;

    let urn = channel
        .tel_urn(from)
        .map_err(|source| MistaError::InvalidSenderIdentity {
            from: from.to_string(),
            source,
        })?;
    let received_on = resolve_timestamp(payload.date.as_deref(), channel.date_policy())?;

    Ok(CanonicalInboundMessage {
        channel_uuid: channel.uuid().to_string(),
        urn,
        text: text.to_string(),
        external_id: id.to_string(),
        received_on,
    })
}

/// Validate a delivery report and map its status.
pub fn build_status(
    channel: &ChannelConfig,
    payload: &StatusPayload,
) -> Result<CanonicalStatus, MistaError> {
    let id = require(&payload.id, "id")?;
    let raw = require(&payload.status, "status")?;
    let status = map_status(raw)?;
    Ok(CanonicalStatus {
        channel_uuid: channel.uuid().to_string(),
        external_id: id.to_string(),
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::channel::DatePolicy;
    use crate::channels::inbound::MsgStatus;
    use chrono::{TimeZone, Utc};

    fn channel() -> ChannelConfig {
        ChannelConfig::new("8eb23e93-5ecb-45ba-b726-3b064e0c56ab", "256", "UG")
    }

    fn payload() -> InboundPayload {
        InboundPayload {
            id: "m1".to_string(),
            text: Some("hello".to_string()),
            body: None,
            from: "0711223344".to_string(),
            to: "256".to_string(),
            date: Some("2017-05-03T06:04:45Z".to_string()),
        }
    }

    #[test]
    fn valid_message() {
        let msg = build_inbound_message(&channel(), &payload()).unwrap();
        assert_eq!(msg.external_id, "m1");
        assert_eq!(msg.text, "hello");
        assert_eq!(msg.urn.to_string(), "tel:+256711223344");
        assert_eq!(
            msg.received_on,
            Some(Utc.with_ymd_and_hms(2017, 5, 3, 6, 4, 45).unwrap())
        );
    }

    #[test]
    fn body_is_accepted_for_text() {
        let mut p = payload();
        p.text = None;
        p.body = Some("from body".to_string());
        let msg = build_inbound_message(&channel(), &p).unwrap();
        assert_eq!(msg.text, "from body");
    }

    #[test]
    fn missing_fields_are_named() {
        let cases: [(fn(&mut InboundPayload), &str); 4] = [
            (|p| p.id.clear(), "id"),
            (|p| p.text = None, "text"),
            (|p| p.from = "  ".to_string(), "from"),
            (|p| p.to.clear(), "to"),
        ];
        for (mutate, field) in cases {
            let mut p = payload();
            mutate(&mut p);
            match build_inbound_message(&channel(), &p) {
                Err(MistaError::Validation { field: f }) => assert_eq!(f, field),
                other => panic!("expected validation error for {}, got {:?}", field, other),
            }
        }
    }

    #[test]
    fn invalid_sender_is_rejected() {
        let mut p = payload();
        p.from = "12".to_string();
        let err = build_inbound_message(&channel(), &p).unwrap_err();
        assert!(matches!(err, MistaError::InvalidSenderIdentity { ref from, .. } if from == "12"));
    }

    #[test]
    fn bad_date_is_rejected() {
        let mut p = payload();
        p.date = Some("03/05/2017".to_string());
        let err = build_inbound_message(&channel(), &p).unwrap_err();
        assert!(matches!(err, MistaError::MalformedTimestamp(ref s) if s == "03/05/2017"));
    }

    #[test]
    fn absent_date_depends_on_channel() {
        let mut p = payload();
        p.date = None;
        let msg = build_inbound_message(&channel(), &p).unwrap();
        assert_eq!(msg.received_on, None);

        let strict = channel().with_date_policy(DatePolicy::Required);
        assert!(matches!(
            build_inbound_message(&strict, &p),
            Err(MistaError::MalformedTimestamp(_))
        ));
    }

    #[test]
    fn status_report() {
        let status = build_status(
            &channel(),
            &StatusPayload {
                id: "abc123".to_string(),
                status: "Buffered".to_string(),
            },
        )
        .unwrap();
        assert_eq!(status.external_id, "abc123");
        assert_eq!(status.status, MsgStatus::Sent);
    }

    #[test]
    fn status_report_errors() {
        let missing = build_status(&channel(), &StatusPayload::default()).unwrap_err();
        assert!(matches!(missing, MistaError::Validation { field: "id" }));

        let unknown = build_status(
            &channel(),
            &StatusPayload {
                id: "abc123".to_string(),
                status: "Lost".to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(unknown, MistaError::UnknownStatus(ref s) if s == "Lost"));
    }
}
