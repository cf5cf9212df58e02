//! Send adapter: render, call the provider once, interpret, record.
//!
//! Every attempt that gets past request rendering yields an [`OutboundSendResult`]; transport
//! and parse failures degrade to `errored` instead of propagating. Retries are the host's job.
//! If the host cancels the future mid-call, the outcome is unknown (the provider may already
//! have accepted the message) and should be recorded as errored.

use super::error::MistaError;
use super::request::{build_send_request, SendRequest};
use super::response::interpret_response;
use crate::channels::channel::ChannelConfig;
use crate::channels::outbound::{ChannelLog, OutboundMessage, OutboundSendResult};
use chrono::Utc;
use std::time::Instant;

const LOG_DESCRIPTION: &str = "Message Sent";

/// Sends outbound messages through the Mista HTTP API.
///
/// The `reqwest::Client` is supplied by the host, which owns timeouts and connection pooling.
#[derive(Clone, Default)]
pub struct SendAdapter {
    client: reqwest::Client,
}

impl SendAdapter {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// One send attempt. Only a missing credential is returned as `Err`, before any network call.
    pub async fn send(
        &self,
        channel: &ChannelConfig,
        msg: &OutboundMessage,
    ) -> Result<OutboundSendResult, MistaError> {
        let request = build_send_request(channel, msg)?;
        let mut result = OutboundSendResult::pending(&msg.id);
        let started = Instant::now();

        let (entry, outcome) = self.call(&request, started).await;
        result.add_log(entry);

        match outcome {
            Ok(external_id) => {
                if external_id.is_none() {
                    log::warn!(
                        "mista channel {}: msg {} accepted without uid, status reports cannot be correlated",
                        channel.uuid(),
                        msg.id
                    );
                }
                log::info!(
                    "mista channel {}: msg {} wired (external id {:?})",
                    channel.uuid(),
                    msg.id,
                    external_id
                );
                result.set_wired(external_id);
            }
            Err(e) => {
                log::warn!(
                    "mista channel {}: msg {} errored: {}",
                    channel.uuid(),
                    msg.id,
                    e
                );
            }
        }
        Ok(result)
    }

    async fn call(
        &self,
        request: &SendRequest,
        started: Instant,
    ) -> (ChannelLog, Result<Option<String>, MistaError>) {
        let mut entry = ChannelLog {
            description: LOG_DESCRIPTION.to_string(),
            method: "POST".to_string(),
            url: request.url.clone(),
            request: request.redacted(),
            status_code: None,
            response: None,
            error: None,
            elapsed_ms: 0,
            created_on: Utc::now(),
        };

        let mut builder = self.client.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        let outcome = match builder.body(request.body_json()).send().await {
            Ok(res) => {
                let status = res.status().as_u16();
                entry.status_code = Some(status);
                match res.text().await {
                    Ok(body) => {
                        let outcome = interpret_response(status, &body);
                        entry.response = Some(body);
                        outcome
                    }
                    Err(e) => Err(MistaError::Network(e)),
                }
            }
            Err(e) => Err(MistaError::Network(e)),
        };
        entry.elapsed_ms = started.elapsed().as_millis() as u64;
        if let Err(ref e) = outcome {
            entry = entry.with_error(e.to_string());
        }
        (entry, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::inbound::MsgStatus;
    use crate::urn::Urn;
    use httpmock::Method::POST;
    use httpmock::MockServer;

    fn channel(send_url: String, api_key: Option<&str>) -> ChannelConfig {
        ChannelConfig::new("8eb23e93-5ecb-45ba-b726-3b064e0c56ab", "MISTA", "UG")
            .with_api_key(api_key.map(str::to_string))
            .with_send_url(send_url)
    }

    fn msg() -> OutboundMessage {
        OutboundMessage {
            id: "10".to_string(),
            urn: Urn::parse("tel:+15551234567").unwrap(),
            text: "hi".to_string(),
        }
    }

    #[tokio::test]
    async fn delivered_response_is_wired() {
        let server = MockServer::start();
        let sent = server.mock(|when, then| {
            when.method(POST)
                .path("/sms")
                .header("authorization", "Bearer secret")
                .header("content-type", "application/json")
                .header("accept", "application/json")
                .json_body(serde_json::json!({
                    "recipient": "+15551234567",
                    "sender_id": "MISTA",
                    "message": "hi",
                    "type": "plain"
                }));
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"data":{"status":"Delivered","uid":"abc123"}}"#);
        });

        let adapter = SendAdapter::default();
        let result = adapter
            .send(&channel(server.url("/sms"), Some("secret")), &msg())
            .await
            .unwrap();
        sent.assert_calls(1);
        assert_eq!(result.msg_id, "10");
        assert_eq!(result.status, MsgStatus::Wired);
        assert_eq!(result.external_id.as_deref(), Some("abc123"));
        assert_eq!(result.logs.len(), 1);
        assert_eq!(result.logs[0].status_code, Some(200));
        assert!(!result.logs[0].is_error());
        assert!(!result.logs[0].request.contains("secret"));
    }

    #[tokio::test]
    async fn server_error_is_errored() {
        let server = MockServer::start();
        let sent = server.mock(|when, then| {
            when.method(POST).path("/sms");
            then.status(500)
                .body(r#"{"data":{"status":"Delivered","uid":"abc123"}}"#);
        });

        let result = SendAdapter::default()
            .send(&channel(server.url("/sms"), Some("secret")), &msg())
            .await
            .unwrap();
        sent.assert_calls(1);
        assert_eq!(result.status, MsgStatus::Errored);
        assert_eq!(result.external_id, None);
        assert_eq!(result.logs[0].status_code, Some(500));
        assert!(result.logs[0].is_error());
    }

    #[tokio::test]
    async fn malformed_success_body_is_errored() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/sms");
            then.status(200).body("not json");
        });

        let result = SendAdapter::default()
            .send(&channel(server.url("/sms"), Some("secret")), &msg())
            .await
            .unwrap();
        assert_eq!(result.status, MsgStatus::Errored);
        assert_eq!(result.logs[0].response.as_deref(), Some("not json"));
    }

    #[tokio::test]
    async fn rejected_status_is_errored() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/sms");
            then.status(200).body(r#"{"status":"Rejected","uid":"abc123"}"#);
        });

        let result = SendAdapter::default()
            .send(&channel(server.url("/sms"), Some("secret")), &msg())
            .await
            .unwrap();
        assert_eq!(result.status, MsgStatus::Errored);
        assert_eq!(result.external_id, None);
    }

    #[tokio::test]
    async fn connection_failure_is_errored() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let result = SendAdapter::default()
            .send(
                &channel(format!("http://127.0.0.1:{}/sms", port), Some("secret")),
                &msg(),
            )
            .await
            .unwrap();
        assert_eq!(result.status, MsgStatus::Errored);
        assert_eq!(result.logs[0].status_code, None);
        assert!(result.logs[0].is_error());
    }

    #[tokio::test]
    async fn missing_credential_makes_no_call() {
        let server = MockServer::start();
        let sent = server.mock(|when, then| {
            when.method(POST).path("/sms");
            then.status(200);
        });

        let err = SendAdapter::default()
            .send(&channel(server.url("/sms"), None), &msg())
            .await
            .unwrap_err();
        assert!(matches!(err, MistaError::MissingCredential(_)));
        sent.assert_calls(0);
    }
}
