//! Per-channel settings supplied by the host. Immutable once built; the adapter only reads them.

use crate::urn::{Urn, UrnError};

/// Provider send endpoint used when a channel does not override it.
pub const DEFAULT_SEND_URL: &str = "https://api.mista.io/sms";

/// Whether an inbound message must carry a `date` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DatePolicy {
    /// Absent date is accepted; the message carries no received-on instant.
    #[default]
    Optional,
    /// Absent date is rejected as a malformed timestamp.
    Required,
}

/// A configured Mista route: credential, sender address and country scope.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    uuid: String,
    address: String,
    country: String,
    api_key: Option<String>,
    sender_id: Option<String>,
    send_url: String,
    date_policy: DatePolicy,
}

impl ChannelConfig {
    pub fn new(uuid: impl Into<String>, address: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            address: address.into(),
            country: country.into().trim().to_uppercase(),
            api_key: None,
            sender_id: None,
            send_url: DEFAULT_SEND_URL.to_string(),
            date_policy: DatePolicy::default(),
        }
    }

    /// Bearer credential. Blank values are treated as unset.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        self
    }

    /// Sender ID to use instead of the channel address.
    pub fn with_sender_id(mut self, sender_id: Option<String>) -> Self {
        self.sender_id = sender_id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self
    }

    pub fn with_send_url(mut self, send_url: impl Into<String>) -> Self {
        self.send_url = send_url.into();
        self
    }

    pub fn with_date_policy(mut self, date_policy: DatePolicy) -> Self {
        self.date_policy = date_policy;
        self
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Sender identifier for outbound requests: configured sender ID, else the channel address.
    pub fn sender(&self) -> &str {
        self.sender_id.as_deref().unwrap_or(&self.address)
    }

    pub fn send_url(&self) -> &str {
        &self.send_url
    }

    pub fn date_policy(&self) -> DatePolicy {
        self.date_policy
    }

    /// Validate `number` as a phone number within this channel's country.
    pub fn tel_urn(&self, number: &str) -> Result<Urn, UrnError> {
        Urn::tel_for_country(number, &self.country)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_falls_back_to_address() {
        let channel = ChannelConfig::new("c1", "MISTA", "ug");
        assert_eq!(channel.sender(), "MISTA");
        assert_eq!(channel.country(), "UG");
        let channel = channel.with_sender_id(Some("Acme".to_string()));
        assert_eq!(channel.sender(), "Acme");
    }

    #[test]
    fn blank_credentials_are_unset() {
        let channel = ChannelConfig::new("c1", "MISTA", "UG").with_api_key(Some("  ".to_string()));
        assert_eq!(channel.api_key(), None);
        assert_eq!(channel.send_url(), DEFAULT_SEND_URL);
    }
}
