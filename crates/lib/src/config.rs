//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.mista/config.json`) and environment.
//! Channel entries are turned into immutable [`ChannelConfig`] values for the adapter.

use crate::channels::{ChannelConfig, ChannelRegistry, DatePolicy, DEFAULT_SEND_URL};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Webhook gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Provider endpoint and HTTP client settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Configured Mista channels.
    #[serde(default)]
    pub channels: Vec<ChannelEntry>,
}

/// Gateway bind and port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Port for webhook HTTP (default 15180).
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bind address (default "127.0.0.1").
    #[serde(default = "default_gateway_bind")]
    pub bind: String,
}

fn default_gateway_port() -> u16 {
    15180
}

fn default_gateway_bind() -> String {
    "127.0.0.1".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            bind: default_gateway_bind(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Send endpoint (default https://api.mista.io/sms). Point at a test double in staging.
    #[serde(default = "default_send_url")]
    pub send_url: String,

    /// Timeout for the outbound HTTP client, in seconds (default 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_send_url() -> String {
    DEFAULT_SEND_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            send_url: default_send_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// One channel as written in the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelEntry {
    pub uuid: String,
    /// Channel address (short code or number); default sender for outbound.
    pub address: String,
    /// ISO 3166 alpha-2 country used to validate inbound numbers.
    pub country: String,
    /// Bearer credential. MISTA_API_KEY is used when this is unset.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Sender ID to use instead of the address.
    #[serde(default)]
    pub sender_id: Option<String>,
    /// Reject inbound messages without a date (default false).
    #[serde(default)]
    pub date_required: bool,
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let t = s.trim();
        if t.is_empty() {
            None
        } else {
            Some(t.to_string())
        }
    })
}

/// Resolve a channel's API key: config value, else env MISTA_API_KEY.
pub fn resolve_api_key(entry: &ChannelEntry) -> Option<String> {
    api_key_or(entry, || non_empty_env("MISTA_API_KEY"))
}

/// Non-blank config key, else `fallback` (only evaluated when the config key is blank).
fn api_key_or(entry: &ChannelEntry, fallback: impl FnOnce() -> Option<String>) -> Option<String> {
    entry
        .api_key
        .as_ref()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            fallback()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

impl ChannelEntry {
    pub fn to_channel_config(&self, provider: &ProviderConfig) -> ChannelConfig {
        let date_policy = if self.date_required {
            DatePolicy::Required
        } else {
            DatePolicy::Optional
        };
        ChannelConfig::new(self.uuid.trim(), self.address.trim(), &self.country)
            .with_api_key(resolve_api_key(self))
            .with_sender_id(self.sender_id.clone())
            .with_send_url(provider.send_url.trim())
            .with_date_policy(date_policy)
    }
}

/// Build the channel registry handed to the gateway and send path.
pub fn build_registry(config: &Config) -> ChannelRegistry {
    ChannelRegistry::new(
        config
            .channels
            .iter()
            .filter(|c| {
                if c.uuid.trim().is_empty() {
                    log::warn!("skipping channel entry without uuid (address {})", c.address);
                    false
                } else {
                    true
                }
            })
            .map(|c| c.to_channel_config(&config.provider)),
    )
}

/// HTTP client for provider calls, bounded by the configured timeout.
pub fn build_http_client(config: &Config) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.provider.timeout_secs))
        .build()
        .context("building provider HTTP client")
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("MISTA_CONFIG_PATH").map(PathBuf::from).unwrap_or_else(|_| {
        dirs::home_dir()
            .map(|h| h.join(".mista").join("config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    })
}

/// Load config from the given path, the default path, or MISTA_CONFIG_PATH. Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.gateway.port, 15180);
        assert_eq!(config.gateway.bind, "127.0.0.1");
        assert_eq!(config.provider.send_url, "https://api.mista.io/sms");
        assert_eq!(config.provider.timeout_secs, 30);
        assert!(config.channels.is_empty());
    }

    #[test]
    fn parses_camel_case_channels() {
        let config: Config = serde_json::from_str(
            r#"{
                "provider": {"sendUrl": "http://localhost:9000/sms"},
                "channels": [{
                    "uuid": "8eb23e93-5ecb-45ba-b726-3b064e0c56ab",
                    "address": "256",
                    "country": "ug",
                    "apiKey": "secret",
                    "senderId": "MISTA",
                    "dateRequired": true
                }]
            }"#,
        )
        .unwrap();
        let registry = build_registry(&config);
        let channel = registry.get("8eb23e93-5ecb-45ba-b726-3b064e0c56ab").unwrap();
        assert_eq!(channel.country(), "UG");
        assert_eq!(channel.api_key(), Some("secret"));
        assert_eq!(channel.sender(), "MISTA");
        assert_eq!(channel.send_url(), "http://localhost:9000/sms");
        assert_eq!(channel.date_policy(), DatePolicy::Required);
    }

    #[test]
    fn entries_without_uuid_are_skipped() {
        let mut config = Config::default();
        config.channels.push(ChannelEntry {
            address: "256".to_string(),
            country: "UG".to_string(),
            ..Default::default()
        });
        assert!(build_registry(&config).is_empty());
    }

    #[test]
    fn configured_api_key_wins_over_env() {
        let entry = ChannelEntry {
            api_key: Some(" secret ".to_string()),
            ..Default::default()
        };
        let key = api_key_or(&entry, || panic!("env must not be consulted"));
        assert_eq!(key.as_deref(), Some("secret"));
    }

    #[test]
    fn blank_api_key_falls_back_to_env() {
        let mut entry = ChannelEntry::default();
        assert_eq!(
            api_key_or(&entry, || Some("from-env".to_string())).as_deref(),
            Some("from-env")
        );
        entry.api_key = Some("   ".to_string());
        assert_eq!(
            api_key_or(&entry, || Some(" from-env ".to_string())).as_deref(),
            Some("from-env")
        );
        assert_eq!(api_key_or(&entry, || Some(" ".to_string())), None);
        assert_eq!(api_key_or(&entry, || None), None);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join(format!("mista-missing-{}.json", uuid::Uuid::new_v4()));
        let (config, used) = load_config(Some(path.clone())).unwrap();
        assert_eq!(used, path);
        assert_eq!(config.gateway.port, 15180);
    }
}
