//! Client configuration.

use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};
use serde_with::{DurationSeconds, serde_as};

/// Settings shared by every request a session makes.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use hue_voice_rs::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_device_type("kitchen-panel#tablet")
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.device_type, "kitchen-panel#tablet");
/// assert_eq!(config.discovery_url, "https://discovery.meethue.com/");
/// ```
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Cloud endpoint listing bridges on the caller's network.
    pub discovery_url: String,
    /// Application identifier sent when registering, `app#device`.
    pub device_type: String,
    /// Per-request timeout. Expiry surfaces as a network error.
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(rename = "timeout_secs")]
    pub timeout: Duration,
    /// Number of exchanges kept in the session history.
    pub history_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            discovery_url: Self::DISCOVERY_URL.to_string(),
            device_type: Self::DEVICE_TYPE.to_string(),
            timeout: Duration::from_secs(Self::TIMEOUT_SECS),
            history_size: 100,
        }
    }
}

impl ClientConfig {
    pub const DISCOVERY_URL: &'static str = "https://discovery.meethue.com/";
    pub const DEVICE_TYPE: &'static str = "hue-voice-rs#client";
    pub const TIMEOUT_SECS: u64 = 8;

    /// Build a configuration from `HUE_DISCOVERY_URL`, `HUE_DEVICE_TYPE` and
    /// `HUE_TIMEOUT_SECS`, using defaults for anything unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup("HUE_DISCOVERY_URL") {
            config.discovery_url = url;
        }
        if let Some(device_type) = lookup("HUE_DEVICE_TYPE") {
            config.device_type = device_type;
        }
        if let Some(secs) = lookup("HUE_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) => config.timeout = Duration::from_secs(secs),
                Err(_) => warn!("ignoring unparsable HUE_TIMEOUT_SECS={:?}", secs),
            }
        }
        config
    }

    pub fn with_discovery_url(mut self, url: &str) -> Self {
        self.discovery_url = url.to_string();
        self
    }

    pub fn with_device_type(mut self, device_type: &str) -> Self {
        self.device_type = device_type.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_history_size(mut self, history_size: usize) -> Self {
        self.history_size = history_size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_from_lookup_overrides() {
        let vars = HashMap::from([
            ("HUE_DEVICE_TYPE", "test#box"),
            ("HUE_TIMEOUT_SECS", "3"),
        ]);
        let config = ClientConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.device_type, "test#box");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.discovery_url, ClientConfig::DISCOVERY_URL);
    }

    #[test]
    fn test_from_lookup_bad_timeout_keeps_default() {
        let config = ClientConfig::from_lookup(|k| {
            (k == "HUE_TIMEOUT_SECS").then(|| "soon".to_string())
        });
        assert_eq!(config.timeout, Duration::from_secs(ClientConfig::TIMEOUT_SECS));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"timeout_secs": 2, "device_type": "a#b"}"#).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.device_type, "a#b");
        assert_eq!(config.history_size, 100);
    }
}
