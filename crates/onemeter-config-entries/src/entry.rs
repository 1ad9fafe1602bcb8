//! Config Entry types
//!
//! A [`ConfigEntry`] is the single configuration record of the
//! integration: the submitted credentials in `data`, the user-tunable
//! settings in `options`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use onemeter_core::{CONF_API_KEY, CONF_DEVICE_ID, CONF_SYNC_INTERVAL, DEFAULT_SYNC_INTERVAL};

/// A configuration entry for the integration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigEntry {
    /// Unique identifier (ULID)
    pub entry_id: String,

    /// Human-readable display name
    pub title: String,

    /// Immutable configuration data submitted at setup
    #[serde(default)]
    pub data: HashMap<String, serde_json::Value>,

    /// User-configurable options
    #[serde(default)]
    pub options: HashMap<String, serde_json::Value>,

    /// Schema version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    #[serde(default = "Utc::now")]
    pub modified_at: DateTime<Utc>,
}

fn default_version() -> u32 {
    1
}

impl ConfigEntry {
    /// Create a new config entry
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            entry_id: ulid::Ulid::new().to_string(),
            title: title.into(),
            data: HashMap::new(),
            options: HashMap::new(),
            version: 1,
            created_at: now,
            modified_at: now,
        }
    }

    /// Set entry data
    pub fn with_data(mut self, data: HashMap<String, serde_json::Value>) -> Self {
        self.data = data;
        self
    }

    /// Set entry options
    pub fn with_options(mut self, options: HashMap<String, serde_json::Value>) -> Self {
        self.options = options;
        self
    }

    /// API key submitted at setup, if present
    pub fn api_key(&self) -> Option<&str> {
        self.data.get(CONF_API_KEY).and_then(|v| v.as_str())
    }

    /// Device identifier submitted at setup, if present
    pub fn device_id(&self) -> Option<&str> {
        self.data.get(CONF_DEVICE_ID).and_then(|v| v.as_str())
    }

    /// Polling interval in seconds.
    ///
    /// Reads the options map and falls back to the default when unset,
    /// non-integer or non-positive. The options form accepts any integer,
    /// so zero and negatives can be stored; they never reach the
    /// coordinator as a schedule.
    pub fn sync_interval(&self) -> u64 {
        self.options
            .get(CONF_SYNC_INTERVAL)
            .and_then(|v| v.as_i64())
            .filter(|v| *v > 0)
            .and_then(|v| u64::try_from(v).ok())
            .unwrap_or(DEFAULT_SYNC_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_entry_new() {
        let entry = ConfigEntry::new("my-key");
        assert_eq!(entry.title, "my-key");
        assert_eq!(entry.version, 1);
        assert!(!entry.entry_id.is_empty());
        assert!(entry.data.is_empty());
        assert!(entry.options.is_empty());
    }

    #[test]
    fn test_typed_accessors() {
        let mut data = HashMap::new();
        data.insert(CONF_API_KEY.to_string(), json!("secret"));
        data.insert(CONF_DEVICE_ID.to_string(), json!("meter-001"));

        let entry = ConfigEntry::new("secret").with_data(data);
        assert_eq!(entry.api_key(), Some("secret"));
        assert_eq!(entry.device_id(), Some("meter-001"));
    }

    #[test]
    fn test_sync_interval_default() {
        let entry = ConfigEntry::new("t");
        assert_eq!(entry.sync_interval(), DEFAULT_SYNC_INTERVAL);
    }

    #[test]
    fn test_sync_interval_from_options() {
        let mut options = HashMap::new();
        options.insert(CONF_SYNC_INTERVAL.to_string(), json!(120));

        let entry = ConfigEntry::new("t").with_options(options);
        assert_eq!(entry.sync_interval(), 120);
    }

    #[test]
    fn test_sync_interval_non_positive_falls_back() {
        for value in [json!(-5), json!(0)] {
            let mut options = HashMap::new();
            options.insert(CONF_SYNC_INTERVAL.to_string(), value);

            let entry = ConfigEntry::new("t").with_options(options);
            assert_eq!(entry.sync_interval(), DEFAULT_SYNC_INTERVAL);
        }
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut data = HashMap::new();
        data.insert(CONF_API_KEY.to_string(), json!("secret"));

        let entry = ConfigEntry::new("secret").with_data(data);
        let json = serde_json::to_string(&entry).unwrap();
        let parsed: ConfigEntry = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.entry_id, entry.entry_id);
        assert_eq!(parsed.title, "secret");
        assert_eq!(parsed.api_key(), Some("secret"));
    }
}
