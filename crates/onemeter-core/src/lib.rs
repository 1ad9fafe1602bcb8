//! Core types for the OneMeter integration
//!
//! This crate carries what every other crate needs: the integration
//! constants, the device snapshot type, the cloud API collaborator traits
//! and the API error taxonomy.
//!
//! # Key Types
//!
//! - [`MeterApi`] / [`MeterApiFactory`] - the cloud API collaborator contract
//! - [`ApiError`] - every way a cloud call can fail
//! - [`DeviceSnapshot`] - the latest poll result, passed through as JSON

pub mod api;
pub mod error;

pub use api::{MeterApi, MeterApiFactory};
pub use error::{ApiError, ApiResult};

/// Integration domain, used as the identifier namespace.
pub const DOMAIN: &str = "onemeter";

/// Human-readable integration name.
pub const NAME: &str = "OneMeter";

/// Integration version, shown as the device model.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Config entry data key: cloud API key.
pub const CONF_API_KEY: &str = "api_key";

/// Config entry data key: meter device identifier.
pub const CONF_DEVICE_ID: &str = "device_id";

/// Config entry options key: polling interval in seconds.
pub const CONF_SYNC_INTERVAL: &str = "sync_interval";

/// Polling interval used when the options don't set one.
pub const DEFAULT_SYNC_INTERVAL: u64 = 3600;

/// Latest device metadata returned by the cloud API.
///
/// The payload is not parsed field-by-field; the coordinator stores it
/// as-is and consumers pick what they need.
pub type DeviceSnapshot = serde_json::Map<String, serde_json::Value>;
