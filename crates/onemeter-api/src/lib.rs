//! OneMeter cloud API client
//!
//! A blocking HTTP client implementing the [`MeterApi`] collaborator
//! contract. Callers on an async runtime dispatch calls through
//! `tokio::task::spawn_blocking`; the client itself never touches the
//! runtime.
//!
//! The device payload is passed through as a JSON map. Field-level
//! parsing and retry policies are out of scope here.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use onemeter_core::{ApiError, ApiResult, DeviceSnapshot, MeterApi, MeterApiFactory};

/// Default cloud endpoint
pub const DEFAULT_BASE_URL: &str = "https://cloud.onemeter.com";

/// Request timeout for cloud calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A connected client for one meter device
pub struct OnemeterClient {
    api_key: String,
    device_id: String,
    base_url: String,
    host: String,
    http: reqwest::blocking::Client,
}

impl OnemeterClient {
    /// Create a client for the given credentials against the default
    /// cloud endpoint.
    pub fn new(api_key: impl Into<String>, device_id: impl Into<String>) -> ApiResult<Self> {
        Self::with_base_url(api_key, device_id, DEFAULT_BASE_URL)
    }

    /// Create a client against a specific endpoint (used by tests).
    pub fn with_base_url(
        api_key: impl Into<String>,
        device_id: impl Into<String>,
        base_url: impl Into<String>,
    ) -> ApiResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let host = base_url
            .split("://")
            .nth(1)
            .unwrap_or(&base_url)
            .split('/')
            .next()
            .unwrap_or(&base_url)
            .to_string();

        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;

        Ok(Self {
            api_key: api_key.into(),
            device_id: device_id.into(),
            base_url,
            host,
            http,
        })
    }

    fn device_url(&self) -> String {
        format!("{}/api/v1/devices/{}", self.base_url, self.device_id)
    }

    fn map_transport_error(err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl MeterApi for OnemeterClient {
    fn host(&self) -> &str {
        &self.host
    }

    fn fetch_device(&self) -> ApiResult<DeviceSnapshot> {
        let url = self.device_url();
        debug!(%url, "Fetching device metadata");

        let response = self
            .http
            .get(&url)
            .header("Authorization", &self.api_key)
            .send()
            .map_err(Self::map_transport_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ApiError::Auth);
        }
        if !status.is_success() {
            return Err(ApiError::Network(format!("unexpected status {status}")));
        }

        let snapshot: DeviceSnapshot = response
            .json()
            .map_err(|err| ApiError::Malformed(err.to_string()))?;

        debug!(keys = snapshot.len(), "Fetched device metadata");
        Ok(snapshot)
    }
}

/// Builds [`OnemeterClient`] instances for the setup flow and the
/// coordinator.
#[derive(Debug, Clone)]
pub struct OnemeterClientFactory {
    base_url: String,
}

impl OnemeterClientFactory {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for OnemeterClientFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl MeterApiFactory for OnemeterClientFactory {
    fn connect(&self, api_key: &str, device_id: &str) -> ApiResult<Arc<dyn MeterApi>> {
        let client = OnemeterClient::with_base_url(api_key, device_id, &self.base_url)?;
        Ok(Arc::new(client))
    }
}
