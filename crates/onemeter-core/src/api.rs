//! Cloud API collaborator traits
//!
//! The flow handlers and the coordinator only ever talk to the cloud
//! through these traits. The real implementation lives in `onemeter-api`;
//! tests substitute their own.

use std::sync::Arc;

use crate::error::ApiResult;
use crate::DeviceSnapshot;

/// A connected cloud API client for one meter device.
///
/// `fetch_device` is blocking; callers on an async runtime must dispatch
/// it to a worker thread (`tokio::task::spawn_blocking`).
pub trait MeterApi: Send + Sync {
    /// Host the client talks to, used as the device identifier.
    fn host(&self) -> &str;

    /// Fetch the device metadata. Returns the raw payload on success and
    /// an [`ApiError`](crate::ApiError) on any failure (auth, network,
    /// timeout, malformed body).
    fn fetch_device(&self) -> ApiResult<DeviceSnapshot>;
}

/// Builds a transient [`MeterApi`] client from submitted credentials.
///
/// The setup flow constructs one client per form submission; nothing is
/// cached between attempts.
pub trait MeterApiFactory: Send + Sync {
    fn connect(&self, api_key: &str, device_id: &str) -> ApiResult<Arc<dyn MeterApi>>;
}
