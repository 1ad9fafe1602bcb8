//! Entity adapter
//!
//! Binds the coordinator's last snapshot to a displayable device entity.
//! Read-only: the host entity framework queries identity, availability
//! and the poll-suppression flag.

use std::sync::Arc;

use serde::Serialize;

use onemeter_core::{DOMAIN, NAME, VERSION};

use crate::coordinator::MeterCoordinator;

/// Device identity, used by the host to group entities under one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    /// (domain, host) identifier pair
    pub identifiers: (String, String),
    pub name: String,
    pub model: String,
    pub manufacturer: String,
}

/// The meter entity exposed to the host entity framework.
pub struct MeterEntity {
    coordinator: Arc<MeterCoordinator>,
    entry_id: String,
}

impl MeterEntity {
    pub fn new(coordinator: Arc<MeterCoordinator>, entry_id: impl Into<String>) -> Self {
        Self {
            coordinator,
            entry_id: entry_id.into(),
        }
    }

    /// Config entry this entity belongs to.
    pub fn entry_id(&self) -> &str {
        &self.entry_id
    }

    /// Stable device identity for the host's device registry.
    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            identifiers: (DOMAIN.to_string(), self.coordinator.host().to_string()),
            name: NAME.to_string(),
            model: VERSION.to_string(),
            manufacturer: NAME.to_string(),
        }
    }

    /// Available once the coordinator has produced any data.
    pub async fn available(&self) -> bool {
        self.coordinator.has_data().await
    }

    /// Never polled by the host's generic polling loop; the coordinator
    /// pushes updates.
    pub fn should_poll(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onemeter_core::{ApiResult, DeviceSnapshot, MeterApi};
    use serde_json::json;
    use std::time::Duration;

    struct StaticApi;

    impl MeterApi for StaticApi {
        fn host(&self) -> &str {
            "cloud.onemeter.com"
        }

        fn fetch_device(&self) -> ApiResult<DeviceSnapshot> {
            Ok(DeviceSnapshot::new())
        }
    }

    fn entity() -> (Arc<MeterCoordinator>, MeterEntity) {
        let coordinator = Arc::new(MeterCoordinator::new(
            Arc::new(StaticApi),
            Duration::from_secs(3600),
        ));
        let entity = MeterEntity::new(coordinator.clone(), "entry-1");
        (coordinator, entity)
    }

    #[tokio::test]
    async fn test_device_info() {
        let (_coordinator, entity) = entity();

        let info = entity.device_info();
        assert_eq!(
            info.identifiers,
            (DOMAIN.to_string(), "cloud.onemeter.com".to_string())
        );
        assert_eq!(info.name, NAME);
        assert_eq!(info.manufacturer, NAME);
        assert_eq!(info.model, VERSION);
    }

    #[tokio::test]
    async fn test_available_tracks_snapshot() {
        let (coordinator, entity) = entity();

        // No snapshot yet.
        assert!(!entity.available().await);

        // Empty snapshot is still unavailable.
        coordinator.set_data(Some(DeviceSnapshot::new())).await;
        assert!(!entity.available().await);

        // Any non-empty snapshot makes it available.
        let mut snapshot = DeviceSnapshot::new();
        snapshot.insert("reading".to_string(), json!(42));
        coordinator.set_data(Some(snapshot)).await;
        assert!(entity.available().await);

        // And back to unavailable when the data goes away.
        coordinator.set_data(None).await;
        assert!(!entity.available().await);
    }

    #[tokio::test]
    async fn test_should_poll_always_false() {
        let (coordinator, entity) = entity();

        assert!(!entity.should_poll());

        let mut snapshot = DeviceSnapshot::new();
        snapshot.insert("reading".to_string(), json!(42));
        coordinator.set_data(Some(snapshot)).await;
        assert!(!entity.should_poll());
    }
}
