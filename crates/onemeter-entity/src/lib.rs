//! Coordinator and entity adapter
//!
//! [`MeterCoordinator`] polls the cloud on a fixed interval and holds the
//! last device snapshot. [`MeterEntity`] is the passive adapter a host
//! entity framework reads: identity, availability, poll suppression. The
//! entity never fetches anything itself.

pub mod coordinator;
pub mod entity;

pub use coordinator::MeterCoordinator;
pub use entity::{DeviceInfo, MeterEntity};
