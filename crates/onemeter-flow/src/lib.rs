//! Config and options flows
//!
//! The two-step setup/options negotiation of the OneMeter integration:
//!
//! - [`SetupFlow`] - first-time configuration: collects the API key and
//!   device id, verifies them against the cloud, commits the config
//!   entry. Aborts when an entry already exists (single instance).
//! - [`OptionsFlow`] - post-setup reconfiguration of the sync interval,
//!   merged into the existing entry's options.
//!
//! Both implement [`FlowHandler`] so a host can drive either through the
//! same interface. Each step awaits the cloud verification, which runs
//! under `spawn_blocking` so the blocking call never stalls the runtime.

pub mod handler;
pub mod options;
pub mod result;
pub mod schema;
pub mod setup;

pub use handler::{FlowError, FlowHandler, FlowInput};
pub use options::OptionsFlow;
pub use result::{FlowResult, ABORT_SINGLE_INSTANCE, ERROR_AUTH};
pub use schema::{FieldType, FormField, FormSchema};
pub use setup::SetupFlow;
