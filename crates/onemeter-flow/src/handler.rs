//! Flow Handler Trait
//!
//! Common interface over the setup and options flows so a host can drive
//! either one step at a time.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use onemeter_config_entries::StoreError;

use crate::result::FlowResult;

/// Raw form input: field name to submitted JSON value.
pub type FlowInput = HashMap<String, Value>;

/// Errors a flow step can surface to the host.
///
/// Validation and verification failures never appear here - those come
/// back inside [`FlowResult::Form`] as field errors. This covers the
/// commit path only.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Trait for driving a configuration flow
///
/// A step with no input renders the form; a step with input processes the
/// submission and either finishes the flow or re-renders with errors.
#[async_trait]
pub trait FlowHandler: Send {
    async fn step(&mut self, user_input: Option<FlowInput>) -> Result<FlowResult, FlowError>;
}
