//! Setup Flow Handler
//!
//! First-time configuration: collect the API key and device id, verify
//! them against the cloud, commit the config entry. The integration is
//! single-instance, so the flow aborts up front when an entry already
//! exists.
//!
//! State machine:
//!
//! ```text
//! start → show_form → (validating) → created
//!                                  ↘ show_form_with_error
//! start → aborted (entry already exists)
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{error, info};

use onemeter_config_entries::{ConfigEntry, ConfigEntryStore};
use onemeter_core::{MeterApiFactory, CONF_API_KEY, CONF_DEVICE_ID};

use crate::handler::{FlowError, FlowHandler, FlowInput};
use crate::result::{FlowResult, ABORT_SINGLE_INSTANCE, ERROR_AUTH};
use crate::schema::{FieldType, FormField, FormSchema};

/// Step id of the single setup form
pub const STEP_USER: &str = "user";

/// Drives the first-time setup of the integration.
///
/// One instance per user session; the store and API factory are injected.
pub struct SetupFlow {
    store: Arc<ConfigEntryStore>,
    factory: Arc<dyn MeterApiFactory>,
    errors: HashMap<String, String>,
}

impl SetupFlow {
    pub fn new(store: Arc<ConfigEntryStore>, factory: Arc<dyn MeterApiFactory>) -> Self {
        Self {
            store,
            factory,
            errors: HashMap::new(),
        }
    }

    /// Run the `user` step.
    ///
    /// Without input: render the credentials form. With input: validate,
    /// verify against the cloud and commit the entry, or re-render the
    /// form with `{"base": "auth"}` when verification fails.
    pub async fn step_user(
        &mut self,
        user_input: Option<FlowInput>,
    ) -> Result<FlowResult, FlowError> {
        self.errors.clear();

        // Single instance: checked before any form, input or not.
        if !self.store.is_empty() {
            return Ok(FlowResult::Abort {
                reason: ABORT_SINGLE_INSTANCE.to_string(),
            });
        }

        let Some(input) = user_input else {
            return Ok(self.show_form(None));
        };

        let validated = match self.schema(Some(&input)).validate(&input) {
            Ok(validated) => validated,
            Err(errors) => {
                self.errors = errors;
                return Ok(self.show_form(Some(&input)));
            }
        };

        let api_key = validated
            .get(CONF_API_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let device_id = validated
            .get(CONF_DEVICE_ID)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        if self.verify(&api_key, &device_id).await {
            let entry = ConfigEntry::new(&api_key).with_data(validated);
            let entry = self.store.add(entry).await?;

            info!("Setup complete, created config entry {}", entry.entry_id);
            return Ok(FlowResult::CreateEntry {
                title: Some(api_key),
                entry,
            });
        }

        self.errors
            .insert("base".to_string(), ERROR_AUTH.to_string());
        Ok(self.show_form(Some(&input)))
    }

    /// Verify the submitted credentials with a transient cloud client.
    ///
    /// The blocking fetch runs on a worker thread. Every failure - client
    /// construction, the call itself, or the worker task - is caught here,
    /// logged with its cause and reported as a plain `false`.
    async fn verify(&self, api_key: &str, device_id: &str) -> bool {
        let api = match self.factory.connect(api_key, device_id) {
            Ok(api) => api,
            Err(err) => {
                error!(error = %err, "Could not construct cloud client");
                return false;
            }
        };

        match tokio::task::spawn_blocking(move || api.fetch_device()).await {
            Ok(Ok(_)) => true,
            Ok(Err(err)) => {
                error!(error = %err, cause = ?err, "Credential verification failed");
                false
            }
            Err(err) => {
                error!(error = %err, "Verification worker task failed");
                false
            }
        }
    }

    /// Field table for the setup form. Previously submitted values come
    /// back as defaults so the user doesn't retype them after an error.
    fn schema(&self, submitted: Option<&FlowInput>) -> FormSchema {
        let default_for = |name: &str| submitted.and_then(|input| input.get(name).cloned());

        let mut api_key = FormField::new(CONF_API_KEY, FieldType::Str, true);
        if let Some(value) = default_for(CONF_API_KEY) {
            api_key = api_key.with_default(value);
        }

        let mut device_id = FormField::new(CONF_DEVICE_ID, FieldType::Str, true);
        if let Some(value) = default_for(CONF_DEVICE_ID) {
            device_id = device_id.with_default(value);
        }

        FormSchema::new(vec![api_key, device_id])
    }

    fn show_form(&self, submitted: Option<&FlowInput>) -> FlowResult {
        FlowResult::Form {
            step_id: STEP_USER.to_string(),
            data_schema: self.schema(submitted).fields,
            errors: self.errors.clone(),
        }
    }
}

#[async_trait]
impl FlowHandler for SetupFlow {
    async fn step(&mut self, user_input: Option<FlowInput>) -> Result<FlowResult, FlowError> {
        self.step_user(user_input).await
    }
}
