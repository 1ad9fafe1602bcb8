//! Options Flow Handler
//!
//! Post-setup reconfiguration of the polling interval. Bound to the
//! existing config entry; the submitted fields are shallow-merged into a
//! working copy of its options and committed in one step.
//!
//! State machine: `init → show_form → (submitted) → updated`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use onemeter_config_entries::{ConfigEntry, ConfigEntryStore};
use onemeter_core::{CONF_SYNC_INTERVAL, DEFAULT_SYNC_INTERVAL};

use crate::handler::{FlowError, FlowHandler, FlowInput};
use crate::result::FlowResult;
use crate::schema::{FieldType, FormField, FormSchema};

/// Step id of the single options form
pub const STEP_USER: &str = "user";

/// Drives reconfiguration of an existing config entry.
pub struct OptionsFlow {
    store: Arc<ConfigEntryStore>,
    entry: ConfigEntry,
    options: HashMap<String, Value>,
}

impl OptionsFlow {
    /// Bind the flow to an existing entry. The working options map starts
    /// as a copy of the entry's current options.
    pub fn new(store: Arc<ConfigEntryStore>, entry: ConfigEntry) -> Self {
        let options = entry.options.clone();
        Self {
            store,
            entry,
            options,
        }
    }

    /// Entry step; goes straight to the form.
    pub async fn step_init(
        &mut self,
        user_input: Option<FlowInput>,
    ) -> Result<FlowResult, FlowError> {
        self.step_user(user_input).await
    }

    /// Run the `user` step: render the interval form, or merge the
    /// submission into the options and commit.
    pub async fn step_user(
        &mut self,
        user_input: Option<FlowInput>,
    ) -> Result<FlowResult, FlowError> {
        let Some(input) = user_input else {
            return Ok(self.show_form(HashMap::new()));
        };

        let validated = match self.schema().validate(&input) {
            Ok(validated) => validated,
            Err(errors) => return Ok(self.show_form(errors)),
        };

        // Shallow merge: submitted keys overwrite, everything else stays.
        self.options.extend(validated);

        let updated = self
            .store
            .update_options(&self.entry.entry_id, self.options.clone())
            .await?;

        info!(
            "Updated options for config entry {}",
            self.entry.entry_id
        );

        // The completion title reads the interval from the entry's data
        // map, not the freshly written options. Data normally has no such
        // key, so the title is normally absent.
        let title = self
            .entry
            .data
            .get(CONF_SYNC_INTERVAL)
            .map(render_title);

        Ok(FlowResult::CreateEntry {
            title,
            entry: updated,
        })
    }

    /// Field table for the options form: one interval field, pre-filled
    /// with the current stored value or the default.
    fn schema(&self) -> FormSchema {
        let default = self
            .options
            .get(CONF_SYNC_INTERVAL)
            .cloned()
            .unwrap_or_else(|| Value::from(DEFAULT_SYNC_INTERVAL));

        FormSchema::new(vec![
            FormField::new(CONF_SYNC_INTERVAL, FieldType::Int, true).with_default(default),
        ])
    }

    fn show_form(&self, errors: HashMap<String, String>) -> FlowResult {
        FlowResult::Form {
            step_id: STEP_USER.to_string(),
            data_schema: self.schema().fields,
            errors,
        }
    }
}

fn render_title(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl FlowHandler for OptionsFlow {
    async fn step(&mut self, user_input: Option<FlowInput>) -> Result<FlowResult, FlowError> {
        self.step_init(user_input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onemeter_config_entries::Storage;
    use serde_json::json;
    use tempfile::TempDir;

    async fn store_with_entry(
        options: &[(&str, Value)],
    ) -> (TempDir, Arc<ConfigEntryStore>, ConfigEntry) {
        let temp_dir = TempDir::new().unwrap();
        let storage = Arc::new(Storage::new(temp_dir.path()));
        let store = Arc::new(ConfigEntryStore::new(storage));

        let mut data = HashMap::new();
        data.insert("api_key".to_string(), json!("my-key"));
        data.insert("device_id".to_string(), json!("meter-001"));

        let options: HashMap<String, Value> = options
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();

        let entry = store
            .add(
                ConfigEntry::new("my-key")
                    .with_data(data)
                    .with_options(options),
            )
            .await
            .unwrap();

        (temp_dir, store, entry)
    }

    fn interval_input(value: Value) -> FlowInput {
        let mut input = FlowInput::new();
        input.insert(CONF_SYNC_INTERVAL.to_string(), value);
        input
    }

    #[tokio::test]
    async fn test_form_default_is_constant_when_unset() {
        let (_dir, store, entry) = store_with_entry(&[]).await;
        let mut flow = OptionsFlow::new(store, entry);

        let result = flow.step_init(None).await.unwrap();
        match result {
            FlowResult::Form {
                step_id,
                data_schema,
                errors,
            } => {
                assert_eq!(step_id, STEP_USER);
                assert!(errors.is_empty());
                assert_eq!(data_schema.len(), 1);
                assert_eq!(data_schema[0].name, CONF_SYNC_INTERVAL);
                assert_eq!(data_schema[0].default, Some(json!(DEFAULT_SYNC_INTERVAL)));
            }
            other => panic!("expected form, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_form_default_reflects_stored_value() {
        let (_dir, store, entry) =
            store_with_entry(&[(CONF_SYNC_INTERVAL, json!(60))]).await;
        let mut flow = OptionsFlow::new(store, entry);

        let result = flow.step_init(None).await.unwrap();
        match result {
            FlowResult::Form { data_schema, .. } => {
                assert_eq!(data_schema[0].default, Some(json!(60)));
            }
            other => panic!("expected form, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_with_no_prior_options() {
        let (_dir, store, entry) = store_with_entry(&[]).await;
        let entry_id = entry.entry_id.clone();
        let mut flow = OptionsFlow::new(store.clone(), entry);

        let result = flow.step_init(Some(interval_input(json!(120)))).await.unwrap();
        match result {
            FlowResult::CreateEntry { entry, .. } => {
                assert_eq!(entry.options.len(), 1);
                assert_eq!(entry.options.get(CONF_SYNC_INTERVAL), Some(&json!(120)));
            }
            other => panic!("expected create_entry, got {other:?}"),
        }

        // Committed to the store too.
        let stored = store.get(&entry_id).unwrap();
        assert_eq!(stored.sync_interval(), 120);
    }

    #[tokio::test]
    async fn test_update_preserves_other_options() {
        let (_dir, store, entry) =
            store_with_entry(&[(CONF_SYNC_INTERVAL, json!(60)), ("x", json!(1))]).await;
        let mut flow = OptionsFlow::new(store, entry);

        let result = flow.step_init(Some(interval_input(json!(120)))).await.unwrap();
        match result {
            FlowResult::CreateEntry { entry, .. } => {
                assert_eq!(entry.options.get(CONF_SYNC_INTERVAL), Some(&json!(120)));
                assert_eq!(entry.options.get("x"), Some(&json!(1)));
            }
            other => panic!("expected create_entry, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_string_interval_coerced() {
        let (_dir, store, entry) = store_with_entry(&[]).await;
        let mut flow = OptionsFlow::new(store, entry);

        let result = flow
            .step_init(Some(interval_input(json!("120"))))
            .await
            .unwrap();
        match result {
            FlowResult::CreateEntry { entry, .. } => {
                assert_eq!(entry.options.get(CONF_SYNC_INTERVAL), Some(&json!(120)));
            }
            other => panic!("expected create_entry, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_coercion_failure_reshows_form() {
        let (_dir, store, entry) = store_with_entry(&[(CONF_SYNC_INTERVAL, json!(60))]).await;
        let entry_id = entry.entry_id.clone();
        let mut flow = OptionsFlow::new(store.clone(), entry);

        let result = flow
            .step_init(Some(interval_input(json!("abc"))))
            .await
            .unwrap();
        match result {
            FlowResult::Form { errors, .. } => {
                assert_eq!(
                    errors.get(CONF_SYNC_INTERVAL).map(String::as_str),
                    Some(crate::schema::ERROR_INVALID_INT)
                );
            }
            other => panic!("expected form, got {other:?}"),
        }

        // Stored options untouched.
        let stored = store.get(&entry_id).unwrap();
        assert_eq!(stored.sync_interval(), 60);
    }

    #[tokio::test]
    async fn test_title_reads_entry_data_not_options() {
        // Data has no interval key, so the title stays absent even though
        // the options just got one.
        let (_dir, store, entry) = store_with_entry(&[]).await;
        let mut flow = OptionsFlow::new(store, entry);

        let result = flow.step_init(Some(interval_input(json!(120)))).await.unwrap();
        match result {
            FlowResult::CreateEntry { title, .. } => assert_eq!(title, None),
            other => panic!("expected create_entry, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_negative_interval_accepted() {
        let (_dir, store, entry) = store_with_entry(&[]).await;
        let mut flow = OptionsFlow::new(store, entry);

        let result = flow.step_init(Some(interval_input(json!(-10)))).await.unwrap();
        assert!(result.is_create_entry());
    }
}
