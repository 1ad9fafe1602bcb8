//! Flow step results

use std::collections::HashMap;

use serde::Serialize;

use onemeter_config_entries::ConfigEntry;

use crate::schema::FormField;

/// Abort reason: an entry already exists for this installation.
pub const ABORT_SINGLE_INSTANCE: &str = "single_instance_allowed";

/// Error code shown when credential verification fails, whatever the
/// underlying cause.
pub const ERROR_AUTH: &str = "auth";

/// Result of a config flow step
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlowResult {
    /// Show (or re-show) a form to the user
    Form {
        /// Current step ID
        step_id: String,
        /// Field schema for the form
        data_schema: Vec<FormField>,
        /// Errors from the previous submission, field name to error code
        errors: HashMap<String, String>,
    },

    /// The flow finished and committed an entry
    CreateEntry {
        /// Display title; for options updates this may be absent
        title: Option<String>,
        /// The committed entry
        entry: ConfigEntry,
    },

    /// The flow terminated without showing a form
    Abort {
        /// Machine-readable abort reason
        reason: String,
    },
}

impl FlowResult {
    pub fn is_form(&self) -> bool {
        matches!(self, FlowResult::Form { .. })
    }

    pub fn is_create_entry(&self) -> bool {
        matches!(self, FlowResult::CreateEntry { .. })
    }

    pub fn is_abort(&self) -> bool {
        matches!(self, FlowResult::Abort { .. })
    }
}
