//! Configuration types for object action consoles.
//!
//! A console registration can be declared in YAML instead of code. Handlers,
//! conditions and bulk completion hooks are referenced by name and resolved
//! once against a [`HandlerCatalog`](crate::registry::HandlerCatalog) when the
//! registry is built.
//!
//! ```yaml
//! console: orders
//! object_name: order
//! actions:
//!   - handler: archive_order
//!     identifier: archive
//!     label: Archive
//!     permission: orders.archive
//!     log_template: archived
//! ```

pub mod actions;
pub mod audit;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use actions::ActionDeclaration;
pub use audit::AuditConfig;

use crate::console::ObjectNames;

/// One console registration: the object type and its actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Console (model admin) name, used in change logs.
    pub console: String,

    /// Singular display name of the managed object type.
    #[serde(default = "default_object_name")]
    pub object_name: String,

    /// Plural display name. Defaults to `object_name` + "s".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_name_plural: Option<String>,

    /// Action declarations, in display and evaluation order.
    #[serde(default)]
    pub actions: Vec<ActionDeclaration>,

    /// Change log configuration.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            console: "default".to_string(),
            object_name: default_object_name(),
            object_name_plural: None,
            actions: Vec::new(),
            audit: AuditConfig::default(),
        }
    }
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid action descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ConsoleConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Display names for the managed object type.
    pub fn object_names(&self) -> ObjectNames {
        match &self.object_name_plural {
            Some(plural) => ObjectNames::new(self.object_name.clone(), plural.clone()),
            None => ObjectNames::regular(self.object_name.clone()),
        }
    }

    /// Look up a declaration by its effective identifier.
    ///
    /// With duplicate identifiers the last declaration wins, matching the
    /// registry's collision policy.
    pub fn get_action(&self, identifier: &str) -> Option<&ActionDeclaration> {
        self.actions
            .iter()
            .rev()
            .find(|action| action.effective_identifier() == identifier)
    }
}

fn default_object_name() -> String {
    "object".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{DisplaySlot, Phase};

    const ORDERS: &str = r#"
console: orders
object_name: order
actions:
  - handler: archive_order
    identifier: archive
    label: Archive
    permission: orders.archive
    log_template: archived
  - handler: refund_order
    label: Refund
    condition: is_paid
    display_as_disabled_if_condition_not_met: true
    display_position: before_fieldsets
    phase: before_save
    eligible_for_bulk: false
    confirmation: Refund this order?
    extra_classes: [danger]
"#;

    #[test]
    fn test_parse_console_config() {
        let config = ConsoleConfig::from_yaml(ORDERS).unwrap();
        assert_eq!(config.console, "orders");
        assert_eq!(config.actions.len(), 2);

        let archive = &config.actions[0];
        assert_eq!(archive.effective_identifier(), "archive");
        assert_eq!(archive.permission.as_deref(), Some("orders.archive"));
        assert_eq!(archive.log_template.as_deref(), Some("archived"));
        assert_eq!(archive.display_slot, DisplaySlot::AfterFields);
        assert_eq!(archive.phase, Phase::AfterSave);
        assert!(archive.eligible_for_bulk);

        let refund = &config.actions[1];
        assert_eq!(refund.effective_identifier(), "_refund_order");
        assert!(refund.disable_if_condition_not_met);
        assert_eq!(refund.display_slot, DisplaySlot::BeforeFields);
        assert_eq!(refund.phase, Phase::BeforeSave);
        assert!(!refund.eligible_for_bulk);
        assert_eq!(refund.extra_classes, vec!["danger".to_string()]);
    }

    #[test]
    fn test_object_names_default_plural() {
        let config = ConsoleConfig::from_yaml(ORDERS).unwrap();
        let names = config.object_names();
        assert_eq!(names.singular, "order");
        assert_eq!(names.plural, "orders");

        let config = ConsoleConfig::from_yaml(
            "console: categories\nobject_name: category\nobject_name_plural: categories\n",
        )
        .unwrap();
        assert_eq!(config.object_names().plural, "categories");
    }

    #[test]
    fn test_get_action_last_declaration_wins() {
        let config = ConsoleConfig::from_yaml(
            r#"
console: orders
actions:
  - handler: first
    identifier: go
    label: First
  - handler: second
    identifier: go
    label: Second
"#,
        )
        .unwrap();
        assert_eq!(config.get_action("go").unwrap().label, "Second");
        assert!(config.get_action("missing").is_none());
    }

    #[test]
    fn test_unknown_slot_is_parse_error() {
        let result = ConsoleConfig::from_yaml(
            "console: orders\nactions:\n  - handler: a\n    label: A\n    display_slot: sidebar\n",
        );
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_default_config_matches_schema() {
        let mut config = ConsoleConfig::from_yaml(ORDERS).unwrap();
        config.audit = AuditConfig::default();

        let instance = serde_json::to_value(&config).expect("config must serialize");
        let schema: serde_json::Value =
            serde_json::from_str(include_str!("../../../../schemas/ConsoleConfig.schema.json"))
                .expect("schema must parse");

        let validator = jsonschema::draft202012::options()
            .build(&schema)
            .expect("schema must compile");

        if !validator.is_valid(&instance) {
            let mut msgs = Vec::new();
            for (idx, err) in validator.iter_errors(&instance).take(20).enumerate() {
                msgs.push(format!("{}: {}", idx + 1, err));
            }
            panic!("console config did not validate: {}", msgs.join("; "));
        }
    }
}
