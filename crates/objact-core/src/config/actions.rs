//! Declarative form of an action descriptor.

use serde::{Deserialize, Serialize};

use crate::descriptor::{DisplaySlot, Phase, derive_identifier};

/// One action as declared in a console configuration file.
///
/// Mirrors every [`ActionDescriptor`](crate::descriptor::ActionDescriptor)
/// field. The handler, condition and completion hook are names looked up
/// in a [`HandlerCatalog`](crate::registry::HandlerCatalog).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDeclaration {
    /// Name of the handler in the catalog.
    pub handler: String,

    /// Trigger key. Derived from the handler name when omitted.
    #[serde(default, alias = "parameter_name", skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    /// User-facing label.
    pub label: String,

    /// Permission key required to see the action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<String>,

    /// Name of the enablement condition in the catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,

    /// Show disabled instead of hiding when the condition fails.
    #[serde(default, alias = "display_as_disabled_if_condition_not_met")]
    pub disable_if_condition_not_met: bool,

    #[serde(default, alias = "display_position")]
    pub display_slot: DisplaySlot,

    #[serde(default)]
    pub phase: Phase,

    /// Message recorded against the object when the action fires.
    #[serde(default, alias = "log_message", skip_serializing_if = "Option::is_none")]
    pub log_template: Option<String>,

    /// Whether the action is offered in the bulk selection menu.
    #[serde(default = "default_true")]
    pub eligible_for_bulk: bool,

    /// Name of the bulk completion hook in the catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bulk_completion: Option<String>,

    /// Confirmation prompt shown before submitting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<String>,

    /// Extra CSS classes for the rendered control.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_classes: Vec<String>,
}

impl ActionDeclaration {
    /// A declaration with every optional field at its default.
    pub fn new(handler: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            handler: handler.into(),
            identifier: None,
            label: label.into(),
            permission: None,
            condition: None,
            disable_if_condition_not_met: false,
            display_slot: DisplaySlot::default(),
            phase: Phase::default(),
            log_template: None,
            eligible_for_bulk: true,
            bulk_completion: None,
            confirmation: None,
            extra_classes: Vec::new(),
        }
    }

    /// Identifier the action will be registered under.
    pub fn effective_identifier(&self) -> String {
        match &self.identifier {
            Some(identifier) => identifier.clone(),
            None => derive_identifier(&self.handler),
        }
    }
}

fn default_true() -> bool {
    true
}
