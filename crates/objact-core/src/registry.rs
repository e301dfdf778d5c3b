//! Ordered action registry and the name catalog used to build one from
//! configuration.

use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::{ActionDeclaration, ConfigError, ConsoleConfig};
use crate::context::RequestContext;
use crate::descriptor::{
    ActionDescriptor, ActionDescriptorBuilder, ActionOutcome, BulkCompletion, Condition, Handler,
};

/// Actions attached to one console registration, keyed by identifier and
/// kept in declaration order.
///
/// Identifier collisions resolve last-write-wins: the later descriptor
/// replaces the earlier one and takes the later declaration position. A
/// warning is logged for every collision.
pub struct ActionRegistry<O> {
    actions: IndexMap<String, Arc<ActionDescriptor<O>>>,
}

impl<O> ActionRegistry<O> {
    pub fn new() -> Self {
        Self {
            actions: IndexMap::new(),
        }
    }

    /// Register a descriptor. Returns the descriptor it replaced, if any.
    pub fn register(&mut self, descriptor: ActionDescriptor<O>) -> Option<Arc<ActionDescriptor<O>>> {
        self.register_shared(Arc::new(descriptor))
    }

    pub fn register_shared(
        &mut self,
        descriptor: Arc<ActionDescriptor<O>>,
    ) -> Option<Arc<ActionDescriptor<O>>> {
        let identifier = descriptor.identifier().to_string();
        let replaced = self.actions.shift_remove(&identifier);
        if let Some(previous) = &replaced {
            tracing::warn!(
                identifier = %identifier,
                replaced_handler = %previous.handler_name(),
                handler = %descriptor.handler_name(),
                "Duplicate object action identifier, last registration wins"
            );
        }
        self.actions.insert(identifier, descriptor);
        replaced
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, descriptor: ActionDescriptor<O>) -> Self {
        self.register(descriptor);
        self
    }

    /// Merge another registry into this one, in its order, with the same
    /// last-write-wins policy.
    pub fn merge(&mut self, other: ActionRegistry<O>) {
        for (_, descriptor) in other.actions {
            self.register_shared(descriptor);
        }
    }

    pub fn get(&self, identifier: &str) -> Option<&Arc<ActionDescriptor<O>>> {
        self.actions.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.actions.contains_key(identifier)
    }

    /// Descriptors in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ActionDescriptor<O>>> {
        self.actions.values()
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Build a registry from a console configuration.
    ///
    /// Declarations naming a handler the catalog does not know are skipped
    /// with a warning. Unknown condition or completion hook names are
    /// errors, since skipping a condition would silently enable the action.
    pub fn from_config(
        config: &ConsoleConfig,
        catalog: &HandlerCatalog<O>,
    ) -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        for declaration in &config.actions {
            let Some(handler) = catalog.handler(&declaration.handler) else {
                tracing::warn!(
                    console = %config.console,
                    handler = %declaration.handler,
                    "Object action handler not found in catalog, skipping"
                );
                continue;
            };
            let descriptor = build_declared(declaration, Arc::clone(handler), catalog)?;
            registry.register(descriptor);
        }
        Ok(registry)
    }
}

fn build_declared<O>(
    declaration: &ActionDeclaration,
    handler: Handler<O>,
    catalog: &HandlerCatalog<O>,
) -> Result<ActionDescriptor<O>, ConfigError> {
    let mut builder =
        ActionDescriptorBuilder::from_handler(&declaration.handler, &declaration.label, handler)
            .disable_if_condition_not_met(declaration.disable_if_condition_not_met)
            .display_slot(declaration.display_slot)
            .phase(declaration.phase)
            .eligible_for_bulk(declaration.eligible_for_bulk)
            .extra_classes(declaration.extra_classes.iter().cloned());

    if let Some(identifier) = &declaration.identifier {
        builder = builder.identifier(identifier);
    }
    if let Some(permission) = &declaration.permission {
        builder = builder.permission(permission);
    }
    if let Some(name) = &declaration.condition {
        let condition = catalog.condition(name).ok_or_else(|| {
            ConfigError::Config(format!(
                "condition '{}' for handler '{}' is not in the catalog",
                name, declaration.handler
            ))
        })?;
        builder = builder.shared_condition(Arc::clone(condition));
    }
    if let Some(message) = &declaration.log_template {
        builder = builder.log_template(message);
    }
    if let Some(name) = &declaration.bulk_completion {
        let hook = catalog.bulk_completion(name).ok_or_else(|| {
            ConfigError::Config(format!(
                "bulk completion hook '{}' for handler '{}' is not in the catalog",
                name, declaration.handler
            ))
        })?;
        builder = builder.shared_bulk_completion(Arc::clone(hook));
    }
    if let Some(text) = &declaration.confirmation {
        builder = builder.confirmation(text);
    }

    builder.build()
}

impl<O> Default for ActionRegistry<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> fmt::Debug for ActionRegistry<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("count", &self.actions.len())
            .field("identifiers", &self.actions.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Named handlers, conditions and bulk completion hooks that configuration
/// files can refer to.
pub struct HandlerCatalog<O> {
    handlers: HashMap<String, Handler<O>>,
    conditions: HashMap<String, Condition<O>>,
    completions: HashMap<String, BulkCompletion<O>>,
}

impl<O> HandlerCatalog<O> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            conditions: HashMap::new(),
            completions: HashMap::new(),
        }
    }

    pub fn with_handler<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&RequestContext, &O) -> anyhow::Result<ActionOutcome> + Send + Sync + 'static,
    {
        self.handlers.insert(name.into(), Arc::new(handler));
        self
    }

    pub fn with_condition<F>(mut self, name: impl Into<String>, condition: F) -> Self
    where
        F: Fn(&RequestContext, &O) -> bool + Send + Sync + 'static,
    {
        self.conditions.insert(name.into(), Arc::new(condition));
        self
    }

    pub fn with_bulk_completion<F>(mut self, name: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&RequestContext, &[O], usize) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.completions.insert(name.into(), Arc::new(hook));
        self
    }

    pub fn handler(&self, name: &str) -> Option<&Handler<O>> {
        self.handlers.get(name)
    }

    pub fn condition(&self, name: &str) -> Option<&Condition<O>> {
        self.conditions.get(name)
    }

    pub fn bulk_completion(&self, name: &str) -> Option<&BulkCompletion<O>> {
        self.completions.get(name)
    }
}

impl<O> Default for HandlerCatalog<O> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{DisplaySlot, Phase};

    struct Ticket {
        open: bool,
    }

    fn close(_: &RequestContext, _: &Ticket) -> anyhow::Result<ActionOutcome> {
        Ok(ActionOutcome::Applied)
    }

    fn action(handler: &str, identifier: &str, label: &str) -> ActionDescriptor<Ticket> {
        ActionDescriptor::builder(handler, label, close)
            .identifier(identifier)
            .build()
            .unwrap()
    }

    fn labels(registry: &ActionRegistry<Ticket>) -> Vec<&str> {
        registry.iter().map(|d| d.label()).collect()
    }

    #[test]
    fn test_registry_keeps_declaration_order() {
        let registry = ActionRegistry::new()
            .with(action("close", "close", "Close"))
            .with(action("reopen", "reopen", "Reopen"))
            .with(action("escalate", "escalate", "Escalate"));

        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.identifiers().collect::<Vec<_>>(),
            vec!["close", "reopen", "escalate"]
        );
    }

    #[test]
    fn test_duplicate_identifier_last_wins() {
        let mut registry = ActionRegistry::new()
            .with(action("close", "close", "Close"))
            .with(action("reopen", "reopen", "Reopen"));

        let replaced = registry.register(action("close_v2", "close", "Close now"));
        assert_eq!(replaced.unwrap().label(), "Close");
        assert_eq!(registry.len(), 2);
        assert_eq!(labels(&registry), vec!["Reopen", "Close now"]);
        assert_eq!(registry.get("close").unwrap().handler_name(), "close_v2");
    }

    #[test]
    fn test_merge_applies_last_write_wins() {
        let mut host = ActionRegistry::new()
            .with(action("close", "close", "Close"))
            .with(action("reopen", "reopen", "Reopen"));
        let extra = ActionRegistry::new()
            .with(action("escalate", "escalate", "Escalate"))
            .with(action("close_hard", "close", "Close hard"));

        host.merge(extra);
        assert_eq!(labels(&host), vec!["Reopen", "Escalate", "Close hard"]);
    }

    fn catalog() -> HandlerCatalog<Ticket> {
        HandlerCatalog::new()
            .with_handler("close_ticket", close)
            .with_condition("is_open", |_, ticket: &Ticket| ticket.open)
            .with_bulk_completion("noop", |_, _: &[Ticket], _| Ok(()))
    }

    #[test]
    fn test_from_config_resolves_names_once() {
        let config = ConsoleConfig::from_yaml(
            r#"
console: tickets
actions:
  - handler: close_ticket
    identifier: close
    label: Close
    condition: is_open
    display_slot: before_fields
    phase: before_save
    bulk_completion: noop
  - handler: missing_handler
    label: Ghost
"#,
        )
        .unwrap();

        let registry = ActionRegistry::from_config(&config, &catalog()).unwrap();
        assert_eq!(registry.len(), 1);

        let close = registry.get("close").unwrap();
        assert!(close.has_condition());
        assert!(close.bulk_completion().is_some());
        assert_eq!(close.display_slot(), DisplaySlot::BeforeFields);
        assert_eq!(close.phase(), Phase::BeforeSave);
        assert!(!registry.contains("_missing_handler"));
    }

    #[test]
    fn test_from_config_unknown_condition_is_error() {
        let config = ConsoleConfig::from_yaml(
            r#"
console: tickets
actions:
  - handler: close_ticket
    label: Close
    condition: is_frozen
"#,
        )
        .unwrap();

        let result = ActionRegistry::from_config(&config, &catalog());
        assert!(matches!(result, Err(ConfigError::Config(_))));
    }

    #[test]
    fn test_from_config_unknown_completion_is_error() {
        let config = ConsoleConfig::from_yaml(
            r#"
console: tickets
actions:
  - handler: close_ticket
    label: Close
    bulk_completion: report
"#,
        )
        .unwrap();

        let result = ActionRegistry::from_config(&config, &catalog());
        assert!(matches!(result, Err(ConfigError::Config(_))));
    }
}
