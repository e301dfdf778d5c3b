//! Action descriptors.
//!
//! An [`ActionDescriptor`] is the static configuration of one triggerable
//! operation: the handler plus the metadata that decides when it is shown,
//! whether it is enabled, where it renders and when it runs relative to the
//! record being saved. Descriptors are built once through
//! [`ActionDescriptor::builder`] and shared read-only for the lifetime of the
//! console registration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::config::ConfigError;
use crate::context::{RequestContext, Response};

/// Handler body: runs the action against one object.
pub type Handler<O> = Arc<dyn Fn(&RequestContext, &O) -> anyhow::Result<ActionOutcome> + Send + Sync>;

/// Enablement predicate evaluated against the target object.
pub type Condition<O> = Arc<dyn Fn(&RequestContext, &O) -> bool + Send + Sync>;

/// Custom bulk-result handling: `(context, selection, applied_count)`.
pub type BulkCompletion<O> =
    Arc<dyn Fn(&RequestContext, &[O], usize) -> anyhow::Result<()> + Send + Sync>;

/// Where an action's control renders on the single-object page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplaySlot {
    /// Above the form fields.
    #[serde(alias = "before_fieldsets")]
    BeforeFields,
    /// Below the form fields.
    #[default]
    #[serde(alias = "after_fieldsets")]
    AfterFields,
    /// Below the related-object sections.
    #[serde(alias = "after_related_objects")]
    AfterRelated,
}

impl DisplaySlot {
    /// All slots in page order.
    pub const ALL: [DisplaySlot; 3] = [
        DisplaySlot::BeforeFields,
        DisplaySlot::AfterFields,
        DisplaySlot::AfterRelated,
    ];

    /// Key under which the template layer finds this slot's actions.
    pub fn context_key(self) -> &'static str {
        match self {
            Self::BeforeFields => "object_actions_before_fieldsets",
            Self::AfterFields => "object_actions_after_fieldsets",
            Self::AfterRelated => "object_actions_after_related_objects",
        }
    }
}

impl fmt::Display for DisplaySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeforeFields => write!(f, "before_fields"),
            Self::AfterFields => write!(f, "after_fields"),
            Self::AfterRelated => write!(f, "after_related"),
        }
    }
}

/// Execution order relative to persisting the target object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Runs before the object is saved and may replace the save entirely.
    BeforeSave,
    /// Runs once the object has been saved.
    #[default]
    AfterSave,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeforeSave => write!(f, "before_save"),
            Self::AfterSave => write!(f, "after_save"),
        }
    }
}

/// What a handler reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Nothing was done for this object.
    Skipped,
    /// The action was applied; the caller picks the response.
    Applied,
    /// The action was applied and produced its own response.
    Respond(Response),
}

impl ActionOutcome {
    /// Whether the handler counts as having applied the action.
    pub fn is_applied(&self) -> bool {
        !matches!(self, Self::Skipped)
    }

    /// The response artifact, if the handler produced one.
    pub fn into_response(self) -> Option<Response> {
        match self {
            Self::Respond(response) => Some(response),
            Self::Skipped | Self::Applied => None,
        }
    }
}

/// Static metadata plus handler for one object action.
pub struct ActionDescriptor<O> {
    identifier: String,
    handler_name: String,
    label: String,
    handler: Handler<O>,
    permission: Option<String>,
    condition: Option<Condition<O>>,
    disable_if_condition_not_met: bool,
    display_slot: DisplaySlot,
    phase: Phase,
    log_template: Option<String>,
    eligible_for_bulk: bool,
    bulk_completion: Option<BulkCompletion<O>>,
    confirmation: Option<String>,
    extra_classes: Vec<String>,
}

impl<O> ActionDescriptor<O> {
    /// Start describing an action backed by `handler`.
    ///
    /// `handler_name` names the handler; when no explicit identifier is
    /// given the trigger key is derived from it as `_<handler_name>`.
    pub fn builder<F>(
        handler_name: impl Into<String>,
        label: impl Into<String>,
        handler: F,
    ) -> ActionDescriptorBuilder<O>
    where
        F: Fn(&RequestContext, &O) -> anyhow::Result<ActionOutcome> + Send + Sync + 'static,
    {
        ActionDescriptorBuilder::from_handler(handler_name, label, Arc::new(handler))
    }

    /// Trigger key: the form field whose truthy value fires this action.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn handler_name(&self) -> &str {
        &self.handler_name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Permission key required to see the action, if any.
    pub fn permission(&self) -> Option<&str> {
        self.permission.as_deref()
    }

    pub fn has_condition(&self) -> bool {
        self.condition.is_some()
    }

    pub fn disable_if_condition_not_met(&self) -> bool {
        self.disable_if_condition_not_met
    }

    pub fn display_slot(&self) -> DisplaySlot {
        self.display_slot
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Message recorded against the object when the action fires.
    pub fn log_template(&self) -> Option<&str> {
        self.log_template.as_deref()
    }

    pub fn eligible_for_bulk(&self) -> bool {
        self.eligible_for_bulk
    }

    pub fn bulk_completion(&self) -> Option<&BulkCompletion<O>> {
        self.bulk_completion.as_ref()
    }

    pub fn confirmation(&self) -> Option<&str> {
        self.confirmation.as_deref()
    }

    pub fn extra_classes(&self) -> &[String] {
        &self.extra_classes
    }

    /// Evaluate the enablement condition.
    ///
    /// Without a condition the action is always enabled. With one, it is
    /// enabled only when an object is present and the condition holds.
    pub fn condition_met(&self, ctx: &RequestContext, object: Option<&O>) -> bool {
        match (&self.condition, object) {
            (None, _) => true,
            (Some(condition), Some(object)) => condition(ctx, object),
            (Some(_), None) => false,
        }
    }

    /// Run the handler.
    pub fn invoke(&self, ctx: &RequestContext, object: &O) -> anyhow::Result<ActionOutcome> {
        (self.handler)(ctx, object)
    }
}

impl<O> Clone for ActionDescriptor<O> {
    fn clone(&self) -> Self {
        Self {
            identifier: self.identifier.clone(),
            handler_name: self.handler_name.clone(),
            label: self.label.clone(),
            handler: Arc::clone(&self.handler),
            permission: self.permission.clone(),
            condition: self.condition.clone(),
            disable_if_condition_not_met: self.disable_if_condition_not_met,
            display_slot: self.display_slot,
            phase: self.phase,
            log_template: self.log_template.clone(),
            eligible_for_bulk: self.eligible_for_bulk,
            bulk_completion: self.bulk_completion.clone(),
            confirmation: self.confirmation.clone(),
            extra_classes: self.extra_classes.clone(),
        }
    }
}

impl<O> fmt::Debug for ActionDescriptor<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDescriptor")
            .field("identifier", &self.identifier)
            .field("handler_name", &self.handler_name)
            .field("label", &self.label)
            .field("permission", &self.permission)
            .field("has_condition", &self.condition.is_some())
            .field("disable_if_condition_not_met", &self.disable_if_condition_not_met)
            .field("display_slot", &self.display_slot)
            .field("phase", &self.phase)
            .field("log_template", &self.log_template)
            .field("eligible_for_bulk", &self.eligible_for_bulk)
            .field("has_bulk_completion", &self.bulk_completion.is_some())
            .finish()
    }
}

/// Builder for [`ActionDescriptor`].
///
/// Defaults: no permission, no condition, hidden (not disabled) when the
/// condition fails, [`DisplaySlot::AfterFields`], [`Phase::AfterSave`],
/// eligible for bulk.
pub struct ActionDescriptorBuilder<O> {
    identifier: Option<String>,
    handler_name: String,
    label: String,
    handler: Handler<O>,
    permission: Option<String>,
    condition: Option<Condition<O>>,
    disable_if_condition_not_met: bool,
    display_slot: DisplaySlot,
    phase: Phase,
    log_template: Option<String>,
    eligible_for_bulk: bool,
    bulk_completion: Option<BulkCompletion<O>>,
    confirmation: Option<String>,
    extra_classes: Vec<String>,
}

impl<O> ActionDescriptorBuilder<O> {
    /// Start from an already shared handler.
    pub fn from_handler(
        handler_name: impl Into<String>,
        label: impl Into<String>,
        handler: Handler<O>,
    ) -> Self {
        Self {
            identifier: None,
            handler_name: handler_name.into(),
            label: label.into(),
            handler,
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

    /// Explicit trigger key. Takes precedence over the derived one.
    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    pub fn condition<F>(self, condition: F) -> Self
    where
        F: Fn(&RequestContext, &O) -> bool + Send + Sync + 'static,
    {
        self.shared_condition(Arc::new(condition))
    }

    pub fn shared_condition(mut self, condition: Condition<O>) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Show the action disabled instead of hiding it when the condition fails.
    pub fn disable_if_condition_not_met(mut self, disable: bool) -> Self {
        self.disable_if_condition_not_met = disable;
        self
    }

    pub fn display_slot(mut self, slot: DisplaySlot) -> Self {
        self.display_slot = slot;
        self
    }

    pub fn phase(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }

    pub fn log_template(mut self, message: impl Into<String>) -> Self {
        self.log_template = Some(message.into());
        self
    }

    pub fn eligible_for_bulk(mut self, eligible: bool) -> Self {
        self.eligible_for_bulk = eligible;
        self
    }

    pub fn bulk_completion<F>(self, hook: F) -> Self
    where
        F: Fn(&RequestContext, &[O], usize) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.shared_bulk_completion(Arc::new(hook))
    }

    pub fn shared_bulk_completion(mut self, hook: BulkCompletion<O>) -> Self {
        self.bulk_completion = Some(hook);
        self
    }

    /// Prompt shown before the action is submitted.
    pub fn confirmation(mut self, text: impl Into<String>) -> Self {
        self.confirmation = Some(text.into());
        self
    }

    pub fn extra_class(mut self, class: impl Into<String>) -> Self {
        self.extra_classes.push(class.into());
        self
    }

    pub fn extra_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_classes.extend(classes.into_iter().map(Into::into));
        self
    }

    /// Finish the descriptor, validating its trigger key.
    pub fn build(self) -> Result<ActionDescriptor<O>, ConfigError> {
        if self.handler_name.trim().is_empty() {
            return Err(ConfigError::InvalidDescriptor(
                "handler name must not be empty".to_string(),
            ));
        }

        let identifier = match self.identifier {
            Some(identifier) => identifier,
            None => derive_identifier(&self.handler_name),
        };
        validate_identifier(&identifier)?;

        Ok(ActionDescriptor {
            identifier,
            handler_name: self.handler_name,
            label: self.label,
            handler: self.handler,
            permission: self.permission,
            condition: self.condition,
            disable_if_condition_not_met: self.disable_if_condition_not_met,
            display_slot: self.display_slot,
            phase: self.phase,
            log_template: self.log_template,
            eligible_for_bulk: self.eligible_for_bulk,
            bulk_completion: self.bulk_completion,
            confirmation: self.confirmation,
            extra_classes: self.extra_classes,
        })
    }
}

/// Trigger key used when none is given: `_<handler_name>`.
pub fn derive_identifier(handler_name: &str) -> String {
    format!("_{}", handler_name)
}

/// Check that a trigger key is usable as a form field name.
pub fn validate_identifier(identifier: &str) -> Result<(), ConfigError> {
    if identifier.is_empty() {
        return Err(ConfigError::InvalidDescriptor(
            "identifier must not be empty".to_string(),
        ));
    }
    if let Some(bad) = identifier
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        return Err(ConfigError::InvalidDescriptor(format!(
            "identifier '{}' contains invalid character '{}'",
            identifier, bad
        )));
    }
    Ok(())
}
