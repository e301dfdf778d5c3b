//! Resolved actions and the canonical resolution of one request.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;
use std::sync::Arc;

use objact_core::{ActionDescriptor, DisplaySlot, Phase};

/// Per-request decision for one descriptor.
///
/// Only visible actions are ever materialized, so a `ResolvedAction` always
/// passed its permission check. It is either enabled, or disabled and shown
/// because the descriptor asks for disabled display.
pub struct ResolvedAction<O> {
    descriptor: Arc<ActionDescriptor<O>>,
    enabled: bool,
}

impl<O> ResolvedAction<O> {
    pub(crate) fn new(descriptor: Arc<ActionDescriptor<O>>, enabled: bool) -> Self {
        Self {
            descriptor,
            enabled,
        }
    }

    pub fn descriptor(&self) -> &ActionDescriptor<O> {
        &self.descriptor
    }

    pub fn identifier(&self) -> &str {
        self.descriptor.identifier()
    }

    pub fn label(&self) -> &str {
        self.descriptor.label()
    }

    /// Always true: invisible actions are never resolved.
    pub fn visible(&self) -> bool {
        true
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn disabled(&self) -> bool {
        !self.enabled
    }

    pub fn phase(&self) -> Phase {
        self.descriptor.phase()
    }

    pub fn display_slot(&self) -> DisplaySlot {
        self.descriptor.display_slot()
    }
}

impl<O> Clone for ResolvedAction<O> {
    fn clone(&self) -> Self {
        Self {
            descriptor: Arc::clone(&self.descriptor),
            enabled: self.enabled,
        }
    }
}

impl<O> fmt::Debug for ResolvedAction<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedAction")
            .field("identifier", &self.identifier())
            .field("enabled", &self.enabled)
            .field("phase", &self.phase())
            .field("display_slot", &self.display_slot())
            .finish()
    }
}

/// Template view of a resolved action.
impl<O> Serialize for ResolvedAction<O> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let d = &self.descriptor;
        let mut state = serializer.serialize_struct("ResolvedAction", 8)?;
        state.serialize_field("identifier", d.identifier())?;
        state.serialize_field("label", d.label())?;
        state.serialize_field("disabled", &self.disabled())?;
        state.serialize_field("display_slot", &d.display_slot())?;
        state.serialize_field("phase", &d.phase())?;
        state.serialize_field("confirmation", &d.confirmation())?;
        state.serialize_field("extra_classes", d.extra_classes())?;
        state.serialize_field("log_template", &d.log_template())?;
        state.end()
    }
}

/// The single resolution pass for one request.
///
/// Rendering and both execution gates filter this one pass, so every part of
/// the request sees the same enabled/disabled state for every action.
pub struct Resolution<O> {
    actions: Vec<ResolvedAction<O>>,
}

impl<O> Resolution<O> {
    pub(crate) fn new(actions: Vec<ResolvedAction<O>>) -> Self {
        Self { actions }
    }

    /// All resolved actions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedAction<O>> {
        self.actions.iter()
    }

    /// Actions that execute in the given phase.
    pub fn for_phase(&self, phase: Phase) -> impl Iterator<Item = &ResolvedAction<O>> {
        self.actions.iter().filter(move |a| a.phase() == phase)
    }

    /// Actions that render in the given slot.
    pub fn for_slot(&self, slot: DisplaySlot) -> impl Iterator<Item = &ResolvedAction<O>> {
        self.actions.iter().filter(move |a| a.display_slot() == slot)
    }

    pub fn get(&self, identifier: &str) -> Option<&ResolvedAction<O>> {
        self.actions.iter().find(|a| a.identifier() == identifier)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl<O> Clone for Resolution<O> {
    fn clone(&self) -> Self {
        Self {
            actions: self.actions.clone(),
        }
    }
}

impl<O> fmt::Debug for Resolution<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.actions.iter()).finish()
    }
}
