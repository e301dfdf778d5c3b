//! Render context handed to the change form template.

use serde::Serialize;
use serde_json::{Map, Value};

use objact_core::DisplaySlot;

use crate::resolver::{Resolution, ResolvedAction};

/// Resolved actions split by display slot, in declaration order.
///
/// The template layer renders one submit control per action, named by the
/// action's identifier.
#[derive(Debug, Serialize)]
#[serde(bound = "")]
pub struct RenderContext<O> {
    #[serde(rename = "object_actions_before_fieldsets")]
    pub before_fields: Vec<ResolvedAction<O>>,
    #[serde(rename = "object_actions_after_fieldsets")]
    pub after_fields: Vec<ResolvedAction<O>>,
    #[serde(rename = "object_actions_after_related_objects")]
    pub after_related: Vec<ResolvedAction<O>>,
}

impl<O> RenderContext<O> {
    pub fn from_resolution(resolution: &Resolution<O>) -> Self {
        let collect = |slot| resolution.for_slot(slot).cloned().collect::<Vec<_>>();
        Self {
            before_fields: collect(DisplaySlot::BeforeFields),
            after_fields: collect(DisplaySlot::AfterFields),
            after_related: collect(DisplaySlot::AfterRelated),
        }
    }

    pub fn slot(&self, slot: DisplaySlot) -> &[ResolvedAction<O>] {
        match slot {
            DisplaySlot::BeforeFields => &self.before_fields,
            DisplaySlot::AfterFields => &self.after_fields,
            DisplaySlot::AfterRelated => &self.after_related,
        }
    }

    /// Populate a template context map, one key per slot.
    pub fn insert_into(&self, context: &mut Map<String, Value>) -> Result<(), serde_json::Error> {
        for slot in DisplaySlot::ALL {
            context.insert(
                slot.context_key().to_string(),
                serde_json::to_value(self.slot(slot))?,
            );
        }
        Ok(())
    }
}
