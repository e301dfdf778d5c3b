//! Bulk (selection) actions.
//!
//! Descriptors marked eligible for bulk also appear in the console's
//! selection menu. A bulk run checks permission once, then applies the
//! handler to every selected object whose condition holds.

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

use objact_core::{ActionDescriptor, ConsoleObject, MessageLevel, RequestContext};

use crate::actions::ObjectActions;
use crate::error::ActionError;

/// Entry point registered in the host's bulk menu.
pub type BulkDispatch<O> =
    Arc<dyn Fn(&RequestContext, &[O]) -> Result<Option<BulkReport>, ActionError> + Send + Sync>;

/// One entry of the bulk action menu.
pub struct BulkAction<O> {
    pub identifier: String,
    pub label: String,
    dispatch: BulkDispatch<O>,
}

impl<O> BulkAction<O> {
    pub fn new(identifier: impl Into<String>, label: impl Into<String>, dispatch: BulkDispatch<O>) -> Self {
        Self {
            identifier: identifier.into(),
            label: label.into(),
            dispatch,
        }
    }

    /// Run the action over a selection.
    pub fn run(&self, ctx: &RequestContext, selection: &[O]) -> Result<Option<BulkReport>, ActionError> {
        (self.dispatch)(ctx, selection)
    }
}

impl<O> Clone for BulkAction<O> {
    fn clone(&self) -> Self {
        Self {
            identifier: self.identifier.clone(),
            label: self.label.clone(),
            dispatch: Arc::clone(&self.dispatch),
        }
    }
}

impl<O> fmt::Debug for BulkAction<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulkAction")
            .field("identifier", &self.identifier)
            .field("label", &self.label)
            .finish()
    }
}

/// Tally of one bulk run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BulkReport {
    /// Objects in the selection.
    pub selected: usize,
    /// Objects skipped because the condition failed.
    pub skipped: usize,
    /// Objects for which the handler reported the action applied.
    pub applied: usize,
}

/// Merge object actions into the host's bulk menu.
///
/// Entries keep the host's order, then the new ones; on an identifier
/// collision the object action replaces the host entry (last write wins).
pub fn merge_bulk_actions<O>(
    mut host: IndexMap<String, BulkAction<O>>,
    object_actions: IndexMap<String, BulkAction<O>>,
) -> IndexMap<String, BulkAction<O>> {
    for (identifier, action) in object_actions {
        if host.shift_remove(&identifier).is_some() {
            tracing::warn!(
                identifier = %identifier,
                "Object action replaces bulk action with the same identifier"
            );
        }
        host.insert(identifier, action);
    }
    host
}

impl<O: ConsoleObject + 'static> ObjectActions<O> {
    /// Bulk menu entries the request's user may see.
    ///
    /// Only the permission is checked; conditions are evaluated per object
    /// when the action runs.
    pub fn bulk_actions(&self, ctx: &RequestContext) -> IndexMap<String, BulkAction<O>> {
        self.registry()
            .iter()
            .filter(|descriptor| descriptor.eligible_for_bulk() && self.is_visible(descriptor, ctx))
            .map(|descriptor| {
                let actions = self.clone();
                let target = Arc::clone(descriptor);
                let dispatch: BulkDispatch<O> =
                    Arc::new(move |ctx: &RequestContext, selection: &[O]| {
                        actions.execute_bulk(&target, ctx, selection)
                    });
                (
                    descriptor.identifier().to_string(),
                    BulkAction::new(descriptor.identifier(), descriptor.label(), dispatch),
                )
            })
            .collect()
    }
}

impl<O: ConsoleObject> ObjectActions<O> {
    /// Apply one action to a selection.
    ///
    /// Returns `None` without touching anything when the user lacks the
    /// permission. A handler failure aborts the remaining objects and skips
    /// the completion step.
    pub fn execute_bulk(
        &self,
        descriptor: &ActionDescriptor<O>,
        ctx: &RequestContext,
        selection: &[O],
    ) -> Result<Option<BulkReport>, ActionError> {
        if !self.is_visible(descriptor, ctx) {
            tracing::debug!(
                identifier = %descriptor.identifier(),
                user = %ctx.user().username,
                "Bulk action refused: permission missing"
            );
            return Ok(None);
        }

        let mut report = BulkReport {
            selected: selection.len(),
            ..BulkReport::default()
        };

        for object in selection {
            if !descriptor.condition_met(ctx, Some(object)) {
                report.skipped += 1;
                continue;
            }
            if self.perform(descriptor, ctx, object)?.is_applied() {
                report.applied += 1;
            }
        }

        match descriptor.bulk_completion() {
            Some(hook) => hook(ctx, selection, report.applied).map_err(|source| {
                ActionError::BulkCompletion {
                    identifier: descriptor.identifier().to_string(),
                    source,
                }
            })?,
            None => {
                let message = format!(
                    "Applied '{}' on {} {}.",
                    descriptor.label(),
                    report.applied,
                    self.names().for_count(report.applied)
                );
                self.notifier().notify(ctx, &message, MessageLevel::Success);
            }
        }

        tracing::info!(
            identifier = %descriptor.identifier(),
            selected = report.selected,
            skipped = report.skipped,
            applied = report.applied,
            "Bulk action finished"
        );

        Ok(Some(report))
    }
}
