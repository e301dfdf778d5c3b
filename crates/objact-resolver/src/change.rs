//! Single-object execution gates.
//!
//! A [`ChangeRequest`] holds the one resolution computed for a change form
//! request. The pre-save gate, the post-save gate and the render context
//! are all filters over it.

use objact_core::{ConsoleObject, ObjectStore, Phase, RequestContext, Response};

use crate::actions::ObjectActions;
use crate::error::ActionError;
use crate::render::RenderContext;
use crate::resolver::{Resolution, ResolvedAction};

/// How a submitted change form ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// A before-save action answered; the object was not saved.
    ShortCircuit(Response),
    /// The object was saved and an after-save action fired.
    Action(Response),
    /// The object was saved and no action fired; the host responds as usual.
    Saved,
}

impl ChangeOutcome {
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::ShortCircuit(response) | Self::Action(response) => Some(response),
            Self::Saved => None,
        }
    }
}

/// Per-request view of the object actions for one change form.
pub struct ChangeRequest<'a, O> {
    actions: &'a ObjectActions<O>,
    ctx: &'a RequestContext,
    resolution: Resolution<O>,
}

impl<'a, O: ConsoleObject> ChangeRequest<'a, O> {
    pub(crate) fn new(
        actions: &'a ObjectActions<O>,
        ctx: &'a RequestContext,
        resolution: Resolution<O>,
    ) -> Self {
        Self {
            actions,
            ctx,
            resolution,
        }
    }

    pub fn resolution(&self) -> &Resolution<O> {
        &self.resolution
    }

    /// First triggered, enabled action of the phase, in declared order.
    fn triggered(&self, phase: Phase) -> Option<&ResolvedAction<O>> {
        self.resolution
            .for_phase(phase)
            .find(|action| self.ctx.is_triggered(action.identifier()) && !action.disabled())
    }

    /// Gate run before the object is saved.
    ///
    /// At most one action runs. A response from it replaces the rest of the
    /// save processing.
    pub fn pre_save(&self, object: Option<&O>) -> Result<Option<Response>, ActionError> {
        let Some(object) = object else {
            return Ok(None);
        };
        let Some(action) = self.triggered(Phase::BeforeSave) else {
            return Ok(None);
        };

        let outcome = self.actions.perform(action.descriptor(), self.ctx, object)?;
        Ok(outcome.into_response())
    }

    /// Gate run after the object has been saved.
    ///
    /// At most one action runs. Without a response of its own the user is
    /// redirected to `object_path` so they see the saved state. `None` means
    /// no action fired.
    pub fn post_save(&self, object: &O, object_path: &str) -> Result<Option<Response>, ActionError> {
        let Some(action) = self.triggered(Phase::AfterSave) else {
            return Ok(None);
        };

        let outcome = self.actions.perform(action.descriptor(), self.ctx, object)?;
        Ok(Some(
            outcome
                .into_response()
                .unwrap_or_else(|| Response::redirect(object_path)),
        ))
    }

    /// Actions to render, split by slot.
    pub fn render_context(&self) -> RenderContext<O> {
        RenderContext::from_resolution(&self.resolution)
    }
}

impl<O: ConsoleObject> ObjectActions<O> {
    /// Run the whole change form flow for an existing object.
    ///
    /// Looks the object up, resolves once, runs the pre-save gate, lets the
    /// host `apply` the submitted changes, persists, and runs the post-save
    /// gate. Handler and store failures propagate.
    pub fn submit_change<S, F>(
        &self,
        ctx: &RequestContext,
        store: &S,
        object_id: &str,
        object_path: &str,
        apply: F,
    ) -> Result<ChangeOutcome, ActionError>
    where
        S: ObjectStore<O> + ?Sized,
        F: FnOnce(&mut O) -> anyhow::Result<()>,
    {
        let mut object = store
            .lookup(object_id)
            .map_err(ActionError::Lookup)?
            .ok_or_else(|| ActionError::ObjectNotFound(object_id.to_string()))?;

        let request = self.change_request(ctx, Some(&object));

        if let Some(response) = request.pre_save(Some(&object))? {
            tracing::debug!(object_id = %object_id, "Change form short-circuited by object action");
            return Ok(ChangeOutcome::ShortCircuit(response));
        }

        apply(&mut object).map_err(ActionError::Persist)?;
        store.persist(&object).map_err(ActionError::Persist)?;

        match request.post_save(&object, object_path)? {
            Some(response) => Ok(ChangeOutcome::Action(response)),
            None => Ok(ChangeOutcome::Saved),
        }
    }
}
