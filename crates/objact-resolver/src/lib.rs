//! # objact-resolver
//!
//! Decides, per request, which object actions a console offers and runs
//! the one the user triggered.
//!
//! ## Resolution
//!
//! For every registered descriptor, in declaration order:
//!
//! 1. before-save actions are dropped when there is no target object
//! 2. the action is visible when it needs no permission or the user holds it
//! 3. it is enabled when it has no condition, or the object satisfies it
//! 4. it is offered when visible and either enabled or shown disabled
//!
//! [`ObjectActions::resolve`] evaluates lazily and afresh on every call.
//! [`ObjectActions::change_request`] resolves once and serves rendering and
//! both execution gates from that single pass.
//!
//! ## Execution
//!
//! | Call site | Entry point |
//! |-----------|-------------|
//! | change form, before save | [`ChangeRequest::pre_save`] |
//! | change form, after save | [`ChangeRequest::post_save`] |
//! | whole change flow over an [`ObjectStore`](objact_core::ObjectStore) | [`ObjectActions::submit_change`] |
//! | bulk selection menu | [`ObjectActions::bulk_actions`] |
//! | bulk run | [`ObjectActions::execute_bulk`] |
//!
//! Handler failures are not caught; they surface as [`ActionError`].

pub mod actions;
pub mod bulk;
pub mod change;
pub mod error;
pub mod permission;
pub mod render;
pub mod resolver;
pub mod sinks;

pub use actions::ObjectActions;
pub use bulk::{BulkAction, BulkDispatch, BulkReport, merge_bulk_actions};
pub use change::{ChangeOutcome, ChangeRequest};
pub use error::ActionError;
pub use permission::{AllowAll, UserPermissions};
pub use render::RenderContext;
pub use resolver::{Resolution, ResolvedAction};
pub use sinks::{MessageLog, QueuedMessage, TracingChangeLogger, TracingNotifier};
