//! Error types for action execution.
//!
//! Resolution never fails: permission denials and failed conditions only
//! change which actions are offered. Errors come from executing an action
//! or from the host collaborators the change flow calls.

use thiserror::Error;

/// Errors raised while executing object actions.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The handler itself failed. Propagated as-is; a bulk run stops here.
    #[error("object action '{identifier}' failed: {source}")]
    Handler {
        identifier: String,
        #[source]
        source: anyhow::Error,
    },

    /// Recording the log template against the object failed.
    #[error("failed to record change log for action '{identifier}': {source}")]
    ChangeLog {
        identifier: String,
        #[source]
        source: anyhow::Error,
    },

    /// A custom bulk completion hook failed.
    #[error("bulk completion for action '{identifier}' failed: {source}")]
    BulkCompletion {
        identifier: String,
        #[source]
        source: anyhow::Error,
    },

    /// The object store could not look up the target object.
    #[error("object lookup failed: {0}")]
    Lookup(#[source] anyhow::Error),

    /// No object exists under the requested id.
    #[error("object '{0}' does not exist")]
    ObjectNotFound(String),

    /// Applying the submitted changes or persisting the object failed.
    #[error("failed to save object: {0}")]
    Persist(#[source] anyhow::Error),
}

impl ActionError {
    /// Identifier of the action involved, when the error came from one.
    pub fn identifier(&self) -> Option<&str> {
        match self {
            Self::Handler { identifier, .. }
            | Self::ChangeLog { identifier, .. }
            | Self::BulkCompletion { identifier, .. } => Some(identifier),
            Self::Lookup(_) | Self::ObjectNotFound(_) | Self::Persist(_) => None,
        }
    }
}
