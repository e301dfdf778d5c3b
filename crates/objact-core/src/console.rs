//! Contracts of the host console.
//!
//! The engine reads from the host (permission checks, object lookup) and
//! writes to it (change log entries, user messages). These traits are the
//! seams; the host supplies the implementations.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::context::{RequestContext, User};

/// A record managed by the console.
pub trait ConsoleObject {
    /// Stable primary key, as it appears in URLs and change logs.
    fn object_id(&self) -> String;

    /// Human-readable representation.
    fn object_repr(&self) -> String {
        self.object_id()
    }
}

/// Answers whether a user holds a permission key.
pub trait PermissionChecker: Send + Sync {
    fn has_permission(&self, user: &User, permission: &str) -> bool;
}

/// Storage for the console's records.
pub trait ObjectStore<O>: Send + Sync {
    fn lookup(&self, id: &str) -> anyhow::Result<Option<O>>;

    fn persist(&self, object: &O) -> anyhow::Result<()>;
}

/// Records a change message against an object.
pub trait ChangeLogger: Send + Sync {
    fn record(
        &self,
        ctx: &RequestContext,
        object: &dyn ConsoleObject,
        message: &str,
    ) -> anyhow::Result<()>;
}

/// Severity of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Debug,
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for MessageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Delivers messages to the user behind a request.
pub trait Notifier: Send + Sync {
    fn notify(&self, ctx: &RequestContext, message: &str, level: MessageLevel);
}

/// Display names of the object type a console manages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectNames {
    pub singular: String,
    pub plural: String,
}

impl ObjectNames {
    pub fn new(singular: impl Into<String>, plural: impl Into<String>) -> Self {
        Self {
            singular: singular.into(),
            plural: plural.into(),
        }
    }

    /// Plural formed by appending "s".
    pub fn regular(singular: impl Into<String>) -> Self {
        let singular = singular.into();
        let plural = format!("{}s", singular);
        Self { singular, plural }
    }

    /// Name to use next to a count.
    pub fn for_count(&self, count: usize) -> &str {
        if count == 1 {
            &self.singular
        } else {
            &self.plural
        }
    }
}

impl Default for ObjectNames {
    fn default() -> Self {
        Self::regular("object")
    }
}
