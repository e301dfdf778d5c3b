//! # objact-core
//!
//! Shared types for object actions: named operations a console user can
//! trigger on a single record or on a bulk selection.
//!
//! - [`descriptor`]: the static [`ActionDescriptor`] and its builder
//! - [`registry`]: the ordered [`ActionRegistry`] and the [`HandlerCatalog`]
//!   used to build one from configuration
//! - [`context`]: the per-request [`RequestContext`] and [`Response`] artifact
//! - [`console`]: contracts of the host console (permissions, storage,
//!   change log, user messages)
//! - [`config`]: YAML console registrations
//!
//! Resolution and execution live in `objact-resolver`.

pub mod config;
pub mod console;
pub mod context;
pub mod descriptor;
pub mod registry;

pub use config::{ActionDeclaration, AuditConfig, ConfigError, ConsoleConfig};
pub use console::{
    ChangeLogger, ConsoleObject, MessageLevel, Notifier, ObjectNames, ObjectStore,
    PermissionChecker,
};
pub use context::{RequestContext, Response, User};
pub use descriptor::{
    ActionDescriptor, ActionDescriptorBuilder, ActionOutcome, BulkCompletion, Condition,
    DisplaySlot, Handler, Phase,
};
pub use registry::{ActionRegistry, HandlerCatalog};
