//! # objact-audit
//!
//! Change logging for object actions.
//!
//! When an action that carries a log template runs against an object, the
//! resolver hands the message to its change-log collaborator. [`AuditLogger`]
//! is that collaborator: it turns each message into a [`ChangeEvent`] and
//! stores it.
//!
//! ## Storage
//!
//! | Backend | Output |
//! |---------|--------|
//! | [`NullStorage`] | nothing (logging disabled) |
//! | [`ConsoleStorage`] | one JSON object per line on stdout |
//! | [`FileStorage`] | JSON Lines file, queryable |
//! | [`DualStorage`] | file plus a human-readable line on stdout |
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use objact_audit::{AuditFilter, AuditLogger};
//! use objact_core::AuditConfig;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let logger = AuditLogger::new("orders", AuditConfig::default())?;
//!
//! let recent = logger.query(&AuditFilter {
//!     username: Some("alice".to_string()),
//!     limit: Some(20),
//!     ..Default::default()
//! })?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod event;
pub mod logger;
pub mod storage;

pub use error::AuditError;
pub use event::{ChangeEvent, ChangeEventBuilder, ChangeEventType};
pub use logger::{AuditFilter, AuditLogger};
pub use storage::{ChangeStorage, ConsoleStorage, DualStorage, FileStorage, NullStorage};
