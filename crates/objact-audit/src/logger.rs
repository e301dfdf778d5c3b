//! Change logger implementation.
//!
//! [`AuditLogger`] is the change-log collaborator handed to the resolver.
//! Every recorded log template becomes one [`ChangeEvent`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use objact_core::{AuditConfig, ChangeLogger, ConsoleObject, RequestContext};

use crate::error::AuditError;
use crate::event::ChangeEvent;
use crate::storage::{ChangeStorage, ConsoleStorage, DualStorage, FileStorage, NullStorage};

/// Records change events for one console.
pub struct AuditLogger {
    console: String,
    config: AuditConfig,
    storage: Arc<dyn ChangeStorage>,
}

impl AuditLogger {
    /// Create a logger writing where `config` says.
    pub fn new(console: impl Into<String>, config: AuditConfig) -> Result<Self, AuditError> {
        let storage: Arc<dyn ChangeStorage> = if !config.enabled {
            Arc::new(NullStorage::new())
        } else if config.stdout {
            Arc::new(DualStorage::new(config.log_path())?)
        } else {
            Arc::new(FileStorage::new(config.log_path())?)
        };

        Ok(Self {
            console: console.into(),
            config,
            storage,
        })
    }

    /// Create a logger with a custom storage backend.
    pub fn with_storage(
        console: impl Into<String>,
        config: AuditConfig,
        storage: Arc<dyn ChangeStorage>,
    ) -> Self {
        Self {
            console: console.into(),
            config,
            storage,
        }
    }

    /// Create a disabled (no-op) logger.
    pub fn disabled(console: impl Into<String>) -> Self {
        Self {
            console: console.into(),
            config: AuditConfig {
                enabled: false,
                ..Default::default()
            },
            storage: Arc::new(NullStorage::new()),
        }
    }

    /// Create a console-only logger (useful for development).
    pub fn console_only(console: impl Into<String>) -> Self {
        Self {
            console: console.into(),
            config: AuditConfig {
                enabled: true,
                stdout: true,
                ..Default::default()
            },
            storage: Arc::new(ConsoleStorage::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn console(&self) -> &str {
        &self.console
    }

    /// Store a change event.
    pub fn log(&self, event: ChangeEvent) -> Result<(), AuditError> {
        if !self.config.enabled {
            return Ok(());
        }

        tracing::debug!(
            event_id = %event.event_id,
            event_type = %event.event_type,
            console = %event.console,
            user = %event.username,
            object_id = %event.object_id,
            "Change event"
        );

        self.storage.store(event)
    }

    /// Query change events with filters.
    pub fn query(&self, filter: &AuditFilter) -> Result<Vec<ChangeEvent>, AuditError> {
        self.storage.query(filter)
    }

    /// Count change events matching a filter (ignores limit/offset).
    pub fn count(&self, filter: &AuditFilter) -> Result<usize, AuditError> {
        self.storage.count(filter)
    }

    /// Get a change event by ID.
    pub fn get(&self, event_id: uuid::Uuid) -> Result<Option<ChangeEvent>, AuditError> {
        self.storage.get(event_id)
    }

    /// History of one object, oldest first.
    pub fn history(&self, object_id: &str) -> Result<Vec<ChangeEvent>, AuditError> {
        self.query(&AuditFilter {
            object_id: Some(object_id.to_string()),
            ..Default::default()
        })
    }
}

impl ChangeLogger for AuditLogger {
    fn record(
        &self,
        ctx: &RequestContext,
        object: &dyn ConsoleObject,
        message: &str,
    ) -> anyhow::Result<()> {
        let event = ChangeEvent::builder(
            self.console.as_str(),
            ctx.user().username.as_str(),
            object.object_id(),
            message,
        )
        .object_repr(object.object_repr())
        .build();

        self.log(event)?;
        Ok(())
    }
}

impl std::fmt::Debug for AuditLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLogger")
            .field("console", &self.console)
            .field("config", &self.config)
            .finish()
    }
}

/// Filter for querying change events.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    /// Filter by acting user.
    pub username: Option<String>,
    /// Filter by object.
    pub object_id: Option<String>,
    /// Filter by start time (inclusive).
    pub start_time: Option<DateTime<Utc>>,
    /// Filter by end time (inclusive).
    pub end_time: Option<DateTime<Utc>>,
    /// Maximum number of results.
    pub limit: Option<usize>,
    /// Offset for pagination.
    pub offset: Option<usize>,
}

impl AuditFilter {
    /// Whether `event` passes every set criterion.
    pub fn matches(&self, event: &ChangeEvent) -> bool {
        if let Some(ref username) = self.username
            && &event.username != username
        {
            return false;
        }
        if let Some(ref object_id) = self.object_id
            && &event.object_id != object_id
        {
            return false;
        }
        if let Some(start) = self.start_time
            && event.occurred_at < start
        {
            return false;
        }
        if let Some(end) = self.end_time
            && event.occurred_at > end
        {
            return false;
        }
        true
    }

    /// Apply offset, then limit.
    pub fn paginate(&self, events: Vec<ChangeEvent>) -> Vec<ChangeEvent> {
        let offset = self.offset.unwrap_or(0);
        let limit = self.limit.unwrap_or(usize::MAX);
        events.into_iter().skip(offset).take(limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use objact_core::User;
    use tempfile::TempDir;

    struct Invoice(u32);

    impl ConsoleObject for Invoice {
        fn object_id(&self) -> String {
            self.0.to_string()
        }

        fn object_repr(&self) -> String {
            format!("Invoice {}", self.0)
        }
    }

    fn file_logger(dir: &TempDir) -> AuditLogger {
        let config = AuditConfig {
            directory: dir.path().display().to_string(),
            ..Default::default()
        };
        AuditLogger::new("invoices", config).unwrap()
    }

    #[test]
    fn test_disabled_logger() {
        let logger = AuditLogger::disabled("invoices");
        assert!(!logger.is_enabled());

        let ctx = RequestContext::new(User::new("alice"));
        logger.record(&ctx, &Invoice(1), "voided").unwrap();
        assert_eq!(logger.count(&AuditFilter::default()).unwrap(), 0);
    }

    #[test]
    fn test_console_only_logger() {
        let logger = AuditLogger::console_only("invoices");
        assert!(logger.is_enabled());

        let ctx = RequestContext::new(User::new("alice"));
        logger.record(&ctx, &Invoice(1), "voided").unwrap();
    }

    #[test]
    fn test_record_writes_event() {
        let dir = TempDir::new().unwrap();
        let logger = file_logger(&dir);
        let ctx = RequestContext::new(User::new("alice"));

        logger.record(&ctx, &Invoice(9), "voided").unwrap();

        let history = logger.history("9").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].console, "invoices");
        assert_eq!(history[0].username, "alice");
        assert_eq!(history[0].object_repr, "Invoice 9");
        assert_eq!(history[0].message, "voided");
        assert!(dir.path().join("changes.log").exists());
    }

    #[test]
    fn test_filter_window_and_pagination() {
        let dir = TempDir::new().unwrap();
        let logger = file_logger(&dir);
        let now = Utc::now();

        for (offset, object) in [(3, "1"), (2, "2"), (1, "3")] {
            logger
                .log(
                    ChangeEvent::builder("invoices", "bob", object, "sent")
                        .occurred_at(now - Duration::hours(offset))
                        .build(),
                )
                .unwrap();
        }

        let recent = AuditFilter {
            start_time: Some(now - Duration::minutes(150)),
            ..Default::default()
        };
        assert_eq!(logger.count(&recent).unwrap(), 2);

        let page = AuditFilter {
            username: Some("bob".to_string()),
            offset: Some(1),
            limit: Some(1),
            ..Default::default()
        };
        let results = logger.query(&page).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].object_id, "2");
        assert_eq!(logger.count(&page).unwrap(), 3);
    }
}
