//! Default change log and message sinks.

use std::sync::Mutex;

use objact_core::{ChangeLogger, ConsoleObject, MessageLevel, Notifier, RequestContext};

/// Writes change log entries to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingChangeLogger;

impl ChangeLogger for TracingChangeLogger {
    fn record(
        &self,
        ctx: &RequestContext,
        object: &dyn ConsoleObject,
        message: &str,
    ) -> anyhow::Result<()> {
        tracing::info!(
            user = %ctx.user().username,
            object_id = %object.object_id(),
            object = %object.object_repr(),
            message = %message,
            "Change recorded"
        );
        Ok(())
    }
}

/// Writes user messages to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, ctx: &RequestContext, message: &str, level: MessageLevel) {
        tracing::info!(
            user = %ctx.user().username,
            level = %level,
            message = %message,
            "User message"
        );
    }
}

/// A message queued for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedMessage {
    pub username: String,
    pub level: MessageLevel,
    pub message: String,
}

/// Collects user messages until the host drains them into a response.
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: Mutex<Vec<QueuedMessage>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued message, oldest first.
    pub fn drain(&self) -> Vec<QueuedMessage> {
        match self.messages.lock() {
            Ok(mut messages) => std::mem::take(&mut *messages),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Notifier for MessageLog {
    fn notify(&self, ctx: &RequestContext, message: &str, level: MessageLevel) {
        let queued = QueuedMessage {
            username: ctx.user().username.clone(),
            level,
            message: message.to_string(),
        };
        match self.messages.lock() {
            Ok(mut messages) => messages.push(queued),
            Err(poisoned) => poisoned.into_inner().push(queued),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use objact_core::User;

    #[test]
    fn test_message_log_drains_in_order() {
        let log = MessageLog::new();
        let ctx = RequestContext::new(User::new("alice"));

        log.notify(&ctx, "first", MessageLevel::Info);
        log.notify(&ctx, "second", MessageLevel::Success);

        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].message, "first");
        assert_eq!(drained[1].level, MessageLevel::Success);
        assert_eq!(drained[1].username, "alice");
        assert!(log.drain().is_empty());
    }
}
