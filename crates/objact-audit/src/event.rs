//! Change event types.
//!
//! One event is written each time an action with a log template runs
//! against an object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type of change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeEventType {
    /// An object action ran and recorded its log template.
    ActionPerformed,
}

impl std::fmt::Display for ChangeEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ActionPerformed => write!(f, "ACTION_PERFORMED"),
        }
    }
}

/// A change log entry attached to one object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Unique event ID.
    pub event_id: Uuid,

    /// When the event occurred.
    pub occurred_at: DateTime<Utc>,

    /// Event type.
    pub event_type: ChangeEventType,

    /// Console registration the object belongs to.
    pub console: String,

    /// User who triggered the action.
    pub username: String,

    /// Identifier of the affected object.
    pub object_id: String,

    /// Display text of the affected object at the time of the change.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub object_repr: String,

    /// The recorded message.
    pub message: String,
}

impl ChangeEvent {
    pub fn new(
        console: impl Into<String>,
        username: impl Into<String>,
        object_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            event_type: ChangeEventType::ActionPerformed,
            console: console.into(),
            username: username.into(),
            object_id: object_id.into(),
            object_repr: String::new(),
            message: message.into(),
        }
    }

    pub fn builder(
        console: impl Into<String>,
        username: impl Into<String>,
        object_id: impl Into<String>,
        message: impl Into<String>,
    ) -> ChangeEventBuilder {
        ChangeEventBuilder {
            event: Self::new(console, username, object_id, message),
        }
    }

    /// Format the event as a human-readable log line.
    ///
    /// Format: `[timestamp] EVENT_TYPE console=... user=... object=... message="..."`
    pub fn to_log_line(&self) -> String {
        let mut line = format!(
            "[{}] {} console={} user={} object={}",
            self.occurred_at.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            self.event_type,
            self.console,
            self.username,
            self.object_id,
        );
        if !self.object_repr.is_empty() {
            line.push_str(&format!(" repr=\"{}\"", self.object_repr.replace('"', "'")));
        }
        line.push_str(&format!(" message=\"{}\"", self.message.replace('"', "'")));
        line
    }
}

/// Builder for change events.
#[derive(Debug)]
pub struct ChangeEventBuilder {
    event: ChangeEvent,
}

impl ChangeEventBuilder {
    pub fn object_repr(mut self, repr: impl Into<String>) -> Self {
        self.event.object_repr = repr.into();
        self
    }

    /// Override the timestamp (imports and tests).
    pub fn occurred_at(mut self, at: DateTime<Utc>) -> Self {
        self.event.occurred_at = at;
        self
    }

    pub fn build(self) -> ChangeEvent {
        self.event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_fills_fields() {
        let event = ChangeEvent::builder("orders", "alice", "42", "archived")
            .object_repr("Order #42")
            .build();

        assert_eq!(event.event_type, ChangeEventType::ActionPerformed);
        assert_eq!(event.console, "orders");
        assert_eq!(event.username, "alice");
        assert_eq!(event.object_id, "42");
        assert_eq!(event.object_repr, "Order #42");
        assert_eq!(event.message, "archived");
    }

    #[test]
    fn test_log_line() {
        let event = ChangeEvent::builder("orders", "alice", "42", "marked \"paid\"").build();
        let line = event.to_log_line();

        assert!(line.contains("ACTION_PERFORMED"));
        assert!(line.contains("console=orders"));
        assert!(line.contains("user=alice"));
        assert!(line.contains("object=42"));
        assert!(line.ends_with("message=\"marked 'paid'\""));
        assert!(!line.contains("repr="));
    }

    #[test]
    fn test_json_shape() {
        let event = ChangeEvent::new("orders", "alice", "42", "archived");
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event_type"], "action_performed");
        assert!(json.get("object_repr").is_none());

        let back: ChangeEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
