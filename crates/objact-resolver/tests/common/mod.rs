//! Shared fixtures for object action integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use objact_core::{
    ActionDescriptor, ActionOutcome, ActionRegistry, ChangeLogger, ConsoleObject, ObjectNames,
    ObjectStore, RequestContext, User,
};
use objact_resolver::{MessageLog, ObjectActions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: u32,
    pub status: String,
    pub archived: bool,
}

impl Order {
    pub fn new(id: u32, status: &str) -> Self {
        Self {
            id,
            status: status.to_string(),
            archived: false,
        }
    }
}

impl ConsoleObject for Order {
    fn object_id(&self) -> String {
        self.id.to_string()
    }

    fn object_repr(&self) -> String {
        format!("Order #{}", self.id)
    }
}

/// Change log entry captured by [`RecordingChangeLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedChange {
    pub username: String,
    pub object_id: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct RecordingChangeLog {
    entries: Mutex<Vec<LoggedChange>>,
}

impl RecordingChangeLog {
    pub fn entries(&self) -> Vec<LoggedChange> {
        self.entries.lock().unwrap().clone()
    }
}

impl ChangeLogger for RecordingChangeLog {
    fn record(
        &self,
        ctx: &RequestContext,
        object: &dyn ConsoleObject,
        message: &str,
    ) -> anyhow::Result<()> {
        self.entries.lock().unwrap().push(LoggedChange {
            username: ctx.user().username.clone(),
            object_id: object.object_id(),
            message: message.to_string(),
        });
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    orders: Mutex<HashMap<String, Order>>,
}

impl MemoryStore {
    pub fn with(orders: impl IntoIterator<Item = Order>) -> Self {
        let store = Self::default();
        for order in orders {
            store
                .orders
                .lock()
                .unwrap()
                .insert(order.object_id(), order);
        }
        store
    }

    pub fn get(&self, id: &str) -> Option<Order> {
        self.orders.lock().unwrap().get(id).cloned()
    }
}

impl ObjectStore<Order> for MemoryStore {
    fn lookup(&self, id: &str) -> anyhow::Result<Option<Order>> {
        Ok(self.get(id))
    }

    fn persist(&self, object: &Order) -> anyhow::Result<()> {
        self.orders
            .lock()
            .unwrap()
            .insert(object.object_id(), object.clone());
        Ok(())
    }
}

/// Console wiring with recording collaborators.
pub struct Harness {
    pub actions: ObjectActions<Order>,
    pub change_log: Arc<RecordingChangeLog>,
    pub messages: Arc<MessageLog>,
}

impl Harness {
    pub fn new(registry: ActionRegistry<Order>) -> Self {
        let change_log = Arc::new(RecordingChangeLog::default());
        let messages = Arc::new(MessageLog::new());
        let actions = ObjectActions::new(registry, ObjectNames::regular("object"))
            .with_change_logger(change_log.clone())
            .with_notifier(messages.clone());
        Self {
            actions,
            change_log,
            messages,
        }
    }
}

/// Shared counter handlers increment so tests can observe invocations.
pub fn counter() -> Arc<Mutex<Vec<u32>>> {
    Arc::new(Mutex::new(Vec::new()))
}

/// The archive action from the console scenarios.
pub fn archive_action(calls: Arc<Mutex<Vec<u32>>>) -> ActionDescriptor<Order> {
    ActionDescriptor::builder("archive_order", "Archive", move |_, order: &Order| {
        calls.lock().unwrap().push(order.id);
        Ok(ActionOutcome::Applied)
    })
    .identifier("archive")
    .permission("can_archive")
    .log_template("archived")
    .build()
    .unwrap()
}

pub fn clerk() -> User {
    User::new("clerk")
}

pub fn archivist() -> User {
    User::new("archivist").with_permission("can_archive")
}
