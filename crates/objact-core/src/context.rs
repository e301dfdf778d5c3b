//! Request-scoped types: the acting user, the submitted form, and the
//! opaque response artifact handed back to the host console.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// The user a request is made on behalf of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default)]
    pub is_superuser: bool,

    /// Permission keys granted to this user.
    #[serde(default)]
    pub permissions: BTreeSet<String>,
}

impl User {
    /// An active, non-superuser account with no permissions.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_active: true,
            is_superuser: false,
            permissions: BTreeSet::new(),
        }
    }

    pub fn superuser(username: impl Into<String>) -> Self {
        Self {
            is_superuser: true,
            ..Self::new(username)
        }
    }

    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.insert(permission.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// One incoming console request.
///
/// Carries the user and the submitted form fields. The trigger protocol
/// reads the form: a truthy field keyed by an action identifier fires that
/// action.
#[derive(Debug, Clone)]
pub struct RequestContext {
    user: User,
    path: String,
    form: HashMap<String, String>,
}

impl RequestContext {
    pub fn new(user: User) -> Self {
        Self {
            user,
            path: String::new(),
            form: HashMap::new(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Add a submitted form field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.insert(name.into(), value.into());
        self
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw submitted value for a field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.form.get(name).map(String::as_str)
    }

    /// Whether the request carries a truthy (present, non-empty) value for
    /// the given trigger key.
    pub fn is_triggered(&self, identifier: &str) -> bool {
        self.field(identifier).is_some_and(|value| !value.is_empty())
    }
}

/// Response artifact produced by an action or by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Response {
    /// Redirect the browser.
    Redirect { location: String },
    /// A complete response body.
    Content {
        status: u16,
        content_type: String,
        body: String,
    },
}

impl Response {
    pub fn redirect(location: impl Into<String>) -> Self {
        Self::Redirect {
            location: location.into(),
        }
    }

    pub fn html(body: impl Into<String>) -> Self {
        Self::content(200, "text/html; charset=utf-8", body)
    }

    pub fn content(status: u16, content_type: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Content {
            status,
            content_type: content_type.into(),
            body: body.into(),
        }
    }

    /// Redirect target, if this is a redirect.
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Redirect { location } => Some(location),
            Self::Content { .. } => None,
        }
    }
}

fn default_true() -> bool {
    true
}
