//! The object actions attached to one console registration.

use std::fmt;
use std::sync::Arc;

use objact_core::{
    ActionDescriptor, ActionOutcome, ActionRegistry, ChangeLogger, ConsoleObject, Notifier,
    ObjectNames, PermissionChecker, Phase, RequestContext,
};

use crate::change::ChangeRequest;
use crate::error::ActionError;
use crate::permission::UserPermissions;
use crate::resolver::{Resolution, ResolvedAction};
use crate::sinks::{TracingChangeLogger, TracingNotifier};

/// Resolves and runs the actions of one console.
///
/// Holds the read-only registry and the host collaborators. Cloning is cheap
/// and shares everything; nothing here changes after construction, so one
/// instance serves every request.
pub struct ObjectActions<O> {
    registry: Arc<ActionRegistry<O>>,
    names: ObjectNames,
    permissions: Arc<dyn PermissionChecker>,
    change_log: Arc<dyn ChangeLogger>,
    notifier: Arc<dyn Notifier>,
}

impl<O: ConsoleObject> ObjectActions<O> {
    /// Create with the default collaborators: permissions read from the
    /// user, change log and messages written to `tracing`.
    pub fn new(registry: ActionRegistry<O>, names: ObjectNames) -> Self {
        Self {
            registry: Arc::new(registry),
            names,
            permissions: Arc::new(UserPermissions),
            change_log: Arc::new(TracingChangeLogger),
            notifier: Arc::new(TracingNotifier),
        }
    }

    pub fn with_permission_checker(mut self, permissions: Arc<dyn PermissionChecker>) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn with_change_logger(mut self, change_log: Arc<dyn ChangeLogger>) -> Self {
        self.change_log = change_log;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn registry(&self) -> &ActionRegistry<O> {
        &self.registry
    }

    pub fn names(&self) -> &ObjectNames {
        &self.names
    }

    pub(crate) fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    /// Whether the request's user may see the action.
    pub fn is_visible(&self, descriptor: &ActionDescriptor<O>, ctx: &RequestContext) -> bool {
        match descriptor.permission() {
            None => true,
            Some(permission) => self.permissions.has_permission(ctx.user(), permission),
        }
    }

    /// Lazily resolve the actions offered for `object`.
    ///
    /// Every call evaluates permissions and conditions afresh against the
    /// live request; nothing is cached between calls. With no object (the
    /// creation form), before-save actions are never offered.
    pub fn resolve<'a>(
        &'a self,
        ctx: &'a RequestContext,
        object: Option<&'a O>,
    ) -> impl Iterator<Item = ResolvedAction<O>> + 'a {
        self.registry
            .iter()
            .filter_map(move |descriptor| self.resolve_one(descriptor, ctx, object))
    }

    fn resolve_one(
        &self,
        descriptor: &Arc<ActionDescriptor<O>>,
        ctx: &RequestContext,
        object: Option<&O>,
    ) -> Option<ResolvedAction<O>> {
        if object.is_none() && descriptor.phase() == Phase::BeforeSave {
            return None;
        }

        if !self.is_visible(descriptor, ctx) {
            tracing::debug!(
                identifier = %descriptor.identifier(),
                user = %ctx.user().username,
                "Object action hidden: permission missing"
            );
            return None;
        }

        let enabled = descriptor.condition_met(ctx, object);
        if !enabled && !descriptor.disable_if_condition_not_met() {
            tracing::debug!(
                identifier = %descriptor.identifier(),
                "Object action hidden: condition not met"
            );
            return None;
        }

        Some(ResolvedAction::new(Arc::clone(descriptor), enabled))
    }

    /// Resolve once and keep the result for the rest of the request.
    pub fn resolution(&self, ctx: &RequestContext, object: Option<&O>) -> Resolution<O> {
        Resolution::new(self.resolve(ctx, object).collect())
    }

    /// Start the change form flow for one request.
    pub fn change_request<'a>(
        &'a self,
        ctx: &'a RequestContext,
        object: Option<&O>,
    ) -> ChangeRequest<'a, O> {
        ChangeRequest::new(self, ctx, self.resolution(ctx, object))
    }

    /// Record the log template (if any), then run the handler.
    pub(crate) fn perform(
        &self,
        descriptor: &ActionDescriptor<O>,
        ctx: &RequestContext,
        object: &O,
    ) -> Result<ActionOutcome, ActionError> {
        tracing::info!(
            identifier = %descriptor.identifier(),
            object_id = %object.object_id(),
            phase = %descriptor.phase(),
            user = %ctx.user().username,
            "Performing object action"
        );

        if let Some(message) = descriptor.log_template() {
            self.change_log
                .record(ctx, object, message)
                .map_err(|source| ActionError::ChangeLog {
                    identifier: descriptor.identifier().to_string(),
                    source,
                })?;
        }

        descriptor
            .invoke(ctx, object)
            .map_err(|source| ActionError::Handler {
                identifier: descriptor.identifier().to_string(),
                source,
            })
    }
}

impl<O> Clone for ObjectActions<O> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            names: self.names.clone(),
            permissions: Arc::clone(&self.permissions),
            change_log: Arc::clone(&self.change_log),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

impl<O> fmt::Debug for ObjectActions<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectActions")
            .field("registry", &self.registry)
            .field("names", &self.names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use objact_core::{DisplaySlot, User};

    struct Post {
        id: u32,
        published: bool,
    }

    impl ConsoleObject for Post {
        fn object_id(&self) -> String {
            self.id.to_string()
        }
    }

    fn ok(_: &RequestContext, _: &Post) -> anyhow::Result<ActionOutcome> {
        Ok(ActionOutcome::Applied)
    }

    fn actions() -> ObjectActions<Post> {
        let registry = ActionRegistry::new()
            .with(
                ActionDescriptor::builder("publish", "Publish", ok)
                    .identifier("publish")
                    .condition(|_, post: &Post| !post.published)
                    .build()
                    .unwrap(),
            )
            .with(
                ActionDescriptor::builder("unpublish", "Unpublish", ok)
                    .identifier("unpublish")
                    .condition(|_, post: &Post| post.published)
                    .disable_if_condition_not_met(true)
                    .build()
                    .unwrap(),
            )
            .with(
                ActionDescriptor::builder("purge", "Purge", ok)
                    .identifier("purge")
                    .permission("posts.purge")
                    .phase(Phase::BeforeSave)
                    .display_slot(DisplaySlot::AfterRelated)
                    .build()
                    .unwrap(),
            );
        ObjectActions::new(registry, ObjectNames::regular("post"))
    }

    fn identifiers(actions: &ObjectActions<Post>, ctx: &RequestContext, post: Option<&Post>) -> Vec<String> {
        actions
            .resolve(ctx, post)
            .map(|a| a.identifier().to_string())
            .collect()
    }

    #[test]
    fn test_resolution_filters_by_condition_and_permission() {
        let actions = actions();
        let ctx = RequestContext::new(User::new("editor"));
        let draft = Post { id: 1, published: false };

        let resolved: Vec<_> = actions.resolve(&ctx, Some(&draft)).collect();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].identifier(), "publish");
        assert!(resolved[0].enabled());
        assert_eq!(resolved[1].identifier(), "unpublish");
        assert!(resolved[1].disabled());
    }

    #[test]
    fn test_resolution_is_fresh_per_call() {
        let actions = actions();
        let ctx = RequestContext::new(User::new("editor"));
        let mut post = Post { id: 1, published: false };

        assert_eq!(identifiers(&actions, &ctx, Some(&post)), vec!["publish", "unpublish"]);
        post.published = true;
        assert_eq!(identifiers(&actions, &ctx, Some(&post)), vec!["unpublish"]);
    }

    #[test]
    fn test_no_object_drops_before_save_and_conditions_fail() {
        let actions = actions();
        let ctx = RequestContext::new(User::superuser("root"));

        let resolved: Vec<_> = actions.resolve(&ctx, None).collect();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].identifier(), "unpublish");
        assert!(resolved[0].disabled());
    }

    #[test]
    fn test_resolution_partitions_share_one_pass() {
        let actions = actions();
        let ctx = RequestContext::new(User::new("editor").with_permission("posts.purge"));
        let post = Post { id: 3, published: true };

        let resolution = actions.resolution(&ctx, Some(&post));
        assert_eq!(resolution.len(), 2);
        assert_eq!(resolution.for_phase(Phase::BeforeSave).count(), 1);
        assert_eq!(resolution.for_phase(Phase::AfterSave).count(), 1);
        assert_eq!(resolution.for_slot(DisplaySlot::AfterRelated).count(), 1);
        assert_eq!(resolution.for_slot(DisplaySlot::BeforeFields).count(), 0);
        assert!(resolution.get("unpublish").unwrap().enabled());
    }
}
