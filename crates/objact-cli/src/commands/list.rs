//! `objact list` command implementation.
//!
//! Shows which declared actions a user would be offered, slot by slot.
//! Conditions are code, so the CLI cannot evaluate them; condition-gated
//! actions are listed with a `conditional` marker.

use anyhow::{Context, Result};
use std::path::Path;

use objact_core::{
    ActionOutcome, ActionRegistry, ConsoleConfig, ConsoleObject, DisplaySlot, HandlerCatalog,
    Phase, RequestContext, User,
};
use objact_resolver::ObjectActions;

/// Who is looking, and at which form.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub permissions: Vec<String>,
    pub superuser: bool,
    pub new_object: bool,
}

impl ListOptions {
    fn user(&self) -> User {
        let user = if self.superuser {
            User::superuser("cli")
        } else {
            User::new("cli")
        };
        self.permissions
            .iter()
            .fold(user, |user, permission| user.with_permission(permission))
    }
}

/// Stand-in object; only declarations are inspected.
struct Declared;

impl ConsoleObject for Declared {
    fn object_id(&self) -> String {
        String::new()
    }
}

/// One line of the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedAction {
    pub slot: DisplaySlot,
    pub identifier: String,
    pub label: String,
    pub phase: Phase,
    pub conditional: bool,
    pub bulk: bool,
}

/// Catalog that knows every name the file mentions, with inert bodies.
fn placeholder_catalog(config: &ConsoleConfig) -> HandlerCatalog<Declared> {
    config
        .actions
        .iter()
        .fold(HandlerCatalog::new(), |catalog, action| {
            let mut catalog =
                catalog.with_handler(action.handler.clone(), |_, _| Ok(ActionOutcome::Skipped));
            if let Some(name) = &action.condition {
                catalog = catalog.with_condition(name.clone(), |_, _| true);
            }
            if let Some(name) = &action.bulk_completion {
                catalog = catalog.with_bulk_completion(name.clone(), |_, _, _| Ok(()));
            }
            catalog
        })
}

/// Actions offered to the user described by `options`, grouped by slot in
/// slot order, declaration order within a slot.
pub fn visible_actions(config: &ConsoleConfig, options: &ListOptions) -> Result<Vec<ListedAction>> {
    let registry = ActionRegistry::from_config(config, &placeholder_catalog(config))
        .context("Failed to build action registry")?;
    let actions = ObjectActions::new(registry, config.object_names());
    let ctx = RequestContext::new(options.user());

    let mut listed = Vec::new();
    for slot in DisplaySlot::ALL {
        for descriptor in actions.registry().iter() {
            if descriptor.display_slot() != slot {
                continue;
            }
            if options.new_object && descriptor.phase() == Phase::BeforeSave {
                continue;
            }
            if !actions.is_visible(descriptor, &ctx) {
                continue;
            }
            listed.push(ListedAction {
                slot,
                identifier: descriptor.identifier().to_string(),
                label: descriptor.label().to_string(),
                phase: descriptor.phase(),
                conditional: descriptor.has_condition(),
                bulk: descriptor.eligible_for_bulk(),
            });
        }
    }

    Ok(listed)
}

pub fn run(config_path: &Path, options: &ListOptions) -> Result<()> {
    let config = ConsoleConfig::from_file(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    let listed = visible_actions(&config, options)?;

    println!(
        "📋 {} ({} declared, {} offered)",
        config.console,
        config.actions.len(),
        listed.len()
    );

    for slot in DisplaySlot::ALL {
        let in_slot: Vec<_> = listed.iter().filter(|a| a.slot == slot).collect();
        println!("\n{} ({}):", slot, in_slot.len());
        println!("{}", "─".repeat(60));
        if in_slot.is_empty() {
            println!("  (none)");
        }
        for action in in_slot {
            let mut markers = vec![action.phase.to_string()];
            if action.conditional {
                markers.push("conditional".to_string());
            }
            if action.bulk {
                markers.push("bulk".to_string());
            }
            println!(
                "  {:<24} {:<24} [{}]",
                action.identifier,
                action.label,
                markers.join(", ")
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDERS: &str = r#"
console: orders
object_name: order
actions:
  - handler: preview_order
    identifier: preview
    label: Preview
    phase: before_save
    display_slot: before_fields
  - handler: archive_order
    identifier: archive
    label: Archive
    permission: orders.archive
  - handler: refund_order
    identifier: refund
    label: Refund
    condition: is_paid
    display_slot: after_related
    eligible_for_bulk: false
"#;

    fn identifiers(listed: &[ListedAction]) -> Vec<&str> {
        listed.iter().map(|a| a.identifier.as_str()).collect()
    }

    #[test]
    fn test_permission_filters_listing() {
        let config = ConsoleConfig::from_yaml(ORDERS).unwrap();

        let listed = visible_actions(&config, &ListOptions::default()).unwrap();
        assert_eq!(identifiers(&listed), vec!["preview", "refund"]);

        let options = ListOptions {
            permissions: vec!["orders.archive".to_string()],
            ..Default::default()
        };
        let listed = visible_actions(&config, &options).unwrap();
        assert_eq!(identifiers(&listed), vec!["preview", "archive", "refund"]);
        assert_eq!(listed[1].slot, DisplaySlot::AfterFields);
    }

    #[test]
    fn test_new_object_drops_before_save() {
        let config = ConsoleConfig::from_yaml(ORDERS).unwrap();
        let options = ListOptions {
            superuser: true,
            new_object: true,
            ..Default::default()
        };

        let listed = visible_actions(&config, &options).unwrap();
        assert_eq!(identifiers(&listed), vec!["archive", "refund"]);
    }

    #[test]
    fn test_markers() {
        let config = ConsoleConfig::from_yaml(ORDERS).unwrap();

        let listed = visible_actions(&config, &ListOptions::default()).unwrap();
        let refund = listed.iter().find(|a| a.identifier == "refund").unwrap();
        assert!(refund.conditional);
        assert!(!refund.bulk);
        assert_eq!(refund.phase, Phase::AfterSave);
    }
}
