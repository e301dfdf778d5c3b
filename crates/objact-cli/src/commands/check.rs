//! `objact check` command implementation.
//!
//! Validates a console registration file:
//! - JSON Schema validation against the embedded `ConsoleConfig` schema
//! - Consistency checks on the declared actions

use anyhow::{Context, Result};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use objact_core::ConsoleConfig;
use objact_core::descriptor::validate_identifier;

/// Compiled into the binary so validation works without external files.
const CONSOLE_CONFIG_SCHEMA: &str = include_str!("../../../../schemas/ConsoleConfig.schema.json");

// ============================================================================
// Check Result Types
// ============================================================================

/// Severity level for check results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARN"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// A single check finding.
#[derive(Debug, Clone)]
pub struct CheckFinding {
    pub severity: Severity,
    /// Category of the check that produced this finding.
    pub category: String,
    pub message: String,
    pub file: Option<PathBuf>,
    /// Location within the file (e.g., "actions[2]").
    pub location: Option<String>,
}

impl CheckFinding {
    fn error(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, category, message)
    }

    fn warning(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, category, message)
    }

    fn info(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, category, message)
    }

    fn new(severity: Severity, category: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            category: category.into(),
            message: message.into(),
            file: None,
            location: None,
        }
    }

    fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// Results from running all checks.
#[derive(Debug, Default)]
pub struct CheckResults {
    pub findings: Vec<CheckFinding>,
}

impl CheckResults {
    fn extend(&mut self, findings: impl IntoIterator<Item = CheckFinding>) {
        self.findings.extend(findings);
    }

    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }

    /// Findings of one category, in discovery order.
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a CheckFinding> {
        self.findings.iter().filter(move |f| f.category == category)
    }

    /// Print human-readable summary.
    pub fn print_summary(&self) {
        for (severity, heading) in [
            (Severity::Error, "❌ Errors"),
            (Severity::Warning, "⚠️  Warnings"),
            (Severity::Info, "ℹ️  Info"),
        ] {
            let mut group: Vec<_> = self
                .findings
                .iter()
                .filter(|f| f.severity == severity)
                .collect();
            if group.is_empty() {
                continue;
            }
            group.sort_by(|a, b| a.category.cmp(&b.category));

            println!("\n{} ({}):", heading, group.len());
            println!("{}", "─".repeat(60));
            for finding in &group {
                print_finding(finding);
            }
        }

        println!();
        println!("{}", "═".repeat(60));
        let (errors, warnings) = (self.error_count(), self.warning_count());
        if errors == 0 && warnings == 0 {
            println!("✅ All checks passed!");
        } else {
            println!("Summary: {} error(s), {} warning(s)", errors, warnings);
            if errors > 0 {
                println!("\n❌ Registration has errors that must be fixed.");
            }
        }
    }
}

fn print_finding(finding: &CheckFinding) {
    let icon = match finding.severity {
        Severity::Error => "✗",
        Severity::Warning => "⚠",
        Severity::Info => "ℹ",
    };

    let location = match (&finding.file, &finding.location) {
        (Some(f), Some(l)) => format!(" [{}:{}]", f.display(), l),
        (Some(f), None) => format!(" [{}]", f.display()),
        (None, Some(l)) => format!(" [{}]", l),
        (None, None) => String::new(),
    };

    println!(
        "  {} [{}]{}: {}",
        icon, finding.category, location, finding.message
    );
}

// ============================================================================
// Main Check Runner
// ============================================================================

/// Run all checks without printing.
pub fn run_quiet(config_path: &Path) -> Result<CheckResults> {
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;

    let mut results = CheckResults::default();
    results.extend(validate_yaml_against_schema(&content, config_path)?);

    let config = match ConsoleConfig::from_yaml(&content) {
        Ok(config) => config,
        Err(e) => {
            results.findings.push(
                CheckFinding::error("config", format!("Failed to load registration: {}", e))
                    .with_file(config_path),
            );
            return Ok(results);
        }
    };

    results.extend(check_identifiers(&config));
    results.extend(check_duplicate_identifiers(&config));
    results.extend(check_condition_flags(&config));
    results.extend(check_bulk_completion(&config));

    for finding in &mut results.findings {
        if finding.file.is_none() {
            finding.file = Some(config_path.to_path_buf());
        }
    }

    Ok(results)
}

/// Run all checks and print a summary. Fails when any error was found.
pub fn run(config_path: &Path) -> Result<()> {
    println!("🔍 Checking {}...", config_path.display());

    let results = run_quiet(config_path)?;
    results.print_summary();

    if results.has_errors() {
        anyhow::bail!(
            "Registration check failed with {} error(s)",
            results.error_count()
        );
    }

    Ok(())
}

// ============================================================================
// Check 1: JSON Schema Validation
// ============================================================================

fn validate_yaml_against_schema(content: &str, display_path: &Path) -> Result<Vec<CheckFinding>> {
    let mut findings = Vec::new();

    let schema: JsonValue = serde_json::from_str(CONSOLE_CONFIG_SCHEMA)
        .context("Failed to parse embedded schema: ConsoleConfig")?;

    let yaml_value: JsonValue = match serde_yaml::from_str(content) {
        Ok(v) => v,
        Err(e) => {
            findings.push(
                CheckFinding::error("json-schema", format!("Failed to parse YAML: {}", e))
                    .with_file(display_path),
            );
            return Ok(findings);
        }
    };

    let compiled = match jsonschema::validator_for(&schema) {
        Ok(c) => c,
        Err(e) => {
            findings.push(CheckFinding::error(
                "json-schema",
                format!("Failed to compile JSON schema: {}", e),
            ));
            return Ok(findings);
        }
    };

    for error in compiled.iter_errors(&yaml_value) {
        let path_str = error.instance_path().to_string();
        let location = if path_str.is_empty() {
            "(root)".to_string()
        } else {
            path_str
        };

        findings.push(
            CheckFinding::error("json-schema", format!("{}", error))
                .with_file(display_path)
                .with_location(location),
        );
    }

    Ok(findings)
}

// ============================================================================
// Check 2: Identifiers
// ============================================================================

fn check_identifiers(config: &ConsoleConfig) -> Vec<CheckFinding> {
    let mut findings = Vec::new();

    for (index, action) in config.actions.iter().enumerate() {
        let identifier = action.effective_identifier();
        let location = format!("actions[{}]", index);

        if let Err(e) = validate_identifier(&identifier) {
            findings.push(CheckFinding::error("identifier", e.to_string()).with_location(&location));
            continue;
        }

        if action.identifier.is_none() {
            findings.push(
                CheckFinding::info(
                    "identifier",
                    format!(
                        "Action '{}' has no identifier; it is triggered by '{}'",
                        action.label, identifier
                    ),
                )
                .with_location(location),
            );
        }
    }

    findings
}

fn check_duplicate_identifiers(config: &ConsoleConfig) -> Vec<CheckFinding> {
    let mut seen: HashMap<String, Vec<usize>> = HashMap::new();
    for (index, action) in config.actions.iter().enumerate() {
        seen.entry(action.effective_identifier())
            .or_default()
            .push(index);
    }

    let mut duplicates: Vec<_> = seen
        .into_iter()
        .filter(|(_, positions)| positions.len() > 1)
        .collect();
    duplicates.sort_by_key(|(_, positions)| positions[0]);

    duplicates
        .into_iter()
        .map(|(identifier, positions)| {
            let last = positions[positions.len() - 1];
            CheckFinding::warning(
                "duplicate-identifier",
                format!(
                    "Identifier '{}' is declared {} times; only the last declaration (actions[{}]) is kept",
                    identifier,
                    positions.len(),
                    last
                ),
            )
            .with_location(format!("actions[{}]", positions[0]))
        })
        .collect()
}

// ============================================================================
// Check 3: Flags without effect
// ============================================================================

fn check_condition_flags(config: &ConsoleConfig) -> Vec<CheckFinding> {
    config
        .actions
        .iter()
        .enumerate()
        .filter(|(_, action)| action.disable_if_condition_not_met && action.condition.is_none())
        .map(|(index, action)| {
            CheckFinding::warning(
                "condition",
                format!(
                    "Action '{}' sets disable_if_condition_not_met without a condition; the flag has no effect",
                    action.effective_identifier()
                ),
            )
            .with_location(format!("actions[{}]", index))
        })
        .collect()
}

fn check_bulk_completion(config: &ConsoleConfig) -> Vec<CheckFinding> {
    config
        .actions
        .iter()
        .enumerate()
        .filter(|(_, action)| !action.eligible_for_bulk && action.bulk_completion.is_some())
        .map(|(index, action)| {
            CheckFinding::warning(
                "bulk",
                format!(
                    "Action '{}' declares a bulk_completion hook but is not eligible for bulk; the hook never runs",
                    action.effective_identifier()
                ),
            )
            .with_location(format!("actions[{}]", index))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_yaml(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_clean_registration_passes() {
        let file = write_yaml(
            r#"
console: orders
object_name: order
actions:
  - handler: archive_order
    identifier: archive
    label: Archive
    permission: orders.archive
    log_template: archived
  - handler: refund_order
    identifier: refund
    label: Refund
    condition: is_paid
    disable_if_condition_not_met: true
"#,
        );

        let results = run_quiet(file.path()).unwrap();
        assert!(!results.has_errors(), "{:?}", results.findings);
        assert_eq!(results.warning_count(), 0);
    }

    #[test]
    fn test_schema_errors_reported() {
        let file = write_yaml(
            r#"
console: orders
actions:
  - handler: archive_order
    label: Archive
    display_slot: sidebar
    colour: red
"#,
        );

        let results = run_quiet(file.path()).unwrap();
        assert!(results.has_errors());
        assert!(results.in_category("json-schema").count() >= 2);
    }

    #[test]
    fn test_duplicate_identifier_warns() {
        let config = ConsoleConfig::from_yaml(
            r#"
console: orders
actions:
  - { handler: a, identifier: go, label: A }
  - { handler: b, identifier: stop, label: B }
  - { handler: c, identifier: go, label: C }
"#,
        )
        .unwrap();

        let findings = check_duplicate_identifiers(&config);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert!(findings[0].message.contains("actions[2]"));
        assert_eq!(findings[0].location.as_deref(), Some("actions[0]"));
    }

    #[test]
    fn test_derived_and_invalid_identifiers() {
        let config = ConsoleConfig::from_yaml(
            r#"
console: orders
actions:
  - { handler: send_invoice, label: Send }
  - { handler: ship, identifier: "ship now", label: Ship }
"#,
        )
        .unwrap();

        let findings = check_identifiers(&config);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].severity, Severity::Info);
        assert!(findings[0].message.contains("_send_invoice"));
        assert_eq!(findings[1].severity, Severity::Error);
        assert_eq!(findings[1].location.as_deref(), Some("actions[1]"));
    }

    #[test]
    fn test_flags_without_effect() {
        let config = ConsoleConfig::from_yaml(
            r#"
console: orders
actions:
  - handler: hold
    identifier: hold
    label: Hold
    disable_if_condition_not_met: true
  - handler: print
    identifier: print
    label: Print
    eligible_for_bulk: false
    bulk_completion: summarize
"#,
        )
        .unwrap();

        assert_eq!(check_condition_flags(&config).len(), 1);
        let bulk = check_bulk_completion(&config);
        assert_eq!(bulk.len(), 1);
        assert!(bulk[0].message.contains("'print'"));
    }

    #[test]
    fn test_unreadable_yaml() {
        let file = write_yaml("console: [unterminated");

        let results = run_quiet(file.path()).unwrap();
        assert!(results.has_errors());
        assert!(results.in_category("json-schema").count() == 1);
        assert!(results.in_category("config").count() == 1);
    }
}
