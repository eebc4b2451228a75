//! Example: registering an extra rule next to the built-in ones.
//! Run with: cargo run --example custom_rules [path/to/file.sch]

use schlint::{parse_schematic, Issue, Rule, RulesEngine, Schematic, Severity};
use std::path::Path;
use std::sync::Arc;

/// Flags global labels written in lower case.
struct LowercaseLabelRule;

impl Rule for LowercaseLabelRule {
    fn id(&self) -> &str {
        "lowercase_label"
    }

    fn name(&self) -> &str {
        "Lower-case label"
    }

    fn description(&self) -> &str {
        "Global labels should be upper case"
    }

    fn severity(&self) -> Severity {
        Severity::Info
    }

    fn check(&self, schematic: &Schematic) -> Vec<Issue> {
        schematic
            .labels
            .iter()
            .filter(|l| l.text.chars().any(|c| c.is_ascii_lowercase()))
            .map(|l| Issue {
                id: format!("{}-{}-{}", self.id(), l.x, l.y),
                rule_id: self.id().to_string(),
                severity: self.severity(),
                message: format!("Label \"{}\" is not upper case", l.text),
                label: Some(l.text.clone()),
                location: Some(l.position()),
                suggestion: Some(format!("Rename to \"{}\"", l.text.to_uppercase())),
            })
            .collect()
    }
}

fn main() -> Result<(), schlint::SchLintError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/reset_supervisor.sch".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example custom_rules [path/to/file.sch]");
        std::process::exit(1);
    }

    let schematic = parse_schematic(path)?;
    let mut engine = RulesEngine::with_default_rules();
    engine.add_rule(Arc::new(LowercaseLabelRule));
    let issues = engine.analyze(&schematic);

    println!("Found {} issues in {}", issues.len(), path.display());
    for issue in &issues {
        println!("  [{:?}] {}", issue.severity, issue.message);
        if let Some(ref suggestion) = issue.suggestion {
            println!("    {}", suggestion);
        }
    }
    Ok(())
}
