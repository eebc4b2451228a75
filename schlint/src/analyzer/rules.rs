use crate::parser::schema::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Error => "Error",
            Severity::Warning => "Warning",
            Severity::Info => "Info",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    /// Text of the label the issue is about.
    pub label: Option<String>,
    pub location: Option<Position>,
    pub suggestion: Option<String>,
}

pub trait Rule: Send + Sync {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn severity(&self) -> Severity;
    fn check(&self, schematic: &Schematic) -> Vec<Issue>;
}

pub struct RulesEngine {
    rules: Vec<Arc<dyn Rule>>,
}

impl RulesEngine {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_default_rules() -> Self {
        let mut engine = Self::new();
        engine.add_rule(Arc::new(MissingPrefixRule));
        engine
    }

    pub fn add_rule(&mut self, rule: Arc<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }

    pub fn analyze(&self, schematic: &Schematic) -> Vec<Issue> {
        let mut issues = Vec::new();
        for rule in &self.rules {
            issues.extend(rule.check(schematic));
        }
        issues
    }

    /// Run only the rules whose id is listed; an empty list runs everything.
    pub fn analyze_selected(&self, schematic: &Schematic, rule_ids: &[String]) -> Vec<Issue> {
        if rule_ids.is_empty() {
            return self.analyze(schematic);
        }

        let mut issues = Vec::new();
        for rule in &self.rules {
            if rule_ids.iter().any(|id| id == rule.id()) {
                issues.extend(rule.check(schematic));
            }
        }
        issues
    }
}

impl Default for RulesEngine {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

/// Prefix that `full` has in front of `short`, when `short` is a proper suffix of `full`.
///
/// The prefix runs up to the first occurrence of `short` inside `full`, which is
/// not always where the suffix starts (`"A"` in `"ABA"` gives an empty prefix).
pub fn missing_prefix<'a>(short: &str, full: &'a str) -> Option<&'a str> {
    if short == full || !full.ends_with(short) {
        return None;
    }
    full.find(short).map(|idx| &full[..idx])
}

/// Compare every ordered pair of labels and flag labels that look like a
/// shortened form of another one.
///
/// Warnings come out in label order (outer loop is the short label, inner loop
/// the complete one). Repeated pairs are reported every time.
pub fn lint_labels(labels: &[LabelRecord]) -> Vec<Issue> {
    let mut issues = Vec::new();

    for short in labels {
        for full in labels {
            let Some(prefix) = missing_prefix(&short.text, &full.text) else {
                continue;
            };

            issues.push(Issue {
                id: uuid::Uuid::new_v4().to_string(),
                rule_id: MISSING_PREFIX_RULE_ID.to_string(),
                severity: Severity::Warning,
                message: format!(
                    "Maybe missing prefix \"{}\" on \"{}\"",
                    prefix, short.text
                ),
                label: Some(short.text.clone()),
                location: Some(short.position()),
                suggestion: Some(format!(
                    "Check whether it should be \"{}\" (label at {}, {})",
                    full.text, full.x, full.y
                )),
            });
        }
    }

    issues
}

pub const MISSING_PREFIX_RULE_ID: &str = "missing_prefix";

// Rule implementations

pub struct MissingPrefixRule;

impl Rule for MissingPrefixRule {
    fn id(&self) -> &str {
        MISSING_PREFIX_RULE_ID
    }

    fn name(&self) -> &str {
        "Missing label prefix"
    }

    fn description(&self) -> &str {
        "Flags global labels whose text is a suffix of another global label (e.g. RESET vs SYS_RESET)"
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, schematic: &Schematic) -> Vec<Issue> {
        lint_labels(&schematic.labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(text: &str) -> LabelRecord {
        LabelRecord {
            x: "1000".to_string(),
            y: "2000".to_string(),
            kind: "Input".to_string(),
            text: text.to_string(),
            reserved_a: "0".to_string(),
            reserved_b: "60".to_string(),
            reserved_d: "~".to_string(),
        }
    }

    #[test]
    fn test_missing_prefix_helper() {
        assert_eq!(missing_prefix("RESET", "SYS_RESET"), Some("SYS_"));
        assert_eq!(missing_prefix("SYS_RESET", "RESET"), None);
        assert_eq!(missing_prefix("RESET", "RESET"), None);
        assert_eq!(missing_prefix("CLK", "CLOCK"), None);
    }

    #[test]
    fn test_prefix_cut_at_first_occurrence() {
        assert_eq!(missing_prefix("A", "ABA"), Some(""));
        assert_eq!(missing_prefix("EN", "EN_PWR_EN"), Some(""));
    }

    #[test]
    fn test_duplicate_pairs_are_not_merged() {
        let labels = vec![label("RESET"), label("SYS_RESET"), label("SYS_RESET")];
        let issues = lint_labels(&labels);
        assert_eq!(issues.len(), 2);
        assert!(issues
            .iter()
            .all(|i| i.message == "Maybe missing prefix \"SYS_\" on \"RESET\""));
    }

    #[test]
    fn test_order_follows_outer_label() {
        let labels = vec![label("SDA"), label("I2C_SCL"), label("SCL"), label("I2C_SDA")];
        let messages: Vec<_> = lint_labels(&labels)
            .into_iter()
            .map(|i| i.message)
            .collect();
        assert_eq!(
            messages,
            vec![
                "Maybe missing prefix \"I2C_\" on \"SDA\"".to_string(),
                "Maybe missing prefix \"I2C_\" on \"SCL\"".to_string(),
            ]
        );
    }

    #[test]
    fn test_analyze_selected_filters_by_id() {
        let schematic = Schematic {
            labels: vec![label("RESET"), label("SYS_RESET")],
            ..Default::default()
        };
        let engine = RulesEngine::with_default_rules();
        assert_eq!(engine.analyze_selected(&schematic, &[]).len(), 1);
        assert_eq!(
            engine
                .analyze_selected(&schematic, &["missing_prefix".to_string()])
                .len(),
            1
        );
        assert!(engine
            .analyze_selected(&schematic, &["other".to_string()])
            .is_empty());
    }
}
