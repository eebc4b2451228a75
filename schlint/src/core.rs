//! Core lint logic shared by the CLI and library users.
//! No terminal or process handling here.

use std::path::{Path, PathBuf};

use crate::analyzer::rules::{Issue, RulesEngine, Severity};
use crate::parser::kicad_legacy::{SchematicError, SchematicParser};
use crate::parser::schema::Schematic;

#[derive(Debug, thiserror::Error)]
pub enum SchLintError {
    #[error("Parse error: {0}")]
    Parse(#[from] SchematicError),
    #[error("{}: {source}", file.display())]
    File {
        file: PathBuf,
        source: SchematicError,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Options for lint runs.
#[derive(Clone, Debug, Default)]
pub struct LintOptions {
    /// Rule ids to run; empty runs every registered rule.
    pub rules: Vec<String>,
    /// Report a run with any warning as failed.
    pub fail_on_warning: bool,
}

/// Per-file lint result.
#[derive(Debug, Clone)]
pub struct LintResult {
    pub file: PathBuf,
    pub schematic: Schematic,
    pub issues: Vec<Issue>,
    pub stats: LintStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct LintStats {
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
    pub labels: usize,
    pub components: usize,
}

impl LintResult {
    pub fn total_issues(&self) -> usize {
        self.stats.errors + self.stats.warnings + self.stats.info
    }

    pub fn has_errors(&self) -> bool {
        self.stats.errors > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.stats.warnings > 0
    }

    /// Whether this result should fail the run under `options`.
    pub fn fails(&self, options: &LintOptions) -> bool {
        self.has_errors() || (options.fail_on_warning && self.has_warnings())
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "file": self.file.display().to_string(),
            "issues": self.issues,
            "libraries": self.schematic.library_refs,
            "stats": self.stats,
        })
    }
}

fn issues_to_stats(issues: &[Issue], schematic: &Schematic) -> LintStats {
    let mut stats = LintStats {
        labels: schematic.labels.len(),
        components: schematic.components.len(),
        ..Default::default()
    };
    for i in issues {
        match i.severity {
            Severity::Error => stats.errors += 1,
            Severity::Warning => stats.warnings += 1,
            Severity::Info => stats.info += 1,
        }
    }
    stats
}

/// Recursively discover legacy schematic files in a directory.
pub fn discover_schematic_files(dir: &Path) -> Result<Vec<PathBuf>, SchLintError> {
    let mut files = Vec::new();
    walk_dir(dir, &mut files, 0)?;
    files.sort();
    Ok(files)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>, depth: usize) -> Result<(), SchLintError> {
    if depth > 20 {
        return Ok(());
    }
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if name.starts_with('.') || name == "target" || name == "build" {
                continue;
            }
            walk_dir(&path, files, depth + 1)?;
        } else if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("sch") {
            files.push(path);
        }
    }
    Ok(())
}

/// Core lint API used by the CLI.
pub struct SchLintCore;

impl SchLintCore {
    /// Lint schematic text that is already in memory.
    pub fn lint_str(
        file: &Path,
        content: &str,
        options: &LintOptions,
    ) -> Result<LintResult, SchLintError> {
        let schematic = SchematicParser::parse_str(content)?;
        Ok(Self::lint_schematic(file, schematic, options))
    }

    /// Lint a single schematic file.
    pub fn lint_file(path: &Path, options: &LintOptions) -> Result<LintResult, SchLintError> {
        let schematic =
            SchematicParser::parse_file(path).map_err(|source| SchLintError::File {
                file: path.to_path_buf(),
                source,
            })?;
        Ok(Self::lint_schematic(path, schematic, options))
    }

    fn lint_schematic(file: &Path, schematic: Schematic, options: &LintOptions) -> LintResult {
        let engine = RulesEngine::with_default_rules();
        let issues = engine.analyze_selected(&schematic, &options.rules);
        let stats = issues_to_stats(&issues, &schematic);

        tracing::debug!(
            "Linted {}: {} labels, {} issues",
            file.display(),
            stats.labels,
            issues.len()
        );

        LintResult {
            file: file.to_path_buf(),
            schematic,
            issues,
            stats,
        }
    }

    /// Lint every `.sch` file below `dir`. Stops at the first file that fails to parse.
    pub fn lint_project(dir: &Path, options: &LintOptions) -> Result<Vec<LintResult>, SchLintError> {
        let files = discover_schematic_files(dir)?;
        if files.is_empty() {
            tracing::warn!("No schematic files found in {}", dir.display());
        }

        let mut results = Vec::new();
        for path in files {
            results.push(Self::lint_file(&path, options)?);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(severity: Severity) -> Issue {
        Issue {
            id: "1".to_string(),
            rule_id: "test".to_string(),
            severity,
            message: "msg".to_string(),
            label: None,
            location: None,
            suggestion: None,
        }
    }

    fn result_with(issues: Vec<Issue>) -> LintResult {
        let schematic = Schematic::default();
        let stats = issues_to_stats(&issues, &schematic);
        LintResult {
            file: PathBuf::from("test.sch"),
            schematic,
            issues,
            stats,
        }
    }

    #[test]
    fn test_errors_are_not_warnings() {
        let result = result_with(vec![issue(Severity::Error)]);
        assert!(result.has_errors());
        assert!(!result.has_warnings());
        assert!(result.fails(&LintOptions::default()));
    }

    #[test]
    fn test_warnings_fail_only_when_asked() {
        let result = result_with(vec![issue(Severity::Warning), issue(Severity::Info)]);
        assert!(!result.has_errors());
        assert!(result.has_warnings());
        assert_eq!(result.total_issues(), 2);
        assert!(!result.fails(&LintOptions::default()));

        let strict = LintOptions {
            fail_on_warning: true,
            ..Default::default()
        };
        assert!(result.fails(&strict));
    }

    #[test]
    fn test_info_only_is_clean() {
        let result = result_with(vec![issue(Severity::Info)]);
        assert!(!result.has_warnings());
        assert!(!result.fails(&LintOptions {
            fail_on_warning: true,
            ..Default::default()
        }));
    }
}
