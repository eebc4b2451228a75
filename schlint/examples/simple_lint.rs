//! Simple lint example: lint a schematic and print the warnings.

use schlint::prelude::*;
use std::path::Path;

fn main() -> Result<(), SchLintError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/reset_supervisor.sch".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example simple_lint [path/to/file.sch]");
        std::process::exit(1);
    }

    let result = SchLintCore::lint_file(path, &LintOptions::default())?;

    println!("Lint results for: {}", result.file.display());
    println!(
        "{} labels, {} components, {} issues",
        result.stats.labels,
        result.stats.components,
        result.total_issues()
    );
    println!();

    for issue in &result.issues {
        println!("{}: {}", issue.severity.label(), issue.message);
    }

    if result.has_warnings() {
        println!("\nLint finished with warnings.");
    } else {
        println!("\nLint passed.");
    }
    Ok(())
}
