//! schlint - legacy KiCad schematic linter
//!
//! This library reads legacy EESchema schematics (`EESchema Schematic File
//! Version 2`), validates their object structure line by line, and flags
//! global labels that look like they lost a hierarchical prefix (`RESET`
//! next to `SYS_RESET`).
//!
//! # Quick Start
//!
//! ```no_run
//! use schlint::{LintOptions, SchLintCore};
//! use std::path::Path;
//!
//! let options = LintOptions::default();
//! let result = SchLintCore::lint_file(Path::new("board.sch"), &options).unwrap();
//!
//! for issue in &result.issues {
//!     println!("{}: {}", issue.severity.label(), issue.message);
//! }
//! ```
//!
//! # Features
//!
//! - **Schematic parsing**: strict line-state parser with per-line errors
//! - **Label linting**: missing-prefix detection on global labels
//! - **Fabrication export**: BOM + placement merge into assembler CSVs
//! - **Keepout zones**: circular keepout polygons for `kicad_pcb`

pub mod analyzer;
pub mod core;
pub mod fabrication;
pub mod keepout;
pub mod parser;

// Re-export main types
pub use analyzer::rules::{lint_labels, Issue, Rule, RulesEngine, Severity};
pub use crate::core::{
    discover_schematic_files, LintOptions, LintResult, LintStats, SchLintCore, SchLintError,
};
pub use fabrication::{load_board, Board, FabricationError};
pub use keepout::KeepoutZone;
pub use parser::kicad_legacy::{LegacyParseError, SchematicError, SchematicParser};
pub use parser::schema::{LabelRecord, Schematic};

/// Parse a schematic file (convenience wrapper).
pub fn parse_schematic(path: &std::path::Path) -> Result<Schematic, SchLintError> {
    SchematicParser::parse_file(path).map_err(|source| SchLintError::File {
        file: path.to_path_buf(),
        source,
    })
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Issue, LabelRecord, LintOptions, LintResult, LintStats, SchLintCore, SchLintError,
        Severity,
    };
}
