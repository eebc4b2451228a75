pub mod kicad_legacy;
pub mod schema;

// Re-export for convenience
pub use kicad_legacy::{
    LegacyParseError, ObjectKind, SchematicError, SchematicParser, SCHEMATIC_HEADER,
};
pub use schema::*;
