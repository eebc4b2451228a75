//! Records extracted from a legacy EESchema schematic.
//!
//! Coordinates and most tokens are kept as the opaque strings found in the
//! file. Nothing here converts units or interprets orientation.

use serde::{Deserialize, Serialize};

/// Position of an object as written in the file (internal units, unparsed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: String,
    pub y: String,
}

impl Position {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }
}

/// A global (hierarchical) label: the `Text GLabel ...` header plus its text line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRecord {
    pub x: String,
    pub y: String,
    /// Shape token of the label (`Input`, `Output`, `UnSpc`, ...).
    pub kind: String,
    pub text: String,
    /// Tokens between the coordinates and the shape; meaning not decoded.
    pub reserved_a: String,
    pub reserved_b: String,
    /// Token after the shape; meaning not decoded.
    pub reserved_d: String,
}

impl LabelRecord {
    pub fn position(&self) -> Position {
        Position::new(self.x.clone(), self.y.clone())
    }
}

/// `U` line of a component: two undecoded tokens and the timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub reserved_a: String,
    pub reserved_b: String,
    pub timestamp: String,
}

/// `F` line of a component. Built-in fields have no name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRecord {
    pub index: String,
    pub value: String,
    pub name: Option<String>,
}

impl FieldRecord {
    pub fn is_custom(&self) -> bool {
        self.name.is_some()
    }
}

/// Summary of a `$Comp ... $EndComp` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub symbol: String,
    pub reference: String,
    pub unit: Option<UnitRecord>,
    pub position: Option<Position>,
    pub fields: Vec<FieldRecord>,
}

/// Everything the line parser keeps from a complete schematic file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schematic {
    pub labels: Vec<LabelRecord>,
    pub library_refs: Vec<String>,
    pub components: Vec<ComponentRecord>,
}
