//! KiCad Legacy Schematic Parser (EESchema file version 2)
//!
//! The legacy schematic format is line oriented. Objects are opened either by a
//! `Text <Kind> ...` header or by a `$<Kind>` directive, and closed by a fixed
//! follow-up line (`GLabel`, `Notes`) or by an explicit `$End<Kind>` marker
//! (`Descr`, `Sheet`, `Comp`). Objects never nest.
//!
//! [`SchematicParser`] is a small state machine fed one stripped line at a
//! time. Every malformed line is fatal: there is no resynchronisation.

use std::path::Path;

use crate::parser::schema::*;

/// First line of every file this parser accepts.
pub const SCHEMATIC_HEADER: &str = "EESchema Schematic File Version 2";

const LIBRARY_PREFIX: &str = "LIBS:";
const LAYER_PREFIX: &str = "EELAYER";
const TEXT_PREFIX: &str = "Text";
const DIRECTIVE_MARKER: char = '$';

const END_DESCR: &str = "$EndDescr";
const END_SHEET: &str = "$EndSheet";
const END_COMP: &str = "$EndComp";
/// Spelled this way in every file KiCad ever wrote.
const END_SCHEMATIC_KIND: &str = "EndSCHEMATC";

/// Tokens after `Text`: kind, x, y, a, b, type, d.
const TEXT_ARGS: usize = 7;

/// Error raised by a single line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LegacyParseError {
    #[error("Invalid format: {0}")]
    Format(String),
    #[error("Unsupported text object \"{0}\"")]
    UnsupportedObject(String),
    #[error("Wrong number of arguments for \"{field}\": expected {expected}, found {found}")]
    Arity {
        field: String,
        expected: &'static str,
        found: usize,
    },
    #[error("Unknown field type \"{0}\"")]
    UnknownFieldType(String),
    #[error("Unknown object type \"{0}\"")]
    UnknownObjectKind(String),
    #[error("Unexpected line \"{0}\"")]
    UnexpectedLine(String),
}

/// Error for a whole file, carrying the offending line when there is one.
#[derive(Debug, thiserror::Error)]
pub enum SchematicError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line_number}: {source} in \"{line}\"")]
    Line {
        line_number: usize,
        line: String,
        source: LegacyParseError,
    },
    #[error("line {line_number}: invalid UTF-8")]
    Encoding { line_number: usize },
    #[error("{0}")]
    Incomplete(LegacyParseError),
}

impl SchematicError {
    /// The underlying line-level error, if any.
    pub fn parse_error(&self) -> Option<&LegacyParseError> {
        match self {
            SchematicError::Io(_) | SchematicError::Encoding { .. } => None,
            SchematicError::Line { source, .. } => Some(source),
            SchematicError::Incomplete(e) => Some(e),
        }
    }

    /// 1-based line number of the failing line.
    pub fn line_number(&self) -> Option<usize> {
        match self {
            SchematicError::Line { line_number, .. }
            | SchematicError::Encoding { line_number } => Some(*line_number),
            _ => None,
        }
    }
}

/// Kind token of a `Text` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    GLabel,
    Notes,
}

/// A `GLabel` whose text line has not been read yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelDraft {
    pub x: String,
    pub y: String,
    pub kind: String,
    pub reserved_a: String,
    pub reserved_b: String,
    pub reserved_d: String,
}

impl LabelDraft {
    fn complete(self, text: &str) -> LabelRecord {
        LabelRecord {
            x: self.x,
            y: self.y,
            kind: self.kind,
            text: text.to_string(),
            reserved_a: self.reserved_a,
            reserved_b: self.reserved_b,
            reserved_d: self.reserved_d,
        }
    }
}

/// Object currently being read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ObjectKind {
    /// Between objects, expecting a directive.
    #[default]
    TopLevel,
    GLabel(LabelDraft),
    Notes,
    Descr,
    Sheet,
    Comp(ComponentRecord),
    /// `$EndSCHEMATC` was read; nothing may follow.
    EndSchematic,
}

impl ObjectKind {
    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::TopLevel => "top level",
            ObjectKind::GLabel(_) => "GLabel",
            ObjectKind::Notes => "Notes",
            ObjectKind::Descr => "Descr",
            ObjectKind::Sheet => "Sheet",
            ObjectKind::Comp(_) => "Comp",
            ObjectKind::EndSchematic => END_SCHEMATIC_KIND,
        }
    }

    /// Resolve the name following `$` on a directive line.
    fn from_directive(name: &str) -> Result<Self, LegacyParseError> {
        match name {
            "Descr" => Ok(ObjectKind::Descr),
            "Sheet" => Ok(ObjectKind::Sheet),
            "Comp" => Ok(ObjectKind::Comp(ComponentRecord::default())),
            END_SCHEMATIC_KIND => Ok(ObjectKind::EndSchematic),
            other => Err(LegacyParseError::UnknownObjectKind(other.to_string())),
        }
    }
}

/// What a top-level line asks the parser to do.
enum TopLevelLine {
    Library(String),
    Layer,
    Open(ObjectKind),
}

/// Line-at-a-time parser for one schematic file.
#[derive(Debug, Default)]
pub struct SchematicParser {
    initialized: bool,
    done: bool,
    current: ObjectKind,
    labels: Vec<LabelRecord>,
    library_refs: Vec<String>,
    components: Vec<ComponentRecord>,
}

impl SchematicParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn current(&self) -> &ObjectKind {
        &self.current
    }

    pub fn labels(&self) -> &[LabelRecord] {
        &self.labels
    }

    pub fn library_refs(&self) -> &[String] {
        &self.library_refs
    }

    pub fn components(&self) -> &[ComponentRecord] {
        &self.components
    }

    /// Feed one line (already stripped of surrounding whitespace).
    ///
    /// On error the parser state is left as it was before the call; callers
    /// are expected to abandon the run.
    pub fn parse_line(&mut self, line: &str) -> Result<(), LegacyParseError> {
        if !self.initialized {
            if line != SCHEMATIC_HEADER {
                return Err(LegacyParseError::Format(format!(
                    "expected header \"{}\", found \"{}\"",
                    SCHEMATIC_HEADER, line
                )));
            }
            self.initialized = true;
            return Ok(());
        }

        if self.done {
            return Err(LegacyParseError::Format(
                "Unexpected input, parsing already done".to_string(),
            ));
        }

        match &mut self.current {
            ObjectKind::TopLevel => match parse_top_level(line)? {
                TopLevelLine::Library(name) => self.library_refs.push(name),
                TopLevelLine::Layer => {}
                TopLevelLine::Open(ObjectKind::EndSchematic) => {
                    self.current = ObjectKind::EndSchematic;
                    self.done = true;
                }
                TopLevelLine::Open(kind) => self.current = kind,
            },
            ObjectKind::GLabel(draft) => {
                let label = draft.clone().complete(line);
                self.labels.push(label);
                self.current = ObjectKind::TopLevel;
            }
            ObjectKind::Notes => {
                self.current = ObjectKind::TopLevel;
            }
            ObjectKind::Descr => {
                if line == END_DESCR {
                    self.current = ObjectKind::TopLevel;
                }
            }
            ObjectKind::Sheet => {
                if line == END_SHEET {
                    self.current = ObjectKind::TopLevel;
                }
            }
            ObjectKind::Comp(component) => {
                if line == END_COMP {
                    let component = std::mem::take(component);
                    self.components.push(component);
                    self.current = ObjectKind::TopLevel;
                } else {
                    parse_component_line(component, line)?;
                }
            }
            // Unreachable while `done` is set.
            ObjectKind::EndSchematic => {
                return Err(LegacyParseError::Format(
                    "Unexpected input, parsing already done".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Consume the parser once all lines have been fed.
    pub fn finish(self) -> Result<Schematic, LegacyParseError> {
        if !self.initialized {
            return Err(LegacyParseError::Format(format!(
                "missing header \"{}\"",
                SCHEMATIC_HEADER
            )));
        }
        if !self.done {
            return Err(LegacyParseError::Format(format!(
                "unexpected end of input in {} (missing ${})",
                self.current.name(),
                END_SCHEMATIC_KIND
            )));
        }

        Ok(Schematic {
            labels: self.labels,
            library_refs: self.library_refs,
            components: self.components,
        })
    }

    /// Parse a complete schematic held in memory.
    pub fn parse_str(content: &str) -> Result<Schematic, SchematicError> {
        let mut parser = Self::new();

        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            parser
                .parse_line(line)
                .map_err(|source| SchematicError::Line {
                    line_number: idx + 1,
                    line: line.to_string(),
                    source,
                })?;
        }

        let schematic = parser.finish().map_err(SchematicError::Incomplete)?;
        tracing::debug!(
            "Parsed schematic: {} labels, {} components, {} libraries",
            schematic.labels.len(),
            schematic.components.len(),
            schematic.library_refs.len()
        );
        Ok(schematic)
    }

    /// Read and parse a schematic file. The file must be UTF-8.
    pub fn parse_file(path: &Path) -> Result<Schematic, SchematicError> {
        tracing::debug!("Parsing legacy schematic: {}", path.display());
        let bytes = std::fs::read(path)?;
        let content = String::from_utf8(bytes).map_err(|e| {
            let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
            SchematicError::Encoding {
                line_number: valid.iter().filter(|&&b| b == b'\n').count() + 1,
            }
        })?;
        Self::parse_str(&content)
    }
}

fn parse_top_level(line: &str) -> Result<TopLevelLine, LegacyParseError> {
    if line.starts_with(LIBRARY_PREFIX) {
        // LIBS:<name>
        let name = line.split(':').nth(1).unwrap_or_default();
        Ok(TopLevelLine::Library(name.to_string()))
    } else if line.starts_with(LAYER_PREFIX) {
        // EELAYER <n> <m> / EELAYER END: layer bookkeeping, not needed here
        Ok(TopLevelLine::Layer)
    } else if line.starts_with(TEXT_PREFIX) {
        parse_text_header(line).map(TopLevelLine::Open)
    } else if let Some(rest) = line.strip_prefix(DIRECTIVE_MARKER) {
        // $Descr A4 11693 8268 -> Descr
        let name = rest.split(char::is_whitespace).next().unwrap_or_default();
        ObjectKind::from_directive(name).map(TopLevelLine::Open)
    } else {
        Err(LegacyParseError::UnexpectedLine(line.to_string()))
    }
}

/// `Text <Kind> <x> <y> <a> <b> <type> <d> [...]`
fn parse_text_header(line: &str) -> Result<ObjectKind, LegacyParseError> {
    let args: Vec<&str> = line.split_whitespace().skip(1).collect();

    let kind = match args.first().copied() {
        Some("GLabel") => TextKind::GLabel,
        Some("Notes") => TextKind::Notes,
        other => {
            return Err(LegacyParseError::UnsupportedObject(
                other.unwrap_or_default().to_string(),
            ))
        }
    };

    if args.len() < TEXT_ARGS {
        return Err(LegacyParseError::Arity {
            field: TEXT_PREFIX.to_string(),
            expected: "at least 7",
            found: args.len(),
        });
    }

    Ok(match kind {
        TextKind::GLabel => ObjectKind::GLabel(LabelDraft {
            x: args[1].to_string(),
            y: args[2].to_string(),
            reserved_a: args[3].to_string(),
            reserved_b: args[4].to_string(),
            kind: args[5].to_string(),
            reserved_d: args[6].to_string(),
        }),
        TextKind::Notes => ObjectKind::Notes,
    })
}

fn exact_args<'a, const N: usize>(
    field: char,
    args: &[&'a str],
    expected: &'static str,
) -> Result<[&'a str; N], LegacyParseError> {
    <[&str; N]>::try_from(args).map_err(|_| LegacyParseError::Arity {
        field: field.to_string(),
        expected,
        found: args.len(),
    })
}

fn unquote(token: &str) -> String {
    token.trim_matches('"').to_string()
}

/// Validate one line inside `$Comp`, keeping the few tokens worth summarising.
fn parse_component_line(
    component: &mut ComponentRecord,
    line: &str,
) -> Result<(), LegacyParseError> {
    let Some(field_type) = line.chars().next() else {
        return Err(LegacyParseError::UnknownFieldType(String::new()));
    };
    let args: Vec<&str> = line.split_whitespace().skip(1).collect();

    match field_type {
        'L' => {
            let [symbol, reference] = exact_args::<2>('L', &args, "2")?;
            component.symbol = symbol.to_string();
            component.reference = reference.to_string();
        }
        'U' => {
            let [a, b, timestamp] = exact_args::<3>('U', &args, "3")?;
            component.unit = Some(UnitRecord {
                reserved_a: a.to_string(),
                reserved_b: b.to_string(),
                timestamp: timestamp.to_string(),
            });
        }
        'P' => {
            let [x, y] = exact_args::<2>('P', &args, "2")?;
            component.position = Some(Position::new(x, y));
        }
        'F' => {
            let name = match args.len() {
                9 => None,
                10 => Some(unquote(args[9])),
                found => {
                    return Err(LegacyParseError::Arity {
                        field: "F".to_string(),
                        expected: "9 or 10",
                        found,
                    })
                }
            };
            component.fields.push(FieldRecord {
                index: args[0].to_string(),
                value: unquote(args[1]),
                name,
            });
        }
        // Unit position and orientation matrix rows
        c if c.is_ascii_digit() || c == '-' || c == '+' => {}
        other => return Err(LegacyParseError::UnknownFieldType(other.to_string())),
    }

    Ok(())
}
