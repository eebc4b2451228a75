//! Readers for the two fabrication inputs: the BOM spreadsheet (CSV) and the
//! `.pos` placement file exported by Pcbnew.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::FabricationError;

/// Columns a BOM must carry, in any order.
pub const BOM_COLUMNS: [&str; 8] = [
    "Component",
    "Description",
    "References",
    "Quantity Per PCB",
    "Vendor",
    "Mfg",
    "Vendor Part #",
    "Mfg Part #",
];

/// One BOM line: a part and every reference designator using it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BomEntry {
    pub index: String,
    pub description: String,
    pub references: Vec<String>,
    pub quantity: String,
    pub vendor: String,
    pub mfg: String,
    pub vendor_part_number: String,
    pub mfg_part_number: String,
}

/// One row of a `.pos` file. Values are kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub reference: String,
    pub value: String,
    pub package: String,
    pub x: String,
    pub y: String,
    pub rotation: String,
    pub side: String,
}

pub fn load_bom(path: &Path) -> Result<Vec<BomEntry>, FabricationError> {
    let content = std::fs::read_to_string(path)?;
    parse_bom(&content)
}

/// Parse the component table at the top of a BOM.
///
/// The table ends at the first blank (or all-empty) row; whatever follows is
/// notes and totals. Blank lines inside quoted fields do not end it.
pub fn parse_bom(content: &str) -> Result<Vec<BomEntry>, FabricationError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let columns = column_positions(&headers)?;
    let get = |row: &csv::StringRecord, column: usize| -> String {
        row.get(columns[column]).unwrap_or_default().to_string()
    };

    let mut entries = Vec::new();
    let mut row = csv::StringRecord::new();
    let mut record_start = reader.position().byte();
    while reader.read_record(&mut row)? {
        let record_end = reader.position().byte();
        if follows_blank_line(content, record_start, record_end)
            || row.iter().all(|field| field.trim().is_empty())
        {
            break;
        }
        record_start = record_end;

        if row.len() != headers.len() {
            return Err(FabricationError::InvalidRow {
                line: row.position().map_or(0, |pos| pos.line() as usize),
                message: format!("expected {} columns, found {}", headers.len(), row.len()),
            });
        }

        entries.push(BomEntry {
            index: get(&row, 0),
            description: get(&row, 1),
            references: get(&row, 2)
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            quantity: get(&row, 3),
            vendor: get(&row, 4),
            mfg: get(&row, 5),
            vendor_part_number: get(&row, 6),
            mfg_part_number: get(&row, 7),
        });
    }

    tracing::debug!("Loaded {} BOM entries", entries.len());
    Ok(entries)
}

/// Whether the raw text of the record at `start..end` opens with skipped empty lines.
///
/// The reader leaves the `\n` of a CRLF terminator to the next record, so one
/// `\n` right after a `\r` is not a blank line.
fn follows_blank_line(content: &str, start: u64, end: u64) -> bool {
    let (start, end) = (start as usize, end as usize);
    let mut raw = content.get(start..end).unwrap_or_default();
    if content.get(..start).is_some_and(|before| before.ends_with('\r')) {
        raw = raw.strip_prefix('\n').unwrap_or(raw);
    }
    raw.starts_with(|c: char| c == '\r' || c == '\n')
}

/// Index of each of [`BOM_COLUMNS`] in the header row.
fn column_positions(headers: &csv::StringRecord) -> Result<[usize; 8], FabricationError> {
    if headers.len() != BOM_COLUMNS.len() {
        return Err(FabricationError::InvalidHeader(format!(
            "expected {} columns, found {}",
            BOM_COLUMNS.len(),
            headers.len()
        )));
    }

    if let Some(unknown) = headers.iter().find(|h| !BOM_COLUMNS.contains(h)) {
        return Err(FabricationError::InvalidHeader(format!(
            "unexpected column \"{}\"",
            unknown
        )));
    }

    let mut positions = [0usize; 8];
    for (slot, name) in positions.iter_mut().zip(BOM_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| {
                FabricationError::InvalidHeader(format!("missing column \"{}\"", name))
            })?;
    }
    Ok(positions)
}

pub fn load_positions(path: &Path) -> Result<Vec<Placement>, FabricationError> {
    let content = std::fs::read_to_string(path)?;
    parse_positions(&content)
}

/// Parse a Pcbnew `.pos` file: `Ref Val Package PosX PosY Rot Side`.
pub fn parse_positions(content: &str) -> Result<Vec<Placement>, FabricationError> {
    let mut placements = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let [reference, value, package, x, y, rotation, side] =
            <[&str; 7]>::try_from(parts.as_slice()).map_err(|_| FabricationError::InvalidRow {
                line: idx + 1,
                message: format!("expected 7 columns, found {}", parts.len()),
            })?;

        placements.push(Placement {
            reference: reference.to_string(),
            value: value.to_string(),
            package: package.to_string(),
            x: x.to_string(),
            y: y.to_string(),
            rotation: rotation.to_string(),
            side: side.to_string(),
        });
    }

    Ok(placements)
}
