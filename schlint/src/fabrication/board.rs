use std::path::Path;

use serde::Serialize;

use super::loaders::{load_bom, load_positions, BomEntry, Placement};
use super::FabricationError;

const CPL_HEADER: [&str; 5] = ["Ref", "PosX", "PosY", "Rot", "Side"];
const BOM_HEADER: [&str; 8] = [
    "Description",
    "References",
    "Quantity Per PCB",
    "Customer Supplied",
    "Manufacturer",
    "Manufacturer Part #",
    "Vendor",
    "Vendor Part #",
];

/// A single placed part (one reference designator of a BOM line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentInstance {
    pub reference: String,
    pub placement: Option<Placement>,
}

impl ComponentInstance {
    pub fn is_placed(&self) -> bool {
        self.placement.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardComponent {
    pub entry: BomEntry,
    pub instances: Vec<ComponentInstance>,
}

impl BoardComponent {
    pub fn new(entry: BomEntry) -> Self {
        let instances = entry
            .references
            .iter()
            .map(|reference| ComponentInstance {
                reference: reference.clone(),
                placement: None,
            })
            .collect();
        Self { entry, instances }
    }
}

/// BOM lines merged with their placements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Board {
    pub components: Vec<BoardComponent>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bom(entries: Vec<BomEntry>) -> Self {
        Self {
            components: entries.into_iter().map(BoardComponent::new).collect(),
        }
    }

    pub fn add(&mut self, entry: BomEntry) {
        self.components.push(BoardComponent::new(entry));
    }

    /// Attach a placement to every instance with its reference.
    ///
    /// Returns `false` when no BOM line lists the reference (fiducials,
    /// mounting holes and other footprints without a BOM entry).
    pub fn position(&mut self, placement: &Placement) -> bool {
        let mut found = false;
        for component in &mut self.components {
            for instance in &mut component.instances {
                if instance.reference == placement.reference {
                    instance.placement = Some(placement.clone());
                    found = true;
                }
            }
        }

        if !found {
            tracing::warn!(
                "Placement for {} has no BOM entry, skipping",
                placement.reference
            );
        }
        found
    }

    /// Component placement list, one row per instance.
    pub fn cpl_csv(&self) -> Result<String, FabricationError> {
        let mut rows = Vec::new();
        for component in &self.components {
            for instance in &component.instances {
                let placement = instance.placement.as_ref().ok_or_else(|| {
                    FabricationError::UnplacedInstance {
                        reference: instance.reference.clone(),
                    }
                })?;
                rows.push(vec![
                    instance.reference.clone(),
                    placement.x.clone(),
                    placement.y.clone(),
                    placement.rotation.clone(),
                    placement.side.clone(),
                ]);
            }
        }
        to_csv(&CPL_HEADER, &rows)
    }

    /// Bill of materials in the assembler's column layout.
    pub fn bom_csv(&self) -> Result<String, FabricationError> {
        let rows: Vec<Vec<String>> = self
            .components
            .iter()
            .map(|c| {
                vec![
                    c.entry.description.clone(),
                    c.entry.references.join(" "),
                    c.entry.quantity.clone(),
                    "No".to_string(),
                    c.entry.mfg.clone(),
                    c.entry.mfg_part_number.clone(),
                    c.entry.vendor.clone(),
                    c.entry.vendor_part_number.clone(),
                ]
            })
            .collect();
        to_csv(&BOM_HEADER, &rows)
    }
}

fn to_csv(header: &[&str], rows: &[Vec<String>]) -> Result<String, FabricationError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| FabricationError::Io(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Load a BOM and a placement file and merge them.
pub fn load_board(bom_path: &Path, cpl_path: &Path) -> Result<Board, FabricationError> {
    let mut board = Board::from_bom(load_bom(bom_path)?);

    for placement in load_positions(cpl_path)? {
        board.position(&placement);
    }

    Ok(board)
}
