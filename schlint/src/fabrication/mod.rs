//! Fabrication exports: merge a bill of materials with a KiCad placement file
//! and write the BOM and CPL (component placement list) CSVs an assembly
//! house expects.

pub mod board;
pub mod loaders;

pub use board::{load_board, Board, BoardComponent, ComponentInstance};
pub use loaders::{
    load_bom, load_positions, parse_bom, parse_positions, BomEntry, Placement, BOM_COLUMNS,
};

#[derive(Debug, thiserror::Error)]
pub enum FabricationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid BOM header: {0}")]
    InvalidHeader(String),
    #[error("Invalid row at line {line}: {message}")]
    InvalidRow { line: usize, message: String },
    #[error("{reference} has no placement")]
    UnplacedInstance { reference: String },
    #[error("Output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}
