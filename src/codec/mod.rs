pub mod reader;
pub mod cell;
#[cfg(test)]
pub(crate) mod writer;

pub use reader::BinaryReader;
pub use cell::{Cell, CellField, CELL_RECORD_SIZE, RECORD_LAYOUT, decode, words_to_bytes};
