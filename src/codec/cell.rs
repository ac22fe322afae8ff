//! Tile map cell pool decoding
//!
//! The tile map stores its cells as a flat pool of 32-bit integers. Three
//! consecutive words form one 12-byte record made of six little-endian
//! 16-bit fields:
//!
//!   Bytes 0-1:   x                 (i16)
//!   Bytes 2-3:   y                 (i16)
//!   Bytes 4-5:   source_id         (u16)
//!   Bytes 6-7:   alternative_tile  (u16)
//!   Bytes 8-9:   coord_x           (u16)
//!   Bytes 10-11: coord_y           (u16)
//!
//! NOTE: the editor's save path documents `source_id, coord_x, coord_y,
//! alternative_tile` after the position, but its load path for format 2
//! reads `alternative_tile` before the atlas coordinates. Exported scenes
//! follow the load path, so that is the order kept here. Do not "fix" it.

use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;
use tracing::debug;

use super::reader::BinaryReader;
use crate::error::FormatError;

type Result<T> = std::result::Result<T, FormatError>;

/// Size of one packed cell record in bytes
pub const CELL_RECORD_SIZE: usize = 12;

const FIELD_SIZE: usize = 2;

/// One decoded tile instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Cell {
    pub x: i16,
    pub y: i16,
    pub source_id: u16,
    pub alternative_tile: u16,
    pub coord_x: u16,
    pub coord_y: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellField {
    X,
    Y,
    SourceId,
    AlternativeTile,
    CoordX,
    CoordY,
}

impl CellField {
    pub fn is_signed(self) -> bool {
        matches!(self, CellField::X | CellField::Y)
    }
}

/// On-disk field order of a cell record, one 16-bit field per slot.
/// Intentionally differs from the documented write order (see module docs).
pub const RECORD_LAYOUT: [CellField; 6] = [
    CellField::X,
    CellField::Y,
    CellField::SourceId,
    CellField::AlternativeTile,
    CellField::CoordX,
    CellField::CoordY,
];

impl Cell {
    /// Decode one 12-byte record
    pub fn from_record(record: &[u8]) -> Result<Self> {
        if record.len() != CELL_RECORD_SIZE {
            return Err(FormatError::TruncatedRecord { len: record.len() });
        }

        let reader = BinaryReader::new(record);
        let mut cell = Cell::default();
        for (slot, field) in RECORD_LAYOUT.into_iter().enumerate() {
            let offset = slot * FIELD_SIZE;
            let raw = if field.is_signed() {
                i32::from(reader.i16_at(offset)?)
            } else {
                i32::from(reader.u16_at(offset)?)
            };
            cell.set(field, raw);
        }
        Ok(cell)
    }

    // `raw` already carries the field's sign, so the narrowing casts are exact.
    fn set(&mut self, field: CellField, raw: i32) {
        match field {
            CellField::X => self.x = raw as i16,
            CellField::Y => self.y = raw as i16,
            CellField::SourceId => self.source_id = raw as u16,
            CellField::AlternativeTile => self.alternative_tile = raw as u16,
            CellField::CoordX => self.coord_x = raw as u16,
            CellField::CoordY => self.coord_y = raw as u16,
        }
    }
}

/// Serialize the word pool back into its little-endian byte stream
pub fn words_to_bytes(words: &[u32]) -> Vec<u8> {
    let mut bytes = vec![0u8; words.len() * 4];
    LittleEndian::write_u32_into(words, &mut bytes);
    bytes
}

/// Decode a tile map cell pool into cells, in pool order.
///
/// Fails without returning any cells when the pool does not split evenly
/// into 12-byte records.
pub fn decode(words: &[u32]) -> Result<Vec<Cell>> {
    let bytes = words_to_bytes(words);
    if bytes.len() % CELL_RECORD_SIZE != 0 {
        return Err(FormatError::TruncatedRecord { len: bytes.len() });
    }

    let cells = decode_records(&bytes)?;
    debug!(words = words.len(), cells = cells.len(), "decoded cell pool");
    Ok(cells)
}

#[cfg(not(feature = "parallel"))]
fn decode_records(bytes: &[u8]) -> Result<Vec<Cell>> {
    let mut reader = BinaryReader::new(bytes);
    let mut cells = Vec::with_capacity(bytes.len() / CELL_RECORD_SIZE);
    while !reader.is_empty() {
        cells.push(Cell::from_record(reader.read_bytes(CELL_RECORD_SIZE)?)?);
    }
    Ok(cells)
}

// Records are independent; collect() keeps chunk order.
#[cfg(feature = "parallel")]
fn decode_records(bytes: &[u8]) -> Result<Vec<Cell>> {
    use rayon::prelude::*;

    bytes
        .par_chunks_exact(CELL_RECORD_SIZE)
        .map(Cell::from_record)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::writer::encode_cells;

    fn cell(x: i16, y: i16, source_id: u16) -> Cell {
        Cell { x, y, source_id, ..Cell::default() }
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode(&[]).unwrap(), Vec::new());
    }

    #[test]
    fn test_decode_field_order() {
        // x=1, y=2 | source=3, alt=4 | coord_x=5, coord_y=6
        let words = [0x0002_0001, 0x0004_0003, 0x0006_0005];
        let cells = decode(&words).unwrap();

        assert_eq!(
            cells,
            vec![Cell {
                x: 1,
                y: 2,
                source_id: 3,
                alternative_tile: 4,
                coord_x: 5,
                coord_y: 6,
            }]
        );
    }

    #[test]
    fn test_decode_sign_per_field() {
        let words = [0xFFFF_FFFF, 0x0000_FFFF, 0x0000_0000];
        let cells = decode(&words).unwrap();

        assert_eq!(cells[0].x, -1);
        assert_eq!(cells[0].y, -1);
        assert_eq!(cells[0].source_id, 65535);
        assert_eq!(cells[0].alternative_tile, 0);
    }

    #[test]
    fn test_decode_length_invariant() {
        for k in 0..5usize {
            let words = vec![0u32; 3 * k];
            assert_eq!(decode(&words).unwrap().len(), k);
        }
        for len in [1usize, 2, 4, 5, 7, 8] {
            let words = vec![0u32; len];
            assert_eq!(
                decode(&words),
                Err(FormatError::TruncatedRecord { len: len * 4 })
            );
        }
    }

    #[test]
    fn test_decode_roundtrip() {
        let cells = vec![
            Cell {
                x: i16::MIN,
                y: i16::MAX,
                source_id: u16::MAX,
                alternative_tile: 7,
                coord_x: 300,
                coord_y: 0,
            },
            cell(-3, 12, 0),
            cell(0, 0, 42),
        ];

        assert_eq!(decode(&encode_cells(&cells)).unwrap(), cells);
    }

    #[test]
    fn test_decode_roundtrip_boundary_sweep() {
        let signed = [i16::MIN, -1, 0, 1, i16::MAX];
        let unsigned = [0u16, 1, 0x7FFF, 0x8000, u16::MAX];

        // every combination of boundary values across the six fields
        let all: Vec<Cell> = (0..5usize.pow(6))
            .map(|n| {
                let digit = |place: u32| (n / 5usize.pow(place)) % 5;
                Cell {
                    x: signed[digit(0)],
                    y: signed[digit(1)],
                    source_id: unsigned[digit(2)],
                    alternative_tile: unsigned[digit(3)],
                    coord_x: unsigned[digit(4)],
                    coord_y: unsigned[digit(5)],
                }
            })
            .collect();

        for len in [0, 1, 2, 3, 7, 64, 1000, all.len()] {
            let cells = &all[..len];
            let words = encode_cells(cells);

            assert_eq!(words.len(), 3 * len);
            assert_eq!(decode(&words).unwrap(), cells);
        }
    }

    #[test]
    fn test_decode_keeps_overlapping_cells() {
        let cells = vec![cell(4, 4, 1), cell(4, 4, 2), cell(4, 4, 1)];
        assert_eq!(decode(&encode_cells(&cells)).unwrap(), cells);
    }

    #[test]
    fn test_from_record_rejects_short_slice() {
        assert_eq!(
            Cell::from_record(&[0u8; 11]),
            Err(FormatError::TruncatedRecord { len: 11 })
        );
    }

    #[test]
    fn test_words_to_bytes_little_endian() {
        assert_eq!(
            words_to_bytes(&[0x04030201, 0xFFFF0000]),
            vec![1, 2, 3, 4, 0, 0, 0xFF, 0xFF]
        );
    }

    #[test]
    fn test_layout_signedness() {
        let signed: Vec<_> = RECORD_LAYOUT.iter().filter(|f| f.is_signed()).collect();
        assert_eq!(signed, vec![&CellField::X, &CellField::Y]);
    }
}
