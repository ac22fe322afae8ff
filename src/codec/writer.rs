use byteorder::{ByteOrder, LittleEndian};

use super::cell::{Cell, CellField, RECORD_LAYOUT};

/// Little-endian byte writer used to build cell pool fixtures
pub struct BinaryWriter {
    data: Vec<u8>,
}

impl BinaryWriter {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Regroup the bytes into little-endian 32-bit words, dropping any tail
    pub fn into_words(self) -> Vec<u32> {
        self.data.chunks_exact(4).map(LittleEndian::read_u32).collect()
    }

    pub fn write_u16_le(&mut self, v: u16) {
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i16_le(&mut self, v: i16) {
        self.write_u16_le(v as u16);
    }

    pub fn write_cell(&mut self, cell: &Cell) {
        for field in RECORD_LAYOUT {
            match field {
                CellField::X => self.write_i16_le(cell.x),
                CellField::Y => self.write_i16_le(cell.y),
                CellField::SourceId => self.write_u16_le(cell.source_id),
                CellField::AlternativeTile => self.write_u16_le(cell.alternative_tile),
                CellField::CoordX => self.write_u16_le(cell.coord_x),
                CellField::CoordY => self.write_u16_le(cell.coord_y),
            }
        }
    }
}

/// Encode cells into the packed word pool `decode` consumes
pub fn encode_cells(cells: &[Cell]) -> Vec<u32> {
    let mut writer = BinaryWriter::new();
    for cell in cells {
        writer.write_cell(cell);
    }
    writer.into_words()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_cell_layout() {
        let cell = Cell {
            x: -2,
            y: 3,
            source_id: 4,
            alternative_tile: 5,
            coord_x: 6,
            coord_y: 7,
        };
        let mut writer = BinaryWriter::new();
        writer.write_cell(&cell);

        assert_eq!(writer.len(), 12);
        assert_eq!(
            writer.into_vec(),
            vec![0xFE, 0xFF, 3, 0, 4, 0, 5, 0, 6, 0, 7, 0]
        );
    }

    #[test]
    fn test_into_words() {
        let mut writer = BinaryWriter::new();
        writer.write_u16_le(0x5678);
        writer.write_u16_le(0x1234);
        writer.write_u16_le(0xAAAA);

        assert_eq!(writer.into_words(), vec![0x12345678]);
    }
}
