use byteorder::{ByteOrder, LittleEndian};

use crate::error::FormatError;

type Result<T> = std::result::Result<T, FormatError>;

/// Little-endian reader over a borrowed byte buffer.
///
/// Cursor reads hand out fixed-size slices; the `*_at` accessors read
/// integers at explicit offsets without moving the cursor. The host byte
/// order never leaks into decoded values.
pub struct BinaryReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BinaryReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(FormatError::UnexpectedEof { need: n, have: self.remaining() });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn slice_at(&self, offset: usize, n: usize) -> Result<&'a [u8]> {
        self.data
            .get(offset..offset.saturating_add(n))
            .ok_or(FormatError::UnexpectedEof {
                need: n,
                have: self.data.len().saturating_sub(offset),
            })
    }

    pub fn u16_at(&self, offset: usize) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.slice_at(offset, 2)?))
    }

    pub fn i16_at(&self, offset: usize) -> Result<i16> {
        Ok(LittleEndian::read_i16(self.slice_at(offset, 2)?))
    }
}
