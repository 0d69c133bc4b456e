//! Forward-only cursor over an in-memory `.skel` buffer.

use crate::Error;
use byteorder::{BigEndian, ByteOrder};

#[derive(Clone, Debug)]
pub(crate) struct BinaryInput<'a> {
    bytes: &'a [u8],
    cursor: usize,
}

impl<'a> BinaryInput<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, cursor: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.cursor
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.cursor)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], Error> {
        if self.remaining() < n {
            return Err(Error::UnexpectedEndOfData {
                offset: self.cursor,
                needed: n,
            });
        }
        let bytes = &self.bytes[self.cursor..self.cursor + n];
        self.cursor += n;
        Ok(bytes)
    }

    pub(crate) fn skip(&mut self, n: usize) -> Result<(), Error> {
        self.take(n).map(|_| ())
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, Error> {
        Ok(self.take(1)?[0])
    }

    pub(crate) fn read_i8(&mut self) -> Result<i8, Error> {
        Ok(self.read_u8()? as i8)
    }

    pub(crate) fn read_bool(&mut self) -> Result<bool, Error> {
        Ok(self.read_u8()? != 0)
    }

    pub(crate) fn read_i32_be(&mut self) -> Result<i32, Error> {
        Ok(BigEndian::read_i32(self.take(4)?))
    }

    pub(crate) fn read_u16_be(&mut self) -> Result<u16, Error> {
        Ok(BigEndian::read_u16(self.take(2)?))
    }

    /// Bit-for-bit reinterpretation of a big-endian int; NaN payloads survive.
    pub(crate) fn read_f32(&mut self) -> Result<f32, Error> {
        Ok(f32::from_bits(self.read_i32_be()? as u32))
    }

    pub(crate) fn read_varint(&mut self, optimize_positive: bool) -> Result<i32, Error> {
        let mut value: u32 = 0;
        for shift in [0u32, 7, 14, 21, 28] {
            let b = self.read_u8()?;
            value |= ((b & 0x7F) as u32) << shift;
            if (b & 0x80) == 0 {
                break;
            }
        }

        if optimize_positive {
            Ok(value as i32)
        } else {
            Ok((value >> 1) as i32 ^ -((value & 1) as i32))
        }
    }

    /// Reads a varint used as a count or index. Values the writer can only produce for
    /// non-negative quantities are rejected when the high bit is set.
    pub(crate) fn read_count(&mut self) -> Result<usize, Error> {
        let offset = self.cursor;
        let value = self.read_varint(true)?;
        usize::try_from(value).map_err(|_| Error::NegativeCount { offset, value })
    }

    pub(crate) fn read_string(&mut self) -> Result<Option<String>, Error> {
        let length = self.read_count()?;
        if length == 0 {
            return Ok(None);
        }
        let offset = self.cursor;
        let bytes = self.take(length - 1)?;
        let s = std::str::from_utf8(bytes).map_err(|source| Error::InvalidUtf8 { offset, source })?;
        Ok(Some(s.to_string()))
    }

    pub(crate) fn read_string_ref(&mut self, strings: &StringTable) -> Result<Option<String>, Error> {
        let index = self.read_count()?;
        Ok(strings.get(index)?.map(str::to_string))
    }

    pub(crate) fn read_color(&mut self) -> Result<[f32; 4], Error> {
        let rgba = self.take(4)?;
        Ok([
            rgba[0] as f32 / 255.0,
            rgba[1] as f32 / 255.0,
            rgba[2] as f32 / 255.0,
            rgba[3] as f32 / 255.0,
        ])
    }

    /// `count` floats, each multiplied by `scale`.
    pub(crate) fn read_f32_array(&mut self, count: usize, scale: f32) -> Result<Vec<f32>, Error> {
        let mut out = Vec::with_capacity(count.min(self.remaining() / 4));
        for _ in 0..count {
            out.push(self.read_f32()? * scale);
        }
        Ok(out)
    }

    /// Varint length followed by that many big-endian `u16` values.
    pub(crate) fn read_u16_array(&mut self) -> Result<Vec<u16>, Error> {
        let count = self.read_count()?;
        let mut out = Vec::with_capacity(count.min(self.remaining() / 2));
        for _ in 0..count {
            out.push(self.read_u16_be()?);
        }
        Ok(out)
    }
}

/// Strings shared by reference throughout the stream. References are 1-based; 0 is the null string.
#[derive(Clone, Debug, Default)]
pub(crate) struct StringTable {
    strings: Vec<Option<String>>,
}

impl StringTable {
    pub(crate) fn read(input: &mut BinaryInput<'_>) -> Result<Self, Error> {
        let count = input.read_count()?;
        let mut strings = Vec::with_capacity(count.min(input.remaining()));
        for _ in 0..count {
            strings.push(input.read_string()?);
        }
        Ok(Self { strings })
    }

    pub(crate) fn len(&self) -> usize {
        self.strings.len()
    }

    pub(crate) fn get(&self, index: usize) -> Result<Option<&str>, Error> {
        if index == 0 {
            return Ok(None);
        }
        self.strings
            .get(index - 1)
            .map(Option::as_deref)
            .ok_or_else(|| Error::invalid_index("string reference", index as i64, self.len()))
    }
}

#[cfg(test)]
impl From<Vec<Option<String>>> for StringTable {
    fn from(strings: Vec<Option<String>>) -> Self {
        Self { strings }
    }
}
