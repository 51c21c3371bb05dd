//! Primitive field encoding for persisted settings.
//!
//! Layout (all integers big-endian):
//! - u32 / i32: 4 bytes
//! - bool: 1 byte, `0` false, anything else true
//! - string: u32 byte length followed by the UTF-8 bytes

use crate::error::{Result, SearchError};

#[derive(Debug, Default)]
pub struct StreamWriter {
    buffer: Vec<u8>,
}

impl StreamWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buffer.push(u8::from(value));
    }

    pub fn write_str(&mut self, value: &str) -> Result<()> {
        let len = u32::try_from(value.len()).map_err(|_| {
            SearchError::Serialization(format!("string of {} bytes too long", value.len()))
        })?;
        self.write_u32(len);
        self.buffer.extend_from_slice(value.as_bytes());
        Ok(())
    }

    /// Appends everything written to `other`.
    pub fn append(&mut self, other: StreamWriter) {
        self.buffer.extend_from_slice(&other.buffer);
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

#[derive(Debug)]
pub struct StreamReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> StreamReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.take_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_be_bytes(self.take_array()?))
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        let [byte] = self.take_array::<1>()?;
        Ok(byte != 0)
    }

    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|error| {
            SearchError::Decode(format!(
                "invalid UTF-8 in string ending at byte {}: {error}",
                self.position
            ))
        })
    }

    /// Fails unless every byte has been consumed.
    pub fn finish(self) -> Result<()> {
        let remaining = self.data.len() - self.position;
        if remaining != 0 {
            return Err(SearchError::Decode(format!(
                "{remaining} trailing bytes after record"
            )));
        }
        Ok(())
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .position
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| {
                SearchError::Decode(format!(
                    "unexpected end of data: need {len} bytes at byte {}, have {}",
                    self.position,
                    self.data.len() - self.position
                ))
            })?;
        let slice = &self.data[self.position..end];
        self.position = end;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let slice = self.take(N)?;
        let mut array = [0u8; N];
        array.copy_from_slice(slice);
        Ok(array)
    }
}
