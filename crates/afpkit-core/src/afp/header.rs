use serde::Serialize;

use crate::error::{AfpKitError, Result};

/// Offset of the string-table descriptor (offset u32, size u32).
pub const STRING_TABLE_FIELD: usize = 0x30;
/// Minimum number of bytes needed to read every header field.
pub const HEADER_LEN: usize = 0x38;

/// Fixed header fields of an AFP buffer. All integers are little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AfpHeader {
    /// Opaque magic, left exactly as stored.
    pub magic: [u8; 4],
    /// Size declared by the container (not validated against the real length).
    pub declared_size: u32,
    pub flag: u16,
    pub string_table_offset: u32,
    pub string_table_size: u32,
}

impl AfpHeader {
    pub fn parse(buf: &[u8]) -> Result<Self> {
        let magic = read_array::<4>(buf, 0)?;
        let declared_size = u32::from_le_bytes(read_array(buf, 4)?);
        let flag = u16::from_le_bytes(read_array(buf, 8)?);
        let string_table_offset = u32::from_le_bytes(read_array(buf, STRING_TABLE_FIELD)?);
        let string_table_size = u32::from_le_bytes(read_array(buf, STRING_TABLE_FIELD + 4)?);
        Ok(Self {
            magic,
            declared_size,
            flag,
            string_table_offset,
            string_table_size,
        })
    }

    /// Byte range of the string table, checked against `buffer_len`.
    pub fn string_table_range(&self, buffer_len: usize) -> Result<std::ops::Range<usize>> {
        let start = self.string_table_offset as usize;
        let len = self.string_table_size as usize;
        match start.checked_add(len) {
            Some(end) if end <= buffer_len => Ok(start..end),
            _ => Err(AfpKitError::overrun(start, len, buffer_len)),
        }
    }

    /// Magic rendered as text where printable, hex otherwise.
    pub fn magic_display(&self) -> String {
        if self.magic.iter().all(|b| b.is_ascii_graphic()) {
            self.magic.iter().map(|&b| b as char).collect()
        } else {
            self.magic.iter().map(|b| format!("{b:02x}")).collect()
        }
    }
}

pub(crate) fn read_array<const N: usize>(buf: &[u8], offset: usize) -> Result<[u8; N]> {
    let bytes = offset
        .checked_add(N)
        .and_then(|end| buf.get(offset..end))
        .ok_or_else(|| AfpKitError::overrun(offset, N, buf.len()))?;
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    Ok(out)
}

/// Splits a decoded string table into its NUL-separated entries.
/// Empty runs (padding between entries) are skipped.
pub fn string_table_entries(buf: &[u8], header: &AfpHeader) -> Result<Vec<String>> {
    let range = header.string_table_range(buf.len())?;
    Ok(buf[range]
        .split(|&b| b == 0)
        .filter(|s| !s.is_empty())
        .map(|s| String::from_utf8_lossy(s).into_owned())
        .collect())
}
