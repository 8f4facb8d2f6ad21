use super::header::AfpHeader;
use crate::error::Result;

/// Unmasks one string-table byte at zero-based table index `index`.
///
/// Equal to `(x + 0x80 + 0xff * index) mod 256`; since `0xff ≡ -1`, this
/// is `x + 0x80 - index` in wrapping 8-bit arithmetic.
#[inline]
pub fn unmask_byte(x: u8, index: usize) -> u8 {
    x.wrapping_add(0x80).wrapping_sub(index as u8)
}

/// Unmasks `table` in place; indices restart at 0 for the slice.
pub fn unmask_table(table: &mut [u8]) {
    for (i, b) in table.iter_mut().enumerate() {
        *b = unmask_byte(*b, i);
    }
}

/// Unmasks the header-declared string table of `buf` in place.
///
/// Runs unconditionally; a zero-sized table leaves the buffer alone.
pub fn apply_unmask(buf: &mut [u8]) -> Result<AfpHeader> {
    let header = AfpHeader::parse(buf)?;
    let range = header.string_table_range(buf.len())?;
    unmask_table(&mut buf[range]);
    Ok(header)
}

/// Returns an unmasked copy of `buf`.
pub fn unmask(buf: &[u8]) -> Result<Vec<u8>> {
    let mut out = buf.to_vec();
    apply_unmask(&mut out)?;
    Ok(out)
}

