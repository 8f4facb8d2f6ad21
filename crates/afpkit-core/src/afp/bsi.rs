use tracing::trace;

use crate::error::{AfpKitError, Result};

/// Width class of a swap, taken from the top three bits of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapType {
    /// Type 0: present in the encoding but with no verified meaning.
    Unverified,
    U16,
    U32,
    U64,
    Unknown(u8),
}

impl SwapType {
    pub fn from_bits(bits: u8) -> Self {
        match bits {
            0 => Self::Unverified,
            1 => Self::U16,
            2 => Self::U32,
            3 => Self::U64,
            other => Self::Unknown(other),
        }
    }

    /// Number of bytes reversed per iteration, for the supported widths.
    pub fn swap_len(self) -> Option<usize> {
        match self {
            Self::U16 => Some(2),
            Self::U32 => Some(4),
            Self::U64 => Some(8),
            Self::Unverified | Self::Unknown(_) => None,
        }
    }
}

/// One decoded BSI word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapInstruction {
    pub word: u16,
    /// Cursor advance before the first swap, in 2-byte units.
    pub offset_units: u8,
    pub swap_type: SwapType,
    /// Number of consecutive swaps, always in `1..=64`.
    pub loop_count: u8,
}

impl SwapInstruction {
    /// Decodes a word; `None` for the zero terminator.
    pub fn decode(word: u16) -> Option<Self> {
        if word == 0 {
            return None;
        }
        Some(Self {
            word,
            offset_units: (word & 0x7f) as u8,
            swap_type: SwapType::from_bits((word >> 13) as u8),
            loop_count: ((word >> 7) & 0x3f) as u8 + 1,
        })
    }

    pub fn skip_bytes(&self) -> usize {
        self.offset_units as usize * 2
    }
}

/// Iterates the instruction words of a BSI stream up to the terminator.
///
/// Yields `(byte offset in the stream, instruction)`. A trailing odd byte is ignored.
pub fn instructions(bsi: &[u8]) -> impl Iterator<Item = (usize, SwapInstruction)> + '_ {
    bsi.chunks_exact(2)
        .enumerate()
        .map(|(i, w)| (i * 2, u16::from_le_bytes([w[0], w[1]])))
        .map_while(|(at, word)| SwapInstruction::decode(word).map(|ins| (at, ins)))
}

/// Applies the swap instructions of `bsi` to `buf` in place.
///
/// On error `buf` may hold a partially swapped state; callers wanting an
/// untouched input should go through [`decode_swaps`].
pub fn apply_swaps(buf: &mut [u8], bsi: &[u8]) -> Result<usize> {
    let mut cursor = 0usize;
    let mut swaps = 0usize;
    for (bsi_offset, ins) in instructions(bsi) {
        cursor = cursor.saturating_add(ins.skip_bytes());
        let swap_len = match (ins.swap_type, ins.swap_type.swap_len()) {
            (_, Some(len)) => len,
            (SwapType::Unverified, None) => {
                return Err(AfpKitError::UnsupportedSwapType {
                    word: ins.word,
                    bsi_offset,
                });
            }
            (_, None) => {
                return Err(AfpKitError::UnknownSwapType {
                    swap_type: (ins.word >> 13) as u8,
                    word: ins.word,
                    bsi_offset,
                });
            }
        };
        trace!(
            bsi_offset,
            cursor,
            swap_len,
            loops = ins.loop_count,
            "swap instruction"
        );
        for _ in 0..ins.loop_count {
            reverse_span(buf, cursor, swap_len)?;
            cursor += swap_len;
            swaps += 1;
        }
    }
    Ok(swaps)
}

/// Reverses `len` bytes at `offset`.
pub fn reverse_span(buf: &mut [u8], offset: usize, len: usize) -> Result<()> {
    let buffer_len = buf.len();
    let span = offset
        .checked_add(len)
        .and_then(|end| buf.get_mut(offset..end))
        .ok_or_else(|| AfpKitError::overrun(offset, len, buffer_len))?;
    span.reverse();
    Ok(())
}

/// Returns a copy of `buf` with the swaps of `bsi` applied.
pub fn decode_swaps(buf: &[u8], bsi: &[u8]) -> Result<Vec<u8>> {
    let mut out = buf.to_vec();
    apply_swaps(&mut out, bsi)?;
    Ok(out)
}
