//! AFP buffer de-obfuscation.
//!
//! Two passes run in order over an owned copy of the buffer:
//! 1. [`bsi`]: the BSI side stream drives byte-order swaps from a running cursor.
//! 2. [`unmask`]: the header-declared string table gets a keyed additive unmask.

pub mod bsi;
pub mod header;
pub mod unmask;

use tracing::{debug, instrument};

use crate::error::Result;

pub use bsi::{SwapInstruction, SwapType, apply_swaps, decode_swaps, instructions, reverse_span};
pub use header::{AfpHeader, HEADER_LEN, string_table_entries};
pub use unmask::{apply_unmask, unmask, unmask_byte, unmask_table};

/// Decoded AFP buffer together with the header read after swapping.
#[derive(Debug, Clone)]
pub struct DecodedAfp {
    pub data: Vec<u8>,
    pub header: AfpHeader,
    /// Number of individual span reversals performed.
    pub swaps: usize,
}

#[instrument(skip_all, fields(afp_len = afp.len(), bsi_len = bsi.len()))]
/// Runs the swap pass and then the string-table unmask on a copy of `afp`.
///
/// The caller's buffer is never touched; on error the partial copy is dropped.
pub fn decode_afp(afp: &[u8], bsi: &[u8]) -> Result<DecodedAfp> {
    let mut data = afp.to_vec();
    let swaps = apply_swaps(&mut data, bsi)?;
    let header = apply_unmask(&mut data)?;
    debug!(
        swaps,
        string_table_offset = header.string_table_offset,
        string_table_size = header.string_table_size,
        "decoded AFP buffer"
    );
    Ok(DecodedAfp {
        data,
        header,
        swaps,
    })
}
