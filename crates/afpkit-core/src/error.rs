use thiserror::Error;

#[derive(Debug, Error)]
pub enum AfpKitError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "image")]
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    /// Swap type 0 has no verified semantics; decoding stops instead of guessing.
    #[error("Unsupported swap type 0 in instruction {word:#06x} at BSI offset {bsi_offset}")]
    UnsupportedSwapType { word: u16, bsi_offset: usize },
    #[error("Unknown swap type {swap_type} in instruction {word:#06x} at BSI offset {bsi_offset}")]
    UnknownSwapType {
        swap_type: u8,
        word: u16,
        bsi_offset: usize,
    },
    #[error("Buffer overrun: range {offset}..{offset}+{len} exceeds buffer of {buffer_len} bytes")]
    BufferOverrun {
        offset: usize,
        len: usize,
        buffer_len: usize,
    },
    #[error("Image '{key}' ({width}x{height}) does not fit a {page_width}x{page_height} page")]
    ImageTooLarge {
        key: String,
        width: u32,
        height: u32,
        page_width: u32,
        page_height: u32,
    },
    #[error("Invalid page dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid GE2D geometry: {0}")]
    InvalidGeo(String),
    #[error("Nothing to pack")]
    Empty,
}

pub type Result<T> = std::result::Result<T, AfpKitError>;

impl AfpKitError {
    pub(crate) fn overrun(offset: usize, len: usize, buffer_len: usize) -> Self {
        Self::BufferOverrun {
            offset,
            len,
            buffer_len,
        }
    }
}
