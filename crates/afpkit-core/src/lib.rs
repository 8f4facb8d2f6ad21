//! Core library for AFP asset tooling.
//!
//! - AFP: BSI-driven byte-order swaps followed by the string-table unmask (`decode_afp`)
//! - Packing: first-fit guillotine tree over fixed-size pages (`pack_layout`)
//! - Descriptors: `texturelist.xml` and a JSON hash for packed atlases
//! - GE2D: read-only geometry inspection
//!
//! Quick example:
//! ```ignore
//! use afpkit_core::prelude::*;
//! # fn main() -> anyhow::Result<()> {
//! let decoded = decode_afp(&std::fs::read("a.afp")?, &std::fs::read("a.bsi")?)?;
//! println!("string table: {} bytes", decoded.header.string_table_size);
//!
//! let cfg = PackerConfig::builder().with_page_size(1024, 1024).build();
//! let atlas = pack_layout(vec![("a.png", 600, 600), ("b.png", 600, 600)], cfg.clone())?;
//! println!("{}", to_texturelist_xml(&atlas, &cfg)?);
//! # Ok(()) }
//! ```

pub mod afp;
pub mod config;
pub mod error;
pub mod export;
pub mod geo;
pub mod model;
pub mod packer;
pub mod pipeline;

pub use afp::{AfpHeader, DecodedAfp, decode_afp};
pub use config::*;
pub use error::*;
pub use export::*;
pub use geo::{GeoInfo, parse_geo};
pub use model::*;
pub use packer::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `afpkit_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::afp::{AfpHeader, DecodedAfp, decode_afp, decode_swaps, unmask};
    pub use crate::config::{PackerConfig, PackerConfigBuilder, SortOrder};
    pub use crate::error::AfpKitError;
    pub use crate::model::{Atlas, Frame, Meta, PackStats, Page, Placement, Rect};
    pub use crate::pipeline::{LayoutItem, pack_layout, pack_layout_items};
    pub use crate::{to_json_hash, to_texturelist_xml};
}
