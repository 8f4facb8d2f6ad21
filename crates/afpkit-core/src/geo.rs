//! Read-only view of GE2D geometry files, for diagnostics.

use serde::Serialize;

use crate::afp::header::read_array;
use crate::error::{AfpKitError, Result};

pub const GEO_MAGIC: &[u8; 4] = b"GE2D";

const TEXTURE_SIZE_FIELD: usize = 0x14;
const OFFSETS_FIELD: usize = 0x20;

/// Section offsets stored big-endian at 0x20. Zero means absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GeoOffsets {
    pub rect_points: u32,
    pub texture_points: u32,
    pub reserved: u32,
    pub label: u32,
    pub unknown: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoInfo {
    pub texture_width: u16,
    pub texture_height: u16,
    pub offsets: GeoOffsets,
    pub label: Option<String>,
    /// Quad corners in pixels (stored values are half-scale).
    pub rect_points: Option<[(f32, f32); 4]>,
    /// Quad UVs scaled to texture pixels.
    pub texture_points: Option<[(f32, f32); 4]>,
    pub unknown: Option<[i32; 3]>,
}

pub fn parse_geo(buf: &[u8]) -> Result<GeoInfo> {
    if buf.get(..4) != Some(GEO_MAGIC.as_slice()) {
        return Err(AfpKitError::InvalidGeo("missing GE2D magic".into()));
    }

    let texture_width = u16::from_le_bytes(read_array(buf, TEXTURE_SIZE_FIELD)?);
    let texture_height = u16::from_le_bytes(read_array(buf, TEXTURE_SIZE_FIELD + 2)?);

    let be = |at: usize| -> Result<u32> { Ok(u32::from_be_bytes(read_array(buf, at)?)) };
    let offsets = GeoOffsets {
        rect_points: be(OFFSETS_FIELD)?,
        texture_points: be(OFFSETS_FIELD + 4)?,
        reserved: be(OFFSETS_FIELD + 8)?,
        label: be(OFFSETS_FIELD + 12)?,
        unknown: be(OFFSETS_FIELD + 16)?,
    };
    if offsets.reserved != 0 {
        return Err(AfpKitError::InvalidGeo(format!(
            "unexpected reserved offset {:#010x}",
            offsets.reserved
        )));
    }

    let label = match offsets.label {
        0 => None,
        at => Some(read_label(buf, at as usize)?),
    };
    let rect_points = match offsets.rect_points {
        0 => None,
        at => Some(read_quad(buf, at as usize, 2.0)?),
    };
    let texture_points = match offsets.texture_points {
        0 => None,
        at => Some(read_quad(buf, at as usize, texture_width as f32 * 2.0)?),
    };
    let unknown = match offsets.unknown {
        0 => None,
        at => {
            let at = at as usize;
            let mut v = [0i32; 3];
            for (i, slot) in v.iter_mut().enumerate() {
                *slot = i32::from_le_bytes(read_array(buf, at + i * 4)?);
            }
            Some(v)
        }
    };

    Ok(GeoInfo {
        texture_width,
        texture_height,
        offsets,
        label,
        rect_points,
        texture_points,
        unknown,
    })
}

// The label slot holds a pointer to a NUL-terminated string.
fn read_label(buf: &[u8], at: usize) -> Result<String> {
    let start = u32::from_be_bytes(read_array(buf, at)?) as usize;
    let tail = buf
        .get(start..)
        .ok_or_else(|| AfpKitError::overrun(start, 1, buf.len()))?;
    let end = tail
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| AfpKitError::InvalidGeo(format!("unterminated label at {start:#x}")))?;
    let (text, _, _) = encoding_rs::SHIFT_JIS.decode(&tail[..end]);
    Ok(text.into_owned())
}

fn read_quad(buf: &[u8], at: usize, scale: f32) -> Result<[(f32, f32); 4]> {
    let mut pts = [(0.0f32, 0.0f32); 4];
    for (i, p) in pts.iter_mut().enumerate() {
        let x = f32::from_be_bytes(read_array(buf, at + i * 8)?);
        let y = f32::from_be_bytes(read_array(buf, at + i * 8 + 4)?);
        *p = (x * scale, y * scale);
    }
    Ok(pts)
}
