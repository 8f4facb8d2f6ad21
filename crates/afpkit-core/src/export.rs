use crate::config::PackerConfig;
use crate::error::{AfpKitError, Result};
use crate::model::{Atlas, Rect};
use serde_json::{Value, json};
use std::path::Path;

/// Texture name of page `id` in the texturelist (`tex000`, `tex001`, ...).
pub fn texture_name(id: usize) -> String {
    format!("tex{id:03}")
}

/// Image name used in the texturelist: file stem of the key.
pub fn image_name(key: &str) -> String {
    Path::new(key)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(key)
        .to_string()
}

fn half_px(v: u64) -> Option<u16> {
    u16::try_from(v.checked_mul(2)?).ok()
}

fn edges(r: &Rect) -> (u64, u64, u64, u64) {
    let (x, y) = (u64::from(r.x), u64::from(r.y));
    (x, x + u64::from(r.w), y, y + u64::from(r.h))
}

/// `imgrect` value: placement corners in half-pixel units, ordered `x0 x1 y0 y1`.
///
/// `None` when a doubled edge does not fit the descriptor's `u16` fields.
pub fn img_rect(r: &Rect) -> Option<[u16; 4]> {
    let (x0, x1, y0, y1) = edges(r);
    Some([half_px(x0)?, half_px(x1)?, half_px(y0)?, half_px(y1)?])
}

/// `uvrect` value: the placement inset by one pixel on every side, same units as `img_rect`.
pub fn uv_rect(r: &Rect) -> Option<[u16; 4]> {
    let (x0, x1, y0, y1) = edges(r);
    Some([
        half_px(x0 + 1)?,
        half_px(x1.saturating_sub(1))?,
        half_px(y0 + 1)?,
        half_px(y1.saturating_sub(1))?,
    ])
}

fn join4(v: [u16; 4]) -> String {
    format!("{} {} {} {}", v[0], v[1], v[2], v[3])
}

/// Render the `texturelist.xml` descriptor, one `<texture>` per page.
///
/// Sizes and rects are written as `u16` fields; a page or placement that does
/// not fit them fails with [`AfpKitError::InvalidDimensions`].
pub fn to_texturelist_xml<K: ToString>(atlas: &Atlas<K>, cfg: &PackerConfig) -> Result<String> {
    let mut s = String::new();
    s.push_str(&format!(
        "<texturelist compress=\"{}\">\n",
        xml_escape(&cfg.compress)
    ));
    for page in &atlas.pages {
        s.push_str(&format!(
            "  <texture format=\"{}\" mag_filter=\"{}\" min_filter=\"{}\" name=\"{}\" wrap_s=\"{}\" wrap_t=\"{}\">\n",
            xml_escape(&cfg.format),
            xml_escape(&cfg.mag_filter),
            xml_escape(&cfg.min_filter),
            texture_name(page.id),
            xml_escape(&cfg.wrap_s),
            xml_escape(&cfg.wrap_t),
        ));
        let too_large = || AfpKitError::InvalidDimensions {
            width: page.width,
            height: page.height,
        };
        let (w, h) = match (u16::try_from(page.width), u16::try_from(page.height)) {
            (Ok(w), Ok(h)) => (w, h),
            _ => return Err(too_large()),
        };
        s.push_str(&format!("    <size __type=\"2u16\">{w} {h}</size>\n"));
        for fr in &page.frames {
            let uv = uv_rect(&fr.frame).ok_or_else(too_large)?;
            let img = img_rect(&fr.frame).ok_or_else(too_large)?;
            s.push_str(&format!(
                "    <image name=\"{}\">\n      <uvrect __type=\"4u16\">{}</uvrect>\n      <imgrect __type=\"4u16\">{}</imgrect>\n    </image>\n",
                xml_escape(&image_name(&fr.key.to_string())),
                join4(uv),
                join4(img),
            ));
        }
        s.push_str("  </texture>\n");
    }
    s.push_str("</texturelist>\n");
    Ok(s)
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Flatten frames keyed by name with page id/size hints.
/// Shape: `{ frames: { key: { page, texture, frame, pageSize } }, meta }`.
pub fn to_json_hash<K: ToString>(atlas: &Atlas<K>) -> Value {
    let mut frames = serde_json::Map::new();
    for page in &atlas.pages {
        for fr in &page.frames {
            let frame = json!({"x": fr.frame.x, "y": fr.frame.y, "w": fr.frame.w, "h": fr.frame.h});
            frames.insert(
                fr.key.to_string(),
                json!({
                    "page": page.id,
                    "texture": texture_name(page.id),
                    "frame": frame,
                    "pageSize": {"w": page.width, "h": page.height},
                }),
            );
        }
    }
    json!({ "frames": frames, "pages": atlas.pages.len(), "meta": &atlas.meta })
}
