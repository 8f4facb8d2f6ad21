use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Builds a rect from exclusive corner coordinates `(x0, y0)-(x1, y1)`.
    pub fn from_corners(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }
    /// Exclusive right edge (`x + w`).
    pub fn x1(&self) -> u32 {
        self.x + self.w
    }
    /// Exclusive bottom edge (`y + h`).
    pub fn y1(&self) -> u32 {
        self.y + self.h
    }
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
    /// Returns true if `r` is fully inside `self`.
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.x1() <= self.x1() && r.y1() <= self.y1()
    }
    /// Returns true if the two rects share any pixel.
    pub fn overlaps(&self, r: &Rect) -> bool {
        !(self.is_empty()
            || r.is_empty()
            || self.x >= r.x1()
            || r.x >= self.x1()
            || self.y >= r.y1()
            || r.y >= self.y1())
    }
}

/// A placed image within a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame<K = String> {
    /// Caller identifier (usually the source path).
    pub key: K,
    /// Placement rectangle in page-local pixels.
    pub frame: Rect,
}

/// A single atlas page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<K = String> {
    pub id: usize,
    pub width: u32,
    pub height: u32,
    pub frames: Vec<Frame<K>>,
}

/// Where one image ended up.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement {
    pub page: usize,
    pub rect: Rect,
}

/// Atlas-level metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    pub schema_version: String,
    pub app: String,
    pub version: String,
    pub page_size: (u32, u32),
}

/// Atlas of pages and metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Atlas<K = String> {
    pub pages: Vec<Page<K>>,
    pub meta: Meta,
}

/// Statistics about atlas packing efficiency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PackStats {
    pub num_pages: usize,
    pub num_frames: usize,
    /// Sum of width * height over all pages.
    pub total_page_area: u64,
    /// Sum of width * height over all frames.
    pub used_frame_area: u64,
    /// used_frame_area / total_page_area (0.0 to 1.0).
    pub occupancy: f64,
}

impl<K> Atlas<K> {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Identifier -> (page index, rect) map over every page.
    pub fn placements(&self) -> HashMap<K, Placement>
    where
        K: Clone + Eq + Hash,
    {
        self.pages
            .iter()
            .flat_map(|p| {
                p.frames.iter().map(move |f| {
                    (
                        f.key.clone(),
                        Placement {
                            page: p.id,
                            rect: f.frame,
                        },
                    )
                })
            })
            .collect()
    }

    /// Computes packing statistics for this atlas.
    pub fn stats(&self) -> PackStats {
        let num_pages = self.pages.len();
        let mut num_frames = 0;
        let mut total_page_area = 0u64;
        let mut used_frame_area = 0u64;

        for page in &self.pages {
            total_page_area += (page.width as u64) * (page.height as u64);
            for frame in &page.frames {
                num_frames += 1;
                used_frame_area += frame.frame.area();
            }
        }

        let occupancy = if total_page_area > 0 {
            used_frame_area as f64 / total_page_area as f64
        } else {
            0.0
        };

        PackStats {
            num_pages,
            num_frames,
            total_page_area,
            used_frame_area,
            occupancy,
        }
    }
}

impl PackStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Pages: {}, Frames: {}, Occupancy: {:.2}%, Total Area: {} px², Used Area: {} px², Wasted: {} px²",
            self.num_pages,
            self.num_frames,
            self.occupancy * 100.0,
            self.total_page_area,
            self.used_frame_area,
            self.wasted_area(),
        )
    }

    /// Returns wasted space in pixels.
    pub fn wasted_area(&self) -> u64 {
        self.total_page_area.saturating_sub(self.used_frame_area)
    }
}
