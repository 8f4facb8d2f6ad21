use crate::config::{PackerConfig, SortOrder};
use crate::error::{AfpKitError, Result};
use crate::model::{Atlas, Frame, Meta, Page, Rect};
use crate::packer::{Packer, guillotine::GuillotinePacker};
use std::collections::HashSet;
use tracing::{debug, instrument, warn};

/// Layout-only input: an identifier and its pixel size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutItem<K = String> {
    pub key: K,
    pub w: u32,
    pub h: u32,
}

impl<K> LayoutItem<K> {
    pub fn new(key: K, w: u32, h: u32) -> Self {
        Self { key, w, h }
    }
}

#[cfg(feature = "image")]
impl LayoutItem<String> {
    /// Reads only the image header of `path` to get its dimensions.
    pub fn from_path(key: impl Into<String>, path: &std::path::Path) -> Result<Self> {
        let (w, h) = image::image_dimensions(path)?;
        Ok(Self::new(key.into(), w, h))
    }
}

/// Packs `(key, width, height)` tuples into pages.
pub fn pack_layout<K: Into<String>>(
    inputs: Vec<(K, u32, u32)>,
    cfg: PackerConfig,
) -> Result<Atlas<String>> {
    let items = inputs
        .into_iter()
        .map(|(k, w, h)| LayoutItem::new(k, w, h))
        .collect();
    pack_layout_items(items, cfg)
}

#[instrument(skip_all, fields(items = items.len()))]
/// Packs layout items into as many fixed-size pages as needed.
///
/// Notes:
/// - Items are visited in (optionally sorted) order; whatever a page refuses is
///   retried, in order, on a fresh page until nothing is left.
/// - Repeated keys keep their first occurrence.
/// - An item larger than the page fails with `ImageTooLarge` before any packing.
pub fn pack_layout_items<K: Into<String>>(
    items: Vec<LayoutItem<K>>,
    cfg: PackerConfig,
) -> Result<Atlas<String>> {
    cfg.validate()?;

    if items.is_empty() {
        return Err(AfpKitError::Empty);
    }

    let mut seen: HashSet<String> = HashSet::with_capacity(items.len());
    let mut prepared: Vec<LayoutItem<String>> = Vec::with_capacity(items.len());
    for it in items {
        let key: String = it.key.into();
        if !seen.insert(key.clone()) {
            warn!(%key, "duplicate key, keeping first occurrence");
            continue;
        }
        prepared.push(LayoutItem::new(key, it.w, it.h));
    }

    for it in &prepared {
        if it.w > cfg.page_width || it.h > cfg.page_height {
            return Err(AfpKitError::ImageTooLarge {
                key: it.key.clone(),
                width: it.w,
                height: it.h,
                page_width: cfg.page_width,
                page_height: cfg.page_height,
            });
        }
    }

    sort_items(&mut prepared, &cfg.sort_order);

    let mut remaining: Vec<LayoutItem<String>> = prepared;
    let mut pages: Vec<Page> = Vec::new();
    while !remaining.is_empty() {
        let mut packer = GuillotinePacker::new(cfg.page_width, cfg.page_height);
        let mut frames: Vec<Frame> = Vec::new();
        let mut retry: Vec<LayoutItem<String>> = Vec::new();
        for it in remaining {
            let rect = Rect::new(0, 0, it.w, it.h);
            match packer.pack(it.key.clone(), &rect) {
                Some(f) => frames.push(f),
                None => retry.push(it),
            }
        }
        // A fresh page always takes the first pending item; this only trips if
        // that invariant is broken.
        if let (true, Some(it)) = (frames.is_empty(), retry.first()) {
            return Err(AfpKitError::ImageTooLarge {
                key: it.key.clone(),
                width: it.w,
                height: it.h,
                page_width: cfg.page_width,
                page_height: cfg.page_height,
            });
        }
        debug!(
            page = pages.len(),
            placed = frames.len(),
            deferred = retry.len(),
            "page packed"
        );
        pages.push(Page {
            id: pages.len(),
            width: cfg.page_width,
            height: cfg.page_height,
            frames,
        });
        remaining = retry;
    }

    let meta = Meta {
        schema_version: "1".into(),
        app: "afpkit".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        page_size: (cfg.page_width, cfg.page_height),
    };
    Ok(Atlas { pages, meta })
}

fn sort_items(items: &mut [LayoutItem<String>], order: &SortOrder) {
    let area = |it: &LayoutItem<String>| it.w as u64 * it.h as u64;
    match order {
        SortOrder::None => {}
        SortOrder::NameAsc => items.sort_by(|a, b| a.key.cmp(&b.key)),
        SortOrder::AreaDesc => {
            items.sort_by(|a, b| area(b).cmp(&area(a)).then_with(|| a.key.cmp(&b.key)))
        }
        SortOrder::MaxSideDesc => items.sort_by(|a, b| {
            b.w.max(b.h)
                .cmp(&a.w.max(a.h))
                .then_with(|| a.key.cmp(&b.key))
        }),
        SortOrder::HeightDesc => {
            items.sort_by(|a, b| b.h.cmp(&a.h).then_with(|| a.key.cmp(&b.key)))
        }
        SortOrder::WidthDesc => {
            items.sort_by(|a, b| b.w.cmp(&a.w).then_with(|| a.key.cmp(&b.key)))
        }
    }
}
