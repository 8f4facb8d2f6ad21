use crate::model::{Frame, Rect};

pub mod guillotine;

/// A packer places rectangles into a page.
///
/// Implementations must ensure no overlaps and stay inside the page.
/// `pack` returns `None` if the rectangle cannot be placed on the current page.
pub trait Packer<K> {
    fn can_pack(&self, rect: &Rect) -> bool;
    fn pack(&mut self, key: K, rect: &Rect) -> Option<Frame<K>>;
}
