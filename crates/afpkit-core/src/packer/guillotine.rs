use super::Packer;
use crate::model::{Frame, Rect};

/// Free region of a page. Leaves are entirely free; internal nodes hold
/// the two regions left over after one placement.
#[derive(Debug, Clone, Copy)]
struct PackNode {
    area: Rect,
    /// `[right, below]` child indices into the arena.
    children: Option<[usize; 2]>,
}

/// First-fit guillotine packer over a binary tree of free regions.
///
/// Placing `w x h` into a leaf at `(x0, y0)-(x1, y1)` splits it into the
/// column right of the image, `[x0+w, x1) x [y0, y0+h)`, and the full-width
/// row below it, `[x0, x1) x [y0+h, y1)`. Search is depth-first and always
/// tries the right child before the one below, so results are deterministic.
pub struct GuillotinePacker {
    width: u32,
    height: u32,
    nodes: Vec<PackNode>,
}

impl GuillotinePacker {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            nodes: vec![PackNode {
                area: Rect::new(0, 0, width, height),
                children: None,
            }],
        }
    }

    pub fn page_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Places a `w x h` image; `None` if no free leaf can hold it.
    pub fn insert(&mut self, w: u32, h: u32) -> Option<Rect> {
        let idx = self.find_leaf(w, h)?;
        let area = self.nodes[idx].area;
        let right = Rect::from_corners(area.x + w, area.y, area.x1(), area.y + h);
        let below = Rect::from_corners(area.x, area.y + h, area.x1(), area.y1());
        let a = self.push_leaf(right);
        let b = self.push_leaf(below);
        self.nodes[idx].children = Some([a, b]);
        Some(Rect::new(area.x, area.y, w, h))
    }

    /// Free regions still available for placement.
    pub fn free_rects(&self) -> Vec<Rect> {
        self.nodes
            .iter()
            .filter(|n| n.children.is_none() && !n.area.is_empty())
            .map(|n| n.area)
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn push_leaf(&mut self, area: Rect) -> usize {
        self.nodes.push(PackNode {
            area,
            children: None,
        });
        self.nodes.len() - 1
    }

    // Preorder walk; `below` is pushed first so `right` is visited first.
    fn find_leaf(&self, w: u32, h: u32) -> Option<usize> {
        let mut stack = vec![0usize];
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            match node.children {
                Some([right, below]) => {
                    stack.push(below);
                    stack.push(right);
                }
                None if node.area.w >= w && node.area.h >= h => return Some(idx),
                None => {}
            }
        }
        None
    }
}

impl<K> Packer<K> for GuillotinePacker {
    fn can_pack(&self, rect: &Rect) -> bool {
        self.find_leaf(rect.w, rect.h).is_some()
    }

    fn pack(&mut self, key: K, rect: &Rect) -> Option<Frame<K>> {
        self.insert(rect.w, rect.h).map(|frame| Frame { key, frame })
    }
}
