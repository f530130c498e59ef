use std::cmp::Ordering;

/// Coarse paint-order bucket.
///
/// Placeholders sit below resolved content so a half-loaded room never hides
/// a finished asset behind a grey stand-in with the same depth.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum RenderLayer {
    Shell = 0,
    Placeholder = 1,
    Content = 2,
}

/// Stable sort key for draw items.
///
/// Ordering rules:
/// 1) `layer`: ascending (back-to-front)
/// 2) `order`: ascending (insertion order within a layer)
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SortKey {
    pub layer: RenderLayer,
    pub order: u32,
}

impl SortKey {
    #[inline]
    pub const fn new(layer: RenderLayer, order: u32) -> Self {
        Self { layer, order }
    }
}

impl Ord for SortKey {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        match self.layer.cmp(&other.layer) {
            Ordering::Equal => self.order.cmp(&other.order),
            o => o,
        }
    }
}

impl PartialOrd for SortKey {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
