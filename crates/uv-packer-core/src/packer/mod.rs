use crate::error::Result;
use crate::model::Rect;

pub mod maxrects;
pub mod shelf;
pub mod skyline;

/// Placement of the rectangles that need real space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Final canvas width (power of two).
    pub width: u32,
    /// Final canvas height (power of two).
    pub height: u32,
    /// Top-left of each input size, in input order.
    pub positions: Vec<(u32, u32)>,
    /// Shared slot for degenerate rectangles.
    pub empty_slot: (u32, u32),
}

/// A packer places content sizes `(w, h)` onto a power-of-two canvas.
///
/// Implementations must ensure padded slots never overlap and that every
/// content rectangle lies within the returned canvas. `pack` fails with
/// `OutOfSpace` instead of exceeding the configured maximum.
pub trait Packer {
    fn pack(&mut self, sizes: &[(u32, u32)]) -> Result<Layout>;
}

/// Size of the reserved slot for a content size.
#[inline]
pub(crate) fn padded(w: u32, h: u32, padding: u32) -> (u32, u32) {
    (w.saturating_add(padding), h.saturating_add(padding))
}

/// First pixel (row-major) not covered by any of `occupied`.
pub(crate) fn first_free_pixel(occupied: &[Rect], width: u32, height: u32) -> Option<(u32, u32)> {
    let mut spans: Vec<(u32, u32)> = Vec::with_capacity(occupied.len());
    for y in 0..height {
        spans.clear();
        spans.extend(
            occupied
                .iter()
                .filter(|r| y >= r.y && y < r.bottom_ex())
                .map(|r| (r.x, r.right_ex())),
        );
        spans.sort_unstable();
        let mut x = 0;
        for &(x1, x2) in &spans {
            if x1 > x {
                break;
            }
            x = x.max(x2);
        }
        if x < width {
            return Some((x, y));
        }
    }
    None
}

/// Content extents `(max x+w, max y+h)` of placed sizes.
pub(crate) fn content_extents(sizes: &[(u32, u32)], positions: &[(u32, u32)]) -> (u32, u32) {
    sizes
        .iter()
        .zip(positions)
        .fold((0, 0), |(mw, mh), (&(w, h), &(x, y))| {
            (mw.max(x + w), mh.max(y + h))
        })
}

pub(crate) fn content_rects(sizes: &[(u32, u32)], positions: &[(u32, u32)]) -> Vec<Rect> {
    sizes
        .iter()
        .zip(positions)
        .map(|(&(w, h), &(x, y))| Rect::new(x, y, w, h))
        .collect()
}
