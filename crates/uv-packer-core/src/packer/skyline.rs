use super::{Layout, Packer, content_extents, padded};
use crate::config::PackOptions;
use crate::error::{Result, UvPackError};
use crate::model::Rect;
use crate::pow2;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SkylineNode {
    x: u32,
    y: u32,
    w: u32,
}

impl SkylineNode {
    #[inline]
    fn right_ex(&self) -> u32 {
        self.x + self.w
    }
}

/// Bottom-left skyline packer over a canvas that grows on demand.
///
/// The canvas starts at half of `max_size` on both axes. When a rectangle does
/// not fit, the height doubles first and the width once the height is at its
/// maximum.
pub struct SkylinePacker {
    max_size: u32,
    padding: u32,
    width: u32,
    height: u32,
    // sorted by `x`, contiguous, covering the full canvas width
    skylines: Vec<SkylineNode>,
}

impl SkylinePacker {
    pub fn new(options: &PackOptions) -> Self {
        let mut packer = Self {
            max_size: options.max_size,
            padding: options.padding,
            width: 0,
            height: 0,
            skylines: Vec::new(),
        };
        packer.reset();
        packer
    }

    /// Back to the start canvas with a single flat segment.
    fn reset(&mut self) {
        let start = (self.max_size >> 1).max(1);
        self.width = start;
        self.height = start;
        self.skylines.clear();
        self.skylines.push(SkylineNode {
            x: 0,
            y: 0,
            w: start,
        });
    }

    /// Current (grown) canvas size.
    pub fn canvas_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Height at which a `w x h` slot starting at segment `i` rests, if it fits.
    fn can_put(&self, mut i: usize, w: u32, h: u32) -> Option<u32> {
        if self.skylines[i].x.saturating_add(w) > self.width {
            return None;
        }
        let mut y = 0;
        let mut width_left = w;
        loop {
            y = y.max(self.skylines[i].y);
            if y.saturating_add(h) > self.height {
                return None;
            }
            if self.skylines[i].w >= width_left {
                return Some(y);
            }
            width_left -= self.skylines[i].w;
            i += 1;
            if i >= self.skylines.len() {
                return None;
            }
        }
    }

    /// Lowest resting height; the leftmost segment wins ties.
    fn find_position(&self, w: u32, h: u32) -> Option<(usize, Rect)> {
        let mut best: Option<(usize, Rect)> = None;
        for i in 0..self.skylines.len() {
            if let Some(y) = self.can_put(i, w, h) {
                if best.is_none_or(|(_, r)| y < r.y) {
                    best = Some((i, Rect::new(self.skylines[i].x, y, w, h)));
                }
            }
        }
        best
    }

    fn split(&mut self, index: usize, rect: &Rect) {
        let node = SkylineNode {
            x: rect.x,
            y: rect.bottom_ex(),
            w: rect.w,
        };
        debug_assert!(node.right_ex() <= self.width);
        debug_assert!(node.y <= self.height);
        self.skylines.insert(index, node);

        let i = index + 1;
        while i < self.skylines.len() {
            let next = self.skylines[i];
            if next.x >= node.right_ex() {
                break;
            }
            let shrink = node.right_ex() - next.x;
            if next.w <= shrink {
                self.skylines.remove(i);
            } else {
                self.skylines[i].x += shrink;
                self.skylines[i].w -= shrink;
                break;
            }
        }
    }

    fn merge(&mut self) {
        let mut i = 1;
        while i < self.skylines.len() {
            if self.skylines[i - 1].y == self.skylines[i].y {
                let w = self.skylines[i].w;
                self.skylines[i - 1].w += w;
                self.skylines.remove(i);
            } else {
                i += 1;
            }
        }
    }

    /// Doubles the height, or the width once the height is maxed. False when both are.
    fn grow(&mut self) -> bool {
        if self.height < self.max_size {
            self.height = (self.height * 2).min(self.max_size);
        } else if self.width < self.max_size {
            let old_w = self.width;
            self.width = (self.width * 2).min(self.max_size);
            self.skylines.push(SkylineNode {
                x: old_w,
                y: 0,
                w: self.width - old_w,
            });
            self.merge();
        } else {
            return false;
        }
        debug!(width = self.width, height = self.height, "skyline canvas grown");
        true
    }

    /// First pixel (row-major) of the `width x height` canvas not under the skyline.
    fn first_empty_pixel(&self, width: u32, height: u32) -> Option<(u32, u32)> {
        (0..height).find_map(|y| {
            self.skylines
                .iter()
                .find(|n| n.x < width && n.y <= y)
                .map(|n| (n.x, y))
        })
    }
}

impl Packer for SkylinePacker {
    fn pack(&mut self, sizes: &[(u32, u32)]) -> Result<Layout> {
        self.reset();
        let total = sizes.len();
        let mut positions = Vec::with_capacity(total);
        for (i, &(w, h)) in sizes.iter().enumerate() {
            let (pw, ph) = padded(w, h, self.padding);
            let (index, slot) = loop {
                if let Some(found) = self.find_position(pw, ph) {
                    break found;
                }
                if !self.grow() {
                    debug!(index = i, w, h, "skyline exhausted growth");
                    return Err(UvPackError::OutOfSpace { placed: i, total });
                }
            };
            self.split(index, &slot);
            self.merge();
            positions.push((slot.x, slot.y));
        }

        let (used_w, used_h) = content_extents(sizes, &positions);
        let (Some(out_w), Some(out_h)) = (
            pow2::fit_pow2(used_w, self.width),
            pow2::fit_pow2(used_h, self.height),
        ) else {
            return Err(UvPackError::OutOfSpace {
                placed: total,
                total,
            });
        };
        let empty_slot = self.first_empty_pixel(out_w, out_h).unwrap_or((0, 0));
        Ok(Layout {
            width: out_w,
            height: out_h,
            positions,
            empty_slot,
        })
    }
}
