use super::{Layout, Packer, content_extents, content_rects, first_free_pixel, padded};
use crate::config::PackOptions;
use crate::error::{Result, UvPackError};
use crate::model::Rect;
use crate::pow2;
use tracing::debug;

/// Free-rectangle packer using best short-side fit.
///
/// The canvas is as wide as the widest padded rectangle (rounded to a power of
/// two) and as tall as `max_size`; the final height is trimmed to the content.
pub struct MaxRectsPacker {
    max_size: u32,
    padding: u32,
    free: Vec<Rect>,
}

impl MaxRectsPacker {
    pub fn new(options: &PackOptions) -> Self {
        Self {
            max_size: options.max_size,
            padding: options.padding,
            free: Vec::new(),
        }
    }

    fn reset(&mut self, width: u32) {
        self.free = vec![Rect::new(0, 0, width, self.max_size)];
    }

    fn score(fr: &Rect, w: u32, h: u32) -> (u32, u32) {
        let leftover_h = fr.w - w;
        let leftover_v = fr.h - h;
        (leftover_h.min(leftover_v), leftover_h.max(leftover_v))
    }

    /// Best short-side fit, then best long-side fit; the first candidate wins ties.
    fn find_position(&self, w: u32, h: u32) -> Option<Rect> {
        let mut best: Option<(Rect, (u32, u32))> = None;
        for fr in &self.free {
            if fr.w < w || fr.h < h {
                continue;
            }
            let s = Self::score(fr, w, h);
            if best.is_none_or(|(_, bs)| s < bs) {
                best = Some((Rect::new(fr.x, fr.y, w, h), s));
            }
        }
        best.map(|(r, _)| r)
    }

    fn place_rect(&mut self, node: &Rect) {
        let mut new_free: Vec<Rect> = Vec::with_capacity(self.free.len() + 4);
        for fr in self.free.drain(..) {
            if !fr.intersects(node) {
                new_free.push(fr);
                continue;
            }
            split_free_node(fr, node, &mut new_free);
        }
        self.free = new_free;
        self.prune_free_list();
    }

    /// Drops free rectangles contained in another one.
    fn prune_free_list(&mut self) {
        let mut i = 0;
        while i < self.free.len() {
            let a = self.free[i];
            let mut remove_i = false;
            let mut j = i + 1;
            while j < self.free.len() {
                let b = self.free[j];
                if b.contains(&a) {
                    remove_i = true;
                    break;
                }
                if a.contains(&b) {
                    self.free.remove(j);
                    continue;
                }
                j += 1;
            }
            if remove_i {
                self.free.remove(i);
            } else {
                i += 1;
            }
        }
    }
}

/// Maximal residuals of `fr` around `node`: left, right, top and bottom slivers.
fn split_free_node(fr: Rect, node: &Rect, out: &mut Vec<Rect>) {
    let fr_x2 = fr.right_ex();
    let fr_y2 = fr.bottom_ex();
    let n_x2 = node.right_ex();
    let n_y2 = node.bottom_ex();

    // Left
    if node.x > fr.x {
        out.push(Rect::new(fr.x, fr.y, node.x - fr.x, fr.h));
    }
    // Right
    if n_x2 < fr_x2 {
        out.push(Rect::new(n_x2, fr.y, fr_x2 - n_x2, fr.h));
    }
    // Top
    if node.y > fr.y {
        out.push(Rect::new(fr.x, fr.y, fr.w, node.y - fr.y));
    }
    // Bottom
    if n_y2 < fr_y2 {
        out.push(Rect::new(fr.x, n_y2, fr.w, fr_y2 - n_y2));
    }
}

impl Packer for MaxRectsPacker {
    fn pack(&mut self, sizes: &[(u32, u32)]) -> Result<Layout> {
        let total = sizes.len();
        let widest = sizes
            .iter()
            .map(|&(w, h)| padded(w, h, self.padding).0)
            .max()
            .unwrap_or(0);
        let Some(width) = pow2::fit_pow2(widest, self.max_size) else {
            return Err(UvPackError::OutOfSpace { placed: 0, total });
        };
        self.reset(width);
        debug!(width, height = self.max_size, "maxrects canvas");

        let mut positions = Vec::with_capacity(total);
        for (i, &(w, h)) in sizes.iter().enumerate() {
            let (pw, ph) = padded(w, h, self.padding);
            let Some(slot) = self.find_position(pw, ph) else {
                debug!(index = i, w, h, free = self.free.len(), "maxrects found no free rectangle");
                return Err(UvPackError::OutOfSpace { placed: i, total });
            };
            self.place_rect(&slot);
            positions.push((slot.x, slot.y));
        }

        let (used_w, used_h) = content_extents(sizes, &positions);
        let (Some(out_w), Some(out_h)) = (
            pow2::fit_pow2(used_w, self.max_size),
            pow2::fit_pow2(used_h, self.max_size),
        ) else {
            return Err(UvPackError::OutOfSpace {
                placed: total,
                total,
            });
        };
        let occupied = content_rects(sizes, &positions);
        let empty_slot = first_free_pixel(&occupied, out_w, out_h).unwrap_or((0, 0));
        Ok(Layout {
            width: out_w,
            height: out_h,
            positions,
            empty_slot,
        })
    }
}
