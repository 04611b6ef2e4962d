use super::{Layout, Packer, content_rects, first_free_pixel, padded};
use crate::config::PackOptions;
use crate::error::{Result, UvPackError};
use crate::pow2;
use tracing::debug;

/// Row-based packer. Every power-of-two width between the widest rectangle and
/// `max_size` is simulated and the smallest resulting canvas wins.
pub struct ShelfPacker {
    max_size: u32,
    padding: u32,
}

/// Outcome of filling shelves at one fixed canvas width.
struct ShelfRun {
    positions: Vec<(u32, u32)>,
    used_height: u32,
}

impl ShelfPacker {
    pub fn new(options: &PackOptions) -> Self {
        Self {
            max_size: options.max_size,
            padding: options.padding,
        }
    }

    /// Fills shelves left to right at `canvas_w`. `None` if a rectangle is wider than the canvas.
    fn pack_width(&self, sizes: &[(u32, u32)], canvas_w: u32) -> Option<ShelfRun> {
        let mut positions = Vec::with_capacity(sizes.len());
        let mut cur_x = 0u32;
        let mut cur_y = 0u32;
        let mut shelf_h = 0u32;
        for &(w, h) in sizes {
            let (pw, ph) = padded(w, h, self.padding);
            if pw > canvas_w {
                return None;
            }
            if cur_x.saturating_add(pw) > canvas_w {
                cur_y = cur_y.saturating_add(shelf_h);
                cur_x = 0;
                shelf_h = 0;
            }
            positions.push((cur_x, cur_y));
            cur_x += pw;
            shelf_h = shelf_h.max(ph);
        }
        Some(ShelfRun {
            positions,
            used_height: cur_y.saturating_add(shelf_h),
        })
    }

    fn layout(&self, sizes: &[(u32, u32)], width: u32, height: u32, run: ShelfRun) -> Layout {
        let occupied = content_rects(sizes, &run.positions);
        let empty_slot = first_free_pixel(&occupied, width, height).unwrap_or((0, 0));
        Layout {
            width,
            height,
            positions: run.positions,
            empty_slot,
        }
    }
}

impl Packer for ShelfPacker {
    fn pack(&mut self, sizes: &[(u32, u32)]) -> Result<Layout> {
        let min_w = sizes
            .iter()
            .map(|&(w, h)| padded(w, h, self.padding).0)
            .max()
            .unwrap_or(0);
        let min_h = sizes
            .iter()
            .map(|&(w, h)| padded(w, h, self.padding).1)
            .max()
            .unwrap_or(0);

        // (width, height, run)
        let mut best: Option<(u32, u32, ShelfRun)> = None;
        for candidate_w in pow2::candidates(min_w, self.max_size) {
            let Some(run) = self.pack_width(sizes, candidate_w) else {
                debug!(candidate_w, "shelf candidate rejected: rectangle wider than canvas");
                continue;
            };
            let Some(height) = pow2::fit_pow2(run.used_height.max(min_h), self.max_size) else {
                debug!(candidate_w, used_height = run.used_height, "shelf candidate too tall");
                continue;
            };
            let area = candidate_w as u64 * height as u64;
            let better = match &best {
                None => true,
                Some((bw, bh, _)) => {
                    let best_area = *bw as u64 * *bh as u64;
                    area < best_area
                        || (area == best_area
                            && (height < *bh || (height == *bh && candidate_w < *bw)))
                }
            };
            if better {
                best = Some((candidate_w, height, run));
            }
        }

        if let Some((width, height, run)) = best {
            debug!(width, height, "shelf picked canvas");
            return Ok(self.layout(sizes, width, height, run));
        }

        // Single retry with everything on one row.
        let total_w = sizes.iter().fold(0u32, |acc, &(w, h)| {
            acc.saturating_add(padded(w, h, self.padding).0)
        });
        let out_of_space = UvPackError::OutOfSpace {
            placed: 0,
            total: sizes.len(),
        };
        let Some(fallback_w) = pow2::fit_pow2(total_w, self.max_size) else {
            return Err(out_of_space);
        };
        let Some(run) = self.pack_width(sizes, fallback_w) else {
            return Err(out_of_space);
        };
        let Some(height) = pow2::fit_pow2(run.used_height, self.max_size) else {
            return Err(out_of_space);
        };
        debug!(width = fallback_w, height, "shelf fallback width used");
        Ok(self.layout(sizes, fallback_w, height, run))
    }
}
