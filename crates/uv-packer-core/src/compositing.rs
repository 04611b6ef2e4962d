use crate::model::{PackResult, Rect, Region};
use image::{Rgba, RgbaImage};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Frame layout of an animated texture: frames are tiled `frames_x` by
/// `frames_y`, each one the size of the model's texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGrid {
    pub frames_x: u32,
    pub frames_y: u32,
}

impl Default for FrameGrid {
    fn default() -> Self {
        Self {
            frames_x: 1,
            frames_y: 1,
        }
    }
}

impl FrameGrid {
    /// Frames per axis of a `texture` sized image holding frames of `frame` size.
    pub fn from_sizes(texture: (u32, u32), frame: (u32, u32)) -> Self {
        let per_axis = |t: u32, f: u32| t.div_ceil(f.max(1)).max(1);
        Self {
            frames_x: per_axis(texture.0, frame.0),
            frames_y: per_axis(texture.1, frame.1),
        }
    }

    pub fn count(&self) -> u32 {
        self.frames_x * self.frames_y
    }
}

/// Crops `region` out of `texture` as stored (mirror state is ignored).
///
/// Pixels outside the texture read as transparent. `None` for zero-sized regions.
pub fn extract_region(texture: &RgbaImage, region: &Region) -> Option<RgbaImage> {
    if region.is_zero_sized() {
        return None;
    }
    let mut out = RgbaImage::new(region.w, region.h);
    blit_rgba(texture, &mut out, 0, 0, region.rect());
    Some(out)
}

/// Copies `src_rect` of `src` into `canvas` with its top-left at (dx, dy).
///
/// Source pixels outside `src` are written as transparent; destination pixels
/// outside `canvas` are skipped.
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32, src_rect: Rect) {
    let (cw, ch) = canvas.dimensions();
    for yy in 0..src_rect.h {
        let ty = dy.saturating_add(yy);
        if ty >= ch {
            break;
        }
        for xx in 0..src_rect.w {
            let tx = dx.saturating_add(xx);
            if tx >= cw {
                break;
            }
            let px = src
                .get_pixel_checked(src_rect.x.saturating_add(xx), src_rect.y.saturating_add(yy))
                .copied()
                .unwrap_or(TRANSPARENT);
            canvas.put_pixel(tx, ty, px);
        }
    }
}

/// Builds the repacked texture for `result` from the original `texture`.
///
/// The output holds `grid` frames of `result.width x result.height` each. For
/// every rect that owns a slot, each frame's source region (offset by the
/// texture's frame stride) is copied into that frame's slot. Duplicate and
/// empty rects add no pixels.
pub fn compose_texture<K>(result: &PackResult<K>, texture: &RgbaImage, grid: FrameGrid) -> RgbaImage {
    let mut canvas = RgbaImage::new(result.width * grid.frames_x, result.height * grid.frames_y);
    let (tw, th) = texture.dimensions();
    let src_stride = (tw / grid.frames_x.max(1), th / grid.frames_y.max(1));

    for r in result.rects.iter().filter(|r| r.occupies_space()) {
        for i in 0..grid.frames_x {
            for j in 0..grid.frames_y {
                let src = Rect::new(
                    r.source.x + i * src_stride.0,
                    r.source.y + j * src_stride.1,
                    r.source.w,
                    r.source.h,
                );
                let dx = r.placed.x + i * result.width;
                let dy = r.placed.y + j * result.height;
                blit_rgba(texture, &mut canvas, dx, dy, src);
            }
        }
    }
    canvas
}
