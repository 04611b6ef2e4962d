//! Pixel comparison between face regions: exact/near duplicates and mirrored copies.
//!
//! All functions are pure. A size mismatch between the two buffers is never an
//! error; it simply does not match.

use crate::model::Mirror;
use image::RgbaImage;

const MIRROR_HYPOTHESES: [Mirror; 3] = [Mirror::X, Mirror::Y, Mirror::XY];

/// True if every pixel has alpha 0. Empty buffers count as transparent.
pub fn is_transparent(img: &RgbaImage) -> bool {
    img.as_raw().chunks_exact(4).all(|px| px[3] == 0)
}

/// Number of matching pixels out of `total` needed to reach `threshold` percent.
pub fn required_matches(total: u64, threshold: f32) -> u64 {
    let t = f64::from(threshold.clamp(0.0, 100.0));
    ((total as f64) * t / 100.0).ceil() as u64
}

/// Percentage (0..=100) of pixel positions whose RGBA channels match exactly.
/// `None` when sizes differ.
pub fn similarity(a: &RgbaImage, b: &RgbaImage) -> Option<f64> {
    if a.dimensions() != b.dimensions() {
        return None;
    }
    let total = a.as_raw().len() / 4;
    if total == 0 {
        return Some(100.0);
    }
    let matching = a
        .as_raw()
        .chunks_exact(4)
        .zip(b.as_raw().chunks_exact(4))
        .filter(|(pa, pb)| pa == pb)
        .count();
    Some(matching as f64 / total as f64 * 100.0)
}

/// True if at least `threshold` percent of the pixels match exactly.
///
/// Byte-identical buffers short-circuit; otherwise the scan stops as soon as
/// the outcome is decided.
pub fn is_duplicate(a: &RgbaImage, b: &RgbaImage, threshold: f32) -> bool {
    if a.dimensions() != b.dimensions() {
        return false;
    }
    if a.as_raw() == b.as_raw() {
        return true;
    }
    let total = (a.as_raw().len() / 4) as u64;
    let required = required_matches(total, threshold);
    let mut matches = 0u64;
    if matches >= required {
        return true;
    }
    for (i, (pa, pb)) in a
        .as_raw()
        .chunks_exact(4)
        .zip(b.as_raw().chunks_exact(4))
        .enumerate()
    {
        if pa == pb {
            matches += 1;
            if matches >= required {
                return true;
            }
        } else {
            let remaining = total - i as u64 - 1;
            if matches + remaining < required {
                return false;
            }
        }
    }
    false
}

/// Detects whether `a` is `b` read reversed along an axis.
///
/// Hypotheses are x (`a[x,y] == b[w-1-x,y]`), y and xy. The one with the most
/// matching pixels among those reaching `threshold` wins; ties keep the order
/// x, y, xy. Returns [`Mirror::None`] when no hypothesis qualifies.
pub fn detect_mirror(a: &RgbaImage, b: &RgbaImage, threshold: f32) -> Mirror {
    if a.dimensions() != b.dimensions() {
        return Mirror::None;
    }
    let (w, h) = a.dimensions();
    let total = w as u64 * h as u64;
    if total == 0 {
        return Mirror::None;
    }
    let required = required_matches(total, threshold);
    let (ra, rb) = (a.as_raw(), b.as_raw());

    let mut matches = [0u64; 3];
    let mut alive = [true; 3];
    let mut visited = 0u64;
    for y in 0..h {
        for x in 0..w {
            visited += 1;
            let remaining = total - visited;
            let pa = pixel(ra, w, x, y);
            for (k, axis) in MIRROR_HYPOTHESES.iter().enumerate() {
                if !alive[k] {
                    continue;
                }
                let bx = if axis.flips_x() { w - 1 - x } else { x };
                let by = if axis.flips_y() { h - 1 - y } else { y };
                if pa == pixel(rb, w, bx, by) {
                    matches[k] += 1;
                } else if matches[k] + remaining < required {
                    alive[k] = false;
                }
            }
            if !alive.iter().any(|&a| a) {
                return Mirror::None;
            }
        }
    }

    let mut best: Option<(Mirror, u64)> = None;
    for (k, axis) in MIRROR_HYPOTHESES.iter().enumerate() {
        if !alive[k] || matches[k] < required {
            continue;
        }
        if best.is_none_or(|(_, m)| matches[k] > m) {
            best = Some((*axis, matches[k]));
        }
    }
    best.map_or(Mirror::None, |(axis, _)| axis)
}

#[inline]
fn pixel(raw: &[u8], w: u32, x: u32, y: u32) -> &[u8] {
    let i = (y as usize * w as usize + x as usize) * 4;
    &raw[i..i + 4]
}
