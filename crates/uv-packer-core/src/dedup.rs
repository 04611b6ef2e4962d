//! Duplicate resolution over a list of face pixel buffers.

use crate::model::Mirror;
use crate::similarity::{detect_mirror, is_duplicate};
use image::RgbaImage;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// An item whose content is found in an earlier item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duplicate {
    /// Index of the earlier item owning the slot.
    pub target: usize,
    /// How the item's pixels relate to the target's: `None` for an exact
    /// match, otherwise the axis the target must be read reversed along.
    pub axis: Mirror,
}

/// Compares every item against the primaries before it.
///
/// Items without pixels are never duplicates and never targets. The first
/// primary that matches wins; for each primary an exact match is tried before
/// a mirrored one.
pub fn resolve(
    pixels: &[Option<&RgbaImage>],
    threshold: f32,
    parallel: bool,
) -> Vec<Option<Duplicate>> {
    let mut out: Vec<Option<Duplicate>> = Vec::with_capacity(pixels.len());
    let mut primaries: Vec<usize> = Vec::new();
    for (i, item) in pixels.iter().enumerate() {
        let Some(img) = item else {
            out.push(None);
            continue;
        };
        let found = find_target(img, &primaries, pixels, threshold, parallel);
        match found {
            Some(dup) => {
                debug!(index = i, target = dup.target, axis = %dup.axis, "duplicate face");
                out.push(Some(dup));
            }
            None => {
                primaries.push(i);
                out.push(None);
            }
        }
    }
    out
}

fn compare(img: &RgbaImage, target: usize, other: &RgbaImage, threshold: f32) -> Option<Duplicate> {
    if img.dimensions() != other.dimensions() {
        return None;
    }
    if is_duplicate(img, other, threshold) {
        return Some(Duplicate {
            target,
            axis: Mirror::None,
        });
    }
    let axis = detect_mirror(img, other, threshold);
    (!axis.is_none()).then_some(Duplicate { target, axis })
}

fn find_target(
    img: &RgbaImage,
    primaries: &[usize],
    pixels: &[Option<&RgbaImage>],
    threshold: f32,
    parallel: bool,
) -> Option<Duplicate> {
    let check = |&t: &usize| pixels[t].and_then(|other| compare(img, t, other, threshold));

    #[cfg(feature = "parallel")]
    {
        if parallel {
            return primaries.par_iter().find_map_first(check);
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    primaries.iter().find_map(check)
}
