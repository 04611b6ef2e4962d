use crate::config::{Algorithm, PackOptions};
use crate::dedup::{self, Duplicate};
use crate::error::{Result, UvPackError};
use crate::model::{PackRect, PackResult, PlacedRect, Region};
use crate::packer::{
    Layout, Packer, maxrects::MaxRectsPacker, shelf::ShelfPacker, skyline::SkylinePacker,
};
use std::time::Instant;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// How one rectangle (in processing order) is resolved.
#[derive(Debug, Clone, Copy)]
enum Slot {
    /// Index into the layout's positions.
    Own(usize),
    /// Shares the slot of an earlier item (processing index).
    Shared(Duplicate),
    Degenerate,
}

#[instrument(skip_all)]
/// Packs `rects` onto a power-of-two canvas according to `options`.
///
/// Notes:
/// - Sorting is stable; rects come back in processing order (sorted when
///   `options.sort`, input order otherwise).
/// - Degenerate rects (zero size, flagged empty, fully transparent) share one
///   1x1 slot at the first free pixel of the final canvas.
/// - With `similar_check`, rects whose pixels match an earlier placed rect,
///   directly or mirrored, reuse its slot and record `duplicate_of`.
pub fn pack<K: Clone>(rects: &[PackRect<'_, K>], options: &PackOptions) -> Result<PackResult<K>> {
    options.validate()?;

    if rects.is_empty() {
        return Err(UvPackError::InvalidInput("no rectangles to pack".into()));
    }
    for (i, r) in rects.iter().enumerate() {
        if let Some(px) = r.pixels {
            let (pw, ph) = px.dimensions();
            if (pw, ph) != (r.region.w, r.region.h) {
                return Err(UvPackError::InvalidInput(format!(
                    "rect {i}: pixel buffer is {pw}x{ph} but region is {}x{}",
                    r.region.w, r.region.h
                )));
            }
        }
    }

    let start = Instant::now();
    let order = processing_order(rects, options);
    debug!(
        algorithm = ?options.algorithm,
        rects = rects.len(),
        max_size = options.max_size,
        padding = options.padding,
        "packing"
    );

    let degenerate: Vec<bool> = order.iter().map(|&i| rects[i].is_degenerate()).collect();
    let duplicates: Vec<Option<Duplicate>> = if options.similar_check {
        let pixels: Vec<_> = order
            .iter()
            .zip(&degenerate)
            .map(|(&i, &d)| if d { None } else { rects[i].pixels })
            .collect();
        dedup::resolve(&pixels, options.similarity_threshold, options.parallel)
    } else {
        vec![None; order.len()]
    };

    let mut sizes: Vec<(u32, u32)> = Vec::with_capacity(order.len());
    let slots: Vec<Slot> = order
        .iter()
        .enumerate()
        .map(|(p, &i)| {
            if degenerate[p] {
                Slot::Degenerate
            } else if let Some(dup) = duplicates[p] {
                Slot::Shared(dup)
            } else {
                sizes.push((rects[i].region.w, rects[i].region.h));
                Slot::Own(sizes.len() - 1)
            }
        })
        .collect();

    let layout = run_strategy(options, &sizes)?;
    let empty_region = Region::new(layout.empty_slot.0, layout.empty_slot.1, 1, 1);

    let mut placed: Vec<PlacedRect<K>> = Vec::with_capacity(order.len());
    for (p, &i) in order.iter().enumerate() {
        let rect = &rects[i];
        let entry = match slots[p] {
            Slot::Own(k) => {
                let (x, y) = layout.positions[k];
                PlacedRect {
                    key: rect.key.clone(),
                    source: rect.region,
                    placed: Region::new(x, y, rect.region.w, rect.region.h)
                        .with_mirror(rect.region.mirror),
                    duplicate_of: None,
                    empty: false,
                }
            }
            Slot::Shared(dup) => {
                // targets always precede their duplicates
                let target = &placed[dup.target];
                PlacedRect {
                    key: rect.key.clone(),
                    source: rect.region,
                    placed: target
                        .placed
                        .with_mirror(rect.region.mirror.compose(dup.axis)),
                    duplicate_of: Some(target.key.clone()),
                    empty: false,
                }
            }
            Slot::Degenerate => PlacedRect {
                key: rect.key.clone(),
                source: rect.region,
                placed: empty_region,
                duplicate_of: None,
                empty: true,
            },
        };
        placed.push(entry);
    }

    let result = PackResult {
        width: layout.width,
        height: layout.height,
        rects: placed,
    };
    let stats = result.stats();
    info!(
        width = result.width,
        height = result.height,
        placed = stats.num_placed,
        duplicates = stats.num_duplicates,
        empty = stats.num_empty,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "packed"
    );
    Ok(result)
}

/// Packs independent rect sets, one result per set.
///
/// Runs the sets on rayon when the "parallel" feature is enabled and
/// `options.parallel` is set.
pub fn pack_batch<K: Clone + Send + Sync>(
    sets: &[Vec<PackRect<'_, K>>],
    options: &PackOptions,
) -> Vec<Result<PackResult<K>>> {
    #[cfg(feature = "parallel")]
    {
        if options.parallel {
            return sets.par_iter().map(|set| pack(set, options)).collect();
        }
    }
    sets.iter().map(|set| pack(set, options)).collect()
}

/// Input indices in the order the strategy consumes them.
fn processing_order<K>(rects: &[PackRect<'_, K>], options: &PackOptions) -> Vec<usize> {
    let mut order: Vec<usize> = (0..rects.len()).collect();
    if options.sort {
        match options.algorithm {
            Algorithm::Skyline => {
                order.sort_by(|&a, &b| rects[b].region.h.cmp(&rects[a].region.h));
            }
            Algorithm::Shelf | Algorithm::MaxRects => {
                let side = |i: usize| rects[i].region.w.max(rects[i].region.h);
                order.sort_by(|&a, &b| side(b).cmp(&side(a)));
            }
        }
    }
    order
}

fn run_strategy(options: &PackOptions, sizes: &[(u32, u32)]) -> Result<Layout> {
    let mut packer: Box<dyn Packer> = match options.algorithm {
        Algorithm::Shelf => Box::new(ShelfPacker::new(options)),
        Algorithm::MaxRects => Box::new(MaxRectsPacker::new(options)),
        Algorithm::Skyline => Box::new(SkylinePacker::new(options)),
    };
    packer.pack(sizes)
}
