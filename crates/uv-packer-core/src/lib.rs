//! Core library for repacking model UV faces into power-of-two textures.
//!
//! - Algorithms: Shelf (best power-of-two width), MaxRects (best short-side fit), Skyline (growing canvas)
//! - Similarity: exact / near-duplicate and mirrored faces share one slot when `similar_check` is on
//! - Pipeline: `pack` takes face rects (+ optional borrowed pixels) and returns placements
//! - Helpers: region extraction, texture composition and JSON export.
//!
//! Quick example:
//! ```ignore
//! use uv_packer_core::prelude::*;
//! # fn main() -> anyhow::Result<()> {
//! let texture = image::open("skin.png")?.to_rgba8();
//! let head = Region::from_uv([0.0, 0.0, 8.0, 8.0]);
//! let px = extract_region(&texture, &head).unwrap();
//! let rects = vec![PackRect::new("head#north".to_string(), head).with_pixels(&px)];
//! let opts = PackOptions::builder().max_size(256).similar_check(true).build();
//! let out = pack(&rects, &opts)?;
//! println!("{}", out.stats().summary());
//! # Ok(()) }
//! ```

pub mod compositing;
pub mod config;
pub mod dedup;
pub mod error;
pub mod export;
pub mod model;
pub mod packer;
pub mod pipeline;
pub mod pow2;
pub mod similarity;

pub use compositing::*;
pub use config::*;
pub use error::*;
pub use export::*;
pub use model::*;
pub use packer::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `uv_packer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::compositing::{FrameGrid, compose_texture, extract_region};
    pub use crate::config::{Algorithm, PackOptions, PackOptionsBuilder};
    pub use crate::model::{
        FaceKey, Mirror, PackRect, PackResult, PackStats, PlacedRect, Rect, Region,
    };
    pub use crate::similarity::{detect_mirror, is_duplicate, similarity};
    pub use crate::{UvPackError, pack, pack_batch, to_json};
}
