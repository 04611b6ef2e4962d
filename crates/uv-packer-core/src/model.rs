use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge (`x + w`).
    pub fn right_ex(&self) -> u32 {
        self.x + self.w
    }
    /// Exclusive bottom edge (`y + h`).
    pub fn bottom_ex(&self) -> u32 {
        self.y + self.h
    }
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }
    /// Returns true if `r` is fully inside `self`.
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x
            && r.y >= self.y
            && r.right_ex() <= self.right_ex()
            && r.bottom_ex() <= self.bottom_ex()
    }
    /// Strict intersection; rectangles sharing only an edge do not intersect.
    pub fn intersects(&self, r: &Rect) -> bool {
        !(self.x >= r.right_ex()
            || r.x >= self.right_ex()
            || self.y >= r.bottom_ex()
            || r.y >= self.bottom_ex())
    }
    pub fn contains_point(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right_ex() && y >= self.y && y < self.bottom_ex()
    }
}

/// Axis a face's content is read reversed along.
///
/// The four states form a Klein four-group under [`Mirror::compose`]: flipping
/// twice on the same axis cancels, `X` then `Y` yields `XY`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mirror {
    #[default]
    None,
    X,
    Y,
    XY,
}

impl Mirror {
    pub const ALL: [Mirror; 4] = [Mirror::None, Mirror::X, Mirror::Y, Mirror::XY];

    pub fn from_flags(flip_x: bool, flip_y: bool) -> Self {
        match (flip_x, flip_y) {
            (false, false) => Self::None,
            (true, false) => Self::X,
            (false, true) => Self::Y,
            (true, true) => Self::XY,
        }
    }

    pub fn flips_x(self) -> bool {
        matches!(self, Self::X | Self::XY)
    }

    pub fn flips_y(self) -> bool {
        matches!(self, Self::Y | Self::XY)
    }

    /// Composition table of the flip operation.
    pub fn compose(self, other: Mirror) -> Mirror {
        use Mirror::*;
        match (self, other) {
            (None, m) | (m, None) => m,
            (X, X) | (Y, Y) | (XY, XY) => None,
            (X, Y) | (Y, X) => XY,
            (X, XY) | (XY, X) => Y,
            (Y, XY) | (XY, Y) => X,
        }
    }

    pub fn is_none(self) -> bool {
        self == Self::None
    }
}

impl fmt::Display for Mirror {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::X => "x",
            Self::Y => "y",
            Self::XY => "xy",
        };
        f.write_str(s)
    }
}

/// A face region on a texture: integer location and size plus the mirror
/// state its UV quad encodes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    #[serde(default)]
    pub mirror: Mirror,
}

impl Region {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            x,
            y,
            w,
            h,
            mirror: Mirror::None,
        }
    }

    pub fn with_mirror(mut self, mirror: Mirror) -> Self {
        self.mirror = mirror;
        self
    }

    /// Builds a region from a `[u1, v1, u2, v2]` quad. Reversed corners encode
    /// mirroring; fractional sizes round up.
    pub fn from_uv(uv: [f32; 4]) -> Self {
        let w = (uv[2] - uv[0]).abs().ceil() as u32;
        let h = (uv[3] - uv[1]).abs().ceil() as u32;
        let x = uv[0].min(uv[2]).floor().max(0.0) as u32;
        let y = uv[1].min(uv[3]).floor().max(0.0) as u32;
        Self {
            x,
            y,
            w,
            h,
            mirror: Mirror::from_flags(uv[0] > uv[2], uv[1] > uv[3]),
        }
    }

    pub fn to_uv(&self) -> [f32; 4] {
        let (x, y) = (self.x as f32, self.y as f32);
        let (x2, y2) = ((self.x + self.w) as f32, (self.y + self.h) as f32);
        match self.mirror {
            Mirror::None => [x, y, x2, y2],
            Mirror::X => [x2, y, x, y2],
            Mirror::Y => [x, y2, x2, y],
            Mirror::XY => [x2, y2, x, y],
        }
    }

    /// Same location and size, mirror composed with `axis`.
    pub fn flip(&self, axis: Mirror) -> Self {
        self.with_mirror(self.mirror.compose(axis))
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn is_zero_sized(&self) -> bool {
        self.w == 0 || self.h == 0
    }
}

/// Identity of a model face: the owning element plus the face tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FaceKey {
    pub element: String,
    pub face: String,
}

impl FaceKey {
    pub fn new(element: impl Into<String>, face: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            face: face.into(),
        }
    }
}

impl fmt::Display for FaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.element, self.face)
    }
}

/// A rectangle to pack: identity, source region and optional pixel content.
///
/// Pixels are borrowed; the packer only reads them for the duration of a call.
#[derive(Debug, Clone)]
pub struct PackRect<'a, K = String> {
    pub key: K,
    pub region: Region,
    /// Explicitly marks the face as carrying no content.
    pub empty: bool,
    pub pixels: Option<&'a RgbaImage>,
}

impl<'a, K> PackRect<'a, K> {
    pub fn new(key: K, region: Region) -> Self {
        Self {
            key,
            region,
            empty: false,
            pixels: None,
        }
    }

    /// Layout-only rectangle at the origin.
    pub fn sized(key: K, w: u32, h: u32) -> Self {
        Self::new(key, Region::new(0, 0, w, h))
    }

    pub fn with_pixels(mut self, pixels: &'a RgbaImage) -> Self {
        self.pixels = Some(pixels);
        self
    }

    pub fn with_empty(mut self, empty: bool) -> Self {
        self.empty = empty;
        self
    }

    /// Zero-sized, flagged empty, or fully transparent content.
    pub fn is_degenerate(&self) -> bool {
        self.empty
            || self.region.is_zero_sized()
            || self.pixels.is_some_and(crate::similarity::is_transparent)
    }
}

/// A rectangle after packing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedRect<K = String> {
    pub key: K,
    /// Region the content was read from.
    pub source: Region,
    /// Region in the packed canvas; its mirror tells how to read the slot.
    pub placed: Region,
    /// Key of the rectangle whose slot this one shares.
    pub duplicate_of: Option<K>,
    /// True if the rectangle was resolved to the shared degenerate slot.
    pub empty: bool,
}

impl<K> PlacedRect<K> {
    pub fn is_duplicate(&self) -> bool {
        self.duplicate_of.is_some()
    }
    /// Owns real estate in the canvas.
    pub fn occupies_space(&self) -> bool {
        !self.empty && self.duplicate_of.is_none()
    }
}

/// Output of a packing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackResult<K = String> {
    pub width: u32,
    pub height: u32,
    pub rects: Vec<PlacedRect<K>>,
}

impl<K: PartialEq> PackResult<K> {
    pub fn find(&self, key: &K) -> Option<&PlacedRect<K>> {
        self.rects.iter().find(|r| &r.key == key)
    }
}

impl<K> PackResult<K> {
    /// Computes packing statistics for this result.
    pub fn stats(&self) -> PackStats {
        let mut num_placed = 0;
        let mut num_duplicates = 0;
        let mut num_empty = 0;
        let mut used_area = 0u64;
        for r in &self.rects {
            if r.empty {
                num_empty += 1;
            } else if r.duplicate_of.is_some() {
                num_duplicates += 1;
            } else {
                num_placed += 1;
                used_area += r.placed.rect().area();
            }
        }
        let canvas_area = self.width as u64 * self.height as u64;
        let occupancy = if canvas_area > 0 {
            used_area as f64 / canvas_area as f64
        } else {
            0.0
        };
        PackStats {
            num_rects: self.rects.len(),
            num_placed,
            num_duplicates,
            num_empty,
            width: self.width,
            height: self.height,
            canvas_area,
            used_area,
            occupancy,
        }
    }
}

/// Statistics about packing efficiency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PackStats {
    pub num_rects: usize,
    /// Rectangles that received their own slot.
    pub num_placed: usize,
    /// Rectangles folded onto another rectangle's slot.
    pub num_duplicates: usize,
    /// Degenerate rectangles sharing the empty slot.
    pub num_empty: usize,
    pub width: u32,
    pub height: u32,
    pub canvas_area: u64,
    pub used_area: u64,
    /// used_area / canvas_area (0.0 to 1.0).
    pub occupancy: f64,
}

impl PackStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Canvas: {}x{}, Rects: {} (placed {}, duplicates {}, empty {}), Occupancy: {:.2}%, Used Area: {} px²",
            self.width,
            self.height,
            self.num_rects,
            self.num_placed,
            self.num_duplicates,
            self.num_empty,
            self.occupancy * 100.0,
            self.used_area,
        )
    }

    /// Returns wasted space in pixels.
    pub fn wasted_area(&self) -> u64 {
        self.canvas_area.saturating_sub(self.used_area)
    }

    /// Returns wasted space as a percentage (0.0 to 100.0).
    pub fn waste_percentage(&self) -> f64 {
        if self.canvas_area > 0 {
            (self.wasted_area() as f64 / self.canvas_area as f64) * 100.0
        } else {
            0.0
        }
    }
}
