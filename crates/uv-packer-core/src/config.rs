use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Packing algorithms.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Rows of rectangles; tries every power-of-two width and keeps the smallest canvas.
    Shelf,
    /// Free-rectangle list with best short-side fit.
    MaxRects,
    /// Height profile over a canvas that grows on demand.
    #[default]
    Skyline,
}

impl FromStr for Algorithm {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "shelf" => Ok(Self::Shelf),
            "maxrects" | "max_rects" => Ok(Self::MaxRects),
            "skyline" => Ok(Self::Skyline),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PackOptions {
    pub algorithm: Algorithm,
    /// Power-of-two ceiling for both canvas axes.
    pub max_size: u32,
    /// Gap kept to the right of and below every placed rectangle.
    pub padding: u32,
    /// Pre-sort rectangles (by longest side, or by height for Skyline).
    pub sort: bool,
    /// Fold duplicate and mirrored faces onto a shared slot.
    pub similar_check: bool,
    /// Percentage (0..=100) of matching pixels needed to treat faces as equal.
    pub similarity_threshold: f32,
    /// Search duplicates and batches on rayon when feature "parallel" is on.
    pub parallel: bool,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            max_size: 1024,
            padding: 0,
            sort: true,
            similar_check: false,
            similarity_threshold: 90.0,
            parallel: false,
        }
    }
}

impl PackOptions {
    /// Validates the options.
    ///
    /// Returns an error if `max_size` is zero or not a power of two, or if the
    /// similarity threshold lies outside `0..=100`.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::UvPackError;

        if !crate::pow2::is_pow2(self.max_size) {
            return Err(UvPackError::InvalidInput(format!(
                "max_size ({}) must be a non-zero power of two",
                self.max_size
            )));
        }
        if !self.similarity_threshold.is_finite()
            || !(0.0..=100.0).contains(&self.similarity_threshold)
        {
            return Err(UvPackError::InvalidInput(format!(
                "similarity_threshold ({}) must be within 0..=100",
                self.similarity_threshold
            )));
        }
        Ok(())
    }

    /// Create a fluent builder for `PackOptions`.
    pub fn builder() -> PackOptionsBuilder {
        PackOptionsBuilder::new()
    }
}

/// Builder for `PackOptions` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PackOptionsBuilder {
    opts: PackOptions,
}

impl PackOptionsBuilder {
    pub fn new() -> Self {
        Self {
            opts: PackOptions::default(),
        }
    }
    pub fn algorithm(mut self, v: Algorithm) -> Self {
        self.opts.algorithm = v;
        self
    }
    pub fn max_size(mut self, v: u32) -> Self {
        self.opts.max_size = v;
        self
    }
    pub fn padding(mut self, v: u32) -> Self {
        self.opts.padding = v;
        self
    }
    pub fn sort(mut self, v: bool) -> Self {
        self.opts.sort = v;
        self
    }
    pub fn similar_check(mut self, v: bool) -> Self {
        self.opts.similar_check = v;
        self
    }
    pub fn similarity_threshold(mut self, v: f32) -> Self {
        self.opts.similarity_threshold = v;
        self
    }
    pub fn parallel(mut self, v: bool) -> Self {
        self.opts.parallel = v;
        self
    }
    pub fn build(self) -> PackOptions {
        self.opts
    }
}
