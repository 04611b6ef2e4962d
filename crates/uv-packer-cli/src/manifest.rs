use std::fs;
use std::path::Path;

use anyhow::Context;
use image::RgbaImage;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uv_packer_core::{FaceKey, PackRect, PackResult, Region, extract_region};

/// Face manifest of a model: elements with per-face UV quads, in texture pixels.
///
/// ```yaml
/// texture_size: [64, 64]
/// elements:
///   - id: head
///     faces:
///       north: { uv: [8, 8, 16, 16] }
///       up: { uv: [16, 8, 8, 0] }
///       down: { uv: [0, 0, 0, 0], empty: true }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Size of one texture frame. Defaults to the size of the first texture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture_size: Option<[u32; 2]>,
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    pub id: String,
    /// Faces in file order; this order decides processing order when
    /// sorting is off and which face a duplicate resolves to.
    #[serde(default)]
    pub faces: IndexMap<String, Face>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Face {
    pub uv: [f32; 4],
    #[serde(default, skip_serializing_if = "is_false")]
    pub empty: bool,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl Manifest {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read manifest {}", path.display()))?;
        let manifest = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => serde_yaml::from_str(&text)
                .with_context(|| format!("parse manifest {}", path.display()))?,
            _ => serde_json::from_str(&text)
                .with_context(|| format!("parse manifest {}", path.display()))?,
        };
        Ok(manifest)
    }

    pub fn face_count(&self) -> usize {
        self.elements.iter().map(|e| e.faces.len()).sum()
    }

    /// Regions of every face, keyed by (element, face), in manifest order.
    pub fn regions(&self) -> Vec<(FaceKey, Region, bool)> {
        self.elements
            .iter()
            .flat_map(|el| {
                el.faces.iter().map(move |(tag, face)| {
                    (
                        FaceKey::new(el.id.clone(), tag.clone()),
                        Region::from_uv(face.uv),
                        face.empty,
                    )
                })
            })
            .collect()
    }

    /// Copy of the manifest with UVs rewritten to their packed placement.
    pub fn rewritten(&self, result: &PackResult<FaceKey>) -> Self {
        let mut out = self.clone();
        out.texture_size = Some([result.width, result.height]);
        for el in &mut out.elements {
            for (tag, face) in el.faces.iter_mut() {
                let key = FaceKey::new(el.id.clone(), tag.clone());
                if let Some(placed) = result.find(&key) {
                    face.uv = placed.placed.to_uv();
                }
            }
        }
        out
    }
}

/// Pixel buffers for each face, cropped from `texture` (its first frame).
pub fn face_pixels(regions: &[(FaceKey, Region, bool)], texture: &RgbaImage) -> Vec<Option<RgbaImage>> {
    regions
        .iter()
        .map(|(_, region, _)| extract_region(texture, region))
        .collect()
}

/// Builds pack rects borrowing the extracted pixel buffers.
pub fn pack_rects<'a>(
    regions: &[(FaceKey, Region, bool)],
    pixels: &'a [Option<RgbaImage>],
) -> Vec<PackRect<'a, FaceKey>> {
    regions
        .iter()
        .zip(pixels)
        .map(|((key, region, empty), px)| {
            let rect = PackRect::new(key.clone(), *region).with_empty(*empty);
            match px {
                Some(px) => rect.with_pixels(px),
                None => rect,
            }
        })
        .collect()
}
