use crate::model::{PackResult, PlacedRect};
use serde_json::{Value, json};

fn rect_fields<K: ToString>(r: &PlacedRect<K>) -> Value {
    json!({
        "uv": r.placed.to_uv(),
        "sourceUv": r.source.to_uv(),
        "frame": {"x": r.placed.x, "y": r.placed.y, "w": r.placed.w, "h": r.placed.h},
        "mirror": r.placed.mirror,
        "duplicateOf": r.duplicate_of.as_ref().map(|k| k.to_string()),
        "empty": r.empty,
    })
}

/// Serialize a `PackResult` as `{ width, height, rects: [...], stats }`, rects in
/// processing order.
pub fn to_json<K: ToString>(result: &PackResult<K>) -> Value {
    let rects: Vec<Value> = result
        .rects
        .iter()
        .map(|r| {
            let mut v = rect_fields(r);
            v["key"] = json!(r.key.to_string());
            v
        })
        .collect();
    json!({
        "width": result.width,
        "height": result.height,
        "rects": rects,
        "stats": result.stats(),
    })
}

/// Same content keyed by rect name: `{ width, height, rects: { key: {...} }, stats }`.
/// Later rects with an equal key overwrite earlier ones.
pub fn to_json_hash<K: ToString>(result: &PackResult<K>) -> Value {
    let mut rects = serde_json::Map::new();
    for r in &result.rects {
        rects.insert(r.key.to_string(), rect_fields(r));
    }
    json!({
        "width": result.width,
        "height": result.height,
        "rects": rects,
        "stats": result.stats(),
    })
}
